//! Base map tile download and decoding

pub mod loader;

pub use loader::{DecodedTile, TileLoader, TileLoaderConfig, TileResult};
