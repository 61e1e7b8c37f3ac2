pub mod marker;
pub mod plates;
pub mod registry;
pub mod tile;
