pub mod feed;
pub mod geojson;
