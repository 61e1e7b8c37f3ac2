pub mod color;
pub mod scale;
