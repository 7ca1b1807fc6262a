//! Compute module - Grid simulation, rasterization and LZW compression.

mod life;
mod lzw;
mod raster;
mod rle;

pub use life::*;
pub use lzw::*;
pub use raster::*;
pub use rle::*;
