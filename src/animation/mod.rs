//! Animated GIF output for Life-like simulations.
//!
//! # File Layout
//!
//! ```text
//! Header (25 bytes):
//!   Signature: "GIF89a" (6 bytes)
//!   Logical screen: width u16, height u16, flags 0x91, background, aspect
//!   Global color table: 4 RGB entries (12 bytes)
//!
//! Application extension (19 bytes):
//!   NETSCAPE2.0, loop count 0 (forever)
//!
//! Per frame:
//!   Graphic control extension (8 bytes): delay in centiseconds
//!   Image descriptor (10 bytes): full canvas at (0, 0)
//!   Minimum code size: 2
//!   LZW data sub-blocks, zero-length terminator
//!
//! Trailer: 0x3B
//! ```

use std::io;
use std::path::PathBuf;

mod format;
mod recorder;
mod render;

pub use format::{
    GIF_SIGNATURE, GifHeader, GraphicControl, ImageDescriptor, LoopExtension, SCREEN_FLAGS,
    TRAILER, write_frame_block,
};
pub use recorder::{AnimationStats, GifRecorder};
pub use render::{render_animation, render_to_file, resolve_selection};

use crate::schema::{ConfigError, SeedError};

/// Bytes one frame occupies in the file given its sub-blocked image data.
pub fn frame_block_len(image_data_len: usize) -> usize {
    GraphicControl::SIZE + ImageDescriptor::SIZE + 1 + image_data_len
}

/// Error type for animation rendering.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed: {0}")]
    Seed(#[from] SeedError),

    #[error("Unable to create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed writing {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
