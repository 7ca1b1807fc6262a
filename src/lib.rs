//! Life GIF - Animated GIF rendering of Life-like cellular automata.
//!
//! This crate runs a Life-like automaton and writes each generation as a
//! frame of a looping GIF89a animation, drawn with LifeWiki conventions:
//! white dead cells, black live cells and gray gridlines. Frame data is
//! compressed with a small, self-contained GIF LZW encoder.
//!
//! # Architecture
//!
//! - `schema`: Configuration types and seeding
//! - `compute`: Simulation, rasterization and LZW compression
//! - `animation`: GIF block layout, recorder and the frame loop
//!
//! # Example
//!
//! ```rust,no_run
//! use life_gif::{
//!     animation::{render_to_file, resolve_selection},
//!     schema::{AnimationConfig, Seed},
//! };
//!
//! let config = AnimationConfig {
//!     frames: 16,
//!     cell_size: 6,
//!     ..Default::default()
//! };
//!
//! // Glider, in its own 3x3 bounding box
//! let mut seeded = Seed::default().generate()?;
//! let selection = resolve_selection(&config, seeded.bounds)?;
//!
//! let stats = render_to_file(&config, &selection, &mut seeded.grid)?;
//! println!("{stats}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod animation;
pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use animation::{
    AnimationError, AnimationStats, GifRecorder, render_animation, render_to_file,
};
pub use compute::{FrameRasterizer, GridState, LifeGrid, LzwEncoder, PixelSampler, Rule};
pub use schema::{AnimationConfig, Canvas, Palette, Seed, Selection};
