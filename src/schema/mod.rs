//! Schema module - Configuration and seeding types for GIF rendering.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
