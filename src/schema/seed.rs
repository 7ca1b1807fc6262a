//! Seed types for initializing the simulated grid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Selection;
use crate::compute::{BoundsTooLarge, LifeGrid, RleError, Rule, RuleError, parse_rle};

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to place on the grid.
    pub pattern: Pattern,
    /// Rule override. Falls back to the RLE header rule, then B3/S23.
    #[serde(default)]
    pub rule: Option<String>,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Rle {
                rle: "x = 3, y = 3, rule = B3/S23\nbob$2bo$3o!".to_string(),
            },
            rule: None,
        }
    }
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Inline RLE document.
    Rle { rle: String },
    /// Explicit list of live `(col, row)` cells.
    Cells { cells: Vec<(i64, i64)> },
    /// Random soup filling a `width` x `height` box at the origin.
    Noise {
        width: u32,
        height: u32,
        /// Probability that a cell starts alive (0.0-1.0).
        density: f64,
        /// Random seed.
        seed: u64,
    },
}

/// Seeded grid plus the rectangle the seed naturally occupies.
#[derive(Debug, Clone)]
pub struct SeededGrid {
    pub grid: LifeGrid,
    /// Bounding rectangle of the seed, `None` for an empty cell list.
    pub bounds: Option<Selection>,
}

impl Seed {
    /// Build the initial grid.
    pub fn generate(&self) -> Result<SeededGrid, SeedError> {
        let explicit_rule = self.rule.as_deref().map(str::parse::<Rule>).transpose()?;

        let (cells, bounds, header_rule) = match &self.pattern {
            Pattern::Rle { rle } => {
                let parsed = parse_rle(rle)?;
                let bounds = Selection::new(0, 0, parsed.width, parsed.height);
                (parsed.cells, Some(bounds), parsed.rule)
            }
            Pattern::Cells { cells } => (cells.clone(), None, None),
            Pattern::Noise {
                width,
                height,
                density,
                seed,
            } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(SeedError::InvalidDensity(*density));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                let mut cells = Vec::new();
                for y in 0..*height as i64 {
                    for x in 0..*width as i64 {
                        if rng.gen_bool(*density) {
                            cells.push((x, y));
                        }
                    }
                }
                (cells, Some(Selection::new(0, 0, *width, *height)), None)
            }
        };

        let rule = explicit_rule.or(header_rule).unwrap_or_default();
        let grid = LifeGrid::from_cells(rule, cells);
        let bounds = match bounds {
            Some(bounds) => Some(bounds),
            None => grid.bounding_box()?,
        };
        Ok(SeededGrid { grid, bounds })
    }
}

/// Seed construction errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid RLE pattern: {0}")]
    Rle(#[from] RleError),
    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),
    #[error("Noise density must be within [0, 1], got {0}")]
    InvalidDensity(f64),
    #[error(transparent)]
    Bounds(#[from] BoundsTooLarge),
}
