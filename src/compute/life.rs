//! Life-like cellular automaton on an unbounded plane.
//!
//! This is the grid-state source the rasterizer samples from. The renderer
//! only ever sees it through [`GridState`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::schema::Selection;

/// Cell state lookup plus stepping, as consumed by the frame pipeline.
pub trait GridState {
    /// State of the cell at `(col, row)`: 0 dead, 1 live.
    fn get_cell(&self, col: i64, row: i64) -> u8;

    /// Advance the simulation by `steps` generations.
    fn advance(&mut self, steps: u64);
}

/// Outer-totalistic birth/survival rule. Bit `n` set means "n neighbors".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    birth: u16,
    survival: u16,
}

impl Rule {
    /// Conway's Game of Life.
    pub const CONWAY: Rule = Rule {
        birth: 1 << 3,
        survival: (1 << 2) | (1 << 3),
    };

    #[inline]
    pub fn births(&self, neighbors: u8) -> bool {
        self.birth & (1 << neighbors) != 0
    }

    #[inline]
    pub fn survives(&self, neighbors: u8) -> bool {
        self.survival & (1 << neighbors) != 0
    }

    fn digits(s: &str) -> Result<u16, RuleError> {
        s.chars().try_fold(0u16, |mask, c| match c.to_digit(10) {
            Some(d) if d <= 8 => Ok(mask | (1 << d)),
            _ => Err(RuleError::InvalidNeighborCount(c)),
        })
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    /// Accepts `B3/S23`, `b3s23` and the older `23/3` (survival/birth) form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (birth, survival) = if let Some(rest) = s.strip_prefix('b') {
            let (b, sv) = rest
                .split_once('s')
                .ok_or_else(|| RuleError::Malformed(s.clone()))?;
            (b.trim_end_matches('/'), sv)
        } else if let Some((sv, b)) = s.split_once('/') {
            (b, sv)
        } else {
            return Err(RuleError::Malformed(s));
        };

        let rule = Rule {
            birth: Self::digits(birth)?,
            survival: Self::digits(survival)?,
        };
        if rule.births(0) {
            return Err(RuleError::BirthOnZero);
        }
        Ok(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |mask: u16| -> String {
            (0..=8u8)
                .filter(|n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };
        write!(f, "B{}/S{}", list(self.birth), list(self.survival))
    }
}

/// Rule parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Malformed rule string: {0}")]
    Malformed(String),
    #[error("Invalid neighbor count in rule: {0:?}")]
    InvalidNeighborCount(char),
    #[error("B0 rules cannot run on an unbounded plane")]
    BirthOnZero,
}

/// Live cells spread wider than a [`Selection`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Live cells span {width}x{height} cells, beyond the {max} cell selection limit", max = u32::MAX)]
pub struct BoundsTooLarge {
    pub width: u128,
    pub height: u128,
}

/// Sparse set of live cells stepped under a [`Rule`].
#[derive(Debug, Clone, Default)]
pub struct LifeGrid {
    live: HashSet<(i64, i64)>,
    rule: Rule,
    generation: u64,
}

impl LifeGrid {
    pub fn new(rule: Rule) -> Self {
        Self {
            live: HashSet::new(),
            rule,
            generation: 0,
        }
    }

    /// Build a grid from a list of live `(col, row)` cells.
    pub fn from_cells<I>(rule: Rule, cells: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Self {
            live: cells.into_iter().collect(),
            rule,
            generation: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self, col: i64, row: i64) -> bool {
        self.live.contains(&(col, row))
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn population(&self) -> usize {
        self.live.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Smallest rectangle containing every live cell, or `None` when the
    /// grid is empty.
    pub fn bounding_box(&self) -> Result<Option<Selection>, BoundsTooLarge> {
        let mut iter = self.live.iter();
        let Some(&(x0, y0)) = iter.next() else {
            return Ok(None);
        };
        let (min_x, min_y, max_x, max_y) = iter.fold((x0, y0, x0, y0), |(a, b, c, d), &(x, y)| {
            (a.min(x), b.min(y), c.max(x), d.max(y))
        });
        let span = |lo: i64, hi: i64| (hi as i128 - lo as i128 + 1) as u128;
        let (width, height) = (span(min_x, max_x), span(min_y, max_y));
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok(Some(Selection::new(min_x, min_y, w, h))),
            _ => Err(BoundsTooLarge { width, height }),
        }
    }

    /// Compute one generation.
    pub fn step(&mut self) {
        let mut counts: HashMap<(i64, i64), u8> = HashMap::with_capacity(self.live.len() * 8);
        for &(x, y) in &self.live {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    // The plane ends at the edges of the i64 range.
                    if let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) {
                        *counts.entry((nx, ny)).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut next = HashSet::with_capacity(self.live.len());
        for &cell in &self.live {
            let n = counts.get(&cell).copied().unwrap_or(0);
            if self.rule.survives(n) {
                next.insert(cell);
            }
        }
        for (cell, n) in counts {
            if !self.live.contains(&cell) && self.rule.births(n) {
                next.insert(cell);
            }
        }

        self.live = next;
        self.generation += 1;
    }
}

impl GridState for LifeGrid {
    #[inline]
    fn get_cell(&self, col: i64, row: i64) -> u8 {
        self.is_alive(col, row) as u8
    }

    fn advance(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }
}
