//! Rasterization of grid state into 2-bit palette indices.

use super::life::GridState;
use crate::schema::{AnimationConfig, Canvas, Selection};

/// Palette index of a dead cell.
pub const DEAD: u8 = 0;
/// Palette index of a live cell.
pub const LIVE: u8 = 1;
/// Palette index of a gridline pixel.
pub const GRIDLINE: u8 = 2;

/// Maps a canvas pixel at a given frame to a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSampler {
    pitch: i64,
    gridline_width: i64,
    origin: (i64, i64),
    velocity: (i64, i64),
}

impl PixelSampler {
    /// # Panics
    ///
    /// Panics if `cell_size + gridline_width` is zero.
    pub fn new(
        cell_size: u32,
        gridline_width: u32,
        origin: (i64, i64),
        velocity: (i64, i64),
    ) -> Self {
        let pitch = cell_size as i64 + gridline_width as i64;
        assert!(pitch > 0, "cell pitch must be positive");
        Self {
            pitch,
            gridline_width: gridline_width as i64,
            origin,
            velocity,
        }
    }

    pub fn from_config(config: &AnimationConfig, selection: &Selection) -> Self {
        Self::new(
            config.cell_size,
            config.gridline_width,
            (selection.x, selection.y),
            config.velocity,
        )
    }

    /// Pan offset in pixels applied at `frame`.
    ///
    /// Frames past those checked by [`AnimationConfig::validate`] may
    /// overflow.
    #[inline]
    pub fn offset(&self, frame: u64) -> (i64, i64) {
        let f = frame as i64;
        (self.velocity.0 * f, self.velocity.1 * f)
    }

    /// Palette index for pixel `(x, y)` of `frame`.
    ///
    /// Gridlines win over cell content. Negative offsets floor towards the
    /// cells above and left of the selection.
    #[inline]
    pub fn sample<G: GridState + ?Sized>(&self, grid: &G, x: u32, y: u32, frame: u64) -> u8 {
        let (dx, dy) = self.offset(frame);
        self.sample_at(grid, x as i64 + dx, y as i64 + dy)
    }

    #[inline]
    fn sample_at<G: GridState + ?Sized>(&self, grid: &G, xabs: i64, yabs: i64) -> u8 {
        if xabs.rem_euclid(self.pitch) < self.gridline_width
            || yabs.rem_euclid(self.pitch) < self.gridline_width
        {
            return GRIDLINE;
        }
        let col = self.origin.0 + xabs.div_euclid(self.pitch);
        let row = self.origin.1 + yabs.div_euclid(self.pitch);
        let cell = grid.get_cell(col, row);
        debug_assert!(cell <= LIVE, "grid returned cell state {cell}");
        cell
    }
}

/// Produces one row-major raster per frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRasterizer {
    sampler: PixelSampler,
    canvas: Canvas,
}

impl FrameRasterizer {
    pub fn new(sampler: PixelSampler, canvas: Canvas) -> Self {
        Self { sampler, canvas }
    }

    /// Sample every pixel of the canvas, `y` outer and `x` inner.
    pub fn rasterize<G: GridState + ?Sized>(&self, grid: &G, frame: u64) -> Vec<u8> {
        let mut raster = Vec::with_capacity(self.canvas.area());
        self.rasterize_into(grid, frame, &mut raster);
        raster
    }

    /// Like [`FrameRasterizer::rasterize`], reusing `raster`'s allocation.
    pub fn rasterize_into<G: GridState + ?Sized>(
        &self,
        grid: &G,
        frame: u64,
        raster: &mut Vec<u8>,
    ) {
        raster.clear();
        let (dx, dy) = self.sampler.offset(frame);
        for y in 0..self.canvas.height as i64 {
            for x in 0..self.canvas.width as i64 {
                raster.push(self.sampler.sample_at(grid, x + dx, y + dy));
            }
        }
    }
}
