//! Configuration types for GIF animation rendering.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Largest canvas dimension a GIF logical screen can describe.
pub const MAX_CANVAS_DIM: u32 = u16::MAX as u32;

/// LifeWiki draws 2 px gridlines.
fn default_gridline_width() -> u32 {
    2
}

fn default_output() -> PathBuf {
    PathBuf::from("out.gif")
}

/// Top-level animation configuration.
///
/// Built once from JSON, validated, then passed by reference into the
/// rendering pipeline. Nothing mutates it after [`AnimationConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Number of frames to render (one simulation step between frames).
    pub frames: u32,
    /// Delay of each frame in hundredths of a second.
    pub pause_centisecs: u16,
    /// Edge length of one cell in pixels.
    pub cell_size: u32,
    /// Width of gridlines in pixels (0 disables gridlines).
    #[serde(default = "default_gridline_width")]
    pub gridline_width: u32,
    /// Pan speed of the viewport in pixels per frame.
    #[serde(default)]
    pub velocity: (i64, i64),
    /// Destination file.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Cell rectangle to render. Defaults to the seed's bounding box.
    #[serde(default)]
    pub selection: Option<Selection>,
    /// Colors for dead, live, gridline and the unused fourth entry.
    #[serde(default)]
    pub palette: Palette,
    /// Terminate each frame's LZW stream with an end-of-information code.
    ///
    /// Off by default: frames end after the last pending code, which common
    /// decoders accept without complaint.
    #[serde(default)]
    pub end_of_information: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 32,
            pause_centisecs: 10,
            cell_size: 8,
            gridline_width: default_gridline_width(),
            velocity: (0, 0),
            output: default_output(),
            selection: None,
            palette: Palette::default(),
            end_of_information: false,
        }
    }
}

/// Rectangle of cells, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Four-entry global color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(pub [[u8; 3]; 4]);

impl Palette {
    /// White cells, black live cells, LifeWiki gray gridlines.
    pub const LIFEWIKI: Palette = Palette([
        [0xFF, 0xFF, 0xFF],
        [0x00, 0x00, 0x00],
        [0xC6, 0xC6, 0xC6],
        [0x00, 0x00, 0x00],
    ]);

    /// Table bytes in index order, three per entry.
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        for (chunk, rgb) in out.chunks_exact_mut(3).zip(self.0.iter()) {
            chunk.copy_from_slice(rgb);
        }
        out
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::LIFEWIKI
    }
}

/// Pixel dimensions of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u16,
    pub height: u16,
}

impl Canvas {
    /// Check dimensions against the GIF logical screen limits.
    pub fn new(width: u64, height: u64) -> Result<Self, ConfigError> {
        let fits = |d: u64| (1..=MAX_CANVAS_DIM as u64).contains(&d);
        if !fits(width) || !fits(height) {
            return Err(ConfigError::CanvasTooLarge { width, height });
        }
        Ok(Self {
            width: width as u16,
            height: height as u16,
        })
    }

    /// Number of pixels in one raster.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl AnimationConfig {
    /// Distance in pixels between the starts of adjacent cells.
    #[inline]
    pub fn pitch(&self) -> u64 {
        self.cell_size as u64 + self.gridline_width as u64
    }

    /// Canvas covering `selection`: `pitch * cells + gridline_width` per axis.
    pub fn canvas(&self, selection: &Selection) -> Result<Canvas, ConfigError> {
        let pitch = self.pitch();
        let gw = self.gridline_width as u64;
        let side = |cells: u32| pitch.checked_mul(cells as u64)?.checked_add(gw);
        match (side(selection.width), side(selection.height)) {
            (Some(width), Some(height)) => Canvas::new(width, height),
            (width, height) => Err(ConfigError::CanvasTooLarge {
                width: width.unwrap_or(u64::MAX),
                height: height.unwrap_or(u64::MAX),
            }),
        }
    }

    /// Validate configuration parameters against a resolved selection.
    pub fn validate(&self, selection: &Selection) -> Result<Canvas, ConfigError> {
        if self.frames == 0 {
            return Err(ConfigError::NoFrames);
        }
        if self.cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        if selection.is_empty() {
            return Err(ConfigError::EmptySelection);
        }
        let canvas = self.canvas(selection)?;

        // Pitch is at most 2^33 here, so it converts losslessly.
        let pitch = self.pitch() as i64;
        let last_frame = self.frames as i64 - 1;
        let fits_x = pan_fits(selection.x, self.velocity.0, last_frame, canvas.width, pitch);
        let fits_y = pan_fits(selection.y, self.velocity.1, last_frame, canvas.height, pitch);
        if !fits_x || !fits_y {
            return Err(ConfigError::ViewportOutOfRange {
                velocity: self.velocity,
                frames: self.frames,
            });
        }
        Ok(canvas)
    }
}

/// Whether every pixel coordinate and cell index sampled along one axis,
/// over all frames, fits in an `i64`.
///
/// Cell indices grow monotonically with the pixel coordinate, so checking
/// the extreme pixels of the first and last frame covers every frame.
fn pan_fits(origin: i64, velocity: i64, last_frame: i64, extent: u16, pitch: i64) -> bool {
    let last_px = extent as i64 - 1;
    let Some(shift) = velocity.checked_mul(last_frame) else {
        return false;
    };
    let Some(far) = shift.checked_add(last_px) else {
        return false;
    };
    [0, last_px, shift, far]
        .into_iter()
        .all(|px| origin.checked_add(px.div_euclid(pitch)).is_some())
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Frame count must be non-zero")]
    NoFrames,
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Selection must contain at least one cell")]
    EmptySelection,
    #[error(
        "The width or height of the GIF file must be less than 65536 pixels (width: {width}, height: {height})"
    )]
    CanvasTooLarge { width: u64, height: u64 },
    #[error(
        "Panning at {velocity:?} px/frame over {frames} frames moves the viewport outside the addressable grid"
    )]
    ViewportOutOfRange { velocity: (i64, i64), frames: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cell_size: u32, gridline_width: u32) -> AnimationConfig {
        AnimationConfig {
            cell_size,
            gridline_width,
            ..Default::default()
        }
    }

    #[test]
    fn test_canvas_formula() {
        let cfg = config(8, 2);
        let canvas = cfg.canvas(&Selection::new(0, 0, 3, 2)).unwrap();
        assert_eq!(canvas.width, 10 * 3 + 2);
        assert_eq!(canvas.height, 10 * 2 + 2);
        assert_eq!(canvas.area(), 32 * 22);
    }

    #[test]
    fn test_canvas_without_gridlines() {
        let cfg = config(1, 0);
        let canvas = cfg.canvas(&Selection::new(0, 0, 1, 1)).unwrap();
        assert_eq!((canvas.width, canvas.height), (1, 1));
    }

    #[test]
    fn test_canvas_limit() {
        let cfg = config(1, 0);
        assert!(cfg.canvas(&Selection::new(0, 0, 65535, 1)).is_ok());
        let err = cfg.canvas(&Selection::new(0, 0, 65536, 1)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CanvasTooLarge {
                width: 65536,
                height: 1
            }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let sel = Selection::new(0, 0, 4, 4);
        let mut cfg = AnimationConfig::default();
        cfg.frames = 0;
        assert!(matches!(cfg.validate(&sel), Err(ConfigError::NoFrames)));

        let cfg = config(0, 2);
        assert!(matches!(cfg.validate(&sel), Err(ConfigError::InvalidCellSize)));

        let cfg = AnimationConfig::default();
        assert!(matches!(
            cfg.validate(&Selection::new(0, 0, 0, 4)),
            Err(ConfigError::EmptySelection)
        ));
    }

    #[test]
    fn test_huge_cell_pitch_is_too_large() {
        let sel = Selection::new(0, 0, 1, 1);
        let cfg = config(u32::MAX, 1);
        assert_eq!(cfg.pitch(), 1 << 32);
        assert!(matches!(
            cfg.validate(&sel),
            Err(ConfigError::CanvasTooLarge {
                width: 4294967297,
                height: 4294967297
            })
        ));

        let cfg = config(u32::MAX, u32::MAX);
        assert!(matches!(
            cfg.canvas(&Selection::new(0, 0, u32::MAX, u32::MAX)),
            Err(ConfigError::CanvasTooLarge {
                width: u64::MAX,
                height: u64::MAX
            })
        ));
    }

    #[test]
    fn test_validate_rejects_runaway_pan() {
        let sel = Selection::new(0, 0, 4, 4);
        let cfg = AnimationConfig {
            frames: 4,
            velocity: (i64::MAX / 2, 0),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(&sel),
            Err(ConfigError::ViewportOutOfRange { frames: 4, .. })
        ));

        let cfg = AnimationConfig {
            frames: 4,
            velocity: (0, i64::MIN / 2),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(&sel),
            Err(ConfigError::ViewportOutOfRange { .. })
        ));

        // A single frame never pans, however fast.
        let cfg = AnimationConfig {
            frames: 1,
            velocity: (i64::MAX, i64::MIN),
            ..Default::default()
        };
        assert!(cfg.validate(&sel).is_ok());
    }

    #[test]
    fn test_validate_rejects_selection_at_grid_edge() {
        let cfg = AnimationConfig::default();
        let sel = Selection::new(i64::MAX - 1, 0, 4, 4);
        assert!(matches!(
            cfg.validate(&sel),
            Err(ConfigError::ViewportOutOfRange { .. })
        ));
        assert!(cfg.validate(&Selection::new(i64::MAX - 4, i64::MIN, 4, 4)).is_ok());
    }

    #[test]
    fn test_config_json_defaults() {
        let cfg: AnimationConfig =
            serde_json::from_str(r#"{"frames": 5, "pause_centisecs": 20, "cell_size": 4}"#)
                .unwrap();
        assert_eq!(cfg.gridline_width, 2);
        assert_eq!(cfg.velocity, (0, 0));
        assert_eq!(cfg.palette, Palette::LIFEWIKI);
        assert!(!cfg.end_of_information);
        assert!(cfg.selection.is_none());
    }

    #[test]
    fn test_palette_bytes() {
        let bytes = Palette::LIFEWIKI.to_bytes();
        assert_eq!(
            bytes,
            [0xFF, 0xFF, 0xFF, 0, 0, 0, 0xC6, 0xC6, 0xC6, 0, 0, 0]
        );
    }
}
