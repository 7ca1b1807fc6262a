//! Frame loop: render, encode, write, then step the simulation.

use std::io::Write;

use log::{debug, info};

use super::recorder::{AnimationStats, GifRecorder};
use super::AnimationError;
use crate::compute::{FrameRasterizer, GridState, LzwEncoder, PixelSampler};
use crate::schema::{AnimationConfig, ConfigError, Selection};

/// Explicit selection from the config, else the seed's bounds.
pub fn resolve_selection(
    config: &AnimationConfig,
    seed_bounds: Option<Selection>,
) -> Result<Selection, ConfigError> {
    config
        .selection
        .or(seed_bounds)
        .ok_or(ConfigError::EmptySelection)
}

/// Render `config.frames` frames of `grid` into `writer`.
///
/// The grid is advanced by one generation between consecutive frames and
/// left untouched after the last one. Configuration is validated before
/// anything is written.
pub fn render_animation<G, W>(
    config: &AnimationConfig,
    selection: &Selection,
    grid: &mut G,
    writer: W,
) -> Result<(W, AnimationStats), AnimationError>
where
    G: GridState + ?Sized,
    W: Write,
{
    let canvas = config.validate(selection)?;
    let rasterizer = FrameRasterizer::new(PixelSampler::from_config(config, selection), canvas);
    let encoder = LzwEncoder::new().with_end_code(config.end_of_information);

    info!(
        "Rendering {} frames at {}x{} px ({}x{} cells)",
        config.frames, canvas.width, canvas.height, selection.width, selection.height
    );

    let mut recorder = GifRecorder::new(writer, canvas, config.palette)?;
    let mut raster = Vec::with_capacity(canvas.area());
    let frames = config.frames as u64;

    for frame in 0..frames {
        rasterizer.rasterize_into(&*grid, frame, &mut raster);
        let (data, stats) = encoder.encode_with_stats(&raster);
        debug!(
            "frame {}: {} codes, {} clears, width {}..={}, {} bytes packed",
            frame, stats.codes, stats.clears, stats.min_width, stats.max_width, stats.packed_len
        );
        recorder.write_frame(config.pause_centisecs, &data)?;
        info!("{}/{}", frame + 1, frames);

        if frame + 1 < frames {
            grid.advance(1);
        }
    }

    Ok(recorder.finalize()?)
}

/// Render into `config.output`.
///
/// Creation and write failures carry the destination path. A failed render
/// may leave a truncated file behind.
pub fn render_to_file<G>(
    config: &AnimationConfig,
    selection: &Selection,
    grid: &mut G,
) -> Result<AnimationStats, AnimationError>
where
    G: GridState + ?Sized,
{
    // Reject bad dimensions before touching the filesystem.
    config.validate(selection)?;

    let path = &config.output;
    let file = std::fs::File::create(path).map_err(|source| AnimationError::Create {
        path: path.clone(),
        source,
    })?;

    let (_, stats) = render_animation(config, selection, grid, std::io::BufWriter::new(file))
        .map_err(|e| match e {
            AnimationError::Io(source) => AnimationError::Write {
                path: path.clone(),
                source,
            },
            other => other,
        })?;

    info!("GIF animation saved in {}: {}", path.display(), stats);
    Ok(stats)
}
