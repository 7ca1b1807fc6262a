//! GIF recorder: owns the output stream for the lifetime of one file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::format::{GifHeader, LoopExtension, TRAILER, write_frame_block};
use crate::schema::{Canvas, Palette};

/// Appends GIF89a sections to a writer in file order.
///
/// Usage:
/// ```ignore
/// let mut recorder = GifRecorder::create("out.gif", canvas, Palette::default())?;
/// for frame in 0..frames {
///     let raster = rasterizer.rasterize(&grid, frame);
///     recorder.write_frame(pause, &encoder.encode(&raster))?;
///     grid.advance(1);
/// }
/// recorder.finalize()?;
/// ```
///
/// Dropping a recorder without calling [`GifRecorder::finalize`] leaves a
/// file with no trailer.
pub struct GifRecorder<W: Write = BufWriter<File>> {
    writer: W,
    canvas: Canvas,
    frames_written: u64,
    bytes_written: u64,
}

impl GifRecorder<BufWriter<File>> {
    /// Create `path` and write the file header.
    pub fn create<P: AsRef<Path>>(path: P, canvas: Canvas, palette: Palette) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), canvas, palette)
    }
}

impl<W: Write> GifRecorder<W> {
    /// Write header, global color table and the infinite-loop extension.
    pub fn new(mut writer: W, canvas: Canvas, palette: Palette) -> io::Result<Self> {
        GifHeader { canvas, palette }.write_to(&mut writer)?;
        LoopExtension { loop_count: 0 }.write_to(&mut writer)?;
        Ok(Self {
            writer,
            canvas,
            frames_written: 0,
            bytes_written: (GifHeader::SIZE + LoopExtension::SIZE) as u64,
        })
    }

    /// Append one frame.
    ///
    /// `image_data` is LZW output already split into sub-blocks.
    pub fn write_frame(&mut self, pause_centisecs: u16, image_data: &[u8]) -> io::Result<()> {
        write_frame_block(&mut self.writer, self.canvas, pause_centisecs, image_data)?;
        self.frames_written += 1;
        self.bytes_written += super::frame_block_len(image_data.len()) as u64;
        Ok(())
    }

    /// Write the trailer and flush.
    pub fn finalize(mut self) -> io::Result<(W, AnimationStats)> {
        self.writer.write_all(&[TRAILER])?;
        self.writer.flush()?;
        self.bytes_written += 1;

        let stats = AnimationStats {
            frame_count: self.frames_written,
            total_bytes: self.bytes_written,
            canvas: self.canvas,
        };
        Ok((self.writer, stats))
    }

    /// Get number of frames recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Statistics from a finished recording.
#[derive(Debug, Clone, Copy)]
pub struct AnimationStats {
    /// Total frames recorded.
    pub frame_count: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
    /// Frame dimensions.
    pub canvas: Canvas,
}

impl std::fmt::Display for AnimationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames at {}x{}, {} bytes total",
            self.frame_count, self.canvas.width, self.canvas.height, self.total_bytes
        )
    }
}
