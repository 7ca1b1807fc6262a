//! GIF89a block layout.

use std::io::{self, Write};

use crate::compute::MIN_CODE_SIZE;
use crate::schema::{Canvas, Palette};

/// File signature and version.
pub const GIF_SIGNATURE: &[u8; 6] = b"GIF89a";

/// Introduces an extension block.
pub const EXTENSION_INTRODUCER: u8 = 0x21;
/// Application extension label.
pub const APPLICATION_LABEL: u8 = 0xFF;
/// Graphic control extension label.
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
/// Starts an image descriptor.
pub const IMAGE_SEPARATOR: u8 = 0x2C;
/// Ends the file.
pub const TRAILER: u8 = 0x3B;

/// Application identifier and auth code for looping animations.
pub const NETSCAPE_ID: &[u8; 11] = b"NETSCAPE2.0";

/// Logical screen descriptor flags.
///
/// Global color table present (bit 7), color resolution 2 bits (bits 4-6 = 1),
/// unsorted, table size field 1 (2^(1+1) = 4 entries).
pub const SCREEN_FLAGS: u8 = 0x91;

/// Header, logical screen descriptor and color table.
#[derive(Debug, Clone, Copy)]
pub struct GifHeader {
    pub canvas: Canvas,
    pub palette: Palette,
}

impl GifHeader {
    /// Signature(6) + screen descriptor(7) + color table(12).
    pub const SIZE: usize = 25;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(GIF_SIGNATURE)?;
        w.write_all(&self.canvas.width.to_le_bytes())?;
        w.write_all(&self.canvas.height.to_le_bytes())?;
        // Flags, background color index, pixel aspect ratio
        w.write_all(&[SCREEN_FLAGS, 0, 0])?;
        w.write_all(&self.palette.to_bytes())?;
        Ok(())
    }
}

/// NETSCAPE2.0 application extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopExtension {
    /// Number of repetitions, 0 for forever.
    pub loop_count: u16,
}

impl LoopExtension {
    pub const SIZE: usize = 19;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[EXTENSION_INTRODUCER, APPLICATION_LABEL, NETSCAPE_ID.len() as u8])?;
        w.write_all(NETSCAPE_ID)?;
        // Sub-block: length 3, id 1, loop count, terminator
        w.write_all(&[3, 1])?;
        w.write_all(&self.loop_count.to_le_bytes())?;
        w.write_all(&[0])?;
        Ok(())
    }
}

/// Graphic control extension carrying the frame delay.
#[derive(Debug, Clone, Copy)]
pub struct GraphicControl {
    /// Delay in hundredths of a second.
    pub delay_centisecs: u16,
}

impl GraphicControl {
    pub const SIZE: usize = 8;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        // Block size 4, no disposal method, no transparency
        w.write_all(&[EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL, 4, 0])?;
        w.write_all(&self.delay_centisecs.to_le_bytes())?;
        // Transparent index (unused), terminator
        w.write_all(&[0, 0])?;
        Ok(())
    }
}

/// Full-canvas image descriptor without a local color table.
#[derive(Debug, Clone, Copy)]
pub struct ImageDescriptor {
    pub canvas: Canvas,
}

impl ImageDescriptor {
    /// Separator(1) + position(4) + size(4) + flags(1).
    pub const SIZE: usize = 10;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[IMAGE_SEPARATOR])?;
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(&self.canvas.width.to_le_bytes())?;
        w.write_all(&self.canvas.height.to_le_bytes())?;
        // No local color table, not interlaced
        w.write_all(&[0])?;
        Ok(())
    }
}

/// Graphic control, image descriptor, minimum code size and image data.
pub fn write_frame_block<W: Write>(
    w: &mut W,
    canvas: Canvas,
    delay_centisecs: u16,
    image_data: &[u8],
) -> io::Result<()> {
    GraphicControl { delay_centisecs }.write_to(w)?;
    ImageDescriptor { canvas }.write_to(w)?;
    w.write_all(&[MIN_CODE_SIZE])?;
    w.write_all(image_data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u64, height: u64) -> Canvas {
        Canvas::new(width, height).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let mut buf = Vec::new();
        GifHeader {
            canvas: canvas(10, 5),
            palette: Palette::LIFEWIKI,
        }
        .write_to(&mut buf)
        .unwrap();
        assert_eq!(buf.len(), GifHeader::SIZE);
        assert_eq!(&buf[..6], b"GIF89a");
        assert_eq!(&buf[6..13], &[10, 0, 5, 0, 0x91, 0, 0]);
        assert_eq!(&buf[13..], &Palette::LIFEWIKI.to_bytes());
    }

    #[test]
    fn test_large_canvas_little_endian() {
        let mut buf = Vec::new();
        GifHeader {
            canvas: canvas(0x1234, 0xFFFF),
            palette: Palette::LIFEWIKI,
        }
        .write_to(&mut buf)
        .unwrap();
        assert_eq!(&buf[6..10], &[0x34, 0x12, 0xFF, 0xFF]);
    }

    #[test]
    fn test_loop_extension() {
        let mut buf = Vec::new();
        LoopExtension::default().write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), LoopExtension::SIZE);
        assert_eq!(&buf[..3], &[0x21, 0xFF, 0x0B]);
        assert_eq!(&buf[3..14], b"NETSCAPE2.0");
        assert_eq!(&buf[14..], &[3, 1, 0, 0, 0]);
    }

    #[test]
    fn test_frame_block() {
        let mut buf = Vec::new();
        write_frame_block(&mut buf, canvas(1, 1), 300, &[1, 4, 0]).unwrap();
        assert_eq!(
            buf.len(),
            GraphicControl::SIZE + ImageDescriptor::SIZE + 1 + 3
        );
        assert_eq!(&buf[..8], &[0x21, 0xF9, 4, 0, 0x2C, 0x01, 0, 0]);
        assert_eq!(&buf[8..18], &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0]);
        assert_eq!(&buf[18..], &[2, 1, 4, 0]);
    }
}
