//! Test-only GIF reading helpers: sub-block framing, LZW decoding and a
//! walker for the block sequence this crate writes.

#![allow(dead_code)]

const CLEAR: usize = 4;
const END: usize = 5;
const MAX_TABLE: usize = 4096;

/// Concatenated sub-block payloads plus framing facts.
#[derive(Debug)]
pub struct SubBlocks {
    pub data: Vec<u8>,
    /// Data-carrying blocks, terminator excluded.
    pub blocks: usize,
    /// Bytes consumed including the terminator.
    pub consumed: usize,
}

pub fn read_sub_blocks(bytes: &[u8]) -> SubBlocks {
    let mut data = Vec::new();
    let mut pos = 0;
    let mut blocks = 0;
    loop {
        let n = bytes[pos] as usize;
        pos += 1;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&bytes[pos..pos + n]);
        pos += n;
        blocks += 1;
    }
    SubBlocks {
        data,
        blocks,
        consumed: pos,
    }
}

/// Result of decoding one packed LZW stream.
#[derive(Debug, Default)]
pub struct Decoded {
    pub symbols: Vec<u8>,
    /// Every code read, with the width it was read at.
    pub codes: Vec<(u16, u8)>,
    pub end_seen: bool,
}

impl Decoded {
    pub fn clears(&self) -> usize {
        self.codes.iter().filter(|(c, _)| *c as usize == CLEAR).count()
    }

    pub fn max_width(&self) -> u8 {
        self.codes.iter().map(|&(_, w)| w).max().unwrap_or(0)
    }

    pub fn min_width(&self) -> u8 {
        self.codes.iter().map(|&(_, w)| w).min().unwrap_or(0)
    }
}

/// Standard GIF LZW decode with minimum code size 2.
///
/// Stops after `expected_len` symbols, at an end code, or when the stream
/// runs out, whichever comes first.
pub fn decode_lzw(packed: &[u8], expected_len: usize) -> Decoded {
    let mut table: Vec<Vec<u8>> = (0..4u8).map(|s| vec![s]).collect();
    table.push(Vec::new());
    table.push(Vec::new());

    let mut out = Decoded::default();
    let mut width: u8 = 3;
    let mut prev: Option<usize> = None;
    let mut bitpos = 0usize;
    let total_bits = packed.len() * 8;

    while out.symbols.len() < expected_len && bitpos + width as usize <= total_bits {
        let mut code = 0usize;
        for i in 0..width as usize {
            let b = bitpos + i;
            if (packed[b / 8] >> (b % 8)) & 1 == 1 {
                code |= 1 << i;
            }
        }
        bitpos += width as usize;
        out.codes.push((code as u16, width));

        if code == CLEAR {
            table.truncate(6);
            width = 3;
            prev = None;
            continue;
        }
        if code == END {
            out.end_seen = true;
            break;
        }

        let entry = if code < table.len() {
            table[code].clone()
        } else if code == table.len() {
            let p = &table[prev.expect("first code after clear must be a literal")];
            let mut e = p.clone();
            e.push(p[0]);
            e
        } else {
            panic!("code {code} beyond table size {}", table.len());
        };
        assert!(!entry.is_empty(), "control code {code} used as data");

        if let Some(p) = prev {
            if table.len() < MAX_TABLE {
                let mut e = table[p].clone();
                e.push(entry[0]);
                table.push(e);
            }
        }
        out.symbols.extend_from_slice(&entry);
        prev = Some(code);

        if table.len() == 1 << width && width < 12 {
            width += 1;
        }
    }
    out
}

/// Decode sub-blocked image data as written by the encoder.
pub fn decode_image_data(image_data: &[u8], expected_len: usize) -> Decoded {
    let blocks = read_sub_blocks(image_data);
    decode_lzw(&blocks.data, expected_len)
}

#[derive(Debug)]
pub struct ParsedFrame {
    pub delay: u16,
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub packed_flags: u8,
    pub min_code_size: u8,
    pub image_data: Vec<u8>,
    pub blocks: usize,
}

#[derive(Debug)]
pub struct ParsedGif {
    pub width: u16,
    pub height: u16,
    pub screen_flags: u8,
    pub palette: [u8; 12],
    pub loop_count: u16,
    pub frames: Vec<ParsedFrame>,
}

fn le16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

/// Walk the exact block sequence produced by the recorder.
pub fn parse_gif(b: &[u8]) -> ParsedGif {
    assert_eq!(&b[..6], b"GIF89a");
    let width = le16(b, 6);
    let height = le16(b, 8);
    let screen_flags = b[10];
    let mut palette = [0u8; 12];
    palette.copy_from_slice(&b[13..25]);

    assert_eq!(&b[25..28], &[0x21, 0xFF, 0x0B]);
    assert_eq!(&b[28..39], b"NETSCAPE2.0");
    assert_eq!(&b[39..41], &[3, 1]);
    let loop_count = le16(b, 41);
    assert_eq!(b[43], 0);

    let mut pos = 44;
    let mut frames = Vec::new();
    while b[pos] != 0x3B {
        assert_eq!(&b[pos..pos + 4], &[0x21, 0xF9, 4, 0], "graphic control at {pos}");
        let delay = le16(b, pos + 4);
        assert_eq!(&b[pos + 6..pos + 8], &[0, 0]);
        pos += 8;

        assert_eq!(b[pos], 0x2C, "image separator at {pos}");
        let left = le16(b, pos + 1);
        let top = le16(b, pos + 3);
        let fw = le16(b, pos + 5);
        let fh = le16(b, pos + 7);
        let packed_flags = b[pos + 9];
        let min_code_size = b[pos + 10];
        pos += 11;

        let blocks = read_sub_blocks(&b[pos..]);
        let image_data = b[pos..pos + blocks.consumed].to_vec();
        pos += blocks.consumed;

        frames.push(ParsedFrame {
            delay,
            left,
            top,
            width: fw,
            height: fh,
            packed_flags,
            min_code_size,
            image_data,
            blocks: blocks.blocks,
        });
    }
    assert_eq!(pos, b.len() - 1, "trailer must be the last byte");

    ParsedGif {
        width,
        height,
        screen_flags,
        palette,
        loop_count,
        frames,
    }
}
