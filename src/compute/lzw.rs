//! GIF-flavoured LZW compression for 4-color rasters.
//!
//! Codes `0..=3` are the literal color indices, `4` is the clear code and
//! `5` end-of-information. Dictionary entries start at `6`. Codes are packed
//! least-significant-bit first, starting at 3 bits and widening up to 12;
//! when the 12-bit space is exhausted a clear code is written and the
//! dictionary starts over.
//!
//! The packed stream opens with a clear code. It does not close with
//! end-of-information unless asked to ([`LzwEncoder::with_end_code`]).

/// Number of literal symbols (palette entries).
pub const LITERALS: u16 = 4;
/// Minimum code size byte written ahead of the image data.
pub const MIN_CODE_SIZE: u8 = 2;
/// Resets the decoder dictionary.
pub const CLEAR_CODE: u16 = 1 << MIN_CODE_SIZE;
/// Marks the end of the image data.
pub const END_CODE: u16 = CLEAR_CODE + 1;
/// First code assigned to a dictionary entry.
pub const FIRST_FREE_CODE: u16 = END_CODE + 1;
/// Width of codes right after a clear.
pub const INITIAL_CODE_WIDTH: u8 = MIN_CODE_SIZE + 1;
/// GIF caps code width at 12 bits.
pub const MAX_CODE_WIDTH: u8 = 12;
/// Largest payload of a single data sub-block.
pub const MAX_SUB_BLOCK: usize = 255;

const TABLE_SIZE: usize = 1 << MAX_CODE_WIDTH;

/// Dictionary keyed by `(prefix code, next symbol)`.
///
/// A dense `children[prefix][symbol]` array; `0` marks a missing entry,
/// which is unambiguous because assigned codes start at [`FIRST_FREE_CODE`].
struct CodeTable {
    children: Vec<[u16; LITERALS as usize]>,
    next_code: u16,
}

impl CodeTable {
    fn new() -> Self {
        Self {
            children: vec![[0; LITERALS as usize]; TABLE_SIZE],
            next_code: FIRST_FREE_CODE,
        }
    }

    /// Drop every multi-symbol entry, leaving the literals.
    fn reset(&mut self) {
        self.children.fill([0; LITERALS as usize]);
        self.next_code = FIRST_FREE_CODE;
    }

    #[inline]
    fn get(&self, prefix: u16, symbol: u8) -> Option<u16> {
        match self.children[prefix as usize][symbol as usize] {
            0 => None,
            code => Some(code),
        }
    }

    /// Add `prefix + symbol`, returning the code it was given.
    #[inline]
    fn insert(&mut self, prefix: u16, symbol: u8) -> u16 {
        let code = self.next_code;
        // Code 4096 is assigned only to trigger the reset; it is never stored.
        if (code as usize) < TABLE_SIZE {
            self.children[prefix as usize][symbol as usize] = code;
        }
        self.next_code += 1;
        code
    }
}

/// Packs variable-width codes into bytes, LSB first.
#[derive(Debug, Default)]
pub struct BitAccumulator {
    value: u32,
    bits: u8,
    out: Vec<u8>,
}

impl BitAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            value: 0,
            bits: 0,
            out: Vec::with_capacity(capacity),
        }
    }

    /// Append `code` using `width` bits and flush whole bytes.
    #[inline]
    pub fn push(&mut self, code: u16, width: u8) {
        debug_assert!(width <= MAX_CODE_WIDTH);
        debug_assert!(code < (1 << width));
        self.value |= (code as u32) << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.out.push(self.value as u8);
            self.value >>= 8;
            self.bits -= 8;
        }
    }

    /// Emit the trailing partial byte and return the packed stream.
    ///
    /// The trailing byte is always written, even when no bits are pending.
    pub fn finish(mut self) -> Vec<u8> {
        self.out.push(self.value as u8);
        self.out
    }
}

/// Split `data` into length-prefixed sub-blocks and append the terminator.
pub fn to_sub_blocks(data: &[u8]) -> Vec<u8> {
    let blocks = data.len().div_ceil(MAX_SUB_BLOCK);
    let mut out = Vec::with_capacity(data.len() + blocks + 1);
    for chunk in data.chunks(MAX_SUB_BLOCK) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// Counters collected while encoding one raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LzwStats {
    /// Codes written, including clear and end codes.
    pub codes: usize,
    /// Clear codes written, including the leading one.
    pub clears: usize,
    /// Narrowest code width used.
    pub min_width: u8,
    /// Widest code width used.
    pub max_width: u8,
    /// Packed stream length before sub-block framing.
    pub packed_len: usize,
}

/// Writes codes and keeps [`LzwStats`] in step.
struct CodeSink {
    acc: BitAccumulator,
    stats: LzwStats,
}

impl CodeSink {
    #[inline]
    fn emit(&mut self, code: u16, width: u8) {
        self.acc.push(code, width);
        self.stats.codes += 1;
        if code == CLEAR_CODE {
            self.stats.clears += 1;
        }
        self.stats.min_width = self.stats.min_width.min(width);
        self.stats.max_width = self.stats.max_width.max(width);
    }
}

/// LZW encoder for one frame at a time.
///
/// A fresh dictionary is built for every call to [`LzwEncoder::encode`];
/// nothing carries over between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzwEncoder {
    end_code: bool,
}

impl LzwEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminate the stream with an end-of-information code.
    pub fn with_end_code(mut self, enabled: bool) -> Self {
        self.end_code = enabled;
        self
    }

    /// Compress `raster` into GIF image data sub-blocks.
    ///
    /// # Panics
    ///
    /// Panics if a symbol is not a valid color index (`>= 4`).
    pub fn encode(&self, raster: &[u8]) -> Vec<u8> {
        self.encode_with_stats(raster).0
    }

    /// Like [`LzwEncoder::encode`], also returning code statistics.
    pub fn encode_with_stats(&self, raster: &[u8]) -> (Vec<u8>, LzwStats) {
        let mut table = CodeTable::new();
        let mut sink = CodeSink {
            acc: BitAccumulator::with_capacity(raster.len() / 2 + 16),
            stats: LzwStats {
                min_width: MAX_CODE_WIDTH,
                ..Default::default()
            },
        };
        let mut width = INITIAL_CODE_WIDTH;
        let mut mask: u16 = (1 << width) - 1;
        let mut pending: Option<u16> = None;

        sink.emit(CLEAR_CODE, width);

        for &symbol in raster {
            assert!(
                (symbol as u16) < LITERALS,
                "raster symbol {symbol} is not a palette index (0..{LITERALS})"
            );
            let Some(prefix) = pending else {
                pending = Some(symbol as u16);
                continue;
            };
            if let Some(code) = table.get(prefix, symbol) {
                pending = Some(code);
                continue;
            }

            sink.emit(prefix, width);
            let added = table.insert(prefix, symbol);
            if added > mask {
                if width < MAX_CODE_WIDTH {
                    width += 1;
                    mask = (mask << 1) | 1;
                } else {
                    sink.emit(CLEAR_CODE, width);
                    table.reset();
                    width = INITIAL_CODE_WIDTH;
                    mask = (1 << width) - 1;
                }
            }
            pending = Some(symbol as u16);
        }

        if let Some(code) = pending {
            sink.emit(code, width);
        }
        if self.end_code {
            sink.emit(END_CODE, width);
        }

        let packed = sink.acc.finish();
        let mut stats = sink.stats;
        stats.packed_len = packed.len();
        (to_sub_blocks(&packed), stats)
    }
}
