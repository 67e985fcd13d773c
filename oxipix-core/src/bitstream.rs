//! Logical bit streams and fixed-width bit patterns.
//!
//! The encoded image format is defined over a conceptual string of '0'/'1'
//! digits: codebook expansion produces one, and the Huffman layer consumes
//! it through a cursor. [`BitStream`] stores that string packed MSB-first,
//! and [`Code`] is a short (at most 32-bit) pattern used both as a codebook
//! value and as a prefix-table key.
//!
//! # Example
//!
//! ```
//! use oxipix_core::bitstream::{BitStream, Code};
//!
//! let code = Code::parse("011").unwrap();
//! let mut stream = BitStream::new();
//! stream.push_code(code);
//! stream.push(true);
//!
//! assert_eq!(stream.len(), 4);
//! assert_eq!(stream.to_string(), "0111");
//! ```

use crate::error::{OxiPixError, Result};
use std::fmt;

/// A bit pattern of 1 to 32 bits.
///
/// Codes compare and hash by both their bits and their length, so `"0"` and
/// `"00"` are distinct table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    /// Pattern bits, right-aligned (last pattern bit in the LSB).
    bits: u32,
    /// Number of significant bits.
    len: u8,
}

impl Code {
    /// Maximum supported code length in bits.
    pub const MAX_LEN: u8 = 32;

    /// The empty pattern, used as the scanner's starting candidate.
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Parse a pattern from a string of '0'/'1' characters.
    ///
    /// Fails with [`OxiPixError::InvalidBitPattern`] if the string is empty,
    /// longer than [`Code::MAX_LEN`], or contains any other character.
    pub fn parse(pattern: &str) -> Result<Self> {
        let chars = pattern.chars().count();
        if chars == 0 || chars > Self::MAX_LEN as usize {
            return Err(OxiPixError::invalid_bit_pattern(pattern));
        }

        let mut code = Code::EMPTY;
        for ch in pattern.chars() {
            let bit = match ch {
                '0' => false,
                '1' => true,
                _ => return Err(OxiPixError::invalid_bit_pattern(pattern)),
            };
            code = code.extended(bit).ok_or_else(|| {
                // Unreachable given the length check above.
                OxiPixError::invalid_bit_pattern(pattern)
            })?;
        }
        Ok(code)
    }

    /// Number of bits in this pattern.
    pub fn len(self) -> u8 {
        self.len
    }

    /// Whether this is the empty pattern.
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The pattern bits, right-aligned.
    pub fn bits(self) -> u32 {
        self.bits
    }

    /// This pattern extended by one bit, or `None` at [`Code::MAX_LEN`].
    pub fn extended(self, bit: bool) -> Option<Self> {
        if self.len >= Self::MAX_LEN {
            return None;
        }
        Some(Code {
            bits: (self.bits << 1) | u32::from(bit),
            len: self.len + 1,
        })
    }

    /// Whether this pattern is a (possibly equal) prefix of `other`.
    pub fn is_prefix_of(self, other: Code) -> bool {
        if self.len > other.len || self.is_empty() {
            return false;
        }
        other.bits >> (other.len - self.len) == self.bits
    }

    /// Iterate the pattern's bits, first bit first.
    pub fn iter_bits(self) -> impl Iterator<Item = bool> {
        (0..self.len).map(move |i| (self.bits >> (self.len - 1 - i)) & 1 == 1)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter_bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// An ordered sequence of bits, packed MSB-first within bytes.
///
/// Built once by codebook expansion and then only read; decoding tracks its
/// own cursor and never mutates the stream, so one stream can back several
/// concurrent decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    /// Packed bits; bit `i` lives at `bytes[i / 8]`, mask `0x80 >> (i % 8)`.
    bytes: Vec<u8>,
    /// Number of valid bits.
    len: usize,
}

impl BitStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Parse a stream from a string of '0'/'1' characters (any length).
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let mut stream = Self::with_capacity(pattern.len());
        for ch in pattern.chars() {
            match ch {
                '0' => stream.push(false),
                '1' => stream.push(true),
                _ => return Err(OxiPixError::invalid_bit_pattern(pattern)),
            }
        }
        Ok(stream)
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the stream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a single bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[self.len / 8] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Append all bits of a code, first bit first.
    pub fn push_code(&mut self, code: Code) {
        for bit in code.iter_bits() {
            self.push(bit);
        }
    }

    /// The bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Render the bits in `start..end` as a '0'/'1' string.
    ///
    /// The range is clamped to the stream length, so diagnostic callers can
    /// pass windows that run past the end.
    pub fn range_string(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len);
        let start = start.min(end);
        (start..end)
            .map(|i| if self.get(i) == Some(true) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.range_string(0, self.len))
    }
}
