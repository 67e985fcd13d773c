//! Error types for OxiPix decoding.
//!
//! Every error here reflects malformed input or a violated internal
//! invariant. Decoding is fail-fast: nothing is retried, and no partial
//! pixel list is ever returned alongside an error.

use thiserror::Error;

/// The main error type for OxiPix decoding.
#[derive(Debug, Error)]
pub enum OxiPixError {
    /// Encoded string contains a character with no codebook entry.
    #[error("Invalid character '{character}' at index {index} in encoded string")]
    InvalidCharacter {
        /// 0-based character index in the encoded string.
        index: usize,
        /// The offending character.
        character: char,
    },

    /// A code pattern string could not be parsed.
    #[error("Invalid bit pattern '{pattern}': expected 1 to 32 '0'/'1' characters")]
    InvalidBitPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
    },

    /// A code inserted into a prefix table overlaps an existing code.
    #[error("Code '{code}' conflicts with existing code '{existing}': table must be prefix-free")]
    PrefixConflict {
        /// The code being inserted.
        code: String,
        /// The code already present that one is a prefix of the other.
        existing: String,
    },

    /// No prefix code matched before the scan ran out of bits.
    #[error(
        "Huffman decode error for {item}: no matching code found at bit position {position}; \
         tried prefix '{tried_prefix}'; stream context: {context}"
    )]
    HuffmanDecode {
        /// Which stream item was being decoded.
        item: &'static str,
        /// Bit position where the scan started.
        position: usize,
        /// Candidate prefix accumulated before the failure.
        tried_prefix: String,
        /// Bits around the failure position (up to 20 before, 40 after).
        context: String,
    },

    /// Decoded RLE count is not a positive integer.
    #[error("Invalid RLE count decoded: {count}; must be a positive integer")]
    InvalidRunCount {
        /// The decoded count value.
        count: u32,
    },

    /// Bit stream ran out before the expected pixel count was reached.
    #[error(
        "Bit stream ended prematurely: expected data for {expected_pixels} pixels, \
         but RLE data only accounts for {decoded_pixels}; \
         processed {bits_processed} of {stream_bits} bits"
    )]
    PrematureEnd {
        /// Pixels the image dimensions require.
        expected_pixels: u64,
        /// Pixels the decoded runs cover so far.
        decoded_pixels: u64,
        /// Bits consumed when the stream ran out.
        bits_processed: usize,
        /// Total bits in the stream.
        stream_bits: usize,
    },

    /// Stream exactly exhausted while still short of the expected pixel count.
    #[error(
        "Bit stream fully consumed, but RLE data only accounts for {decoded_pixels} \
         of {expected_pixels} pixels"
    )]
    StreamUnderrun {
        /// Pixels the image dimensions require.
        expected_pixels: u64,
        /// Pixels the decoded runs cover.
        decoded_pixels: u64,
    },

    /// Decoded runs cover more pixels than the image dimensions allow.
    #[error("RLE data decodes to too many pixels: expected {expected_pixels}, got {decoded_pixels}")]
    PixelOverrun {
        /// Pixels the image dimensions require.
        expected_pixels: u64,
        /// Pixels the decoded runs cover.
        decoded_pixels: u64,
    },

    /// Run expansion disagreed with the accumulated run totals.
    #[error(
        "Internal error: RLE expansion produced {expanded} pixels, expected {expected} \
         after run totals matched"
    )]
    RleMismatch {
        /// Pixel pairs actually produced by expansion.
        expanded: u64,
        /// Pixel count the run totals promised.
        expected: u64,
    },

    /// Representative color id outside the palette index table.
    #[error(
        "Invalid representative color ID {id}: valid range is 0 to {} for table of size {table_len}",
        table_len.saturating_sub(1)
    )]
    InvalidRepColorId {
        /// The decoded representative color id.
        id: u32,
        /// Number of entries in the representative palette index table.
        table_len: usize,
    },
}

/// Result type alias for OxiPix operations.
pub type Result<T> = std::result::Result<T, OxiPixError>;

impl OxiPixError {
    /// Create an invalid character error.
    pub fn invalid_character(index: usize, character: char) -> Self {
        Self::InvalidCharacter { index, character }
    }

    /// Create an invalid bit pattern error.
    pub fn invalid_bit_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidBitPattern {
            pattern: pattern.into(),
        }
    }

    /// Create a prefix conflict error.
    pub fn prefix_conflict(code: impl Into<String>, existing: impl Into<String>) -> Self {
        Self::PrefixConflict {
            code: code.into(),
            existing: existing.into(),
        }
    }

    /// Create a Huffman decode error.
    pub fn huffman_decode(
        item: &'static str,
        position: usize,
        tried_prefix: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::HuffmanDecode {
            item,
            position,
            tried_prefix: tried_prefix.into(),
            context: context.into(),
        }
    }

    /// Create an invalid run count error.
    pub fn invalid_run_count(count: u32) -> Self {
        Self::InvalidRunCount { count }
    }

    /// Create a premature end-of-stream error.
    pub fn premature_end(
        expected_pixels: u64,
        decoded_pixels: u64,
        bits_processed: usize,
        stream_bits: usize,
    ) -> Self {
        Self::PrematureEnd {
            expected_pixels,
            decoded_pixels,
            bits_processed,
            stream_bits,
        }
    }

    /// Create a stream underrun error.
    pub fn stream_underrun(expected_pixels: u64, decoded_pixels: u64) -> Self {
        Self::StreamUnderrun {
            expected_pixels,
            decoded_pixels,
        }
    }

    /// Create a pixel overrun error.
    pub fn pixel_overrun(expected_pixels: u64, decoded_pixels: u64) -> Self {
        Self::PixelOverrun {
            expected_pixels,
            decoded_pixels,
        }
    }

    /// Create an RLE mismatch error.
    pub fn rle_mismatch(expanded: u64, expected: u64) -> Self {
        Self::RleMismatch { expanded, expected }
    }

    /// Create an invalid representative color id error.
    pub fn invalid_rep_color_id(id: u32, table_len: usize) -> Self {
        Self::InvalidRepColorId { id, table_len }
    }
}
