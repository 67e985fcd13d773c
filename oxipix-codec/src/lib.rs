//! # OxiPix Codec
//!
//! Decoder for a palette-image compression format built on representative
//! colors. Each pixel's palette index is encoded as a (representative color
//! id, signed difference) pair, the pairs are run-length encoded, the
//! (pair, count) stream is Huffman coded into a bit string, and the bits are
//! packed into printable characters through a fixed-width codebook.
//!
//! Decoding runs the four stages in reverse:
//!
//! 1. expand characters to bits ([`oxipix_core::Codebook`])
//! 2. greedily scan prefix codes ([`huffman`])
//! 3. accumulate (pair, count) runs up to the expected pixel count
//!    ([`decoder`])
//! 4. expand runs and resolve palette indices with modular wraparound
//!    ([`pixels`])
//!
//! Only decoding is provided. Table construction, the encoder, and palette
//! or container I/O belong to the caller; the expected pixel count is
//! supplied out-of-band as image dimensions, since the stream itself carries
//! no framing.
//!
//! ## Example
//!
//! ```rust
//! use oxipix_codec::{PrefixTable, decode_image};
//! use oxipix_core::Codebook;
//!
//! let codebook = Codebook::from_pairs(&[
//!     ('A', "000"), ('B', "001"), ('C', "010"), ('D', "011"),
//!     ('E', "100"), ('F', "101"), ('G', "110"), ('H', "111"),
//! ]).unwrap();
//! let rep_table = PrefixTable::from_pairs(&[("0", 0u32), ("1", 1)]).unwrap();
//! let diff_table = PrefixTable::from_pairs(&[("00", 0i32), ("01", 1), ("10", -1)]).unwrap();
//! let count_table = PrefixTable::from_pairs(&[("0", 1u32), ("1", 2)]).unwrap();
//!
//! let image = decode_image(
//!     "BADE",
//!     &codebook,
//!     &rep_table,
//!     &diff_table,
//!     &count_table,
//!     &[10, 100],
//!     256,
//!     2,
//!     2,
//! ).unwrap();
//!
//! assert_eq!(image.pixels, vec![11, 10, 10, 99]);
//! assert!(image.trailing.is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod decoder;
pub mod huffman;
pub mod pixels;

// Re-exports
pub use decoder::{DecodedImage, ImageDecoder, RunRecord, TrailingBits};
pub use huffman::{PrefixTable, StreamItem, decode_item};

use oxipix_core::codebook::Codebook;
use oxipix_core::error::Result;

/// Decode an encoded image string into final palette indices.
///
/// Runs the full pipeline: codebook expansion, Huffman + RLE decoding, run
/// expansion, and palette index resolution. `rep_palette` maps
/// representative color ids to absolute palette indices and `palette_size`
/// is the wraparound modulus; `width * height` is the expected pixel count
/// and the stream's only terminator.
///
/// On success the result holds exactly `width * height` indices, each in
/// `[0, palette_size)`, plus an optional [`TrailingBits`] diagnostic when
/// the stream carried bits past the decoded pixel data. Trailing bits never
/// fail the decode; every other irregularity does, with no partial output.
#[allow(clippy::too_many_arguments)]
pub fn decode_image(
    encoded: &str,
    codebook: &Codebook,
    rep_table: &PrefixTable<u32>,
    diff_table: &PrefixTable<i32>,
    count_table: &PrefixTable<u32>,
    rep_palette: &[u32],
    palette_size: u32,
    width: u32,
    height: u32,
) -> Result<DecodedImage> {
    let expected_pixels = u64::from(width) * u64::from(height);
    let stream = codebook.expand(encoded)?;

    let (runs, pos) = decoder::decode_runs(&stream, expected_pixels, rep_table, diff_table, count_table)?;
    let trailing = decoder::trailing_bits(&stream, pos);

    let pairs = pixels::expand_runs(&runs, expected_pixels)?;
    let pixels = pixels::resolve_palette_indices(&pairs, rep_palette, palette_size)?;

    Ok(DecodedImage { pixels, trailing })
}
