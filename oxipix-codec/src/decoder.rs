//! The run-length accumulator and the image decoder.
//!
//! A decoded image is a sequence of run records, each a (representative
//! color id, difference) pair plus a repeat count. The accumulator walks the
//! bit stream decoding rep-id, difference, count triples until the runs
//! cover `width * height` pixels; the stream carries no framing, so the
//! expected pixel count is the only terminator.

use crate::huffman::{PrefixTable, StreamItem, decode_item};
use oxipix_core::bitstream::BitStream;
use oxipix_core::codebook::Codebook;
use oxipix_core::error::{OxiPixError, Result};
use std::fmt;

/// Bits of unconsumed tail shown in the trailing-bits diagnostic.
const TRAILING_PREVIEW_BITS: usize = 30;

/// One run of identical pixel encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    /// Representative color id.
    pub rep_id: u32,
    /// Signed difference from the representative's palette index.
    pub diff: i32,
    /// Repeat count, always positive.
    pub count: u32,
}

/// Non-fatal diagnostic: bits left over after the pixel count was satisfied.
///
/// Huffman data normally ends exactly or under a padding rule; this format
/// defines neither, so a leftover tail is reported to the caller rather than
/// printed or treated as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingBits {
    /// Number of unconsumed bits.
    pub remaining: usize,
    /// The first bits of the tail, at most 30.
    pub preview: String,
}

impl fmt::Display for TrailingBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bit stream not fully consumed after decoding expected pixel data: \
             {} remaining bits: '{}...'",
            self.remaining, self.preview
        )
    }
}

/// A successfully decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Final palette indices, row-major, length `width * height`.
    pub pixels: Vec<u32>,
    /// Set when the stream held bits beyond the decoded pixel data.
    pub trailing: Option<TrailingBits>,
}

/// Decoder owning the codebook, Huffman tables, and palette layout.
///
/// Construct once, decode many: `decode` takes `&self` and keeps its cursor
/// on the stack, so one decoder can serve concurrent decodes.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    codebook: Codebook,
    rep_table: PrefixTable<u32>,
    diff_table: PrefixTable<i32>,
    count_table: PrefixTable<u32>,
    rep_palette: Vec<u32>,
    palette_size: u32,
}

impl ImageDecoder {
    /// Create a decoder from caller-built tables.
    ///
    /// `rep_palette` maps representative color ids to absolute palette
    /// indices; `palette_size` is the modulus for final index wraparound.
    pub fn new(
        codebook: Codebook,
        rep_table: PrefixTable<u32>,
        diff_table: PrefixTable<i32>,
        count_table: PrefixTable<u32>,
        rep_palette: Vec<u32>,
        palette_size: u32,
    ) -> Self {
        Self {
            codebook,
            rep_table,
            diff_table,
            count_table,
            rep_palette,
            palette_size,
        }
    }

    /// Decode an encoded string into palette indices for a
    /// `width` x `height` image.
    pub fn decode(&self, encoded: &str, width: u32, height: u32) -> Result<DecodedImage> {
        crate::decode_image(
            encoded,
            &self.codebook,
            &self.rep_table,
            &self.diff_table,
            &self.count_table,
            &self.rep_palette,
            self.palette_size,
            width,
            height,
        )
    }
}

/// Decode rep-id/difference/count triples until the runs cover
/// `expected_pixels`, returning the runs and the final cursor.
pub(crate) fn decode_runs(
    stream: &BitStream,
    expected_pixels: u64,
    rep_table: &PrefixTable<u32>,
    diff_table: &PrefixTable<i32>,
    count_table: &PrefixTable<u32>,
) -> Result<(Vec<RunRecord>, usize)> {
    let mut runs = Vec::new();
    let mut pos = 0usize;
    let mut decoded_pixels = 0u64;

    while decoded_pixels < expected_pixels {
        if pos >= stream.len() {
            return Err(OxiPixError::premature_end(
                expected_pixels,
                decoded_pixels,
                pos,
                stream.len(),
            ));
        }

        let (rep_id, next) = decode_item(stream, pos, rep_table, StreamItem::RepColorId)?;
        pos = next;
        let (diff, next) = decode_item(stream, pos, diff_table, StreamItem::DiffValue)?;
        pos = next;
        let (count, next) = decode_item(stream, pos, count_table, StreamItem::RunCount)?;
        pos = next;

        if count == 0 {
            return Err(OxiPixError::invalid_run_count(count));
        }

        runs.push(RunRecord {
            rep_id,
            diff,
            count,
        });
        decoded_pixels += u64::from(count);
    }

    if decoded_pixels > expected_pixels {
        return Err(OxiPixError::pixel_overrun(expected_pixels, decoded_pixels));
    }
    // Unreachable given the in-loop exhaustion check; kept as a consistency
    // check on the loop itself.
    if decoded_pixels < expected_pixels && pos == stream.len() {
        return Err(OxiPixError::stream_underrun(expected_pixels, decoded_pixels));
    }

    Ok((runs, pos))
}

/// Build the trailing-bits diagnostic if the cursor stopped short of the end.
pub(crate) fn trailing_bits(stream: &BitStream, pos: usize) -> Option<TrailingBits> {
    if pos >= stream.len() {
        return None;
    }
    Some(TrailingBits {
        remaining: stream.len() - pos,
        preview: stream.range_string(pos, pos + TRAILING_PREVIEW_BITS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep_table() -> PrefixTable<u32> {
        PrefixTable::from_pairs(&[("0", 0), ("1", 1)]).unwrap()
    }

    fn diff_table() -> PrefixTable<i32> {
        PrefixTable::from_pairs(&[("00", 0), ("01", 1), ("10", -1)]).unwrap()
    }

    fn count_table() -> PrefixTable<u32> {
        PrefixTable::from_pairs(&[("0", 1), ("1", 2)]).unwrap()
    }

    #[test]
    fn test_decode_runs_triple_order() {
        // "BADE" expanded: 001 000 011 100
        // -> (rep 0, diff +1, count 1), (rep 0, diff 0, count 2),
        //    (rep 1, diff -1, count 1)
        let stream = BitStream::from_pattern("001000011100").unwrap();
        let (runs, pos) =
            decode_runs(&stream, 4, &rep_table(), &diff_table(), &count_table()).unwrap();

        assert_eq!(pos, 12);
        assert_eq!(
            runs,
            vec![
                RunRecord {
                    rep_id: 0,
                    diff: 1,
                    count: 1
                },
                RunRecord {
                    rep_id: 0,
                    diff: 0,
                    count: 2
                },
                RunRecord {
                    rep_id: 1,
                    diff: -1,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_decode_runs_premature_end() {
        // One pixel of data ("0010": rep 0, diff +1, count 1) but two expected.
        let stream = BitStream::from_pattern("0010").unwrap();
        let err =
            decode_runs(&stream, 2, &rep_table(), &diff_table(), &count_table()).unwrap_err();
        match err {
            OxiPixError::PrematureEnd {
                expected_pixels,
                decoded_pixels,
                bits_processed,
                stream_bits,
            } => {
                assert_eq!(expected_pixels, 2);
                assert_eq!(decoded_pixels, 1);
                assert_eq!(bits_processed, 4);
                assert_eq!(stream_bits, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_runs_empty_stream() {
        let stream = BitStream::new();
        let err =
            decode_runs(&stream, 1, &rep_table(), &diff_table(), &count_table()).unwrap_err();
        assert!(matches!(err, OxiPixError::PrematureEnd { .. }));
    }

    #[test]
    fn test_decode_runs_zero_pixels() {
        // Zero expected pixels decode from anything, consuming nothing.
        let stream = BitStream::from_pattern("0010").unwrap();
        let (runs, pos) =
            decode_runs(&stream, 0, &rep_table(), &diff_table(), &count_table()).unwrap();
        assert!(runs.is_empty());
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_decode_runs_overrun() {
        // One pixel expected but the first run counts two.
        // rep "0", diff "00", count "1" (=2)
        let stream = BitStream::from_pattern("0001").unwrap();
        let err =
            decode_runs(&stream, 1, &rep_table(), &diff_table(), &count_table()).unwrap_err();
        match err {
            OxiPixError::PixelOverrun {
                expected_pixels,
                decoded_pixels,
            } => {
                assert_eq!(expected_pixels, 1);
                assert_eq!(decoded_pixels, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_runs_rejects_zero_count() {
        let zero_count: PrefixTable<u32> = PrefixTable::from_pairs(&[("0", 0), ("1", 1)]).unwrap();
        // rep "0", diff "00", count "0" (=0)
        let stream = BitStream::from_pattern("0000").unwrap();
        let err = decode_runs(&stream, 1, &rep_table(), &diff_table(), &zero_count).unwrap_err();
        assert!(matches!(err, OxiPixError::InvalidRunCount { count: 0 }));
    }

    #[test]
    fn test_scanner_error_carries_item_name() {
        // rep "0" decodes, then "11" matches no difference code.
        let stream = BitStream::from_pattern("011").unwrap();
        let err =
            decode_runs(&stream, 1, &rep_table(), &diff_table(), &count_table()).unwrap_err();
        match err {
            OxiPixError::HuffmanDecode { item, position, .. } => {
                assert_eq!(item, "difference value");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_bits_preview() {
        let stream = BitStream::from_pattern(&"10".repeat(40)).unwrap();
        let trailing = trailing_bits(&stream, 10).unwrap();
        assert_eq!(trailing.remaining, 70);
        assert_eq!(trailing.preview.len(), 30);
        assert_eq!(trailing.preview, "10".repeat(15));

        assert!(trailing_bits(&stream, 80).is_none());
    }

    #[test]
    fn test_trailing_bits_display() {
        let trailing = TrailingBits {
            remaining: 3,
            preview: "000".to_string(),
        };
        let text = trailing.to_string();
        assert!(text.contains("3 remaining bits"));
        assert!(text.contains("'000...'"));
    }
}
