//! Prefix-code tables and the greedy Huffman scanner.
//!
//! The format Huffman-codes three interleaved alphabets (representative
//! color ids, difference values, run counts), each with its own table
//! mapping bit patterns to values. Decoding is greedy shortest-match: grow
//! a candidate one bit at a time from the cursor and take the first pattern
//! present in the table. With a prefix-free table this is unambiguous;
//! [`PrefixTable`] enforces prefix-freeness at construction.

use oxipix_core::bitstream::{BitStream, Code};
use oxipix_core::error::{OxiPixError, Result};
use std::collections::HashMap;

/// Bits of context rendered before a scan failure position.
const CONTEXT_BITS_BEFORE: usize = 20;

/// Bits of context rendered after a scan failure position.
const CONTEXT_BITS_AFTER: usize = 40;

/// Which stream item a scan is decoding, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamItem {
    /// Representative color id.
    RepColorId,
    /// Signed difference from the representative's palette index.
    DiffValue,
    /// Run-length repeat count.
    RunCount,
}

impl StreamItem {
    /// Human-readable item name used in decode errors.
    pub fn name(self) -> &'static str {
        match self {
            StreamItem::RepColorId => "representative color ID",
            StreamItem::DiffValue => "difference value",
            StreamItem::RunCount => "RLE count",
        }
    }
}

/// A prefix-free map from bit patterns to decoded values.
///
/// Keys are hashed whole (bits plus length), so each candidate the scanner
/// grows costs one lookup instead of a string slice comparison, and the
/// tracked maximum key length bounds every scan.
#[derive(Debug, Clone)]
pub struct PrefixTable<V> {
    codes: HashMap<Code, V>,
    min_len: u8,
    max_len: u8,
}

impl<V> Default for PrefixTable<V> {
    fn default() -> Self {
        Self {
            codes: HashMap::new(),
            min_len: 0,
            max_len: 0,
        }
    }
}

impl<V: Copy> PrefixTable<V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a `pattern -> value` mapping.
    ///
    /// Fails with [`OxiPixError::PrefixConflict`] if the pattern equals, is
    /// a prefix of, or is extended by an existing key. Greedy decoding would
    /// otherwise silently pick the shortest interpretation.
    pub fn insert(&mut self, pattern: &str, value: V) -> Result<()> {
        let code = Code::parse(pattern)?;
        for existing in self.codes.keys() {
            if existing.is_prefix_of(code) || code.is_prefix_of(*existing) {
                return Err(OxiPixError::prefix_conflict(
                    code.to_string(),
                    existing.to_string(),
                ));
            }
        }
        if self.codes.is_empty() {
            self.min_len = code.len();
            self.max_len = code.len();
        } else {
            self.min_len = self.min_len.min(code.len());
            self.max_len = self.max_len.max(code.len());
        }
        self.codes.insert(code, value);
        Ok(())
    }

    /// Build a table from `(pattern, value)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use oxipix_codec::huffman::PrefixTable;
    ///
    /// let diff: PrefixTable<i32> =
    ///     PrefixTable::from_pairs(&[("00", 0), ("01", 1), ("10", -1)]).unwrap();
    /// assert_eq!(diff.len(), 3);
    /// ```
    pub fn from_pairs(pairs: &[(&str, V)]) -> Result<Self> {
        let mut table = Self::new();
        for &(pattern, value) in pairs {
            table.insert(pattern, value)?;
        }
        Ok(table)
    }

    /// Look up a code.
    pub fn get(&self, code: Code) -> Option<V> {
        self.codes.get(&code).copied()
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Length of the shortest code, 0 if empty.
    pub fn min_code_len(&self) -> u8 {
        self.min_len
    }

    /// Length of the longest code, 0 if empty.
    pub fn max_code_len(&self) -> u8 {
        self.max_len
    }
}

/// Decode one item from `stream` starting at bit `start`.
///
/// Greedy shortest-match: the candidate grows one bit per step and the first
/// table hit wins, returning the value and the cursor one past the matched
/// code. The scan never looks further than the table's longest code; past
/// that no candidate can match.
///
/// Fails with [`OxiPixError::HuffmanDecode`] when the stream runs out (or
/// the length bound is hit) with no match. The error carries the start
/// position, the candidate tried, and a window of up to 20 bits before and
/// 40 bits after the start position.
pub fn decode_item<V: Copy>(
    stream: &BitStream,
    start: usize,
    table: &PrefixTable<V>,
    item: StreamItem,
) -> Result<(V, usize)> {
    let mut candidate = Code::EMPTY;
    let mut pos = start;

    while candidate.len() < table.max_code_len() {
        let Some(bit) = stream.get(pos) else {
            break;
        };
        // max_code_len <= Code::MAX_LEN, so extending cannot overflow.
        candidate = candidate.extended(bit).unwrap_or(candidate);
        pos += 1;

        if candidate.len() >= table.min_code_len()
            && let Some(value) = table.get(candidate)
        {
            return Ok((value, pos));
        }
    }

    Err(OxiPixError::huffman_decode(
        item.name(),
        start,
        candidate.to_string(),
        bit_context(stream, start),
    ))
}

/// Render `...<bits before>[HERE]<bits after>...` around a failure position.
fn bit_context(stream: &BitStream, position: usize) -> String {
    let before = stream.range_string(position.saturating_sub(CONTEXT_BITS_BEFORE), position);
    let after = stream.range_string(position, position + CONTEXT_BITS_AFTER);
    format!("...{before}[HERE]{after}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_table() -> PrefixTable<u32> {
        PrefixTable::from_pairs(&[("0", 0), ("1", 1)]).unwrap()
    }

    #[test]
    fn test_greedy_shortest_match() {
        let table = bit_table();
        let stream = BitStream::from_pattern("01").unwrap();

        let (value, pos) = decode_item(&stream, 0, &table, StreamItem::RepColorId).unwrap();
        assert_eq!((value, pos), (0, 1));

        let (value, pos) = decode_item(&stream, pos, &table, StreamItem::RepColorId).unwrap();
        assert_eq!((value, pos), (1, 2));
    }

    #[test]
    fn test_multi_length_codes() {
        let table: PrefixTable<i32> =
            PrefixTable::from_pairs(&[("00", 0), ("01", 1), ("10", -1), ("110", 2)]).unwrap();
        let stream = BitStream::from_pattern("1100110").unwrap();

        let (value, pos) = decode_item(&stream, 0, &table, StreamItem::DiffValue).unwrap();
        assert_eq!((value, pos), (2, 3));
        let (value, pos) = decode_item(&stream, pos, &table, StreamItem::DiffValue).unwrap();
        assert_eq!((value, pos), (1, 5));
        let (value, pos) = decode_item(&stream, pos, &table, StreamItem::DiffValue).unwrap();
        assert_eq!((value, pos), (-1, 7));
    }

    #[test]
    fn test_exhaustion_reports_context() {
        let table: PrefixTable<u32> = PrefixTable::from_pairs(&[("00", 0), ("01", 1)]).unwrap();
        let stream = BitStream::from_pattern("010").unwrap();

        // First item matches, the lone trailing bit cannot.
        let (_, pos) = decode_item(&stream, 0, &table, StreamItem::RunCount).unwrap();
        let err = decode_item(&stream, pos, &table, StreamItem::RunCount).unwrap_err();
        match err {
            OxiPixError::HuffmanDecode {
                item,
                position,
                tried_prefix,
                context,
            } => {
                assert_eq!(item, "RLE count");
                assert_eq!(position, 2);
                assert_eq!(tried_prefix, "0");
                assert_eq!(context, "...01[HERE]0...");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_context_window_bounds() {
        let table: PrefixTable<u32> = PrefixTable::from_pairs(&[("0000", 0)]).unwrap();
        let stream = BitStream::from_pattern(&"1".repeat(100)).unwrap();

        let err = decode_item(&stream, 50, &table, StreamItem::RepColorId).unwrap_err();
        match err {
            OxiPixError::HuffmanDecode { context, .. } => {
                assert_eq!(
                    context,
                    format!("...{}[HERE]{}...", "1".repeat(20), "1".repeat(40))
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_bounded_by_longest_code() {
        // An undecodable region mid-stream fails without scanning to the end.
        let table: PrefixTable<u32> = PrefixTable::from_pairs(&[("00", 0), ("01", 1)]).unwrap();
        let stream = BitStream::from_pattern("110000").unwrap();

        let err = decode_item(&stream, 0, &table, StreamItem::RepColorId).unwrap_err();
        match err {
            OxiPixError::HuffmanDecode {
                position,
                tried_prefix,
                ..
            } => {
                assert_eq!(position, 0);
                assert_eq!(tried_prefix, "11");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table: PrefixTable<u32> = PrefixTable::new();
        let stream = BitStream::from_pattern("0101").unwrap();
        assert!(decode_item(&stream, 0, &table, StreamItem::RunCount).is_err());
    }

    #[test]
    fn test_insert_rejects_prefix_conflicts() {
        let mut table: PrefixTable<u32> = PrefixTable::new();
        table.insert("0", 0).unwrap();
        assert!(matches!(
            table.insert("01", 1),
            Err(OxiPixError::PrefixConflict { .. })
        ));
        assert!(matches!(
            table.insert("0", 2),
            Err(OxiPixError::PrefixConflict { .. })
        ));

        let mut table: PrefixTable<u32> = PrefixTable::new();
        table.insert("011", 0).unwrap();
        assert!(table.insert("01", 1).is_err());
        assert!(table.insert("00", 1).is_ok());
    }

    #[test]
    fn test_code_length_tracking() {
        let table: PrefixTable<u32> =
            PrefixTable::from_pairs(&[("10", 0), ("0", 1), ("110", 2)]).unwrap();
        assert_eq!(table.min_code_len(), 1);
        assert_eq!(table.max_code_len(), 3);
    }
}
