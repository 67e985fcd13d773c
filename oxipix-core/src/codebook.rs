//! Character codebooks and bit expansion.
//!
//! The outermost layer of the format packs the Huffman bit string into
//! printable characters through a fixed-width codebook (every entry the same
//! bit length, e.g. 8 characters covering all 3-bit patterns). Decoding
//! starts by expanding each input character back into its bits.
//!
//! The same-length property is a caller-side convention: the expander works
//! from whatever entries it is given and does not enforce it.

use crate::bitstream::{BitStream, Code};
use crate::error::{OxiPixError, Result};
use std::collections::HashMap;

/// A `char` to bit-pattern codebook.
#[derive(Debug, Clone, Default)]
pub struct Codebook {
    entries: HashMap<char, Code>,
}

impl Codebook {
    /// Create an empty codebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping from `character` to the pattern string.
    ///
    /// Re-inserting a character replaces its pattern. Fails if the pattern
    /// is not a valid [`Code`] string.
    pub fn insert(&mut self, character: char, pattern: &str) -> Result<()> {
        let code = Code::parse(pattern)?;
        self.entries.insert(character, code);
        Ok(())
    }

    /// Build a codebook from `(character, pattern)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use oxipix_core::codebook::Codebook;
    ///
    /// let codebook = Codebook::from_pairs(&[('a', "00"), ('b', "01")]).unwrap();
    /// assert_eq!(codebook.len(), 2);
    /// ```
    pub fn from_pairs(pairs: &[(char, &str)]) -> Result<Self> {
        let mut codebook = Self::new();
        for &(character, pattern) in pairs {
            codebook.insert(character, pattern)?;
        }
        Ok(codebook)
    }

    /// Look up the pattern for a character.
    pub fn get(&self, character: char) -> Option<Code> {
        self.entries.get(&character).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the codebook has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand an encoded string into the concatenated bit stream.
    ///
    /// Fails with [`OxiPixError::InvalidCharacter`] at the first character
    /// without an entry, reporting its 0-based index; no partial stream is
    /// returned.
    pub fn expand(&self, encoded: &str) -> Result<BitStream> {
        let mut stream = BitStream::new();
        for (index, character) in encoded.chars().enumerate() {
            let code = self
                .get(character)
                .ok_or_else(|| OxiPixError::invalid_character(index, character))?;
            stream.push_code(code);
        }
        Ok(stream)
    }
}
