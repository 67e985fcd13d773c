//! # OxiPix Core
//!
//! Core components for the OxiPix palette-image decoder.
//!
//! This crate provides the building blocks the codec layer is written
//! against:
//!
//! - [`bitstream`]: the logical '0'/'1' stream and short bit patterns
//! - [`codebook`]: character-to-bits codebooks and stream expansion
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! The decode pipeline is layered, each stage consuming only the previous
//! stage's output:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ oxipix-codec                                            │
//! │     prefix tables, Huffman scan, RLE, pixel indices     │
//! ├─────────────────────────────────────────────────────────┤
//! │ oxipix-core (this crate)                                │
//! │     BitStream, Code, Codebook, errors                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxipix_core::codebook::Codebook;
//!
//! let codebook = Codebook::from_pairs(&[('a', "00"), ('c', "10")]).unwrap();
//! let stream = codebook.expand("ac").unwrap();
//! assert_eq!(stream.to_string(), "0010");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod codebook;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitStream, Code};
pub use codebook::Codebook;
pub use error::{OxiPixError, Result};
