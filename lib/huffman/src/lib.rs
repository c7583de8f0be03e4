//! Huffman coding library
//!
//! The pipeline is strictly linear:
//!
//! 1. [`analyze`] counts symbol occurrences into a [`FrequencyTable`]
//! 2. [`build_tree`] merges the two lightest nodes until one root remains
//! 3. [`generate_codes`] assigns each leaf its root-to-leaf path
//! 4. [`encode`] / [`decode`] map symbols to bits and back
//!
//! ```
//! let input = "abracadabra";
//! let freq_table = huffman::analyze(input.chars());
//! let tree = huffman::build_tree(&freq_table).unwrap();
//! let codes = huffman::generate_codes(&tree);
//!
//! let encoded = huffman::encode(input.chars(), &codes).unwrap();
//! assert_eq!(encoded.len(), 23);
//!
//! let decoded = huffman::decode(&encoded, &tree).unwrap();
//! assert_eq!(decoded.into_iter().collect::<String>(), input);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

pub mod bits;
pub mod prefix;
pub mod stats;
pub mod tree;

pub use bits::BitString;
pub use prefix::{CodeTable, PrefixDecoder};
pub use stats::FrequencyTable;
pub use tree::{HuffmanTree, HuffmanTreeNode};

/// Bits per symbol of the uncompressed baseline
pub const BITS_PER_SYMBOL: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot build a prefix code from empty input")]
    EmptyInput,
    #[error("no prefix code for the symbol at position {position}")]
    MissingCode { position: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("bit stream ended in the middle of a code after {consumed} bits")]
    TruncatedStream { consumed: usize },
    #[error("bit {position} is not a valid code for a single-symbol tree")]
    DegenerateTree { position: usize },
    #[error("invalid bit digit at position {position}")]
    InvalidDigit { position: usize },
}

#[inline]
pub fn analyze<K, I>(iter: I) -> FrequencyTable<K>
where
    K: Copy + Ord,
    I: IntoIterator<Item = K>,
{
    FrequencyTable::analyze(iter)
}

#[inline]
pub fn build_tree<K: Copy + Ord>(freq_table: &FrequencyTable<K>) -> Result<HuffmanTree<K>, EncodeError> {
    HuffmanTree::build(freq_table)
}

#[inline]
pub fn generate_codes<K: Copy + Ord>(tree: &HuffmanTree<K>) -> CodeTable<K> {
    CodeTable::generate(tree)
}

#[inline]
pub fn encode<K, I>(iter: I, codes: &CodeTable<K>) -> Result<BitString, EncodeError>
where
    K: Copy + Ord,
    I: IntoIterator<Item = K>,
{
    codes.encode(iter)
}

#[inline]
pub fn decode<K: Copy>(bits: &BitString, tree: &HuffmanTree<K>) -> Result<Vec<K>, DecodeError> {
    PrefixDecoder::new(tree).decode_all(bits)
}

/// Space saved against an 8-bit-per-symbol baseline, in percent
///
/// Negative when the code does worse than the baseline; `0.0` for empty input.
#[inline]
pub fn compression_ratio<K, I>(iter: I, codes: &CodeTable<K>) -> f64
where
    K: Copy + Ord,
    I: IntoIterator<Item = K>,
{
    codes.compression_ratio(iter)
}
