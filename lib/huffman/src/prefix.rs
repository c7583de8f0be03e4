//! Prefix Coder
//!
//! https://en.wikipedia.org/wiki/Huffman_coding
use crate::bits::BitStreamReader;
use crate::*;

/// Symbol to code mapping derived from a [`HuffmanTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<K> {
    codes: BTreeMap<K, BitString>,
}

impl<K: Copy + Ord> CodeTable<K> {
    /// Assigns every leaf its root-to-leaf path, `0` for left and `1` for right
    ///
    /// A tree made of a single leaf has no path; that leaf gets the code `0`.
    pub fn generate(tree: &HuffmanTree<K>) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = Vec::new();
        match tree.root() {
            HuffmanTreeNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, BitString::from_iter([false]));
            }
            root => stack.push((root, BitString::new())),
        }

        while let Some((node, path)) = stack.pop() {
            match node {
                HuffmanTreeNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path);
                }
                HuffmanTreeNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push_bool(true);
                    let mut left_path = path;
                    left_path.push_bool(false);
                    stack.push((&**right, right_path));
                    stack.push((&**left, left_path));
                }
            }
        }

        let result = Self { codes };
        log::debug!(
            "generated {} prefix codes, longest {} bits",
            result.len(),
            result.max_code_len()
        );
        result
    }

    #[inline]
    pub fn get(&self, symbol: &K) -> Option<&BitString> {
        self.codes.get(symbol)
    }

    #[inline]
    pub fn code_len(&self, symbol: &K) -> Option<usize> {
        self.codes.get(symbol).map(|v| v.len())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries ordered by symbol
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (K, &BitString)> + '_ {
        self.codes.iter().map(|(k, v)| (*k, v))
    }

    #[inline]
    pub fn max_code_len(&self) -> usize {
        self.codes.values().fold(0, |a, v| a.max(v.len()))
    }

    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(p, lhs)| {
            self.codes
                .iter()
                .all(|(q, rhs)| p == q || !rhs.starts_with(lhs))
        })
    }

    pub fn encode<I: IntoIterator<Item = K>>(&self, iter: I) -> Result<BitString, EncodeError> {
        let mut output = BitString::new();
        for (position, symbol) in iter.into_iter().enumerate() {
            let code = self
                .codes
                .get(&symbol)
                .ok_or(EncodeError::MissingCode { position })?;
            output.push_bits(code);
        }
        Ok(output)
    }

    /// Number of bits needed to encode the input the table was built from
    pub fn encoded_len(&self, freq_table: &FrequencyTable<K>) -> usize {
        freq_table.iter().fold(0, |a, (symbol, freq)| {
            a + freq * self.code_len(&symbol).unwrap_or_default()
        })
    }

    /// Expected code length in bits per symbol
    pub fn average_code_len(&self, freq_table: &FrequencyTable<K>) -> f64 {
        match freq_table.total_count() {
            0 => 0.0,
            total => self.encoded_len(freq_table) as f64 / total as f64,
        }
    }

    /// Space saved against [`BITS_PER_SYMBOL`], in percent
    ///
    /// Symbols without a code count as zero bits.
    pub fn compression_ratio<I: IntoIterator<Item = K>>(&self, iter: I) -> f64 {
        let mut input_bits = 0usize;
        let mut output_bits = 0usize;
        for symbol in iter {
            input_bits += BITS_PER_SYMBOL;
            output_bits += self.code_len(&symbol).unwrap_or_default();
        }
        if input_bits == 0 {
            return 0.0;
        }
        (1.0 - output_bits as f64 / input_bits as f64) * 100.0
    }
}

/// Bits saved by a symbol's code against [`BITS_PER_SYMBOL`]; negative if the code is longer
#[inline]
pub fn bits_saved(freq: usize, code_len: usize) -> isize {
    (freq as isize).saturating_mul(BITS_PER_SYMBOL as isize - code_len as isize)
}

/// Decodes symbols by walking a [`HuffmanTree`] one bit at a time
pub struct PrefixDecoder<'a, K> {
    root: &'a HuffmanTreeNode<K>,
}

impl<'a, K: Copy> PrefixDecoder<'a, K> {
    #[inline]
    pub fn new(tree: &'a HuffmanTree<K>) -> Self {
        Self { root: tree.root() }
    }

    /// Reads exactly one code from `reader`
    pub fn decode(&self, reader: &mut BitStreamReader) -> Result<K, DecodeError> {
        if let HuffmanTreeNode::Leaf { symbol, .. } = self.root {
            let position = reader.consumed();
            return match reader.read_bool() {
                Some(false) => Ok(*symbol),
                Some(true) => Err(DecodeError::DegenerateTree { position }),
                None => Err(DecodeError::TruncatedStream { consumed: position }),
            };
        }

        let mut node = self.root;
        loop {
            match node {
                HuffmanTreeNode::Leaf { symbol, .. } => return Ok(*symbol),
                HuffmanTreeNode::Internal { left, right, .. } => {
                    let bit = reader.read_bool().ok_or(DecodeError::TruncatedStream {
                        consumed: reader.consumed(),
                    })?;
                    node = if bit { &**right } else { &**left };
                }
            }
        }
    }

    pub fn decode_all(&self, bits: &BitString) -> Result<Vec<K>, DecodeError> {
        let mut reader = bits.iter();
        let mut output = Vec::new();
        while !reader.is_empty() {
            output.push(self.decode(&mut reader)?);
        }
        Ok(output)
    }
}
