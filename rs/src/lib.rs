//! Huffman Coding Visualizer

mod options;
pub use options::{CodecOptions, SymbolUnit};

use huffman::prefix::bits_saved;
use huffman::{BitString, DecodeError, EncodeError, FrequencyTable};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn encode_text(input: &str, options: &str) -> Result<String, String> {
    let options = CodecOptions::from_json(options).map_err(|e| format!("{}", e))?;
    let encoded = _encode_text(input, &options).map_err(|e| format!("{}", e))?;
    serde_json::to_string(&encoded).map_err(|e| format!("{}", e))
}

pub fn _encode_text(input: &str, options: &CodecOptions) -> Result<EncodeTextResult, FacadeError> {
    log::debug!("encode_text: {} bytes, {:?}", input.len(), options);
    match options.unit {
        SymbolUnit::Char => encode_symbols(&input.chars().collect::<Vec<_>>(), options),
        SymbolUnit::Byte => encode_symbols(input.as_bytes(), options),
    }
}

/// `frequencies` is the `frequencies` array of a previous [`encode_text`] result
#[wasm_bindgen]
pub fn decode_text(encoded: &str, frequencies: &str, options: &str) -> Result<String, String> {
    let options = CodecOptions::from_json(options).map_err(|e| format!("{}", e))?;
    let frequencies = serde_json::from_str::<Vec<FrequencyEntry>>(frequencies)
        .map_err(|e| format!("{}", e))?;
    _decode_text(encoded, &frequencies, &options).map_err(|e| format!("{}", e))
}

pub fn _decode_text(
    encoded: &str,
    frequencies: &[FrequencyEntry],
    options: &CodecOptions,
) -> Result<String, FacadeError> {
    log::debug!(
        "decode_text: {} bits, {} symbols, {:?}",
        encoded.len(),
        frequencies.len(),
        options
    );
    match options.unit {
        SymbolUnit::Char => decode_symbols::<char>(encoded, frequencies),
        SymbolUnit::Byte => decode_symbols::<u8>(encoded, frequencies),
    }
}

fn encode_symbols<K: Symbol>(
    input: &[K],
    options: &CodecOptions,
) -> Result<EncodeTextResult, FacadeError> {
    let freq_table = huffman::analyze(input.iter().copied());
    let tree = huffman::build_tree(&freq_table)?;
    let codes = huffman::generate_codes(&tree);
    let encoded = huffman::encode(input.iter().copied(), &codes)?;

    let input_len = input.len() as f64;
    let prefix_table = freq_table
        .sorted_by_freq()
        .into_iter()
        .filter_map(|(symbol, freq)| {
            codes.get(&symbol).map(|code| PrefixTableEntry {
                symbol: symbol.to_index(),
                symbol_char: symbol.stringify(),
                freq,
                freq_rate: freq as f64 / input_len,
                len: code.len(),
                code: format!("{}", code),
                bits_saved: bits_saved(freq, code.len()),
            })
        })
        .collect::<Vec<_>>();

    let encoded_str = input
        .iter()
        .take(options.preview_len)
        .filter_map(|symbol| codes.get(symbol))
        .map(|code| format!("{}", code))
        .collect::<Vec<_>>();

    let (huffman_tree, tree_levels) = if options.include_tree {
        let levels = tree
            .levels()
            .into_iter()
            .map(|item| TreeLevelEntry {
                depth: item.depth,
                path: format!("{}", item.path),
                weight: item.node.weight(),
                symbol: item.node.symbol().map(|v| v.to_index()),
                symbol_char: item.node.symbol().map(|v| v.stringify()),
            })
            .collect::<Vec<_>>();
        (tree.render(K::stringify), levels)
    } else {
        (String::new(), Vec::new())
    };

    let frequencies = freq_table
        .iter()
        .map(|(symbol, freq)| FrequencyEntry {
            symbol: symbol.to_index(),
            freq,
        })
        .collect::<Vec<_>>();

    Ok(EncodeTextResult {
        input_len: input.len(),
        input_bits: input.len() * huffman::BITS_PER_SYMBOL,
        input_entropy: entropy_of(&freq_table.iter().collect::<Vec<_>>()),
        output_bits: encoded.len(),
        compression_ratio: codes.compression_ratio(input.iter().copied()),
        average_code_len: codes.average_code_len(&freq_table),
        frequencies,
        prefix_table,
        encoded: format!("{}", encoded),
        encoded_bytes: encoded.as_bytes().to_vec(),
        encoded_str,
        huffman_tree,
        tree_levels,
    })
}

fn decode_symbols<K: Symbol>(
    encoded: &str,
    frequencies: &[FrequencyEntry],
) -> Result<String, FacadeError> {
    let entries = frequencies
        .iter()
        .map(|entry| {
            K::from_index(entry.symbol)
                .map(|symbol| (symbol, entry.freq))
                .ok_or(FacadeError::InvalidSymbol(entry.symbol))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let tree = huffman::build_tree(&FrequencyTable::from_entries(entries))?;
    let bits = encoded.trim().parse::<BitString>()?;
    let decoded = huffman::decode(&bits, &tree)?;
    K::into_text(decoded)
}

/// Input unit the pipeline runs over
pub trait Symbol: Copy + Ord {
    fn to_index(self) -> u32;

    fn from_index(index: u32) -> Option<Self>;

    fn stringify(&self) -> String;

    fn into_text(symbols: Vec<Self>) -> Result<String, FacadeError>;
}

impl Symbol for u8 {
    #[inline]
    fn to_index(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_index(index: u32) -> Option<Self> {
        u8::try_from(index).ok()
    }

    fn stringify(&self) -> String {
        let data = *self;
        if data < 0x20 || data > 0x7e {
            format!("\"\\x{:02x}\"", data)
        } else {
            format!("\"{}\"", data as char)
        }
    }

    fn into_text(symbols: Vec<Self>) -> Result<String, FacadeError> {
        String::from_utf8(symbols).map_err(|_| FacadeError::InvalidUtf8)
    }
}

impl Symbol for char {
    #[inline]
    fn to_index(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_index(index: u32) -> Option<Self> {
        char::from_u32(index)
    }

    fn stringify(&self) -> String {
        if self.is_control() {
            format!("\"\\u{{{:04x}}}\"", *self as u32)
        } else {
            format!("\"{}\"", self)
        }
    }

    fn into_text(symbols: Vec<Self>) -> Result<String, FacadeError> {
        Ok(symbols.into_iter().collect())
    }
}

/// Shannon entropy in bits per symbol
fn entropy_of<T>(data: &[(T, usize)]) -> f64 {
    let total_size = data.iter().map(|v| v.1).sum::<usize>() as f64;
    let mut entropy = 0.0;
    for (_, count) in data.iter() {
        let p = *count as f64 / total_size;
        if p > 0.0 {
            entropy -= p * p.log2();
        }
    }
    entropy
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeTextResult {
    pub input_len: usize,
    pub input_bits: usize,
    pub input_entropy: f64,
    pub output_bits: usize,
    pub compression_ratio: f64,
    pub average_code_len: f64,
    pub frequencies: Vec<FrequencyEntry>,
    pub prefix_table: Vec<PrefixTableEntry>,
    pub encoded: String,
    pub encoded_bytes: Vec<u8>,
    pub encoded_str: Vec<String>,
    pub huffman_tree: String,
    pub tree_levels: Vec<TreeLevelEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub symbol: u32,
    pub freq: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrefixTableEntry {
    pub symbol: u32,
    pub symbol_char: String,
    pub freq: usize,
    pub freq_rate: f64,
    pub len: usize,
    pub code: String,
    pub bits_saved: isize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TreeLevelEntry {
    pub depth: usize,
    pub path: String,
    pub weight: usize,
    pub symbol: Option<u32>,
    pub symbol_char: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("symbol {0} is out of range for the selected unit")]
    InvalidSymbol(u32),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}
