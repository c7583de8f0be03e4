//! Options passed in from the page as JSON

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolUnit {
    /// Unicode scalar values
    #[default]
    Char,
    /// Raw UTF-8 bytes
    Byte,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub unit: SymbolUnit,
    /// Number of leading symbols listed in `encoded_str`
    pub preview_len: usize,
    /// Emit `huffman_tree` and `tree_levels`
    pub include_tree: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            unit: SymbolUnit::Char,
            preview_len: 5,
            include_tree: true,
        }
    }
}

impl CodecOptions {
    /// An empty or blank string yields the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(json)
        }
    }
}
