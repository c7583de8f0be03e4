//! Symbol statistics
use crate::*;

/// Occurrence count of every distinct symbol, in first-occurrence order
///
/// The order does not affect lookups, but it is the tie-break order used by
/// [`HuffmanTree::build`](crate::HuffmanTree::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    index: BTreeMap<K, usize>,
}

impl<K: Copy + Ord> FrequencyTable<K> {
    #[inline]
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn analyze<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut result = Self::empty();
        for symbol in iter {
            result.count_freq(symbol, 1);
        }
        result
    }

    /// Rebuilds a table from `(symbol, count)` pairs, keeping their order
    ///
    /// Repeated symbols are merged into the first entry; zero counts are dropped.
    pub fn from_entries<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut result = Self::empty();
        for (symbol, freq) in iter {
            if freq > 0 {
                result.count_freq(symbol, freq);
            }
        }
        result
    }

    fn count_freq(&mut self, symbol: K, freq: usize) {
        match self.index.get(&symbol) {
            Some(&index) => {
                let count = &mut self.entries[index].1;
                *count = count.saturating_add(freq);
            }
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, freq));
            }
        }
    }

    #[inline]
    pub fn get(&self, symbol: &K) -> Option<usize> {
        self.index.get(symbol).map(|&index| self.entries[index].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn total_count(&self) -> usize {
        self.entries.iter().fold(0usize, |a, v| a.saturating_add(v.1))
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (K, usize)> + '_ {
        self.entries.iter().copied()
    }

    #[inline]
    pub fn symbols(&self) -> impl ExactSizeIterator<Item = K> + '_ {
        self.entries.iter().map(|v| v.0)
    }

    /// Entries by descending count; equal counts keep first-occurrence order
    pub fn sorted_by_freq(&self) -> Vec<(K, usize)> {
        let mut vec = self.entries.clone();
        vec.sort_by(|a, b| b.1.cmp(&a.1));
        vec
    }
}
