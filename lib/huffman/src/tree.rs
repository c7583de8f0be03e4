//! Huffman Tree
use crate::*;
use alloc::collections::{BinaryHeap, VecDeque};
use alloc::string::String;
use core::cmp;
use core::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanTreeNode<K> {
    Leaf {
        symbol: K,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<HuffmanTreeNode<K>>,
        right: Box<HuffmanTreeNode<K>>,
    },
}

impl<K> HuffmanTreeNode<K> {
    #[inline]
    pub fn make_leaf(symbol: K, weight: usize) -> Self {
        Self::Leaf { symbol, weight }
    }

    #[inline]
    pub fn make_pair(left: Self, right: Self) -> Self {
        Self::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[inline]
    pub fn weight(&self) -> usize {
        match self {
            Self::Leaf { weight, .. } | Self::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    #[inline]
    pub fn symbol(&self) -> Option<&K> {
        match self {
            Self::Leaf { symbol, .. } => Some(symbol),
            Self::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn left(&self) -> Option<&Self> {
        self.child(false)
    }

    #[inline]
    pub fn right(&self) -> Option<&Self> {
        self.child(true)
    }

    /// `false` selects the left child, `true` the right one
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&Self> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal { left, right, .. } => Some(if bit { &**right } else { &**left }),
        }
    }
}

/// A node waiting in the merge queue
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: the lightest node
/// with the lowest sequence number compares greatest.
struct Pending<K> {
    weight: usize,
    sequence: usize,
    node: HuffmanTreeNode<K>,
}

impl<K> Ord for Pending<K> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match other.weight.cmp(&self.weight) {
            cmp::Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl<K> PartialOrd for Pending<K> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> PartialEq for Pending<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl<K> Eq for Pending<K> {}

/// A node visited in breadth-first order
#[derive(Debug, Clone)]
pub struct TreeLevelNode<'a, K> {
    pub depth: usize,
    pub path: BitString,
    pub node: &'a HuffmanTreeNode<K>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<K> {
    root: HuffmanTreeNode<K>,
}

impl<K: Copy + Ord> HuffmanTree<K> {
    /// Builds the tree by repeatedly merging the two lightest nodes
    ///
    /// Ties are broken by sequence number: leaves are numbered in the table's
    /// first-occurrence order and every merged node takes the next number. The
    /// first node popped becomes the left child.
    pub fn build(freq_table: &FrequencyTable<K>) -> Result<Self, EncodeError> {
        let mut heap = freq_table
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| Pending {
                weight,
                sequence,
                node: HuffmanTreeNode::make_leaf(symbol, weight),
            })
            .collect::<BinaryHeap<_>>();
        let mut sequence = heap.len();

        let root = loop {
            let left = heap.pop().ok_or(EncodeError::EmptyInput)?;
            let Some(right) = heap.pop() else {
                break left.node;
            };
            log::trace!(
                "merge #{} ({}) + #{} ({}) -> #{}",
                left.sequence,
                left.weight,
                right.sequence,
                right.weight,
                sequence
            );
            let node = HuffmanTreeNode::make_pair(left.node, right.node);
            heap.push(Pending {
                weight: node.weight(),
                sequence,
                node,
            });
            sequence += 1;
        };

        log::debug!(
            "built huffman tree: {} symbols, weight {}",
            freq_table.len(),
            root.weight()
        );
        Ok(Self { root })
    }
}

impl<K> HuffmanTree<K> {
    #[inline]
    pub fn root(&self) -> &HuffmanTreeNode<K> {
        &self.root
    }

    /// Total weight, equal to the length of the analyzed input
    #[inline]
    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_depths().count()
    }

    /// Length of the longest root-to-leaf path; `0` for a single-leaf tree
    pub fn depth(&self) -> usize {
        self.leaf_depths().fold(0, |a, v| a.max(v))
    }

    /// Depth of every leaf, left before right
    fn leaf_depths(&self) -> impl Iterator<Item = usize> + '_ {
        let mut stack = Vec::from([(&self.root, 0usize)]);
        core::iter::from_fn(move || {
            while let Some((node, depth)) = stack.pop() {
                match node {
                    HuffmanTreeNode::Leaf { .. } => return Some(depth),
                    HuffmanTreeNode::Internal { left, right, .. } => {
                        stack.push((&**right, depth + 1));
                        stack.push((&**left, depth + 1));
                    }
                }
            }
            None
        })
    }

    /// All nodes in breadth-first order, left before right
    pub fn levels(&self) -> Vec<TreeLevelNode<'_, K>> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(TreeLevelNode {
            depth: 0,
            path: BitString::new(),
            node: &self.root,
        });
        while let Some(item) = queue.pop_front() {
            if let HuffmanTreeNode::Internal { left, right, .. } = item.node {
                for (bit, child) in [(false, left), (true, right)] {
                    let mut path = item.path.clone();
                    path.push_bool(bit);
                    queue.push_back(TreeLevelNode {
                        depth: item.depth + 1,
                        path,
                        node: &**child,
                    });
                }
            }
            result.push(item);
        }
        result
    }

    /// Indented text rendering, one node per line, left subtree first
    pub fn render<F>(&self, stringify: F) -> String
    where
        F: Fn(&K) -> String,
    {
        let mut output = String::new();
        let mut stack = Vec::new();
        stack.push((&self.root, 0usize));
        while let Some((item, nest)) = stack.pop() {
            if !output.is_empty() {
                output.push('\n');
            }
            for _ in 0..nest * 2 {
                output.push(' ');
            }
            match item {
                HuffmanTreeNode::Leaf { symbol, weight } => {
                    let _ = write!(output, "{}: {}", weight, stringify(symbol));
                }
                HuffmanTreeNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    let _ = write!(output, "{}:", weight);
                    stack.push((&**right, nest + 1));
                    stack.push((&**left, nest + 1));
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(input: &str) -> HuffmanTree<char> {
        HuffmanTree::build(&FrequencyTable::analyze(input.chars())).unwrap()
    }

    fn assert_weights<K>(node: &HuffmanTreeNode<K>) -> usize {
        match node {
            HuffmanTreeNode::Leaf { weight, .. } => *weight,
            HuffmanTreeNode::Internal {
                weight,
                left,
                right,
            } => {
                let sum = assert_weights(&**left) + assert_weights(&**right);
                assert_eq!(*weight, sum);
                sum
            }
        }
    }

    #[test]
    fn two_symbols() {
        let tree = build("aaab");
        assert_eq!(tree.weight(), 4);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root().left().and_then(|v| v.symbol()), Some(&'b'));
        assert_eq!(tree.root().right().and_then(|v| v.symbol()), Some(&'a'));
    }

    #[test]
    fn empty() {
        let freq_table = FrequencyTable::<char>::analyze("".chars());
        assert_eq!(HuffmanTree::build(&freq_table), Err(EncodeError::EmptyInput));
    }

    #[test]
    fn single_leaf() {
        let tree = build("zzz");
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().symbol(), Some(&'z'));
        assert_eq!(tree.weight(), 3);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn tie_break() {
        let tree = build("aabb");
        assert_eq!(tree.root().left().and_then(|v| v.symbol()), Some(&'a'));
        assert_eq!(tree.root().right().and_then(|v| v.symbol()), Some(&'b'));
        for _ in 0..8 {
            assert_eq!(build("aabb"), tree);
        }

        // first occurrence wins: "b" is seen first here
        let tree = build("bbaa");
        assert_eq!(tree.root().left().and_then(|v| v.symbol()), Some(&'b'));
    }

    #[test]
    fn weights() {
        let input = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let tree = build(input);
        assert_eq!(assert_weights(tree.root()), input.chars().count());
        assert_eq!(tree.weight(), input.chars().count());
    }

    #[test]
    fn abracadabra() {
        let tree = build("abracadabra");
        let levels = tree
            .levels()
            .iter()
            .map(|v| (v.depth, format!("{}", v.path), v.node.weight(), v.node.symbol().copied()))
            .collect::<Vec<_>>();
        assert_eq!(
            levels,
            [
                (0, "".to_owned(), 11, None),
                (1, "0".to_owned(), 5, Some('a')),
                (1, "1".to_owned(), 6, None),
                (2, "10".to_owned(), 2, None),
                (2, "11".to_owned(), 4, None),
                (3, "100".to_owned(), 1, Some('c')),
                (3, "101".to_owned(), 1, Some('d')),
                (3, "110".to_owned(), 2, Some('b')),
                (3, "111".to_owned(), 2, Some('r')),
            ]
        );
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_count(), 5);
    }

    #[test]
    fn skewed() {
        // weights 1, 2, 4, 8 merge into a chain
        let tree = build("abbccccdddddddd");
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_count(), 4);
        let levels = tree.levels();
        assert_eq!(
            tree.depth(),
            levels.iter().fold(0, |a, v| a.max(v.depth))
        );
        assert_eq!(
            tree.leaf_count(),
            levels.iter().filter(|v| v.node.is_leaf()).count()
        );
    }

    #[test]
    fn render() {
        let tree = build("aaab");
        assert_eq!(tree.render(|c| format!("{:?}", c)), "4:\n  1: 'b'\n  3: 'a'");

        let tree = build("q");
        assert_eq!(tree.render(|c| format!("{:?}", c)), "1: 'q'");
    }
}
