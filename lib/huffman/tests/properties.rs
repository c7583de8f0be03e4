use huffman::{BitString, CodeTable, FrequencyTable, HuffmanTree, HuffmanTreeNode};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Straightforward construction: stable-sort the working set by weight
/// before every merge, take the first two, append the parent.
fn naive_codes<K: Copy + Ord>(freq_table: &FrequencyTable<K>) -> BTreeMap<K, String> {
    enum Node<K> {
        Leaf(K, usize),
        Pair(usize, Box<Node<K>>, Box<Node<K>>),
    }

    fn weight<K>(node: &Node<K>) -> usize {
        match node {
            Node::Leaf(_, w) | Node::Pair(w, _, _) => *w,
        }
    }

    fn walk<K: Copy + Ord>(node: &Node<K>, path: String, out: &mut BTreeMap<K, String>) {
        match node {
            Node::Leaf(symbol, _) => {
                out.insert(*symbol, if path.is_empty() { "0".to_owned() } else { path });
            }
            Node::Pair(_, left, right) => {
                walk(left, format!("{path}0"), out);
                walk(right, format!("{path}1"), out);
            }
        }
    }

    let mut nodes = freq_table
        .iter()
        .map(|(k, w)| Node::Leaf(k, w))
        .collect::<Vec<_>>();
    while nodes.len() > 1 {
        nodes.sort_by_key(|v| weight(v));
        let left = nodes.remove(0);
        let right = nodes.remove(0);
        nodes.push(Node::Pair(weight(&left) + weight(&right), Box::new(left), Box::new(right)));
    }

    let mut out = BTreeMap::new();
    if let Some(root) = nodes.first() {
        walk(root, String::new(), &mut out);
    }
    out
}

fn check_weights<K>(node: &HuffmanTreeNode<K>) -> usize {
    match node {
        HuffmanTreeNode::Leaf { weight, .. } => *weight,
        HuffmanTreeNode::Internal {
            weight,
            left,
            right,
        } => {
            let sum = check_weights(&**left) + check_weights(&**right);
            assert_eq!(*weight, sum);
            sum
        }
    }
}

proptest! {
    #[test]
    fn round_trip_bytes(input in prop::collection::vec(any::<u8>(), 1..1024)) {
        let tree = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
        let codes = huffman::generate_codes(&tree);
        let encoded = huffman::encode(input.iter().copied(), &codes).unwrap();
        prop_assert_eq!(huffman::decode(&encoded, &tree).unwrap(), input);
    }

    #[test]
    fn round_trip_text(input in "\\PC{1,200}") {
        let tree = huffman::build_tree(&huffman::analyze(input.chars())).unwrap();
        let codes = huffman::generate_codes(&tree);
        let encoded = huffman::encode(input.chars(), &codes).unwrap();

        let text: BitString = format!("{}", encoded).parse().unwrap();
        prop_assert_eq!(&text, &encoded);
        let decoded = huffman::decode(&text, &tree).unwrap();
        prop_assert_eq!(decoded.into_iter().collect::<String>(), input);
    }

    #[test]
    fn prefix_free(input in prop::collection::vec(0u8..64, 1..512)) {
        let tree = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
        let codes = huffman::generate_codes(&tree);
        prop_assert!(codes.is_prefix_free());
        prop_assert!(codes.iter().all(|(_, code)| !code.is_empty()));
    }

    #[test]
    fn code_count(input in prop::collection::vec(any::<u8>(), 1..512)) {
        let freq_table = huffman::analyze(input.iter().copied());
        let codes = huffman::generate_codes(&huffman::build_tree(&freq_table).unwrap());
        let distinct = input.iter().collect::<std::collections::BTreeSet<_>>().len();
        prop_assert_eq!(freq_table.len(), distinct);
        prop_assert_eq!(codes.len(), distinct);
        prop_assert_eq!(freq_table.total_count(), input.len());
    }

    #[test]
    fn weight_conservation(input in prop::collection::vec(any::<u8>(), 1..512)) {
        let tree = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
        prop_assert_eq!(check_weights(tree.root()), input.len());
        prop_assert_eq!(tree.weight(), input.len());
    }

    #[test]
    fn deterministic(input in prop::collection::vec(0u8..16, 1..256)) {
        let first = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
        let second = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(CodeTable::generate(&first), CodeTable::generate(&second));
    }

    #[test]
    fn matches_naive_construction(input in prop::collection::vec(0u8..24, 1..512)) {
        let freq_table = huffman::analyze(input.iter().copied());
        let codes = CodeTable::generate(&HuffmanTree::build(&freq_table).unwrap())
            .iter()
            .map(|(k, v)| (k, format!("{}", v)))
            .collect::<BTreeMap<_, _>>();
        prop_assert_eq!(codes, naive_codes(&freq_table));
    }

    #[test]
    fn encoded_len_matches_table(input in prop::collection::vec(any::<u8>(), 1..512)) {
        let freq_table = huffman::analyze(input.iter().copied());
        let codes = huffman::generate_codes(&huffman::build_tree(&freq_table).unwrap());
        let encoded = huffman::encode(input.iter().copied(), &codes).unwrap();
        prop_assert_eq!(encoded.len(), codes.encoded_len(&freq_table));

        let expected = (1.0 - encoded.len() as f64 / (input.len() * 8) as f64) * 100.0;
        prop_assert!((huffman::compression_ratio(input.iter().copied(), &codes) - expected).abs() < 1e-9);
    }
}

#[test]
fn truncated_streams_are_rejected() {
    let input = b"the quick brown fox jumps over the lazy dog";
    let tree = huffman::build_tree(&huffman::analyze(input.iter().copied())).unwrap();
    let codes = huffman::generate_codes(&tree);
    let encoded = huffman::encode(input.iter().copied(), &codes).unwrap();

    let mut partial = BitString::new();
    partial.extend(encoded.iter().take(encoded.len() - 1));
    assert!(matches!(
        huffman::decode(&partial, &tree),
        Err(huffman::DecodeError::TruncatedStream { .. })
    ));
}
