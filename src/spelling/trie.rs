//! Frequency-weighted prefix tree over bounded words.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Every node
//! accumulates the total frequency of the words passing through it, so the
//! ratio of a child's frequency to its parent's is the conditional
//! probability of the next character.

use std::collections::{BTreeMap, VecDeque};

use crate::spelling::alphabet::END_SYMBOL;

/// Index of a node in the trie arena.
pub type NodeId = usize;

/// A single trie node.
#[derive(Debug, Clone)]
pub struct TrieNode {
    symbol: Option<char>,
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
    frequency: f64,
    depth: usize,
    prefix: String,
}

impl TrieNode {
    fn root() -> Self {
        TrieNode {
            symbol: None,
            parent: None,
            children: BTreeMap::new(),
            frequency: 0.0,
            depth: 0,
            prefix: String::new(),
        }
    }

    /// Character on the edge leading to this node; `None` for the root.
    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The string spelled from the root to this node.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A node reached through the end boundary marks a complete word.
    pub fn is_leaf(&self) -> bool {
        self.symbol == Some(END_SYMBOL)
    }
}

/// A completion found below a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Suffix {
    pub node: NodeId,
    pub text: String,
    /// Frequency of the completion relative to the starting node.
    pub probability: f64,
}

/// Arena-backed frequency trie.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Trie {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Trie {
            nodes: vec![TrieNode::root()],
            word_count: 0,
        }
    }

    /// Insert a word, adding `frequency` to every node on its path.
    pub fn insert(&mut self, word: &str, frequency: f64) {
        let mut current = Self::ROOT;
        self.nodes[current].frequency += frequency;

        for ch in word.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => self.add_child(current, ch),
            };
            self.nodes[current].frequency += frequency;
        }
        self.word_count += 1;
    }

    fn add_child(&mut self, parent: NodeId, ch: char) -> NodeId {
        let id = self.nodes.len();
        let parent_node = &self.nodes[parent];
        let mut prefix = String::with_capacity(parent_node.prefix.len() + ch.len_utf8());
        prefix.push_str(&parent_node.prefix);
        prefix.push(ch);

        let node = TrieNode {
            symbol: Some(ch),
            parent: Some(parent),
            children: BTreeMap::new(),
            frequency: 0.0,
            depth: parent_node.depth + 1,
            prefix,
        };
        self.nodes.push(node);
        self.nodes[parent].children.insert(ch, id);
        id
    }

    /// Follow `prefix` from the root.
    pub fn search(&self, prefix: &str) -> Option<NodeId> {
        prefix
            .chars()
            .try_fold(Self::ROOT, |node, ch| self.child(node, ch))
    }

    /// Whether `word` was inserted, with the given boundaries included.
    pub fn contains(&self, word: &str) -> bool {
        self.search(word)
            .is_some_and(|node| self.nodes[node].is_leaf())
    }

    /// Frequency of the node reached by `prefix` relative to the root, or
    /// `None` when no inserted word starts with `prefix`.
    pub fn estimated_probability(&self, prefix: &str) -> Option<f64> {
        let root = self.nodes[Self::ROOT].frequency;
        if root <= 0.0 {
            return None;
        }
        self.search(prefix)
            .map(|node| self.nodes[node].frequency / root)
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    pub fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[node].children.get(&ch).copied()
    }

    /// Children of a node in character order.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes[node].children.iter().map(|(&ch, &id)| (ch, id))
    }

    pub fn frequency(&self, node: NodeId) -> f64 {
        self.nodes[node].frequency
    }

    pub fn prefix(&self, node: NodeId) -> &str {
        &self.nodes[node].prefix
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node].is_leaf()
    }

    /// Mean frequency of the children of a node, zero for a childless node.
    pub fn average_child_frequency(&self, node: NodeId) -> f64 {
        let children = &self.nodes[node].children;
        if children.is_empty() {
            return 0.0;
        }
        let sum: f64 = children.values().map(|&id| self.nodes[id].frequency).sum();
        sum / children.len() as f64
    }

    /// Breadth-first enumeration of the strings below `node`, up to
    /// `max_depth` characters deep. The node itself comes first, with an
    /// empty text and probability 1.
    pub fn suffixes(&self, node: NodeId, max_depth: usize) -> Vec<Suffix> {
        let base = self.nodes[node].frequency;
        let start = &self.nodes[node];
        let mut result = Vec::new();
        let mut queue = VecDeque::from([node]);

        while let Some(current) = queue.pop_front() {
            let current_node = &self.nodes[current];
            let depth = current_node.depth - start.depth;
            result.push(Suffix {
                node: current,
                text: current_node.prefix[start.prefix.len()..].to_string(),
                probability: if current == node {
                    1.0
                } else if base > 0.0 {
                    current_node.frequency / base
                } else {
                    0.0
                },
            });
            if depth < max_depth {
                queue.extend(current_node.children.values().copied());
            }
        }

        result
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of insertions performed.
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trie {
        let mut trie = Trie::new();
        trie.insert("#КОТ$", 3.0);
        trie.insert("#КОД$", 1.0);
        trie.insert("#ДОМ$", 4.0);
        trie
    }

    #[test]
    fn test_frequencies_accumulate_along_path() {
        let trie = sample();
        assert_eq!(trie.frequency(Trie::ROOT), 8.0);

        let k = trie.search("#К").unwrap();
        assert_eq!(trie.frequency(k), 4.0);
        let kot = trie.search("#КОТ$").unwrap();
        assert_eq!(trie.frequency(kot), 3.0);

        for node in 1..trie.node_count() {
            let parent = trie.parent(node).unwrap();
            assert!(trie.frequency(node) <= trie.frequency(parent));
        }
    }

    #[test]
    fn test_search_and_contains() {
        let trie = sample();
        assert!(trie.contains("#КОТ$"));
        assert!(!trie.contains("#КО"));
        assert!(!trie.contains("#КИТ$"));
        assert!(trie.search("#КО").is_some());
        assert_eq!(trie.search(""), Some(Trie::ROOT));

        let node = trie.search("#ДО").unwrap();
        assert_eq!(trie.prefix(node), "#ДО");
        assert_eq!(trie.node(node).depth(), 3);
        assert_eq!(trie.node(node).symbol(), Some('О'));
        assert!(trie.is_leaf(trie.search("#ДОМ$").unwrap()));
    }

    #[test]
    fn test_estimated_probability() {
        let trie = sample();
        assert_eq!(trie.estimated_probability("#КО"), Some(0.5));
        assert_eq!(trie.estimated_probability("#ДОМ$"), Some(0.5));
        assert_eq!(trie.estimated_probability(""), Some(1.0));
        assert_eq!(trie.estimated_probability("#Я"), None);
        assert_eq!(Trie::new().estimated_probability("#"), None);
    }

    #[test]
    fn test_children_and_average() {
        let trie = sample();
        let ko = trie.search("#КО").unwrap();
        let symbols: Vec<char> = trie.children(ko).map(|(ch, _)| ch).collect();
        assert_eq!(symbols, vec!['Д', 'Т']);
        assert_eq!(trie.average_child_frequency(ko), 2.0);

        let leaf = trie.search("#КОТ$").unwrap();
        assert_eq!(trie.average_child_frequency(leaf), 0.0);
    }

    #[test]
    fn test_suffixes() {
        let trie = sample();
        let ko = trie.search("#КО").unwrap();
        let suffixes = trie.suffixes(ko, 2);
        let texts: Vec<&str> = suffixes.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["", "Д", "Т", "Д$", "Т$"]);
        assert_eq!(suffixes[0].node, ko);
        assert_eq!(suffixes[0].probability, 1.0);
        assert_eq!(suffixes[2].probability, 0.75);

        let shallow = trie.suffixes(ko, 1);
        assert_eq!(shallow.len(), 3);

        let only_self = trie.suffixes(ko, 0);
        assert_eq!(only_self.len(), 1);
        assert_eq!(only_self[0].text, "");
    }

    #[test]
    fn test_suffixes_start_with_node_itself() {
        let mut trie = Trie::new();
        trie.insert("#AB$", 2.0);
        let a = trie.search("#A").unwrap();
        let texts: Vec<String> = trie.suffixes(a, 2).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["", "B", "B$"]);
    }

    #[test]
    fn test_counts() {
        let trie = sample();
        assert_eq!(trie.word_count(), 3);
        // root, '#', К, О, Т, $, Д, $, Д, О, М, $
        assert_eq!(trie.node_count(), 12);
    }
}
