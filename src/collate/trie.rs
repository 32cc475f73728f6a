use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::CollationElement;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct TrieNode {
    children: BTreeMap<u32, u32>,
    // Range into `CollationTrie::elements`
    value: Option<(u32, u32)>,
}

/// Maps code point sequences to collation elements.
///
/// Nodes live in one arena and refer to each other by index, so the whole trie
/// serializes as two flat vectors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollationTrie {
    nodes: Vec<TrieNode>,
    elements: Vec<CollationElement>,
    keys: usize,
}

/// Result of a trie lookup: how many code points matched, whether they form a
/// complete key, and whether any longer key shares the prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrieMatch {
    node: u32,
    pub size: usize,
    pub matched: bool,
    pub leaf: bool,
}

impl Default for CollationTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            elements: Vec::new(),
            keys: 0,
        }
    }
}

impl CollationTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Inserts or replaces the elements for `key`.
    pub fn insert(&mut self, key: &[u32], ces: &[CollationElement]) {
        assert!(!key.is_empty(), "collation keys cannot be empty");

        let mut node = 0usize;
        for &cp in key {
            let next = self.nodes.len() as u32;
            let child = *self.nodes[node].children.entry(cp).or_insert(next);
            if child == next {
                self.nodes.push(TrieNode::default());
            }
            node = child as usize;
        }

        // A replaced value leaves its old elements behind, unreferenced
        let start = self.elements.len() as u32;
        self.elements.extend_from_slice(ces);
        let end = self.elements.len() as u32;

        if self.nodes[node].value.replace((start, end)).is_none() {
            self.keys += 1;
        }
    }

    fn node_match(&self, node: u32, size: usize) -> TrieMatch {
        let n = &self.nodes[node as usize];
        TrieMatch {
            node,
            size,
            matched: n.value.is_some(),
            leaf: n.children.is_empty(),
        }
    }

    /// Longest prefix of `cps` that is a complete key.
    pub fn longest_match(&self, cps: &[u32]) -> TrieMatch {
        let mut best = TrieMatch {
            node: 0,
            size: 0,
            matched: false,
            leaf: false,
        };

        let mut node = 0u32;
        for (i, cp) in cps.iter().enumerate() {
            match self.nodes[node as usize].children.get(cp) {
                Some(&child) => node = child,
                None => break,
            }
            let m = self.node_match(node, i + 1);
            if m.matched {
                best = m;
            }
        }

        best
    }

    /// Extends a previous match by one more code point. The result is not
    /// `matched` when the longer sequence is not a complete key.
    pub fn extend_subsequence(&self, prev: TrieMatch, cp: u32) -> TrieMatch {
        match self.nodes[prev.node as usize].children.get(&cp) {
            Some(&child) => self.node_match(child, prev.size + 1),
            None => TrieMatch {
                matched: false,
                ..prev
            },
        }
    }

    pub fn elements(&self, m: TrieMatch) -> &[CollationElement] {
        match self.nodes[m.node as usize].value {
            Some((start, end)) if m.matched => &self.elements[start as usize..end as usize],
            _ => &[],
        }
    }

    pub fn get(&self, key: &[u32]) -> Option<&[CollationElement]> {
        let m = self.longest_match(key);
        (m.matched && m.size == key.len()).then(|| self.elements(m))
    }
}
