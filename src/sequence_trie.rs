use smallvec::SmallVec;

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    // sorted by char
    children: SmallVec<[(char, NodeId); 2]>,
    value: Option<u32>,
}

/// Codepoint trie mapping emoji sequences to entry ids.
///
/// Walking it one character at a time is what lets the scanner find the
/// longest registered sequence at a position, and tell when a chunk boundary
/// cuts a candidate short.
#[derive(Debug, Clone)]
pub(crate) struct SequenceTrie {
    nodes: Vec<TrieNode>,
    keys: usize,
}

impl Default for SequenceTrie {
    fn default() -> Self {
        SequenceTrie {
            nodes: vec![TrieNode::default()],
            keys: 0,
        }
    }
}

impl SequenceTrie {
    pub(crate) fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        let children = &self.nodes[node as usize].children;
        children
            .binary_search_by_key(&ch, |&(c, _)| c)
            .ok()
            .map(|pos| children[pos].1)
    }

    pub(crate) fn value(&self, node: NodeId) -> Option<u32> {
        self.nodes[node as usize].value
    }

    pub(crate) fn has_children(&self, node: NodeId) -> bool {
        !self.nodes[node as usize].children.is_empty()
    }

    /// Number of sequences stored.
    pub(crate) fn len(&self) -> usize {
        self.keys
    }

    pub(crate) fn get<I>(&self, seq: I) -> Option<u32>
    where
        I: IntoIterator<Item = char>,
    {
        let mut node = ROOT;
        for ch in seq {
            node = self.child(node, ch)?;
        }
        self.value(node)
    }

    /// Store `value` under `seq`, returning the value it replaced.
    pub(crate) fn insert(&mut self, seq: &[char], value: u32) -> Option<u32> {
        let mut node = ROOT;
        for &ch in seq {
            node = match self.child(node, ch) {
                Some(next) => next,
                None => self.push_child(node, ch),
            };
        }
        let old = self.nodes[node as usize].value.replace(value);
        if old.is_none() {
            self.keys += 1;
        }
        old
    }

    fn push_child(&mut self, node: NodeId, ch: char) -> NodeId {
        let next = NodeId::try_from(self.nodes.len()).unwrap_or(NodeId::MAX);
        self.nodes.push(TrieNode::default());
        let children = &mut self.nodes[node as usize].children;
        let pos = match children.binary_search_by_key(&ch, |&(c, _)| c) {
            Ok(pos) | Err(pos) => pos,
        };
        children.insert(pos, (ch, next));
        next
    }
}
