//! Character-keyed prefix tree used as the lexer's automaton.
//!
//! Nodes live in an arena and refer to their children by [`NodeId`]. A path from the
//! root spells a lexeme; a [`NodeKey::Terminal`] child marks that the path leading to
//! its parent is a complete lexeme. Character keys are unique among a node's children
//! and at most one terminal marker sits next to them.
//!
//! Tries are combined with [`Trie::merge`], which never edits either input: the union
//! is rebuilt into a fresh arena.

/// Index of a node inside a [`Trie`] arena.
pub type NodeId = usize;

/// What a trie node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// Start state of a lexer automaton; matches no character.
    Root,
    /// One matched character.
    Char(char),
    /// "A valid lexeme ends here." Has no payload and no children.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    key: NodeKey,
    children: Vec<NodeId>,
}

/// Arena-backed prefix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl Trie {
    /// Id of the root node of every trie.
    pub const ROOT: NodeId = 0;

    /// Empty automaton rooted at [`NodeKey::Root`].
    pub fn new() -> Self {
        Trie::with_root(NodeKey::Root)
    }

    /// Sub-trie whose root matches `c`.
    pub fn rooted_at(c: char) -> Self {
        Trie::with_root(NodeKey::Char(c))
    }

    /// A lone terminal marker.
    pub fn terminal() -> Self {
        Trie::with_root(NodeKey::Terminal)
    }

    fn with_root(key: NodeKey) -> Self {
        Trie {
            nodes: vec![Node {
                key,
                children: Vec::new(),
            }],
        }
    }

    /// Automaton accepting exactly the given lexemes.
    pub fn from_lexemes<'a, I>(lexemes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut trie = Trie::new();
        for lexeme in lexemes {
            trie.insert(lexeme);
        }
        trie
    }

    /// Number of nodes, terminal markers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }

    pub fn root_key(&self) -> NodeKey {
        self.nodes[Self::ROOT].key
    }

    pub fn key(&self, node: NodeId) -> NodeKey {
        self.nodes[node].key
    }

    /// Walk (creating as needed) one child per character of `lexeme` and mark the end.
    ///
    /// An empty lexeme marks the root itself. Returns `false` when the lexeme was
    /// already present. A terminal-marker trie holds no lexemes and ignores insertion.
    pub fn insert(&mut self, lexeme: &str) -> bool {
        if self.root_key() == NodeKey::Terminal {
            return false;
        }
        let mut current = Self::ROOT;
        for c in lexeme.chars() {
            current = match self.child(current, c) {
                Some(next) => next,
                None => self.push_child(current, NodeKey::Char(c)),
            };
        }
        if self.has_terminal_child(current) {
            return false;
        }
        self.push_child(current, NodeKey::Terminal);
        true
    }

    fn push_child(&mut self, parent: NodeId, key: NodeKey) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            key,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn find_child(&self, node: NodeId, key: NodeKey) -> Option<NodeId> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&id| self.nodes[id].key == key)
    }

    /// Child of `node` matching character `c`.
    pub fn child(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.find_child(node, NodeKey::Char(c))
    }

    /// Whether the path ending at `node` spells a complete lexeme.
    pub fn has_terminal_child(&self, node: NodeId) -> bool {
        self.find_child(node, NodeKey::Terminal).is_some()
    }

    /// Whether `lexeme` was inserted into this automaton.
    pub fn contains(&self, lexeme: &str) -> bool {
        let mut current = Self::ROOT;
        for c in lexeme.chars() {
            match self.child(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.has_terminal_child(current)
    }

    /// Every lexeme the automaton accepts, sorted.
    pub fn lexemes(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = String::new();
        self.collect(Self::ROOT, &mut prefix, &mut out);
        out.sort();
        out
    }

    fn collect(&self, node: NodeId, prefix: &mut String, out: &mut Vec<String>) {
        for &child in &self.nodes[node].children {
            match self.nodes[child].key {
                NodeKey::Terminal => out.push(prefix.clone()),
                NodeKey::Char(c) => {
                    prefix.push(c);
                    self.collect(child, prefix, out);
                    prefix.pop();
                }
                NodeKey::Root => {}
            }
        }
    }

    /// Structural union of two tries whose roots carry the same key.
    ///
    /// Children present on one side only are copied as-is; children present on both
    /// sides are merged recursively. Roots with different keys (including a marker
    /// against a character node) do not merge and yield `None`.
    pub fn merge(a: &Trie, b: &Trie) -> Option<Trie> {
        let mut merged = Trie {
            nodes: Vec::with_capacity(a.len() + b.len()),
        };
        merged.merge_nodes(a, Self::ROOT, b, Self::ROOT)?;
        Some(merged)
    }

    fn merge_nodes(&mut self, a: &Trie, an: NodeId, b: &Trie, bn: NodeId) -> Option<NodeId> {
        let key = a.nodes[an].key;
        if key != b.nodes[bn].key {
            return None;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            key,
            children: Vec::new(),
        });
        let mut children = Vec::with_capacity(a.nodes[an].children.len());
        for &ac in &a.nodes[an].children {
            let child = match b.find_child(bn, a.nodes[ac].key) {
                Some(bc) => self.merge_nodes(a, ac, b, bc)?,
                None => self.copy_subtree(a, ac),
            };
            children.push(child);
        }
        for &bc in &b.nodes[bn].children {
            if a.find_child(an, b.nodes[bc].key).is_none() {
                children.push(self.copy_subtree(b, bc));
            }
        }
        self.nodes[id].children = children;
        Some(id)
    }

    fn copy_subtree(&mut self, from: &Trie, node: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            key: from.nodes[node].key,
            children: Vec::new(),
        });
        let children = from.nodes[node]
            .children
            .iter()
            .map(|&child| self.copy_subtree(from, child))
            .collect();
        self.nodes[id].children = children;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_builds_shared_prefix() {
        let trie = Trie::from_lexemes(["bar", "baz", "barz"]);
        assert!(trie.contains("bar"));
        assert!(trie.contains("barz"));
        assert!(!trie.contains("ba"));
        // root, b, a, r, z(barz), z(baz) and three markers
        assert_eq!(trie.len(), 9);
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut trie = Trie::new();
        assert!(trie.insert("GET"));
        assert!(!trie.insert("GET"));
        assert_eq!(trie.lexemes(), vec!["GET".to_string()]);
    }

    #[test]
    fn empty_lexeme_marks_root() {
        let mut trie = Trie::new();
        assert!(!trie.has_terminal_child(Trie::ROOT));
        assert!(trie.insert(""));
        assert!(trie.has_terminal_child(Trie::ROOT));
        assert!(trie.contains(""));
    }

    #[test]
    fn merge_unions_lexemes() {
        let keywords = Trie::from_lexemes(["MESSAGE", "STRUCT"]);
        let letters = Trie::from_lexemes(["M", "E", "S"]);
        let merged = Trie::merge(&keywords, &letters).expect("roots match");
        assert_eq!(merged.lexemes(), vec!["E", "M", "MESSAGE", "S", "STRUCT"]);
        let m = merged.child(Trie::ROOT, 'M').expect("M");
        assert!(merged.has_terminal_child(m));
        assert!(merged.child(m, 'E').is_some());
    }

    #[test]
    fn merge_keeps_inputs_untouched() {
        let a = Trie::from_lexemes(["ab"]);
        let b = Trie::from_lexemes(["ac"]);
        let before = a.clone();
        let merged = Trie::merge(&a, &b).expect("merge");
        assert_eq!(a, before);
        assert_eq!(merged.lexemes(), vec!["ab", "ac"]);
        // the shared 'a' node is not duplicated
        let a_nodes = merged.nodes[Trie::ROOT]
            .children
            .iter()
            .filter(|&&id| merged.key(id) == NodeKey::Char('a'))
            .count();
        assert_eq!(a_nodes, 1);
    }

    #[test]
    fn merge_rejects_mismatched_roots() {
        assert!(Trie::merge(&Trie::rooted_at('a'), &Trie::rooted_at('b')).is_none());
        assert!(Trie::merge(&Trie::rooted_at('a'), &Trie::terminal()).is_none());
        assert!(Trie::merge(&Trie::new(), &Trie::terminal()).is_none());
        let markers = Trie::merge(&Trie::terminal(), &Trie::terminal()).expect("markers");
        assert_eq!(markers.root_key(), NodeKey::Terminal);
    }

    #[test]
    fn merge_sub_tries_with_same_key() {
        let mut a = Trie::rooted_at('x');
        a.insert("y");
        let mut b = Trie::rooted_at('x');
        b.insert("z");
        b.insert("");
        let merged = Trie::merge(&a, &b).expect("same key");
        assert_eq!(merged.root_key(), NodeKey::Char('x'));
        assert!(merged.has_terminal_child(Trie::ROOT));
        assert_eq!(merged.lexemes(), vec!["", "y", "z"]);
    }
}
