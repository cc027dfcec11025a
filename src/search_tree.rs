use crate::graph::NodeId;

/// A reference to a [`SearchTreeNode`] within its [`SearchTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchTreeIndex {
    index: u32,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        Self {
            index: index as u32,
        }
    }
    #[inline(always)]
    fn as_usize(&self) -> usize {
        self.index as usize
    }
}

/// An expanded node and the expansion that led to it.
#[derive(Copy, Clone, Debug)]
pub struct SearchTreeNode {
    pub(crate) parent: Option<SearchTreeIndex>,
    pub(crate) node: NodeId,
}

/// All expansions of a search. Each frontier entry points at the tree node
/// it was generated from, which encodes its path-so-far without copying it.
///
/// Only grows.
#[derive(Default)]
pub struct SearchTree {
    nodes: Vec<SearchTreeNode>,
}

impl SearchTree {
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub fn push(&mut self, node: NodeId, parent: Option<SearchTreeIndex>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(SearchTreeNode { parent, node });
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes from the root to `index`, both included.
    #[must_use]
    pub fn path(&self, index: SearchTreeIndex) -> Vec<NodeId> {
        let mut path = vec![];
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let n = &self[i];
            path.push(n.node);
            debug_assert!(n.parent.is_none_or(|p| p.as_usize() < i.as_usize()));
            cursor = n.parent;
        }
        path.reverse();
        path
    }
}

impl std::ops::Index<SearchTreeIndex> for SearchTree {
    type Output = SearchTreeNode;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.as_usize()]
    }
}

impl std::fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
