//! Small weighted directed graphs stored as a dense cost matrix.
//!
//! Nodes are named. Names are kept sorted and every node's [`NodeId`] is its
//! position in that order, so iteration order (and with it frontier
//! tie-breaking) only depends on the names.

use derive_more::Display;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::cost::Cost;

/// Name of the node standing in for the start key of a route document.
pub const START_NAME: &str = "start";
/// Name of the node standing in for the goal key of a route document.
pub const END_NAME: &str = "end";

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{_0}")]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Per-node data only heuristics look at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodeAttributes {
    #[serde(default)]
    pub line_of_sight_distance: f64,
    #[serde(default)]
    pub altitude_difference: f64,
}

#[derive(Clone)]
pub struct Graph<C: Cost> {
    names: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    /// Row-major `len * len` matrix, `costs[from * len + to]`.
    costs: Vec<C>,
}

impl<C: Cost> Graph<C> {
    /// A graph without edges over the given node names.
    ///
    /// Names are sorted and de-duplicated before assigning ids.
    ///
    /// ```
    /// use route_search::float_cost::RouteCost;
    /// use route_search::graph::Graph;
    ///
    /// let g = Graph::<RouteCost>::with_names(["b", "c", "a", "b"]);
    /// assert_eq!(g.len(), 3);
    /// assert_eq!(g.id("a").unwrap().index(), 0);
    /// assert_eq!(g.id("c").unwrap().index(), 2);
    /// ```
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();

        let ids = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| Some((name.clone(), NodeId::new(i)?)))
            .collect();
        let len = names.len();

        Self {
            names,
            ids,
            costs: vec![C::max_value(); len * len],
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.len()
    }

    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.names[node.index()]
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.len()).filter_map(NodeId::new)
    }

    /// Whether the node carries one of the reserved endpoint names.
    ///
    /// This only looks at the name, not at which nodes a search starts or
    /// ends at.
    pub fn is_endpoint_name(&self, node: NodeId) -> bool {
        matches!(self.name(node), START_NAME | END_NAME)
    }

    /// The cost of the edge `from -> to`, `C::max_value()` without one.
    #[inline(always)]
    pub fn cost(&self, from: NodeId, to: NodeId) -> C {
        self.costs[from.index() * self.len() + to.index()]
    }

    pub fn set_cost(&mut self, from: NodeId, to: NodeId, c: C) {
        let len = self.len();
        self.costs[from.index() * len + to.index()] = c;
    }

    /// Outgoing edges of a node, by increasing neighbour id.
    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = (NodeId, C)> + '_ {
        let len = self.len();
        let row = &self.costs[node.index() * len..(node.index() + 1) * len];
        row.iter()
            .enumerate()
            .filter(|(_, c)| c.valid())
            .filter_map(|(i, c)| Some((NodeId::new(i)?, *c)))
    }

    pub fn num_edges(&self) -> usize {
        self.costs.iter().filter(|c| c.valid()).count()
    }
}

impl<C: Cost> std::fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Graph({} nodes; {} edges)", self.len(), self.num_edges())
    }
}
