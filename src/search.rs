//! Best-first search over a [`Graph`].
//!
//! Uniform-cost search with [`crate::heuristic::ZeroHeuristic`], A* with any
//! other [`Heuristic`]. Duplicates are resolved lazily: the frontier may hold
//! several entries for a node and all but the first one to be popped with a
//! strictly better cost are skipped.

use thiserror::Error;

use crate::cost::Cost;
use crate::frontier::Frontier;
use crate::graph::Graph;
use crate::graph::NodeAttributes;
use crate::graph::NodeId;
use crate::heuristic::Heuristic;
use crate::search_tree::SearchTree;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No path from {start} to {goal} ({expanded_nodes} nodes expanded)")]
    NoPathFound {
        start: NodeId,
        goal: NodeId,
        expanded_nodes: usize,
    },
    #[error("Node {node} is not in the graph ({len} nodes)")]
    UnknownNode { node: NodeId, len: usize },
}

/// A minimum-cost path and what it took to find it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<C: Cost> {
    pub cost: C,
    /// From start to goal, both included.
    pub path: Vec<NodeId>,
    pub expanded_nodes: usize,
    /// The heuristic of every node not named like an endpoint, by node id.
    pub heuristic: Vec<(NodeId, C)>,
}

/// Progress notifications. These never change the outcome of a search.
pub trait SearchObserver {
    fn on_expand(&mut self, _node: NodeId, _expanded_nodes: usize) {}
    fn on_goal(&mut self, _node: NodeId, _expanded_nodes: usize) {}
    fn on_exhausted(&mut self, _expanded_nodes: usize) {}
}

/// Ignores everything.
impl SearchObserver for () {}

/// Reports progress through `log`.
#[derive(Debug)]
pub struct LogObserver<'g, C: Cost> {
    graph: &'g Graph<C>,
}

impl<'g, C: Cost> LogObserver<'g, C> {
    pub fn new(graph: &'g Graph<C>) -> Self {
        Self { graph }
    }
}

impl<C: Cost> SearchObserver for LogObserver<'_, C> {
    fn on_expand(&mut self, node: NodeId, expanded_nodes: usize) {
        log::debug!(
            "Expanding node: {} ({node}), total expanded nodes: {expanded_nodes}",
            self.graph.name(node)
        );
    }
    fn on_goal(&mut self, node: NodeId, expanded_nodes: usize) {
        log::info!(
            "Goal reached: {} ({node}), expanded nodes: {expanded_nodes}",
            self.graph.name(node)
        );
    }
    fn on_exhausted(&mut self, expanded_nodes: usize) {
        log::warn!("Frontier exhausted after expanding {expanded_nodes} nodes");
    }
}

#[derive(Debug)]
pub struct BestFirstSearch<'a, H, C>
where
    H: Heuristic<C>,
    C: Cost,
{
    graph: &'a Graph<C>,
    attributes: &'a [NodeAttributes],
    heuristic: &'a H,
    start: NodeId,
    goal: NodeId,

    /// Discovered states, ranked by `f = g + h`.
    open: Frontier<C>,
    /// Best `g` each node was finalized with, `C::max_value()` until then.
    closed: Vec<C>,
    /// One node per expansion. Paths are rebuilt from here.
    search_tree: SearchTree,
}

impl<'a, H, C> BestFirstSearch<'a, H, C>
where
    H: Heuristic<C>,
    C: Cost,
{
    pub fn new(
        graph: &'a Graph<C>,
        start: NodeId,
        goal: NodeId,
        heuristic: &'a H,
        attributes: &'a [NodeAttributes],
    ) -> Result<Self, SearchError> {
        for node in [start, goal] {
            if !graph.contains(node) {
                return Err(SearchError::UnknownNode {
                    node,
                    len: graph.len(),
                });
            }
        }

        let mut open = Frontier::new();
        // The start is ranked 0 regardless of its heuristic.
        open.push(C::zero(), C::zero(), start, None);

        Ok(Self {
            graph,
            attributes,
            heuristic,
            start,
            goal,
            open,
            closed: vec![C::max_value(); graph.len()],
            search_tree: SearchTree::new(),
        })
    }

    pub fn run(self) -> Result<SearchResult<C>, SearchError> {
        self.run_observed(&mut ())
    }

    pub fn run_observed<O>(mut self, observer: &mut O) -> Result<SearchResult<C>, SearchError>
    where
        O: SearchObserver + ?Sized,
    {
        while let Some(entry) = self.open.pop() {
            let node = entry.node;
            let g = entry.g;

            // Already finalized with a better or equal cost.
            if g >= self.closed[node.index()] {
                continue;
            }
            self.closed[node.index()] = g;
            let tree_index = self.search_tree.push(node, entry.parent);
            let expanded_nodes = self.search_tree.len();
            observer.on_expand(node, expanded_nodes);

            if node == self.goal {
                observer.on_goal(node, expanded_nodes);
                return Ok(SearchResult {
                    cost: g,
                    path: self.search_tree.path(tree_index),
                    expanded_nodes,
                    heuristic: self.heuristic_snapshot(),
                });
            }

            for (neighbour, c) in self.graph.neighbours(node) {
                let new_g = g + c;
                let h = self.heuristic.h(neighbour, self.attributes);
                self.open.push(new_g + h, new_g, neighbour, Some(tree_index));
            }
        }

        let expanded_nodes = self.search_tree.len();
        observer.on_exhausted(expanded_nodes);
        Err(SearchError::NoPathFound {
            start: self.start,
            goal: self.goal,
            expanded_nodes,
        })
    }

    fn heuristic_snapshot(&self) -> Vec<(NodeId, C)> {
        self.graph
            .nodes()
            .filter(|n| !self.graph.is_endpoint_name(*n))
            .map(|n| (n, self.heuristic.h(n, self.attributes)))
            .collect()
    }
}

/// Finds a minimum-cost path from `start` to `goal`.
pub fn search<H, C>(
    graph: &Graph<C>,
    start: NodeId,
    goal: NodeId,
    heuristic: &H,
    attributes: &[NodeAttributes],
) -> Result<SearchResult<C>, SearchError>
where
    H: Heuristic<C>,
    C: Cost,
{
    BestFirstSearch::new(graph, start, goal, heuristic, attributes)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::float_cost::RouteCost;
    use crate::heuristic::HeuristicKind;
    use crate::heuristic::LineOfSight;
    use crate::heuristic::ZeroHeuristic;

    fn graph(names: &[&str], edges: &[(&str, &str, f64)]) -> Graph<RouteCost> {
        let mut g = Graph::with_names(names.iter().copied());
        for (from, to, c) in edges {
            let (from, to) = (g.id(from).unwrap(), g.id(to).unwrap());
            g.set_cost(from, to, RouteCost::new(*c));
        }
        g
    }

    fn names<'g>(g: &'g Graph<RouteCost>, path: &[NodeId]) -> Vec<&'g str> {
        path.iter().map(|n| g.name(*n)).collect()
    }

    /// All-pairs shortest paths, `result[i][j]`.
    fn floyd_warshall(g: &Graph<RouteCost>) -> Vec<Vec<RouteCost>> {
        let len = g.len();
        let mut d = vec![vec![RouteCost::infinity(); len]; len];
        for i in g.nodes() {
            d[i.index()][i.index()] = RouteCost::new(0.0);
            for (j, c) in g.neighbours(i) {
                d[i.index()][j.index()] = std::cmp::min(d[i.index()][j.index()], c);
            }
        }
        for k in 0..len {
            for i in 0..len {
                for j in 0..len {
                    let via = d[i][k] + d[k][j];
                    if via < d[i][j] {
                        d[i][j] = via;
                    }
                }
            }
        }
        d
    }

    fn random_graph(rng: &mut ChaCha8Rng, len: usize, density: f64) -> Graph<RouteCost> {
        let mut g = Graph::with_names((0..len).map(|i| format!("n{i:02}")));
        for i in g.nodes().collect::<Vec<_>>() {
            for j in g.nodes().collect::<Vec<_>>() {
                if i != j && rng.random_bool(density) {
                    // Integral costs keep float sums exact.
                    g.set_cost(i, j, RouteCost::new(rng.random_range(0..20u32) as f64));
                }
            }
        }
        g
    }

    fn assert_valid_path(
        g: &Graph<RouteCost>,
        result: &SearchResult<RouteCost>,
        start: NodeId,
        goal: NodeId,
    ) {
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        let mut total = RouteCost::new(0.0);
        for pair in result.path.windows(2) {
            let c = g.cost(pair[0], pair[1]);
            assert!(c.valid(), "{} -> {} is not an edge", pair[0], pair[1]);
            total = total + c;
        }
        assert_eq!(total, result.cost);
    }

    #[derive(Default)]
    struct Recorder {
        expanded: Vec<NodeId>,
        goals: Vec<NodeId>,
        exhausted: Option<usize>,
    }

    impl SearchObserver for Recorder {
        fn on_expand(&mut self, node: NodeId, expanded_nodes: usize) {
            self.expanded.push(node);
            assert_eq!(self.expanded.len(), expanded_nodes);
        }
        fn on_goal(&mut self, node: NodeId, _expanded_nodes: usize) {
            self.goals.push(node);
        }
        fn on_exhausted(&mut self, expanded_nodes: usize) {
            self.exhausted = Some(expanded_nodes);
        }
    }

    #[test]
    fn prefers_cheaper_detour() {
        let g = graph(
            &["A", "B", "C"],
            &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 5.0)],
        );
        let (a, c) = (g.id("A").unwrap(), g.id("C").unwrap());

        let result = search(&g, a, c, &ZeroHeuristic, &[]).unwrap();
        assert_eq!(result.cost, RouteCost::new(2.0));
        assert_eq!(names(&g, &result.path), vec!["A", "B", "C"]);
        assert_eq!(result.expanded_nodes, 3);
    }

    #[test]
    fn start_is_goal() {
        let g = graph(&["A", "B"], &[("A", "B", 1.0)]);
        let a = g.id("A").unwrap();

        let result = search(&g, a, a, &ZeroHeuristic, &[]).unwrap();
        assert_eq!(result.cost, RouteCost::new(0.0));
        assert_eq!(result.path, vec![a]);
        assert_eq!(result.expanded_nodes, 1);
    }

    #[test]
    fn unreachable_goal() {
        let g = graph(&["A", "B", "C"], &[("A", "B", 1.0), ("C", "A", 1.0)]);
        let (a, c) = (g.id("A").unwrap(), g.id("C").unwrap());

        let mut recorder = Recorder::default();
        let err = BestFirstSearch::new(&g, a, c, &ZeroHeuristic, &[])
            .unwrap()
            .run_observed(&mut recorder)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::NoPathFound {
                start: a,
                goal: c,
                expanded_nodes: 2
            }
        );
        assert_eq!(recorder.exhausted, Some(2));
        assert!(recorder.goals.is_empty());
    }

    #[test]
    fn unknown_nodes() {
        let g = graph(&["A"], &[]);
        let a = g.id("A").unwrap();
        let missing = NodeId::new(3).unwrap();

        assert_eq!(
            search(&g, a, missing, &ZeroHeuristic, &[]).unwrap_err(),
            SearchError::UnknownNode {
                node: missing,
                len: 1
            }
        );
        assert!(matches!(
            search(&g, missing, a, &ZeroHeuristic, &[]),
            Err(SearchError::UnknownNode { .. })
        ));
    }

    #[test]
    fn zero_cost_edges() {
        let g = graph(
            &["A", "B", "C", "D"],
            &[("A", "B", 0.0), ("B", "C", 0.0), ("C", "D", 0.0), ("A", "D", 1.0)],
        );
        let (a, d) = (g.id("A").unwrap(), g.id("D").unwrap());

        let result = search(&g, a, d, &ZeroHeuristic, &[]).unwrap();
        assert_eq!(result.cost, RouteCost::new(0.0));
        assert_eq!(names(&g, &result.path), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn heuristic_steers_expansions() {
        // Two equally cheap branches; the heuristic knows the right one.
        let g = graph(
            &["S", "L1", "L2", "R1", "G"],
            &[
                ("S", "L1", 1.0),
                ("L1", "L2", 1.0),
                ("S", "R1", 1.0),
                ("R1", "G", 1.0),
            ],
        );
        let attributes: Vec<NodeAttributes> = g
            .nodes()
            .map(|n| NodeAttributes {
                line_of_sight_distance: match g.name(n) {
                    "L1" => 10.0,
                    "L2" => 10.0,
                    "R1" => 1.0,
                    _ => 0.0,
                },
                altitude_difference: 0.0,
            })
            .collect();
        let (s, goal) = (g.id("S").unwrap(), g.id("G").unwrap());

        let uniform = search(&g, s, goal, &ZeroHeuristic, &attributes).unwrap();
        let informed = search(&g, s, goal, &LineOfSight, &attributes).unwrap();

        assert_eq!(uniform.cost, informed.cost);
        assert_eq!(names(&g, &informed.path), vec!["S", "R1", "G"]);
        assert!(informed.expanded_nodes < uniform.expanded_nodes);
        assert_eq!(informed.expanded_nodes, 3);
    }

    #[test]
    fn snapshot_skips_endpoint_names() {
        let g = graph(&["start", "end", "A", "B"], &[("A", "B", 2.0)]);
        let attributes: Vec<NodeAttributes> = g
            .nodes()
            .map(|n| NodeAttributes {
                line_of_sight_distance: n.index() as f64,
                altitude_difference: 2.0,
            })
            .collect();
        let (a, b) = (g.id("A").unwrap(), g.id("B").unwrap());

        let heuristic = HeuristicKind::LineOfSightPlusAltitude;
        let result = search(&g, a, b, &heuristic, &attributes).unwrap();
        let snapshot: Vec<(&str, RouteCost)> = result
            .heuristic
            .iter()
            .map(|(n, h)| (g.name(*n), *h))
            .collect();
        // Sorted: A, B, end, start
        assert_eq!(
            snapshot,
            vec![("A", RouteCost::new(1.0)), ("B", RouteCost::new(2.0))]
        );
    }

    #[test]
    fn snapshot_uses_names_not_endpoints() {
        let g = graph(&["A", "B"], &[("A", "B", 1.0)]);
        let (a, b) = (g.id("A").unwrap(), g.id("B").unwrap());

        let result = search(&g, a, b, &ZeroHeuristic, &[]).unwrap();
        assert_eq!(
            result.heuristic,
            vec![(a, RouteCost::new(0.0)), (b, RouteCost::new(0.0))]
        );
    }

    #[test]
    fn no_node_is_finalized_twice() {
        for seed in 0..20u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = random_graph(&mut rng, 12, 0.3);
            let start = NodeId::new(0).unwrap();
            let goal = NodeId::new(11).unwrap();

            let mut recorder = Recorder::default();
            let outcome = BestFirstSearch::new(&g, start, goal, &ZeroHeuristic, &[])
                .unwrap()
                .run_observed(&mut recorder);

            let mut expanded = recorder.expanded.clone();
            expanded.sort();
            expanded.dedup();
            assert_eq!(expanded.len(), recorder.expanded.len());

            match outcome {
                Ok(result) => {
                    assert!(result.expanded_nodes > 0);
                    assert_eq!(result.expanded_nodes, recorder.expanded.len());
                    assert_eq!(recorder.goals, vec![goal]);
                }
                Err(SearchError::NoPathFound { expanded_nodes, .. }) => {
                    assert_eq!(expanded_nodes, recorder.expanded.len());
                }
                Err(e) => panic!("Unexpected error {e}"),
            }
        }
    }

    #[test]
    fn uniform_cost_matches_all_pairs_shortest_paths() {
        for seed in 0..30u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = random_graph(&mut rng, 10, 0.25);
            let d = floyd_warshall(&g);

            for start in g.nodes() {
                for goal in g.nodes() {
                    let expected = d[start.index()][goal.index()];
                    match search(&g, start, goal, &ZeroHeuristic, &[]) {
                        Ok(result) => {
                            assert_eq!(result.cost, expected, "seed={seed} {start}->{goal}");
                            assert_valid_path(&g, &result, start, goal);
                        }
                        Err(SearchError::NoPathFound { .. }) => {
                            assert!(!expected.valid(), "seed={seed} {start}->{goal}");
                        }
                        Err(e) => panic!("Unexpected error {e}"),
                    }
                }
            }
        }
    }

    #[test]
    fn admissible_heuristic_is_optimal() {
        for seed in 0..30u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = random_graph(&mut rng, 10, 0.3);
            let d = floyd_warshall(&g);
            let goal = NodeId::new(9).unwrap();

            // A fraction of the true remaining cost never overestimates it.
            let attributes: Vec<NodeAttributes> = g
                .nodes()
                .map(|n| {
                    let remaining = d[n.index()][goal.index()];
                    let scale = rng.random_range(0..=10u32) as f64 / 10.0;
                    NodeAttributes {
                        line_of_sight_distance: if remaining.valid() {
                            remaining.get() * scale
                        } else {
                            0.0
                        },
                        altitude_difference: 0.0,
                    }
                })
                .collect();

            for start in g.nodes() {
                let expected = d[start.index()][goal.index()];
                match search(&g, start, goal, &LineOfSight, &attributes) {
                    Ok(result) => {
                        assert_eq!(result.cost, expected, "seed={seed} {start}");
                        assert_valid_path(&g, &result, start, goal);
                    }
                    Err(SearchError::NoPathFound { .. }) => assert!(!expected.valid()),
                    Err(e) => panic!("Unexpected error {e}"),
                }
            }
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // Uniform costs produce many f-value ties.
        let mut g = random_graph(&mut rng, 15, 0.4);
        for i in g.nodes().collect::<Vec<_>>() {
            for (j, _) in g.neighbours(i).collect::<Vec<_>>() {
                g.set_cost(i, j, RouteCost::new(1.0));
            }
        }
        let start = NodeId::new(0).unwrap();
        let goal = NodeId::new(14).unwrap();

        let first = search(&g, start, goal, &ZeroHeuristic, &[]);
        for _ in 0..5 {
            assert_eq!(search(&g, start, goal, &ZeroHeuristic, &[]), first);
        }
    }
}
