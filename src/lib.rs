//! Minimum-cost routes over small weighted directed graphs.
//!
//! A single best-first search covers both uniform-cost search (zero
//! heuristic) and A* (any other heuristic). Around it live the loaders and
//! writers for the YAML route documents and a runner that solves one problem
//! with every heuristic variant.

use shadow_rs::shadow;

shadow!(build);

// Costs
// -----
pub mod cost;
pub mod float_cost;

// Internals
// ---------
pub mod frontier;
pub mod search_tree;

// Graph and heuristics
// --------------------
pub mod graph;
pub mod heuristic;

// Algorithms
// ----------
pub mod search;

// Route documents
// ---------------
pub mod problem;
pub mod runner;
pub mod solution;
