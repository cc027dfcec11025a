use derive_more::Display;

use crate::cost::Cost;
use crate::float_cost::RouteCost;
use crate::graph::NodeAttributes;
use crate::graph::NodeId;

/// An estimate of the remaining cost from a node to the goal.
///
/// The goal is implicit: the node attributes already describe each node
/// relative to it.
pub trait Heuristic<C: Cost>: std::fmt::Debug {
    fn h(&self, node: NodeId, attributes: &[NodeAttributes]) -> C;
}

#[inline(always)]
fn attributes_of(node: NodeId, attributes: &[NodeAttributes]) -> NodeAttributes {
    attributes.get(node.index()).copied().unwrap_or_default()
}

/// Turns A* into uniform-cost search.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl<C: Cost> Heuristic<C> for ZeroHeuristic {
    #[inline(always)]
    fn h(&self, _node: NodeId, _attributes: &[NodeAttributes]) -> C {
        C::zero()
    }
}

/// The straight-line distance to the goal.
#[derive(Copy, Clone, Debug, Default)]
pub struct LineOfSight;

impl Heuristic<RouteCost> for LineOfSight {
    #[inline(always)]
    fn h(&self, node: NodeId, attributes: &[NodeAttributes]) -> RouteCost {
        RouteCost::new(attributes_of(node, attributes).line_of_sight_distance)
    }
}

/// Straight-line distance plus half the altitude difference.
///
/// Only admissible where climbing is at least that expensive.
#[derive(Copy, Clone, Debug, Default)]
pub struct LineOfSightPlusAltitude;

impl LineOfSightPlusAltitude {
    pub const ALTITUDE_WEIGHT: f64 = 0.5;
}

impl Heuristic<RouteCost> for LineOfSightPlusAltitude {
    #[inline(always)]
    fn h(&self, node: NodeId, attributes: &[NodeAttributes]) -> RouteCost {
        let a = attributes_of(node, attributes);
        RouteCost::new(a.line_of_sight_distance + Self::ALTITUDE_WEIGHT * a.altitude_difference)
    }
}

/// The heuristic variants a route problem is solved with, in run order.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum HeuristicKind {
    #[display("uniform-cost")]
    Zero,
    #[display("line-of-sight")]
    LineOfSight,
    #[display("line-of-sight+altitude")]
    LineOfSightPlusAltitude,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::Zero,
        HeuristicKind::LineOfSight,
        HeuristicKind::LineOfSightPlusAltitude,
    ];

    /// The 1-based number used in output file names.
    ///
    /// ```
    /// use route_search::heuristic::HeuristicKind;
    /// assert_eq!(HeuristicKind::Zero.number(), 1);
    /// assert_eq!(HeuristicKind::LineOfSightPlusAltitude.number(), 3);
    /// ```
    pub fn number(&self) -> usize {
        match self {
            HeuristicKind::Zero => 1,
            HeuristicKind::LineOfSight => 2,
            HeuristicKind::LineOfSightPlusAltitude => 3,
        }
    }
}

impl Heuristic<RouteCost> for HeuristicKind {
    fn h(&self, node: NodeId, attributes: &[NodeAttributes]) -> RouteCost {
        match self {
            HeuristicKind::Zero => Heuristic::<RouteCost>::h(&ZeroHeuristic, node, attributes),
            HeuristicKind::LineOfSight => LineOfSight.h(node, attributes),
            HeuristicKind::LineOfSightPlusAltitude => LineOfSightPlusAltitude.h(node, attributes),
        }
    }
}
