//! Route problems as YAML documents.
//!
//! ```yaml
//! problem:
//!   city_start: Alpha
//!   city_end: Gamma
//!   city_Alpha:
//!     connects_to:
//!       Beta: 3
//!   city_Beta:
//!     connects_to:
//!       Gamma: 4.5
//!   city_Gamma: {}
//! additional_information:
//!   city_Alpha:
//!     line_of_sight_distance: 7
//!     altitude_difference: 2
//! ```
//!
//! Every `city_*` key of `problem` becomes a node, `city_start` and
//! `city_end` included, so those show up as edge-less nodes named `start`
//! and `end`.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::float_cost::RouteCost;
use crate::graph::END_NAME;
use crate::graph::Graph;
use crate::graph::NodeAttributes;
use crate::graph::NodeId;
use crate::graph::START_NAME;

pub(crate) const NODE_KEY_PREFIX: &str = "city_";
const CONNECTIONS_KEY: &str = "connects_to";

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("Input file '{0}' does not exist")]
    InputNotFound(PathBuf),
    #[error("I/O error when loading '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("'problem.{0}' is missing or is not a node name")]
    MissingEndpoint(String),
    #[error("Unknown node '{name}' referenced from '{referenced_from}'")]
    UnknownNode {
        name: String,
        referenced_from: String,
    },
    #[error("Invalid connections of '{node}': {e}")]
    InvalidConnections { node: String, e: serde_yaml::Error },
    #[error("Invalid cost {cost} on edge {from} -> {to}")]
    InvalidCost { from: String, to: String, cost: f64 },
}

#[derive(Debug, Deserialize)]
struct ProblemDocument {
    problem: BTreeMap<String, Value>,
    #[serde(default)]
    additional_information: BTreeMap<String, NodeAttributes>,
}

/// A graph, its heuristic attributes, and where to go.
#[derive(Clone, Debug)]
pub struct RouteProblem {
    pub graph: Graph<RouteCost>,
    /// Indexed by `NodeId`.
    pub attributes: Vec<NodeAttributes>,
    pub start: NodeId,
    pub goal: NodeId,
}

fn node_name(key: &str) -> Option<&str> {
    key.strip_prefix(NODE_KEY_PREFIX)
}

impl RouteProblem {
    pub fn load(p: &Path) -> Result<Self, ProblemError> {
        if !p.exists() {
            return Err(ProblemError::InputNotFound(p.to_path_buf()));
        }
        let s = std::fs::read_to_string(p).map_err(|e| ProblemError::IOError {
            p: p.to_path_buf(),
            e,
        })?;
        log::debug!("Loaded {} bytes from {}", s.len(), p.display());
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ProblemError> {
        let document: ProblemDocument = serde_yaml::from_str(s)?;
        Self::from_document(document)
    }

    pub fn start_name(&self) -> &str {
        self.graph.name(self.start)
    }
    pub fn goal_name(&self) -> &str {
        self.graph.name(self.goal)
    }

    fn from_document(document: ProblemDocument) -> Result<Self, ProblemError> {
        let problem = document.problem;
        let mut graph =
            Graph::<RouteCost>::with_names(problem.keys().filter_map(|k| node_name(k)));

        let endpoint = |name: &str| -> Result<NodeId, ProblemError> {
            let key = format!("{NODE_KEY_PREFIX}{name}");
            let value = problem
                .get(&key)
                .and_then(Value::as_str)
                .ok_or_else(|| ProblemError::MissingEndpoint(key.clone()))?;
            graph.id(value).ok_or_else(|| ProblemError::UnknownNode {
                name: value.to_string(),
                referenced_from: key,
            })
        };
        let start = endpoint(START_NAME)?;
        let goal = endpoint(END_NAME)?;

        for (key, value) in &problem {
            let Some(from_name) = node_name(key) else {
                continue;
            };
            let Some(connections) = value.get(CONNECTIONS_KEY) else {
                continue;
            };
            let connections: BTreeMap<String, f64> = serde_yaml::from_value(connections.clone())
                .map_err(|e| ProblemError::InvalidConnections {
                    node: key.clone(),
                    e,
                })?;

            let from = graph.id(from_name).ok_or_else(|| ProblemError::UnknownNode {
                name: from_name.to_string(),
                referenced_from: key.clone(),
            })?;
            for (to_name, cost) in connections {
                let to = graph.id(&to_name).ok_or_else(|| ProblemError::UnknownNode {
                    name: to_name.clone(),
                    referenced_from: key.clone(),
                })?;
                let c = RouteCost::new(cost);
                if !c.is_edge_cost() {
                    return Err(ProblemError::InvalidCost {
                        from: from_name.to_string(),
                        to: to_name,
                        cost,
                    });
                }
                graph.set_cost(from, to, c);
            }
        }

        let mut attributes = vec![NodeAttributes::default(); graph.len()];
        for (key, a) in document.additional_information {
            let name = node_name(&key).unwrap_or(key.as_str());
            let node = graph.id(name).ok_or_else(|| ProblemError::UnknownNode {
                name: name.to_string(),
                referenced_from: format!("additional_information.{key}"),
            })?;
            attributes[node.index()] = a;
        }

        log::debug!(
            "Route problem {:?}: {} -> {}",
            graph,
            graph.name(start),
            graph.name(goal)
        );

        Ok(Self {
            graph,
            attributes,
            start,
            goal,
        })
    }
}
