use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::float_cost::RouteCost;
use crate::graph::Graph;
use crate::problem::NODE_KEY_PREFIX;
use crate::search::SearchResult;

#[derive(Debug, Error)]
pub enum SolutionError {
    #[error("I/O error when saving '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Could not serialize solution: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A solved route, ready to be written out.
///
/// Fields are in alphabetical order, which is also the order they are
/// written in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    pub cost: f64,
    pub expanded_nodes: usize,
    /// Keyed by `city_<name>`.
    pub heuristic: BTreeMap<String, f64>,
    pub path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolutionDocument {
    pub solution: Solution,
}

impl SolutionDocument {
    pub fn new(graph: &Graph<RouteCost>, result: &SearchResult<RouteCost>) -> Self {
        Self {
            solution: Solution {
                cost: result.cost.get(),
                expanded_nodes: result.expanded_nodes,
                heuristic: result
                    .heuristic
                    .iter()
                    .map(|(n, h)| (format!("{NODE_KEY_PREFIX}{}", graph.name(*n)), h.get()))
                    .collect(),
                path: result
                    .path
                    .iter()
                    .map(|n| graph.name(*n).to_string())
                    .collect(),
            },
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, SolutionError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, p: &Path) -> Result<(), SolutionError> {
        let s = self.to_yaml_string()?;
        std::fs::write(p, s).map_err(|e| SolutionError::IOError {
            p: p.to_path_buf(),
            e,
        })
    }
}
