//! Solves one route problem with each heuristic variant and writes one
//! solution document per variant.

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::heuristic::HeuristicKind;
use crate::problem::ProblemError;
use crate::problem::RouteProblem;
use crate::search::BestFirstSearch;
use crate::search::LogObserver;
use crate::search::SearchError;
use crate::solution::SolutionDocument;
use crate::solution::SolutionError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error("Search with the {heuristic} heuristic failed: {e}")]
    Search {
        heuristic: HeuristicKind,
        e: SearchError,
    },
    #[error(transparent)]
    Solution(#[from] SolutionError),
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_prefix: String,
    /// Appended as `.<extension>` to output files unless empty.
    pub extension: String,
    /// Run in this order. Each one keeps its own output number.
    pub heuristics: Vec<HeuristicKind>,
    /// Carry on with the next heuristic when one finds no path.
    pub keep_going: bool,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output_prefix: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_prefix: output_prefix.into(),
            extension: "yaml".to_string(),
            heuristics: HeuristicKind::ALL.to_vec(),
            keep_going: false,
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Solved {
        heuristic: HeuristicKind,
        output: PathBuf,
        solution: SolutionDocument,
    },
    Failed {
        heuristic: HeuristicKind,
        e: SearchError,
    },
}

/// `<prefix>-<number>[.<extension>]`
///
/// ```
/// use std::path::PathBuf;
/// use route_search::heuristic::HeuristicKind;
/// use route_search::runner::output_path;
///
/// assert_eq!(
///     output_path("out/route", HeuristicKind::LineOfSight, "yaml"),
///     PathBuf::from("out/route-2.yaml")
/// );
/// assert_eq!(
///     output_path("route", HeuristicKind::Zero, ""),
///     PathBuf::from("route-1")
/// );
/// ```
pub fn output_path(prefix: &str, heuristic: HeuristicKind, extension: &str) -> PathBuf {
    let mut name = format!("{prefix}-{}", heuristic.number());
    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }
    PathBuf::from(name)
}

/// Solves one heuristic variant and saves its solution.
pub fn solve(
    problem: &RouteProblem,
    heuristic: HeuristicKind,
    output: &Path,
) -> Result<SolutionDocument, RunError> {
    log::info!(
        "Searching {} -> {} with the {heuristic} heuristic",
        problem.start_name(),
        problem.goal_name()
    );
    let mut observer = LogObserver::new(&problem.graph);
    let result = BestFirstSearch::new(
        &problem.graph,
        problem.start,
        problem.goal,
        &heuristic,
        &problem.attributes,
    )
    .and_then(|search| search.run_observed(&mut observer))
    .map_err(|e| RunError::Search { heuristic, e })?;

    let solution = SolutionDocument::new(&problem.graph, &result);
    solution.save(output)?;
    log::info!(
        "Cost {} over {} nodes, {} expanded. Saved to {}",
        result.cost,
        result.path.len(),
        result.expanded_nodes,
        output.display()
    );
    Ok(solution)
}

pub fn run(config: &RunConfig) -> Result<Vec<RunOutcome>, RunError> {
    let problem = RouteProblem::load(&config.input)?;

    let mut outcomes = Vec::with_capacity(config.heuristics.len());
    for &heuristic in &config.heuristics {
        let output = output_path(&config.output_prefix, heuristic, &config.extension);
        match solve(&problem, heuristic, &output) {
            Ok(solution) => outcomes.push(RunOutcome::Solved {
                heuristic,
                output,
                solution,
            }),
            Err(RunError::Search { heuristic, e }) if config.keep_going => {
                log::warn!("{heuristic}: {e}");
                outcomes.push(RunOutcome::Failed { heuristic, e });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(outcomes)
}
