#![no_main]

use libfuzzer_sys::fuzz_target;

use route_search::heuristic::HeuristicKind;
use route_search::problem::RouteProblem;
use route_search::search::SearchError;
use route_search::search::search;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(problem) = RouteProblem::from_yaml_str(s) else {
        return;
    };

    for heuristic in HeuristicKind::ALL {
        match search(
            &problem.graph,
            problem.start,
            problem.goal,
            &heuristic,
            &problem.attributes,
        ) {
            Ok(result) => {
                assert!(result.expanded_nodes > 0);
                assert_eq!(result.path.first(), Some(&problem.start));
                assert_eq!(result.path.last(), Some(&problem.goal));
            }
            Err(SearchError::NoPathFound { .. }) => {}
            Err(e) => panic!("Loaded problems only reference known nodes: {e}"),
        }
    }
});
