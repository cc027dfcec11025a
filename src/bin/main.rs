use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;

use route_search::heuristic::HeuristicKind;
use route_search::runner::RunConfig;
use route_search::runner::RunOutcome;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Finds minimum-cost routes with uniform-cost search and A*
#[derive(Parser, Debug)]
#[clap(long_version = route_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Route problem (YAML)
    #[arg()]
    pub input_file: PathBuf,

    /// Solutions are written to `<OUTPUT_PREFIX>-<N>`, N being the heuristic number
    #[arg()]
    pub output_prefix: String,

    /// Extension of the solution files. Empty for none.
    #[arg(long, env = "ROUTE_SEARCH_OUTPUT_EXTENSION", default_value = "yaml")]
    pub extension: String,

    /// Heuristics to run (default: all, in order)
    #[arg(long = "heuristic", value_enum)]
    pub heuristics: Vec<HeuristicKind>,

    /// Keep running the remaining heuristics when one finds no path
    #[arg(long)]
    pub keep_going: bool,

    /// More logging. Repeat for more. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.input_file, &self.output_prefix);
        config.extension = self.extension.clone();
        if !self.heuristics.is_empty() {
            config.heuristics = self.heuristics.clone();
        }
        config.keep_going = self.keep_going;
        config
    }

    fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let outcomes = match route_search::runner::run(&args.run_config()) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for outcome in &outcomes {
        match outcome {
            RunOutcome::Solved {
                heuristic,
                output,
                solution,
            } => {
                let s = &solution.solution;
                println!(
                    "{} {heuristic}: cost {} via {} ({} expanded) -> {}",
                    "solved".green().bold(),
                    s.cost.yellow(),
                    s.path.join(" → "),
                    s.expanded_nodes,
                    output.display()
                );
            }
            RunOutcome::Failed { heuristic, e } => {
                failed = true;
                println!("{} {heuristic}: {e}", "failed".red().bold());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
