use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use tracing::debug;

use rm_feasibility::config::{self, NamedTaskSet, PriorityOrder};
use rm_feasibility::report::Report;

/// Feasibility tests for rate-monotonic scheduling of periodic tasks.
///
/// Prints one verdict per test for each task set. The exit status is 0
/// whether or not a task set is feasible; malformed input exits with 2.
///
/// Example:
///   rm-feasibility -t "2:1,10:1,15:2"
///   rm-feasibility --file tasks.yaml --format yaml
#[derive(Debug, Parser)]
#[command(name = "rm-feasibility", version, long_about = None)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["tasks", "file", "example", "all_examples"]),
))]
struct Cli {
    /// Task set as `period:wcet` pairs in priority order, e.g. "2:1,10:1,15:2".
    #[arg(short = 't', long = "tasks")]
    tasks: Option<String>,

    /// Path to a YAML task-set file.
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Analyze one of the built-in examples (ex0 .. ex9).
    #[arg(short = 'e', long = "example")]
    example: Option<String>,

    /// Analyze all built-in examples.
    #[arg(short = 'a', long = "all-examples")]
    all_examples: bool,

    /// Assign rate-monotonic priorities by sorting tasks by period
    /// instead of rejecting out-of-order input.
    #[arg(short = 's', long = "sort")]
    sort: bool,

    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Include per-task completion times and scheduling points.
    #[arg(short = 'd', long = "details")]
    details: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

const SEPARATOR: &str =
    "************************************************************************";

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so the report on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_task_sets(cli: &Cli) -> Result<Vec<NamedTaskSet>> {
    let order = if cli.sort {
        PriorityOrder::RateMonotonic
    } else {
        PriorityOrder::AsListed
    };

    if let Some(literal) = &cli.tasks {
        let tasks = config::parse_literal(literal, order)?;
        Ok(vec![NamedTaskSet {
            name: String::from("tasks"),
            tasks,
        }])
    } else if let Some(path) = &cli.file {
        config::load_from_file(path, order)
    } else if let Some(name) = &cli.example {
        Ok(vec![config::example(name, order)?])
    } else {
        config::examples(order)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let task_sets = load_task_sets(cli)?;
    debug!(count = task_sets.len(), "task sets loaded");

    let reports: Vec<Report> = task_sets
        .iter()
        .map(|ts| Report::generate(ts.name.clone(), &ts.tasks))
        .collect();

    match cli.format {
        Format::Text => {
            for report in &reports {
                println!("{}", SEPARATOR);
                if cli.details {
                    print!("{:#}", report);
                } else {
                    print!("{}", report);
                }
            }
            println!("{}", SEPARATOR);
        }
        Format::Yaml => print!("{}", serde_yaml::to_string(&reports)?),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(2);
    }
}
