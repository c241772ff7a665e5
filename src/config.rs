//! Loading task sets from YAML files and command-line literals.
//!
//! The expected YAML structure is either a single task set:
//! ```yaml
//! name: ex0
//! tasks:
//!   - { period: 2, wcet: 1 }
//!   - { period: 10, wcet: 1 }
//! ```
//! or a list of them under `task_sets:`. The literal form is a list of
//! `period:wcet` pairs separated by commas or whitespace, e.g.
//! `2:1,10:1,15:2`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::task::{InvalidTaskSet, Task, TaskSet};
use crate::time::{Duration, Service};

/// The bundled catalogue of example task sets.
const EXAMPLES_YAML: &str = include_str!("../data/examples.yaml");

// ── YAML layout ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaskEntry {
    period: u64,
    wcet: u64,
}

#[derive(Debug, Deserialize)]
struct TaskSetEntry {
    #[serde(default)]
    name: Option<String>,
    tasks: Vec<TaskEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskSetFile {
    Many { task_sets: Vec<TaskSetEntry> },
    One(TaskSetEntry),
}

// ── Public types ─────────────────────────────────────────────────────────────

/// How priorities are derived from the order of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityOrder {
    /// Tasks must already be listed in rate-monotonic order.
    #[default]
    AsListed,
    /// Sort tasks by period to assign rate-monotonic priorities.
    RateMonotonic,
}

impl PriorityOrder {
    pub fn build(self, tasks: Vec<Task>) -> Result<TaskSet, InvalidTaskSet> {
        match self {
            PriorityOrder::AsListed => TaskSet::new(tasks),
            PriorityOrder::RateMonotonic => TaskSet::rate_monotonic(tasks),
        }
    }
}

/// A validated task set with a label for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTaskSet {
    pub name: String,
    pub tasks: TaskSet,
}

/// Errors in the literal `period:wcet` notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a `period:wcet` pair, found `{0}`")]
    MissingSeparator(String),

    #[error("`{0}` is not a non-negative integer")]
    BadNumber(String),

    #[error(transparent)]
    Invalid(#[from] InvalidTaskSet),
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Parse a literal list of `period:wcet` pairs.
pub fn parse_literal(input: &str, order: PriorityOrder) -> Result<TaskSet, ParseError> {
    let tasks = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_pair)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(order.build(tasks)?)
}

fn parse_pair(token: &str) -> Result<Task, ParseError> {
    let (period, wcet) = token
        .split_once(':')
        .ok_or_else(|| ParseError::MissingSeparator(token.to_string()))?;
    Ok(Task::new(
        Duration::from(parse_number(period)?),
        Service::from(parse_number(wcet)?),
    ))
}

fn parse_number(s: &str) -> Result<u64, ParseError> {
    s.trim()
        .parse()
        .map_err(|_| ParseError::BadNumber(s.to_string()))
}

/// Parse YAML task-set content. Unnamed sets are labelled after
/// `source` (and their position, if the content holds several sets).
pub fn parse_yaml(content: &str, source: &str, order: PriorityOrder) -> Result<Vec<NamedTaskSet>> {
    let file: TaskSetFile = serde_yaml::from_str(content)
        .with_context(|| format!("Failed to parse task sets from {}", source))?;

    let entries = match file {
        TaskSetFile::Many { task_sets } => task_sets,
        TaskSetFile::One(entry) => vec![entry],
    };
    let several = entries.len() > 1;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = entry.name.unwrap_or_else(|| {
                if several {
                    format!("{}#{}", source, i)
                } else {
                    source.to_string()
                }
            });
            let tasks = entry
                .tasks
                .iter()
                .map(|t| Task::new(Duration::from(t.period), Service::from(t.wcet)))
                .collect();
            let tasks = order
                .build(tasks)
                .with_context(|| format!("Invalid task set `{}` in {}", name, source))?;
            debug!(name = %name, n = tasks.len(), "loaded task set");
            Ok(NamedTaskSet { name, tasks })
        })
        .collect()
}

/// Read and parse a YAML task-set file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid YAML of
/// the expected shape, or contains an invalid task set.
pub fn load_from_file(path: &Path, order: PriorityOrder) -> Result<Vec<NamedTaskSet>> {
    info!("Loading task sets from: {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open task-set file: {}", path.display()))?;
    parse_yaml(&content, &path.display().to_string(), order)
}

/// The bundled example catalogue.
pub fn examples(order: PriorityOrder) -> Result<Vec<NamedTaskSet>> {
    parse_yaml(EXAMPLES_YAML, "built-in examples", order)
}

/// Look up one example of the bundled catalogue by name.
pub fn example(name: &str, order: PriorityOrder) -> Result<NamedTaskSet> {
    examples(order)?
        .into_iter()
        .find(|ex| ex.name == name)
        .with_context(|| format!("No built-in example named `{}`", name))
}
