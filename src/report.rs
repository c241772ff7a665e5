//! The task-set driver: runs every feasibility test on a task set and
//! aggregates the verdicts into a [Report].

use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use tracing::{info, warn};

use crate::fixed_priority::completion_time::{self, ResponseTime};
use crate::fixed_priority::lub::{self, LubAnalysis};
use crate::fixed_priority::scheduling_point::{self, TaskOutcome};
use crate::task::TaskSet;

/// Slack for comparing a floating-point utilization sum against 1.0.
const CAPACITY_EPSILON: f64 = 1e-9;

/// A feasibility verdict as printed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Feasible,
    Infeasible,
}

impl From<bool> for Verdict {
    fn from(feasible: bool) -> Self {
        if feasible {
            Verdict::Feasible
        } else {
            Verdict::Infeasible
        }
    }
}

impl Verdict {
    pub fn is_feasible(self) -> bool {
        self == Verdict::Feasible
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Feasible => f.pad("FEASIBLE"),
            Verdict::Infeasible => f.pad("INFEASIBLE"),
        }
    }
}

/// The combined results of all feasibility tests for one task set.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub tasks: TaskSet,
    /// Total utilization in percent.
    pub utilization_percent: f64,
    /// Sufficient test: utilization against the Liu & Layland bound.
    pub rm_lub: LubAnalysis,
    pub completion_time: Verdict,
    pub scheduling_point: Verdict,
    /// Necessary condition `U <= 1` for any uniprocessor scheduler.
    /// This is a capacity check only, not an analysis of dynamic-priority
    /// schedulers.
    pub within_capacity: Verdict,
    pub response_times: Vec<ResponseTime>,
    pub scheduling_points: Vec<TaskOutcome>,
}

impl Report {
    /// Run every test on `tasks`.
    pub fn generate(name: impl Into<String>, tasks: &TaskSet) -> Self {
        let name = name.into();
        let rm_lub = lub::analyze(tasks);
        let response_times = completion_time::response_times(tasks);
        let scheduling_points = scheduling_point::analyze(tasks);

        let report = Report {
            utilization_percent: rm_lub.utilization * 100.0,
            completion_time: response_times.iter().all(ResponseTime::is_feasible).into(),
            scheduling_point: scheduling_points.iter().all(TaskOutcome::is_feasible).into(),
            within_capacity: (rm_lub.utilization <= 1.0 + CAPACITY_EPSILON).into(),
            name,
            tasks: tasks.clone(),
            rm_lub,
            response_times,
            scheduling_points,
        };

        if !report.exact_tests_agree() {
            warn!(name = %report.name, "exact feasibility tests disagree");
        }
        info!(
            name = %report.name,
            utilization = report.rm_lub.utilization,
            rm_lub = %Verdict::from(report.rm_lub.feasible),
            completion_time = %report.completion_time,
            scheduling_point = %report.scheduling_point,
            "analysis complete"
        );
        report
    }

    pub fn rm_lub_verdict(&self) -> Verdict {
        self.rm_lub.feasible.into()
    }

    /// The two exact tests must always reach the same verdict.
    pub fn exact_tests_agree(&self) -> bool {
        self.completion_time == self.scheduling_point
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.tasks.len();
        let wcets = self
            .tasks
            .iter()
            .zip(1..=n)
            .map(|(t, i)| format!("C{}={}", i, t.wcet))
            .join(", ");
        let periods = self
            .tasks
            .iter()
            .zip(1..=n)
            .map(|(t, i)| format!("T{}={}", i, t.period))
            .join(", ");
        writeln!(
            f,
            "{} U={:4.2}% ({}; {}; T=D)",
            self.name, self.utilization_percent, wcets, periods
        )
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (i, (rt, sp)) in self
            .response_times
            .iter()
            .zip(self.scheduling_points.iter())
            .enumerate()
        {
            write!(f, "  task {}: ", i + 1)?;
            match rt {
                ResponseTime::Converged {
                    completion_time,
                    deadline,
                    iterations,
                } => write!(
                    f,
                    "completion time {} <= deadline {} ({} iterations)",
                    completion_time, deadline, iterations
                )?,
                ResponseTime::Diverged {
                    last_estimate,
                    deadline,
                    iterations,
                } => write!(
                    f,
                    "completion time > deadline {} (estimate {} after {} iterations)",
                    deadline, last_estimate, iterations
                )?,
            }
            match &sp.satisfied_at {
                Some(p) => writeln!(
                    f,
                    "; demand {} fits at t={} ({} x T{}, {} points checked)",
                    p.demand,
                    p.time,
                    p.multiple,
                    p.task + 1,
                    sp.points_checked
                )?,
                None => writeln!(f, "; no scheduling point fits ({} checked)", sp.points_checked)?,
            }
        }
        Ok(())
    }
}

/// Renders the human-readable verdict report. The alternate form
/// (`{:#}`) adds per-task diagnostics.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        if f.alternate() {
            self.write_details(f)?;
        }
        writeln!(f)?;
        writeln!(f, "Completion Time:  {}", self.completion_time)?;
        writeln!(f, "Scheduling Point: {}", self.scheduling_point)?;
        writeln!(
            f,
            "RM LUB:           {} (U={:.4}, bound={:.4})",
            self.rm_lub_verdict(),
            self.rm_lub.utilization,
            self.rm_lub.bound
        )?;
        writeln!(f, "Capacity (U<=1):  {}", self.within_capacity)
    }
}
