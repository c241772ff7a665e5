//! Exact completion-time test (response-time analysis)

use serde::Serialize;
use tracing::{debug, info};

use crate::demand::{self, RequestBound};
use crate::fixed_point::{self, FixedPoint, SearchFailure};
use crate::task::{Task, TaskSet};
use crate::time::{Duration, Service};

/// The worst-case completion time of one task, or the evidence that
/// it exceeds the task's deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseTime {
    /// The fixed point was reached at or before the deadline.
    Converged {
        completion_time: Duration,
        deadline: Duration,
        iterations: usize,
    },
    /// The estimate grew past the deadline; the search was aborted.
    Diverged {
        last_estimate: Duration,
        deadline: Duration,
        iterations: usize,
    },
}

impl ResponseTime {
    pub fn is_feasible(&self) -> bool {
        matches!(self, ResponseTime::Converged { .. })
    }

    /// The completion time, if one was found within the deadline.
    pub fn completion_time(&self) -> Option<Duration> {
        match self {
            ResponseTime::Converged {
                completion_time, ..
            } => Some(*completion_time),
            ResponseTime::Diverged { .. } => None,
        }
    }

    pub fn deadline(&self) -> Duration {
        match self {
            ResponseTime::Converged { deadline, .. } | ResponseTime::Diverged { deadline, .. } => {
                *deadline
            }
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            ResponseTime::Converged { iterations, .. }
            | ResponseTime::Diverged { iterations, .. } => *iterations,
        }
    }
}

/// Compute the worst-case completion time of a task under
/// fully-preemptive fixed-priority scheduling on a dedicated
/// uniprocessor, given the request-bound functions of all
/// higher-priority tasks.
///
/// The search starts from one job of every task of higher-or-equal
/// priority and iterates
///
/// `a' = wcet + sum_{j < i} ceil(a / period_j) * wcet_j`
///
/// until `a' == a`. The search is aborted as soon as the estimate
/// exceeds the task's deadline, which therefore bounds the number of
/// iterations even if no fixed point exists. A task without work
/// completes once all higher-priority work released before it is done.
///
/// Every iteration that does not converge grows the estimate by at
/// least one unit, so the cost is bounded by the deadline rather than by
/// the number of tasks. For widely spread periods this is slow: with
/// tasks `(1, 1)` and `(10^12, 1)` the estimate creeps towards the
/// deadline one job of the short task at a time.
pub fn completion_time<RBF>(interference: &RBF, tua: &Task) -> ResponseTime
where
    RBF: RequestBound + ?Sized,
{
    let deadline = tua.deadline();
    let start = Duration::from(interference.one_job_each().saturating_add(tua.wcet));
    let rhs = |a: Duration| -> Service { tua.wcet.saturating_add(interference.service_needed(a)) };
    match fixed_point::search(start, deadline, rhs) {
        Ok(FixedPoint { value, iterations }) => ResponseTime::Converged {
            completion_time: value,
            deadline,
            iterations,
        },
        Err(SearchFailure::DivergenceLimitExceeded {
            last_estimate,
            iterations,
            ..
        }) => ResponseTime::Diverged {
            last_estimate,
            deadline,
            iterations,
        },
    }
}

/// Per-task worst-case completion times, in priority order.
pub fn response_times(tasks: &TaskSet) -> Vec<ResponseTime> {
    let rbfs: Vec<demand::RBF> = tasks.iter().map(Task::rbf).collect();
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let interference = demand::Slice::of(&rbfs[0..i]);
            let rt = completion_time(&interference, task);
            match rt {
                ResponseTime::Converged {
                    completion_time, ..
                } => debug!(
                    task = i,
                    %completion_time,
                    deadline = %task.deadline(),
                    "completion time"
                ),
                ResponseTime::Diverged { last_estimate, .. } => info!(
                    task = i,
                    %last_estimate,
                    deadline = %task.deadline(),
                    "completion time exceeds deadline"
                ),
            }
            rt
        })
        .collect()
}

/// Exact feasibility test: every task completes by its deadline in the
/// worst case.
///
/// See [completion_time] for the cost of the search, which grows with
/// the ratio of the largest to the smallest period.
pub fn feasible_by_completion_time(tasks: &TaskSet) -> bool {
    response_times(tasks).iter().all(ResponseTime::is_feasible)
}
