//! Exact scheduling-point test (Lehoczky, Sha & Ding)

use serde::Serialize;
use tracing::{debug, info};

use crate::demand::{self, RequestBound};
use crate::task::{Task, TaskSet};
use crate::time::{Duration, Service};

/// A scheduling point `l * period_k` at which the cumulative demand of
/// the task under analysis and all higher-priority tasks fits into the
/// window `[0, l * period_k]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulingPoint {
    /// The length of the window, `l * period_k`.
    pub time: Duration,
    /// Index `k` of the (highest-priority) task whose period yields the point.
    pub task: usize,
    /// The multiple `l`.
    pub multiple: u64,
    /// The cumulative demand `W(l, k)` in the window.
    pub demand: Service,
}

/// The result of the scheduling-point test for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    /// The earliest scheduling point with sufficient capacity, if any.
    pub satisfied_at: Option<SchedulingPoint>,
    /// How many scheduling points were examined.
    pub points_checked: usize,
}

impl TaskOutcome {
    pub fn is_feasible(&self) -> bool {
        self.satisfied_at.is_some()
    }
}

/// Check task `i` at every scheduling point within its period.
///
/// The candidate points are all multiples `l * period_k` with `k <= i`
/// and `1 <= l <= floor(period_i / period_k)`, visited in increasing
/// order without duplicates. The task is feasible if at least one point
/// `t` satisfies
///
/// `sum_{j <= i} wcet_j * ceil(t / period_j) <= t`.
///
/// All arithmetic is exact, so demand equal to capacity passes.
///
/// The number of candidate points is `sum_{k <= i} floor(period_i / period_k)`,
/// so the cost grows with the period ratio: with tasks `(1, 1)` and
/// `(10^12, 1)`, the second task has about `10^12` points to check.
fn check_task(tasks: &[Task], rbfs: &[demand::RBF], i: usize) -> TaskOutcome {
    let horizon = tasks[i].period;
    let prefix = demand::Slice::of(&rbfs[..=i]);
    let mut points_checked = 0;
    for t in prefix.release_iter().take_while(|t| *t <= horizon) {
        points_checked += 1;
        let demand = prefix.service_needed(t);
        if demand <= Service::from(t) {
            let (task, multiple) = origin_of(&tasks[..=i], t);
            let point = SchedulingPoint {
                time: t,
                task,
                multiple,
                demand,
            };
            debug!(
                task = i,
                time = %t,
                k = task,
                l = multiple,
                %demand,
                "scheduling point satisfied"
            );
            return TaskOutcome {
                satisfied_at: Some(point),
                points_checked,
            };
        }
    }
    info!(task = i, points_checked, "no scheduling point satisfied");
    TaskOutcome {
        satisfied_at: None,
        points_checked,
    }
}

/// The highest-priority task `k` whose period divides `t`, and the
/// multiple `l` with `t = l * period_k`.
fn origin_of(tasks: &[Task], t: Duration) -> (usize, u64) {
    tasks
        .iter()
        .enumerate()
        .find(|(_, task)| u64::from(t) % u64::from(task.period) == 0)
        .map(|(k, task)| (k, task.period.multiples_within(t)))
        .unwrap_or((tasks.len() - 1, 1))
}

/// Per-task outcomes of the scheduling-point test, in priority order.
pub fn analyze(tasks: &TaskSet) -> Vec<TaskOutcome> {
    let rbfs: Vec<demand::RBF> = tasks.iter().map(Task::rbf).collect();
    (0..tasks.len())
        .map(|i| check_task(tasks.tasks(), &rbfs, i))
        .collect()
}

/// Exact feasibility test: every task has at least one scheduling
/// point with sufficient capacity.
///
/// Like the completion-time test, this is exact but pseudo-polynomial:
/// the work per task is proportional to the ratio of its period to the
/// shortest higher-priority period.
pub fn feasible_by_scheduling_point(tasks: &TaskSet) -> bool {
    analyze(tasks).iter().all(TaskOutcome::is_feasible)
}
