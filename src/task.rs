//! The periodic task model and validated task sets.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::demand;
use crate::time::{Duration, Service};

/// A single periodic task with an implicit deadline.
///
/// Priorities are not stored: a task's priority is given by its
/// position in a [TaskSet] (index 0 is the highest priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The exact separation between two job releases.
    pub period: Duration,
    /// The worst-case execution time of each job.
    pub wcet: Service,
}

impl Task {
    pub fn new(period: Duration, wcet: Service) -> Self {
        Task { period, wcet }
    }

    /// The relative deadline, which always equals the period.
    pub fn deadline(&self) -> Duration {
        self.period
    }

    /// The fraction of the processor the task demands, `wcet / period`.
    ///
    /// Both operands are widened to `f64` before dividing.
    pub fn utilization(&self) -> f64 {
        self.wcet.as_f64() / self.period.as_f64()
    }

    /// The request-bound function of this task.
    pub fn rbf(&self) -> demand::RBF {
        demand::RBF::new(self.period, self.wcet)
    }
}

/// Reasons for rejecting a task set before analysis.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTaskSet {
    #[error("the task set is empty")]
    Empty,

    #[error("task {index} has a period of zero")]
    ZeroPeriod { index: usize },

    #[error("task {index} has a WCET of {wcet} exceeding its period of {period}")]
    WcetExceedsPeriod {
        index: usize,
        wcet: Service,
        period: Duration,
    },

    #[error(
        "task {index} (period {period}) is listed after a task with the longer period {previous}; \
         tasks must be in rate-monotonic order"
    )]
    NotRateMonotonic {
        index: usize,
        period: Duration,
        previous: Duration,
    },
}

/// A non-empty, validated sequence of tasks in rate-monotonic priority
/// order (non-decreasing periods, highest priority first).
///
/// A `TaskSet` can only be obtained through its validating
/// constructors, so the analyses never see an empty set, a zero
/// period, or a WCET exceeding its period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Validate `tasks` and require that they are already listed in
    /// rate-monotonic order.
    pub fn new(tasks: Vec<Task>) -> Result<Self, InvalidTaskSet> {
        validate_tasks(&tasks)?;
        for (index, pair) in tasks.windows(2).enumerate() {
            if pair[1].period < pair[0].period {
                return Err(InvalidTaskSet::NotRateMonotonic {
                    index: index + 1,
                    period: pair[1].period,
                    previous: pair[0].period,
                });
            }
        }
        Ok(TaskSet { tasks })
    }

    /// Validate `tasks` and assign rate-monotonic priorities by sorting
    /// them by period. Tasks with equal periods keep their relative order.
    pub fn rate_monotonic(mut tasks: Vec<Task>) -> Result<Self, InvalidTaskSet> {
        validate_tasks(&tasks)?;
        tasks.sort_by_key(|t| t.period);
        Ok(TaskSet { tasks })
    }

    /// Convenience constructor from `(period, wcet)` pairs in priority order.
    pub fn from_pairs(pairs: &[(u64, u64)]) -> Result<Self, InvalidTaskSet> {
        Self::new(
            pairs
                .iter()
                .map(|&(period, wcet)| Task::new(Duration::from(period), Service::from(wcet)))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false`; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn periods(&self) -> Vec<Duration> {
        self.tasks.iter().map(|t| t.period).collect()
    }

    pub fn wcets(&self) -> Vec<Service> {
        self.tasks.iter().map(|t| t.wcet).collect()
    }

    pub fn deadlines(&self) -> Vec<Duration> {
        self.tasks.iter().map(Task::deadline).collect()
    }

    /// The tasks with strictly higher priority than task `i`.
    pub fn higher_priority(&self, i: usize) -> &[Task] {
        &self.tasks[..i]
    }

    /// Task `i` together with all tasks of higher priority.
    pub fn priority_prefix(&self, i: usize) -> &[Task] {
        &self.tasks[..=i]
    }

    /// Total utilization `U = sum(wcet / period)`.
    pub fn utilization(&self) -> f64 {
        let mut total = 0.0;
        for (i, task) in self.tasks.iter().enumerate() {
            total += task.utilization();
            debug!(
                task = i,
                wcet = %task.wcet,
                period = %task.period,
                utilization = task.utilization(),
                running_sum = total,
                "task utilization"
            );
        }
        total
    }
}

impl Index<usize> for TaskSet {
    type Output = Task;

    fn index(&self, i: usize) -> &Task {
        &self.tasks[i]
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

fn validate_tasks(tasks: &[Task]) -> Result<(), InvalidTaskSet> {
    if tasks.is_empty() {
        return Err(InvalidTaskSet::Empty);
    }
    for (index, task) in tasks.iter().enumerate() {
        if task.period.is_zero() {
            return Err(InvalidTaskSet::ZeroPeriod { index });
        }
        if Duration::from(task.wcet) > task.period {
            return Err(InvalidTaskSet::WcetExceedsPeriod {
                index,
                wcet: task.wcet,
                period: task.period,
            });
        }
    }
    Ok(())
}
