//! The Liu & Layland utilization bound (**RM LUB**)

use serde::Serialize;
use tracing::debug;

use crate::task::TaskSet;

/// The least upper bound on total utilization that guarantees
/// rate-monotonic schedulability of `n` tasks, `n * (2^(1/n) - 1)`.
///
/// The bound is 1.0 for a single task and decreases towards `ln 2` as
/// `n` grows. It is undefined for `n = 0`, which a [TaskSet] rules out.
pub fn utilization_bound(n: usize) -> f64 {
    debug_assert!(n > 0, "the utilization bound is undefined for zero tasks");
    let n = n as f64;
    n * (2.0_f64.powf(1.0 / n) - 1.0)
}

/// The outcome of the utilization-bound test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LubAnalysis {
    /// Total utilization of the task set.
    pub utilization: f64,
    /// The Liu & Layland bound for the number of tasks.
    pub bound: f64,
    /// Whether `utilization <= bound`.
    pub feasible: bool,
}

/// Compare the total utilization of `tasks` to the Liu & Layland bound.
pub fn analyze(tasks: &TaskSet) -> LubAnalysis {
    let utilization = tasks.utilization();
    let bound = utilization_bound(tasks.len());
    let feasible = utilization <= bound;
    debug!(utilization, bound, feasible, "RM least upper bound");
    LubAnalysis {
        utilization,
        bound,
        feasible,
    }
}

/// Sufficient (but not necessary) feasibility test: a `true` result
/// guarantees that all deadlines are met under rate-monotonic
/// scheduling, whereas a `false` result is inconclusive and must be
/// confirmed with one of the exact tests.
pub fn feasible_by_lub(tasks: &TaskSet) -> bool {
    analyze(tasks).feasible
}
