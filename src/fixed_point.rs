use thiserror::Error;
use tracing::trace;

use crate::time::{Duration, Service};

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, PartialOrd)]
pub enum SearchFailure {
    /// The iteration exceeded the given divergence threshold before
    /// reaching a fixed point.
    #[error("no fixed point at most {limit} found (last estimate {last_estimate} after {iterations} iterations)")]
    DivergenceLimitExceeded {
        limit: Duration,
        last_estimate: Duration,
        iterations: usize,
    },
}

/// A converged fixed point together with the number of iterations it took.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FixedPoint {
    pub value: Duration,
    pub iterations: usize,
}

pub type SearchResult = Result<FixedPoint, SearchFailure>;

/// Conduct an iterative search for the least fixed point of
/// `t = workload(t)` at or above `start`, giving up as soon as an
/// estimate exceeds `divergence_limit`.
///
/// The workload bound must be monotonically non-decreasing and satisfy
/// `workload(start) >= start`; the sequence of estimates is then
/// non-decreasing, so every iteration either converges or moves closer
/// to the limit, and the search always terminates.
pub fn search<RHS>(start: Duration, divergence_limit: Duration, workload: RHS) -> SearchResult
where
    RHS: Fn(Duration) -> Service,
{
    let mut assumed = start;
    let mut iterations = 0;
    while assumed <= divergence_limit {
        iterations += 1;
        let next = Duration::from(workload(assumed));
        trace!(iteration = iterations, %assumed, %next, "fixed-point step");
        if next == assumed {
            // we have converged
            return Ok(FixedPoint {
                value: assumed,
                iterations,
            });
        }
        debug_assert!(next > assumed, "workload bound must be non-decreasing");
        // continue iterating
        assumed = next;
    }
    // if we get here, we overshot the limit => no admissible solution
    Err(SearchFailure::DivergenceLimitExceeded {
        limit: divergence_limit,
        last_estimate: assumed,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{d, s};

    /// Very slow, naive search for the least fixed point at or above `start`.
    fn brute_force_search<RHS>(start: Duration, limit: Duration, workload: RHS) -> Option<Duration>
    where
        RHS: Fn(Duration) -> Service,
    {
        (u64::from(start)..=u64::from(limit))
            .map(d)
            .find(|t| Duration::from(workload(*t)) == *t)
    }

    #[test]
    fn constant_workload_converges_immediately() {
        let result = search(d(5), d(10), |_| s(5));
        assert_eq!(result, Ok(FixedPoint { value: d(5), iterations: 1 }));
    }

    #[test]
    fn converges_to_least_fixed_point() {
        // one interfering task (T=4, C=1) plus own cost 2
        let rhs = |t: Duration| s(2 + u64::from(t).div_ceil(4));
        let result = search(d(3), d(100), rhs).unwrap();
        assert_eq!(result.value, d(3));
        assert_eq!(Some(result.value), brute_force_search(d(3), d(100), rhs));

        let rhs = |t: Duration| s(3 + 2 * u64::from(t).div_ceil(4));
        let result = search(d(5), d(100), rhs).unwrap();
        assert_eq!(Some(result.value), brute_force_search(d(5), d(100), rhs));
        assert_eq!(result.value, d(7));
    }

    #[test]
    fn aborts_at_divergence_limit() {
        let result = search(d(1), d(20), |t| s(u64::from(t) + 1));
        assert_eq!(
            result,
            Err(SearchFailure::DivergenceLimitExceeded {
                limit: d(20),
                last_estimate: d(21),
                iterations: 20,
            })
        );
    }

    #[test]
    fn start_beyond_limit_fails_without_iterating() {
        let result = search(d(11), d(10), |t| s(u64::from(t)));
        assert!(matches!(
            result,
            Err(SearchFailure::DivergenceLimitExceeded { iterations: 0, .. })
        ));
    }

    #[test]
    fn zero_demand_is_a_fixed_point() {
        assert_eq!(search(d(0), d(10), |_| s(0)).map(|fp| fp.value), Ok(d(0)));
    }
}
