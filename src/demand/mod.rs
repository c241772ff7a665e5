/*! Models of processor demand (request-bound functions)

The central trait, [RequestBound], bounds the cumulative processor
demand of one or more periodic tasks in a window `[0, delta)` that
starts at a synchronous release of all tasks (the critical instant).
*/

use auto_impl::auto_impl;

use crate::time::{Duration, Service};

/// The general interface for processor demand. This can represent the
/// demand of a single task, or the cumulative demand of multiple tasks.
#[auto_impl(&, Box, Rc)]
pub trait RequestBound {
    /// Bound the total amount of service needed in an interval of length `delta`.
    fn service_needed(&self, delta: Duration) -> Service;

    /// The demand of a single job of every task involved, i.e., the
    /// work released together at the critical instant.
    fn one_job_each(&self) -> Service;

    /// Yield, in increasing order and without duplicates, the release
    /// offsets of jobs after the initial synchronous release, i.e., the
    /// positive multiples of the period(s) involved.
    fn release_iter<'a>(&'a self) -> Box<dyn Iterator<Item = Duration> + 'a>;
}

mod rbf;
mod slice;

pub use rbf::RBF;
pub use slice::Slice;
