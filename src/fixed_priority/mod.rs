/*! Feasibility tests for *rate-monotonic* (**RM**) scheduling

This module collects three feasibility tests for a set of independent,
periodic tasks with implicit deadlines (deadline = period) scheduled by
a fully-preemptive fixed-priority scheduler on a dedicated
uniprocessor. Priorities follow the order of the [TaskSet][crate::task::TaskSet]
(index 0 is the highest priority).

- [lub]: the Liu & Layland utilization bound, a *sufficient* test.
- [completion_time]: the exact completion-time (response-time) test.
- [scheduling_point]: the exact scheduling-point test.

The two exact tests always agree; the utilization bound may reject
task sets that are in fact feasible.

## Citation

- C. L. Liu and J. W. Layland, “Scheduling Algorithms for Multiprogramming in a Hard-Real-Time Environment”, *Journal of the ACM* 20(1), pp.&nbsp;46--61, 1973.
- J. Lehoczky, L. Sha, and Y. Ding, “The Rate Monotonic Scheduling Algorithm: Exact Characterization and Average Case Behavior”, *Proceedings of the 10th IEEE Real-Time Systems Symposium (RTSS 1989)*, 1989.
- M. Joseph and P. Pandya, “Finding Response Times in a Real-Time System”, *The Computer Journal* 29(5), pp.&nbsp;390--395, 1986.
 */

pub mod completion_time;
pub mod lub;
pub mod scheduling_point;

pub use completion_time::feasible_by_completion_time;
pub use lub::feasible_by_lub;
pub use scheduling_point::feasible_by_scheduling_point;

#[cfg(test)]
mod tests;
