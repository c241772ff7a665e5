/*! Feasibility analysis for rate-monotonic scheduling

This crate answers whether a fixed-priority, rate-monotonic scheduler
on a single processor can guarantee that every task of a periodic task
set meets its deadline (deadline = period). It provides:

- the Liu & Layland utilization bound ([fixed_priority::lub]), a fast but
  only *sufficient* test,
- the exact completion-time test ([fixed_priority::completion_time]), and
- the exact scheduling-point test ([fixed_priority::scheduling_point]).

Task sets are validated on construction ([task::TaskSet]), so each test
is a total, side-effect-free function of its input. The [report] module
runs all tests and renders the results; [config] loads task sets from
YAML files or `period:wcet` literals.

```
use rm_feasibility::fixed_priority::{
    feasible_by_completion_time, feasible_by_lub, feasible_by_scheduling_point,
};
use rm_feasibility::task::TaskSet;

let ts = TaskSet::from_pairs(&[(2, 1), (4, 1), (16, 4)]).unwrap();
assert!(!feasible_by_lub(&ts)); // U = 1.0 exceeds the bound...
assert!(feasible_by_completion_time(&ts)); // ...but the set is schedulable
assert!(feasible_by_scheduling_point(&ts));
```
*/

pub mod config;
pub mod demand;
pub mod fixed_point;
pub mod fixed_priority;
pub mod report;
pub mod task;
pub mod time;
