use assert_approx_eq::assert_approx_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::demand;
use crate::fixed_priority::{completion_time, lub, scheduling_point};
use crate::fixed_priority::{
    feasible_by_completion_time, feasible_by_lub, feasible_by_scheduling_point,
};
use crate::task::{Task, TaskSet};
use crate::tests::{d, s};

fn task_set(params: &[(u64, u64)]) -> TaskSet {
    TaskSet::from_pairs(params).unwrap()
}

/// Verdicts in the order (LUB, completion time, scheduling point).
fn verdicts(ts: &TaskSet) -> (bool, bool, bool) {
    (
        feasible_by_lub(ts),
        feasible_by_completion_time(ts),
        feasible_by_scheduling_point(ts),
    )
}

/// Discrete-time simulation of the synchronous release under
/// preemptive fixed-priority scheduling. Returns, for each task, the
/// completion time of its first job, or `None` if it is still
/// incomplete at its deadline. A job without work completes once all
/// higher-priority work released before it has been served.
fn simulate_first_jobs(ts: &TaskSet) -> Vec<Option<u64>> {
    let periods: Vec<u64> = ts.iter().map(|t| u64::from(t.period)).collect();
    let wcets: Vec<u64> = ts.iter().map(|t| u64::from(t.wcet)).collect();
    let horizon = *periods.iter().max().unwrap();
    let mut backlog = vec![0u64; ts.len()];
    let mut served = vec![0u64; ts.len()];
    // nothing at all to do at or above this priority
    let mut done: Vec<Option<u64>> = (0..ts.len())
        .map(|i| wcets[..=i].iter().all(|c| *c == 0).then_some(0))
        .collect();
    for now in 0..horizon {
        for (j, period) in periods.iter().enumerate() {
            if now % period == 0 {
                backlog[j] += wcets[j];
            }
        }
        // jobs of the same task run in release order, so the first job
        // is complete once the task has received `wcet` units of service
        if let Some(j) = backlog.iter().position(|b| *b > 0) {
            backlog[j] -= 1;
            served[j] += 1;
            if served[j] == wcets[j] {
                done[j] = Some(now + 1);
            }
        }
        for i in 0..ts.len() {
            if wcets[i] == 0 && done[i].is_none() && backlog[..i].iter().all(|b| *b == 0) {
                done[i] = Some(now + 1);
            }
        }
    }
    done.iter()
        .zip(periods.iter())
        .map(|(c, p)| c.filter(|c| c <= p))
        .collect()
}

fn random_task_set(rng: &mut StdRng) -> TaskSet {
    let n = rng.gen_range(1..=5);
    let tasks = (0..n)
        .map(|_| {
            let period = rng.gen_range(1..=40);
            let wcet = rng.gen_range(0..=period / 2);
            Task::new(d(period), s(wcet))
        })
        .collect();
    TaskSet::rate_monotonic(tasks).unwrap()
}

#[test]
fn liu_layland_bounds() {
    assert_approx_eq!(lub::utilization_bound(1), 1.0);
    assert_approx_eq!(lub::utilization_bound(2), 0.8284, 0.0001);
    assert_approx_eq!(lub::utilization_bound(3), 0.7798, 0.0001);
    assert_approx_eq!(lub::utilization_bound(4), 0.7568, 0.0001);
    assert_approx_eq!(lub::utilization_bound(1000), 2.0_f64.ln(), 0.001);
    for n in 1..50 {
        assert!(lub::utilization_bound(n + 1) < lub::utilization_bound(n));
    }
}

#[test]
fn saturated_set_fails_lub_but_is_feasible() {
    // periods {2, 5, 10}, U = 1.0
    let ts = task_set(&[(2, 1), (5, 2), (10, 1)]);
    let analysis = lub::analyze(&ts);
    assert_approx_eq!(analysis.utilization, 1.0);
    assert_approx_eq!(analysis.bound, 0.7798, 0.0001);
    assert!(!analysis.feasible);
    assert_eq!(verdicts(&ts), (false, true, true));

    let rts: Vec<_> = completion_time::response_times(&ts)
        .iter()
        .map(|rt| rt.completion_time())
        .collect();
    assert_eq!(rts, vec![Some(d(1)), Some(d(4)), Some(d(10))]);
}

#[test]
fn below_lub_is_feasible_everywhere() {
    // periods {2, 10, 15}, U ≈ 0.7333
    let ts = task_set(&[(2, 1), (10, 1), (15, 2)]);
    assert_approx_eq!(lub::analyze(&ts).utilization, 0.7333, 0.0001);
    assert_eq!(verdicts(&ts), (true, true, true));
}

#[test]
fn harmonic_full_utilization() {
    // periods {2, 4, 16}, U = 1.0, harmonic periods
    let ts = task_set(&[(2, 1), (4, 1), (16, 4)]);
    assert_eq!(verdicts(&ts), (false, true, true));

    let last = scheduling_point::analyze(&ts)[2].satisfied_at.unwrap();
    assert_eq!(last.time, d(16));
    assert_eq!(last.demand, s(16));
}

#[test]
fn single_task_at_full_utilization() {
    let ts = task_set(&[(10, 10)]);
    assert_eq!(verdicts(&ts), (true, true, true));
    assert_eq!(
        completion_time::response_times(&ts),
        vec![completion_time::ResponseTime::Converged {
            completion_time: d(10),
            deadline: d(10),
            iterations: 1,
        }]
    );
}

#[test]
fn overloaded_set_is_infeasible() {
    // periods {2, 5, 7}, U ≈ 0.9857 -- the lowest-priority task misses
    let ts = task_set(&[(2, 1), (5, 1), (7, 2)]);
    assert_eq!(verdicts(&ts), (false, false, false));

    let rts = completion_time::response_times(&ts);
    assert!(rts[0].is_feasible() && rts[1].is_feasible());
    assert_eq!(
        rts[2],
        completion_time::ResponseTime::Diverged {
            last_estimate: d(8),
            deadline: d(7),
            iterations: 4,
        }
    );

    let outcome = scheduling_point::analyze(&ts)[2];
    assert_eq!(outcome.satisfied_at, None);
    // {2, 4, 6, 5, 7}
    assert_eq!(outcome.points_checked, 5);
}

#[test]
fn unbounded_interference_terminates() {
    // the top task alone saturates the processor
    let ts = task_set(&[(3, 3), (1000, 1)]);
    let rts = completion_time::response_times(&ts);
    assert!(rts[0].is_feasible());
    assert!(!rts[1].is_feasible());
    assert!(rts[1].iterations() <= 1000);
    assert!(!feasible_by_scheduling_point(&ts));
}

#[test]
fn work_grows_with_period_ratio() {
    // the estimate creeps up by one job of the short task per iteration
    let ts = task_set(&[(1, 1), (1000, 1)]);
    assert_eq!(
        completion_time::response_times(&ts)[1],
        completion_time::ResponseTime::Diverged {
            last_estimate: d(1001),
            deadline: d(1000),
            iterations: 999,
        }
    );
    // every multiple of the short period up to 1000 is a candidate
    let outcome = scheduling_point::analyze(&ts)[1];
    assert_eq!(outcome.satisfied_at, None);
    assert_eq!(outcome.points_checked, 1000);
}

#[test]
fn zero_wcet_task_waits_for_higher_priority_work() {
    let ts = task_set(&[(2, 2), (3, 0)]);
    assert_eq!(verdicts(&ts), (false, true, true));
    assert_eq!(
        completion_time::response_times(&ts)[1].completion_time(),
        Some(d(2))
    );

    // the busy period of the two upper tasks ends at 2
    let ts = task_set(&[(2, 1), (4, 1), (16, 0)]);
    let rts = completion_time::response_times(&ts);
    assert_eq!(rts[2].completion_time(), Some(d(2)));
    assert_eq!(simulate_first_jobs(&ts)[2], Some(2));
    assert_eq!(verdicts(&ts), (true, true, true));

    // no work anywhere at or above its priority
    let ts = task_set(&[(5, 0), (7, 0)]);
    assert_eq!(
        completion_time::response_times(&ts)[1].completion_time(),
        Some(d(0))
    );
}

#[test]
fn zero_wcet_task_behind_overload() {
    let ts = task_set(&[(2, 2), (2, 1), (3, 0)]);
    let rts = completion_time::response_times(&ts);
    assert!(!rts[2].is_feasible());
    assert!(!scheduling_point::analyze(&ts)[2].is_feasible());
}

#[test]
fn equal_periods() {
    let ts = task_set(&[(4, 2), (4, 2)]);
    assert_eq!(verdicts(&ts), (false, true, true));
    let ts = task_set(&[(4, 2), (4, 2), (4, 1)]);
    assert_eq!(verdicts(&ts), (false, false, false));
}

/// Literature example with known response times {1, 2, 7, 18}.
#[test]
fn known_response_times() {
    let params: Vec<(u64, u64)> = vec![(4, 1), (5, 1), (9, 3), (18, 3)];
    let expected = vec![1, 2, 7, 18];
    let ts = task_set(&params);
    let rbfs: Vec<demand::RBF> = ts.iter().map(Task::rbf).collect();

    for (i, expected_bound) in expected.iter().enumerate() {
        // lower-indexed task == higher-priority task
        let interference = demand::Slice::of(&rbfs[0..i]);
        let result = completion_time::completion_time(&interference, &ts[i]);
        assert_eq!(Some(d(*expected_bound)), result.completion_time());
    }
    assert!(feasible_by_scheduling_point(&ts));
}

/// Example 3 in "Fixed Priority Scheduling of Periodic Task Sets
/// with Arbitrary Deadlines", John P. Lehoczky, RTSS 1990: the second
/// task's response time of 118 exceeds its period of 100.
#[test]
fn lehoczky90_ex3() {
    let ts = task_set(&[(70, 26), (100, 62)]);
    let rts = completion_time::response_times(&ts);
    assert_eq!(rts[0].completion_time(), Some(d(26)));
    assert!(!rts[1].is_feasible());
    assert_eq!(verdicts(&ts), (false, false, false));
}

#[test]
fn earliest_scheduling_point_is_reported() {
    let ts = task_set(&[(6, 1), (8, 2), (12, 4), (24, 6)]);
    let outcomes = scheduling_point::analyze(&ts);
    let points: Vec<_> = outcomes
        .iter()
        .map(|o| o.satisfied_at.map(|p| (u64::from(p.time), p.task, p.multiple)))
        .collect();
    assert_eq!(
        points,
        vec![Some((6, 0, 1)), Some((6, 0, 1)), Some((8, 1, 1)), Some((24, 0, 4))]
    );
}

#[test]
fn repeated_analysis_is_idempotent() {
    let ts = task_set(&[(2, 1), (5, 1), (7, 1), (13, 2)]);
    let first = verdicts(&ts);
    for _ in 0..3 {
        assert_eq!(verdicts(&ts), first);
    }
    assert_eq!(
        completion_time::response_times(&ts),
        completion_time::response_times(&ts)
    );
    assert_eq!(scheduling_point::analyze(&ts), scheduling_point::analyze(&ts));
}

#[test]
fn exact_tests_agree_with_simulation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..2000 {
        let ts = random_task_set(&mut rng);
        let simulated = simulate_first_jobs(&ts);
        let rts = completion_time::response_times(&ts);
        let points = scheduling_point::analyze(&ts);
        for i in 0..ts.len() {
            assert_eq!(
                rts[i].completion_time().map(u64::from),
                simulated[i],
                "completion time of task {} in {:?}",
                i,
                ts
            );
            assert_eq!(
                rts[i].is_feasible(),
                points[i].is_feasible(),
                "exact tests disagree on task {} in {:?}",
                i,
                ts
            );
        }
    }
}

#[test]
fn utilization_bound_is_sound() {
    let mut rng = StdRng::seed_from_u64(1973);
    let mut accepted = 0;
    for _ in 0..2000 {
        let ts = random_task_set(&mut rng);
        if feasible_by_lub(&ts) {
            accepted += 1;
            assert!(feasible_by_completion_time(&ts), "{:?}", ts);
            assert!(feasible_by_scheduling_point(&ts), "{:?}", ts);
        }
    }
    assert!(accepted > 0);
}

#[test]
fn utilization_is_positive_with_any_work() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let ts = random_task_set(&mut rng);
        if ts.iter().any(|t| !t.wcet.is_none()) {
            assert!(lub::analyze(&ts).utilization > 0.0);
        }
    }
}
