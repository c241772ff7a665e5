use super::RequestBound;
use crate::time::{divide_with_ceil, Duration, Service};

/// The request-bound function (RBF) of a periodic task.
///
/// Jobs are released at `0, T, 2T, ...`, so an interval of length
/// `delta` contains `ceil(delta / T)` releases, each contributing a
/// full WCET.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RBF {
    pub period: Duration,
    pub wcet: Service,
}

impl RBF {
    pub fn new(period: Duration, wcet: Service) -> Self {
        RBF { period, wcet }
    }

    /// Number of jobs released in an interval of length `delta`.
    pub fn number_arrivals(&self, delta: Duration) -> u64 {
        if self.period.is_zero() {
            0
        } else {
            divide_with_ceil(delta, self.period)
        }
    }
}

impl RequestBound for RBF {
    fn service_needed(&self, delta: Duration) -> Service {
        self.wcet.times(self.number_arrivals(delta))
    }

    fn one_job_each(&self) -> Service {
        self.wcet
    }

    fn release_iter<'a>(&'a self) -> Box<dyn Iterator<Item = Duration> + 'a> {
        let period = self.period;
        let last = period.multiples_within(Duration::from(u64::MAX));
        Box::new((1..=last).map(move |l| period.times(l)))
    }
}
