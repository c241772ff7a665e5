//! The discrete time model used throughout the crate.
//!
//! All time values are non-negative integers. Keeping periods, WCETs,
//! and demand integral means every ceiling in the analyses is computed
//! exactly, so a demand that exactly matches the available capacity
//! never "rounds over" it.

use derive_more::{Add, AddAssign, Display, From, Into, Sub, Sum};
use serde::{Deserialize, Serialize};

/// An interval length, e.g., a period, a deadline, or the length of
/// an analysis window `[0, t]`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Add,
    AddAssign,
    Sub,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Duration(u64);

/// An amount of processor service, e.g., a WCET or the cumulative
/// demand of several jobs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Add,
    AddAssign,
    Sub,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Service(u64);

impl Duration {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widen to a real number (for utilization computations).
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// The `n`-th multiple of this interval length, saturating at
    /// `u64::MAX`.
    pub fn times(self, n: u64) -> Self {
        Duration(self.0.saturating_mul(n))
    }

    /// How many complete intervals of length `self` fit into `horizon`,
    /// i.e., `floor(horizon / self)`. Zero-length intervals fit nowhere.
    pub fn multiples_within(self, horizon: Duration) -> u64 {
        if self.is_zero() {
            0
        } else {
            horizon.0 / self.0
        }
    }
}

impl Service {
    pub const fn none() -> Self {
        Service(0)
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// The cost of `n` jobs of this size, saturating at `u64::MAX`.
    pub fn times(self, n: u64) -> Self {
        Service(self.0.saturating_mul(n))
    }

    pub fn saturating_add(self, other: Service) -> Self {
        Service(self.0.saturating_add(other.0))
    }
}

// On a dedicated processor one unit of time supplies one unit of
// service, so the two quantities convert freely.
impl From<Duration> for Service {
    fn from(d: Duration) -> Self {
        Service(d.0)
    }
}

impl From<Service> for Duration {
    fn from(s: Service) -> Self {
        Duration(s.0)
    }
}

/// `ceil(a / b)` in exact integer arithmetic. Callers must ensure `b` is non-zero.
pub fn divide_with_ceil(a: Duration, b: Duration) -> u64 {
    a.0 / b.0 + (a.0 % b.0 > 0) as u64
}
