//! RTT estimation as an additive running average.
//!
//! avg = sum / count, clamped to [rtt_min, rtt_max] wherever it feeds a
//! timer. The raw sums are rescaled once the sample count grows
//! unreasonably large so a long-lived stream never accumulates numeric
//! drift: both sum and count are divided so the average is preserved.

use std::time::Duration;

use crate::config::BLOCKS_PER_ACK;

/// Sample count above which the running sums are rescaled.
const RESCALE_THRESHOLD: u32 = 1_000_000;
/// Count the estimator is rescaled down to (two ack windows of weight).
const RESCALED_COUNT: u32 = BLOCKS_PER_ACK * 2;

/// Additive running-average RTT estimator.
#[derive(Debug, Clone)]
pub struct RttEstimator {
    /// Sum of all samples (after any rescaling).
    sum: Duration,
    /// Number of samples folded into `sum`.
    count: u32,
    /// Lower clamp applied by `current()`.
    min: Duration,
    /// Upper clamp applied by `current()`.
    max: Duration,
}

impl RttEstimator {
    /// Create an estimator seeded with one sample at the floor, so the
    /// very first timers fire aggressively rather than never.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            sum: min,
            count: 1,
            min,
            max,
        }
    }

    /// Fold one RTT sample into the running average.
    pub fn sample(&mut self, rtt: Duration) {
        self.sum += rtt;
        self.count += 1;
        if self.count > RESCALE_THRESHOLD {
            let avg = self.sum / self.count;
            self.count = RESCALED_COUNT;
            self.sum = avg * self.count;
        }
    }

    /// The clamped running average, safe to use in timer arithmetic.
    pub fn current(&self) -> Duration {
        (self.sum / self.count).clamp(self.min, self.max)
    }

    /// Number of samples currently weighted into the average.
    pub fn samples(&self) -> u32 {
        self.count
    }
}
