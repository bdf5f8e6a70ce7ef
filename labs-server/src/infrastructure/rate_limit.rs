//! Keyed GCRA rate limiter for the admin login endpoint.

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

pub struct LoginRateLimiter {
    limiter: KeyedLimiter,
    clock: DefaultClock,
}

impl LoginRateLimiter {
    /// `max_attempts` within `window`, tracked per key (client IP). The
    /// limiter is GCRA: the burst covers the full allowance and cells
    /// replenish at `window / max_attempts`.
    pub fn new(max_attempts: u32, window: Duration) -> anyhow::Result<Self> {
        let burst = NonZeroU32::new(max_attempts)
            .ok_or_else(|| anyhow::anyhow!("max_attempts must be non-zero"))?;
        let quota = Quota::with_period(window / max_attempts)
            .ok_or_else(|| anyhow::anyhow!("window must be non-zero"))?
            .allow_burst(burst);
        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        })
    }

    /// Allowance for the admin gate: 5 attempts per 15 minutes.
    pub fn for_admin_login() -> anyhow::Result<Self> {
        Self::new(5, Duration::from_secs(15 * 60))
    }

    /// `Err` carries how long the caller has to wait.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(self.clock.now())),
        }
    }
}
