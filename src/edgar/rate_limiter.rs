// Minimum-interval rate limiter for the extraction API.
//
// sec-api.io applies per-key rate limits, so every extraction request passes
// through one shared limiter regardless of how many filings are in flight.
// Each acquire waits until at least `interval` has passed since the last
// request that was let through.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Longest accepted gap between two requests.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// The minimum gap between requests for a given rate.
///
/// Non-positive rates mean "unlimited" and give a zero interval. Rates so low
/// that the gap is not representable or exceeds [`MAX_INTERVAL`] are rejected.
pub fn interval_for(requests_per_second: f64) -> Result<Duration> {
    if requests_per_second.is_nan() {
        anyhow::bail!("Request rate must be a number");
    }
    if requests_per_second <= 0.0 {
        return Ok(Duration::ZERO);
    }
    match Duration::try_from_secs_f64(1.0 / requests_per_second) {
        Ok(interval) if interval <= MAX_INTERVAL => Ok(interval),
        _ => anyhow::bail!(
            "Request rate {requests_per_second} is too low (at most {}s between requests)",
            MAX_INTERVAL.as_secs()
        ),
    }
}

/// A cloneable rate limiter; clones share the same quota.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    /// Minimum time between requests
    interval: Duration,
    /// When the next request may go out
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_second` requests per second.
    /// Non-positive rates disable limiting; rates below one request per
    /// [`MAX_INTERVAL`] are clamped to it.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = interval_for(requests_per_second).unwrap_or(MAX_INTERVAL);
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                next_slot: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    ///
    /// The slot is reserved before sleeping, so concurrent callers queue up
    /// one interval apart instead of all waking at once.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            let slot = match inner.next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            inner.next_slot = Some(slot + inner.interval);
            slot
        };

        if wait_until > Instant::now() {
            tokio::time::sleep_until(wait_until).await;
        }
    }
}
