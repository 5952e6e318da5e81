/// Market data provider rate limiter - sliding one-second window shared process-wide
use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

lazy_static! {
    static ref PROVIDER_RATE_LIMITER: Mutex<RateLimiter> = Mutex::new(RateLimiter::new(10));
}

pub struct RateLimiter {
    /// Queue of request timestamps (last 1 second)
    request_times: VecDeque<Instant>,
    /// Max requests per second
    max_requests: usize,
    /// Time window (1 second)
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize) -> Self {
        Self {
            request_times: VecDeque::new(),
            max_requests: max_requests.max(1),
            window: Duration::from_secs(1),
        }
    }

    fn check_and_record(&mut self, now: Instant) -> Duration {
        // Remove old timestamps outside the 1-second window
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) > self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        // If we're at the limit, calculate how long to wait
        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        self.request_times.push_back(now);
        Duration::from_secs(0)
    }
}

/// Set the global request budget. Called once at startup from configuration.
pub fn configure_provider_rate_limit(max_requests: usize) {
    if let Ok(mut limiter) = PROVIDER_RATE_LIMITER.lock() {
        *limiter = RateLimiter::new(max_requests);
    }
}

/// Wait until a provider request fits in the per-second budget
pub async fn rate_limit_provider() {
    loop {
        let wait_duration = match PROVIDER_RATE_LIMITER.lock() {
            Ok(mut limiter) => limiter.check_and_record(Instant::now()),
            // A poisoned limiter only means another request panicked; don't throttle
            Err(_) => Duration::from_secs(0),
        };

        if wait_duration.is_zero() {
            return;
        }

        tracing::debug!("Provider rate limit: waiting {}ms", wait_duration.as_millis());
        tokio::time::sleep(wait_duration).await;
    }
}
