use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    pub remaining: u32,
    /// Seconds until the current window resets.
    pub retry_after: u64,
}

/// Checks between two sweeps of elapsed windows.
const SWEEP_EVERY: u32 = 256;

struct Window {
    started: Instant,
    count: u32,
}

#[derive(Default)]
struct Windows {
    by_key: HashMap<(String, String), Window>,
    since_sweep: u32,
}

/// Fixed-window request counter per (user, endpoint), process-local.
/// Counters are lost on restart and not shared between instances.
/// Elapsed windows are swept during regular checks, so the map only
/// holds keys seen within the last window plus at most one sweep interval.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    sweep_every: u32,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            sweep_every: SWEEP_EVERY,
            windows: Mutex::new(Windows::default()),
        }
    }

    /// Sweep elapsed windows every `checks` checks instead of the default.
    pub fn sweep_every(mut self, checks: u32) -> Self {
        self.sweep_every = checks.max(1);
        self
    }

    pub fn check(&self, user_id: &str, endpoint: &str) -> Decision {
        self.check_at(user_id, endpoint, Instant::now())
    }

    pub fn check_at(&self, user_id: &str, endpoint: &str, now: Instant) -> Decision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        windows.since_sweep += 1;
        if windows.since_sweep >= self.sweep_every {
            windows.since_sweep = 0;
            let window = self.window;
            windows
                .by_key
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = windows
            .by_key
            .entry((user_id.to_string(), endpoint.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.saturating_duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        let elapsed = now.saturating_duration_since(entry.started);
        let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);

        if entry.count < self.max {
            entry.count += 1;
            Decision {
                allowed: true,
                remaining: self.max - entry.count,
                retry_after,
            }
        } else {
            Decision {
                allowed: false,
                remaining: 0,
                retry_after,
            }
        }
    }

    /// Number of (user, endpoint) windows currently held.
    pub fn tracked(&self) -> usize {
        self.windows.lock().map(|w| w.by_key.len()).unwrap_or(0)
    }
}
