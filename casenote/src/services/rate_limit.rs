use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-window request limiter.
///
/// All callers share one window: the first admission after the window
/// expires resets the counter, and anything past `max_requests` within a
/// window is rejected. There is no smoothing across the boundary, so a
/// burst at the end of one window followed by a burst at the start of the
/// next is allowed.
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    state: Mutex<WindowState>,
}

struct WindowState {
    window_start: Instant,
    count: u32,
}

/// The limiter's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// Rejected; retry once the current window has elapsed.
    Rejected { retry_after_secs: u64 },
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            window,
            max_requests,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    pub fn admit(&self) -> Admission {
        self.admit_at(Instant::now())
    }

    fn admit_at(&self, now: Instant) -> Admission {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let elapsed = now.saturating_duration_since(state.window_start);
        if elapsed >= self.window {
            state.window_start = now;
            state.count = 0;
        }

        if state.count >= self.max_requests {
            let remaining = self.window.saturating_sub(elapsed);
            return Admission::Rejected {
                retry_after_secs: remaining.as_secs().max(1),
            };
        }

        state.count += 1;
        Admission::Admitted
    }
}
