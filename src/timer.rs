//! Time sources for the frame loop.
//!
//! All game timing is expressed in milliseconds on a monotonic tick counter
//! that starts when the [`FrameClock`] is created. Cooldowns and lifetimes are
//! [`Timer`] values checked against that counter, so behaviour does not depend
//! on the frame rate.

use std::time::{Duration, Instant};

/// A one-shot timer: started at some tick, expires `duration_ms` later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub started_at: u64,
    pub duration_ms: u64,
}

impl Timer {
    pub fn start(now: u64, duration_ms: u64) -> Self {
        Self {
            started_at: now,
            duration_ms,
        }
    }

    /// Milliseconds since the timer started (0 if `now` is earlier).
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.started_at)
    }

    /// True once at least `duration_ms` has passed.
    pub fn expired(&self, now: u64) -> bool {
        self.elapsed(now) >= self.duration_ms
    }
}

/// A repeating timer that fires every `interval_ms`.
///
/// Used as the custom periodic event that drives meteor spawning.
#[derive(Clone, Copy, Debug)]
pub struct IntervalTimer {
    interval_ms: u64,
    next_at: u64,
}

impl IntervalTimer {
    pub fn new(now: u64, interval_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_at: now + interval_ms,
        }
    }

    /// Number of times the timer fired since the last poll.
    pub fn poll(&mut self, now: u64) -> u32 {
        let mut fired = 0;
        while now >= self.next_at {
            self.next_at += self.interval_ms;
            fired += 1;
        }
        fired
    }
}

/// Frame-rate cap and monotonic tick source.
pub struct FrameClock {
    origin: Instant,
    last_frame: Instant,
    frame: Duration,
}

impl FrameClock {
    pub fn new(frame: Duration) -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_frame: now,
            frame,
        }
    }

    /// Block until the frame budget is spent, then return dt in seconds.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }

    /// Milliseconds since the clock was created.
    pub fn ticks_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_expires_at_duration() {
        let t = Timer::start(1000, 400);
        assert!(!t.expired(1000));
        assert!(!t.expired(1399));
        assert!(t.expired(1400));
        assert_eq!(t.elapsed(900), 0);
    }

    #[test]
    fn interval_fires_once_per_period() {
        let mut t = IntervalTimer::new(0, 500);
        assert_eq!(t.poll(499), 0);
        assert_eq!(t.poll(500), 1);
        assert_eq!(t.poll(999), 0);
        // A long stall delivers every missed event.
        assert_eq!(t.poll(2600), 4);
    }

    #[test]
    fn frame_clock_caps_rate() {
        let mut clock = FrameClock::new(Duration::from_millis(5));
        let dt = clock.tick();
        assert!(dt >= 0.005);
    }
}
