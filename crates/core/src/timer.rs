use std::time::{Duration, Instant};

/// A fixed-duration deadline owned by whichever component scheduled it.
///
/// There is no global timer wheel: the owner polls with the current instant,
/// and dropping the owner (or the `Timer`) cancels the pending effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    started_at: Instant,
    duration: Duration,
}

impl Timer {
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self {
            started_at: now,
            duration,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.duration
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Fraction of the duration that has passed, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let ratio = self.elapsed(now).as_secs_f32() / self.duration.as_secs_f32();
        ratio.clamp(0.0, 1.0)
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_exactly_at_deadline() {
        let start = Instant::now();
        let timer = Timer::start(start, Duration::from_millis(600));

        assert!(!timer.is_due(start + Duration::from_millis(599)));
        assert!(timer.is_due(start + Duration::from_millis(600)));
        assert_eq!(timer.deadline(), start + Duration::from_millis(600));
    }

    #[test]
    fn progress_is_clamped() {
        let start = Instant::now();
        let timer = Timer::start(start, Duration::from_millis(400));

        assert_eq!(timer.progress(start), 0.0);
        assert!((timer.progress(start + Duration::from_millis(200)) - 0.5).abs() < 1e-3);
        assert_eq!(timer.progress(start + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn earliest_picks_the_sooner_deadline() {
        let now = Instant::now();
        let later = now + Duration::from_millis(10);
        assert_eq!(earliest(Some(later), Some(now)), Some(now));
        assert_eq!(earliest(None, Some(later)), Some(later));
        assert_eq!(earliest(None, None), None);
    }
}
