use std::time::{Duration, Instant};

/// A cancellable fixed-period schedule driven by the caller's clock.
///
/// Nothing runs in the background: the owner asks `poll` how many periods
/// have elapsed since the last firing. A cancelled interval never fires.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// When the next firing is due, if armed.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume one due firing, if any, returning the instant it was due.
    /// Call repeatedly to catch up after a late poll.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        let due = self.next_due.filter(|due| *due <= now)?;
        self.next_due = Some(due + self.period);
        Some(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_never_fires() {
        let mut iv = Interval::every_second();
        assert!(iv.poll(Instant::now() + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_fires_once_per_period() {
        let t0 = Instant::now();
        let mut iv = Interval::every_second();
        iv.arm(t0);
        assert_eq!(iv.next_due(), Some(t0 + Duration::from_secs(1)));
        assert!(iv.poll(t0 + Duration::from_millis(999)).is_none());
        assert_eq!(iv.poll(t0 + Duration::from_secs(1)), Some(t0 + Duration::from_secs(1)));
        assert!(iv.poll(t0 + Duration::from_millis(1500)).is_none());
    }

    #[test]
    fn test_catches_up_after_late_poll() {
        let t0 = Instant::now();
        let mut iv = Interval::every_second();
        iv.arm(t0);
        let late = t0 + Duration::from_millis(3500);
        let mut fired = 0;
        while iv.poll(late).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let t0 = Instant::now();
        let mut iv = Interval::every_second();
        iv.arm(t0);
        iv.cancel();
        assert_eq!(iv.next_due(), None);
        assert!(iv.poll(t0 + Duration::from_secs(5)).is_none());
    }
}
