use std::time::{Duration, Instant};

/// Fixed-interval wall-clock timer polled from the event loop.
///
/// Every elapsed interval counts as one tick, so a stalled loop catches up instead of
/// dropping ticks.
#[derive(Debug, Clone)]
pub(crate) struct IntervalTimer {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl IntervalTimer {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval: normalize_interval(interval),
            next_deadline: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub(crate) fn arm(&mut self, now: Instant) {
        self.next_deadline = Some(now + self.interval);
    }

    #[cfg(test)]
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// Returns how many intervals have elapsed since the previous poll.
    pub(crate) fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut deadline) = self.next_deadline else {
            return 0;
        };

        let mut due = 0u32;
        while now >= deadline {
            due = due.saturating_add(1);
            deadline += self.interval;
        }
        self.next_deadline = Some(deadline);
        due
    }
}

fn normalize_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        Duration::from_millis(1)
    } else {
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = IntervalTimer::new(Duration::from_secs(5));
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(Instant::now() + Duration::from_secs(60)), 0);
    }

    #[test]
    fn fires_once_per_elapsed_interval() {
        let base = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_secs(5));
        timer.arm(base);

        assert_eq!(timer.poll(base + Duration::from_millis(4_999)), 0);
        assert_eq!(timer.poll(base + Duration::from_secs(5)), 1);
        assert_eq!(timer.poll(base + Duration::from_secs(7)), 0);
        assert_eq!(timer.poll(base + Duration::from_secs(10)), 1);
    }

    #[test]
    fn stalled_loop_catches_up_every_missed_interval() {
        let base = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_secs(5));
        timer.arm(base);

        assert_eq!(timer.poll(base + Duration::from_secs(16)), 3);
        assert_eq!(timer.next_deadline(), Some(base + Duration::from_secs(20)));
    }

    #[test]
    fn zero_interval_is_normalized() {
        let base = Instant::now();
        let mut timer = IntervalTimer::new(Duration::ZERO);
        timer.arm(base);
        assert_eq!(timer.poll(base + Duration::from_millis(3)), 3);
    }
}
