//! Trailing-edge rate limiter for high-frequency pan updates
//!
//! Same contract as Leaflet's `Util.throttle`: the first call runs right away
//! and locks the gate for one interval. Calls arriving while locked are not
//! dropped; the latest one is kept and runs once the interval elapses, which
//! locks the gate again. A burst therefore always ends with one pass that
//! sees the final state.
//!
//! The gate has no timer of its own. Callers feed it the current time and
//! call [`ThrottleGate::poll`] from their frame loop.

use instant::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ThrottleGate<T> {
    interval: Duration,
    locked_until: Option<Instant>,
    pending: Option<T>,
}

impl<T> ThrottleGate<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            locked_until: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect from the next lock onwards
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Offers a call to the gate. Returns the arguments when the call may run
    /// now; otherwise they are parked (replacing older parked arguments).
    pub fn call(&mut self, args: T, now: Instant) -> Option<T> {
        if self.is_locked(now) {
            self.pending = Some(args);
            return None;
        }

        // An expired lock with parked arguments that were never polled:
        // the newer call carries the fresher state.
        self.pending = None;
        self.locked_until = Some(now + self.interval);
        Some(args)
    }

    /// Releases the parked call once its interval has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.is_locked(now) {
            return None;
        }

        self.locked_until = None;
        let args = self.pending.take()?;
        self.locked_until = Some(now + self.interval);
        Some(args)
    }

    /// When the parked call becomes due, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and(self.locked_until)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any parked call and unlocks the gate
    pub fn cancel(&mut self) {
        self.pending = None;
        self.locked_until = None;
    }

    fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.map(|until| now < until).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(32);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_runs_immediately() {
        let mut gate = ThrottleGate::new(INTERVAL);
        let t0 = Instant::now();

        assert_eq!(gate.call(1, t0), Some(1));
        assert!(!gate.has_pending());
        assert_eq!(gate.deadline(), None);
    }

    #[test]
    fn test_burst_coalesces_to_last_call() {
        let mut gate = ThrottleGate::new(INTERVAL);
        let t0 = Instant::now();
        assert_eq!(gate.call(0, t0), Some(0));

        let mut ran = Vec::new();
        for i in 1..=10 {
            let now = t0 + ms(i * 2);
            if let Some(args) = gate.call(i, now) {
                ran.push(args);
            }
            if let Some(args) = gate.poll(now) {
                ran.push(args);
            }
        }

        // Nothing runs inside the window
        assert!(ran.is_empty());
        assert_eq!(gate.deadline(), Some(t0 + INTERVAL));

        // The trailing call carries the last arguments
        assert_eq!(gate.poll(t0 + INTERVAL), Some(10));
        assert_eq!(gate.poll(t0 + INTERVAL * 3), None);
    }

    #[test]
    fn test_at_most_one_run_per_window() {
        let mut gate = ThrottleGate::new(INTERVAL);
        let t0 = Instant::now();
        let mut runs = Vec::new();

        // 200 ms of events every 4 ms, polled on every event
        for i in 0..50u64 {
            let now = t0 + ms(i * 4);
            if let Some(args) = gate.poll(now) {
                runs.push((now, args));
            }
            if let Some(args) = gate.call(i, now) {
                runs.push((now, args));
            }
        }
        let end = t0 + ms(50 * 4) + INTERVAL;
        if let Some(args) = gate.poll(end) {
            runs.push((end, args));
        }

        for pair in runs.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= INTERVAL);
        }
        assert_eq!(runs.last().map(|(_, args)| *args), Some(49));
    }

    #[test]
    fn test_new_call_after_expiry_supersedes_parked() {
        let mut gate = ThrottleGate::new(INTERVAL);
        let t0 = Instant::now();
        gate.call("a", t0);
        assert_eq!(gate.call("b", t0 + ms(5)), None);

        // Nobody polled; the next call after the window runs with its own args
        assert_eq!(gate.call("c", t0 + ms(40)), Some("c"));
        assert!(!gate.has_pending());
    }

    #[test]
    fn test_cancel_drops_parked_call() {
        let mut gate = ThrottleGate::new(INTERVAL);
        let t0 = Instant::now();
        gate.call(1, t0);
        gate.call(2, t0 + ms(1));
        gate.cancel();

        assert_eq!(gate.poll(t0 + INTERVAL), None);
        assert_eq!(gate.call(3, t0 + ms(2)), Some(3));
    }
}
