//! Session-owned scheduled events
//!
//! Beat tickers and phase delays are queued here instead of living in
//! free-running timers. The queue belongs to exactly one session: once it is
//! torn down nothing pending can fire and nothing new can be queued, so a
//! stale beat can never touch a discarded session.

/// An event due at a timestamp (ms)
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<E> {
    pub at_ms: f64,
    pub event: E,
    /// Insertion order, breaks ties between events due at the same time
    seq: u64,
}

/// Time-ordered event queue with teardown
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    pending: Vec<Scheduled<E>>,
    next_seq: u64,
    closed: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
            closed: false,
        }
    }

    /// Queue `event` at `at_ms`. Returns false if the queue was torn down.
    pub fn schedule(&mut self, at_ms: f64, event: E) -> bool {
        if self.closed {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { at_ms, event, seq });
        true
    }

    /// Remove and return the earliest event due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Scheduled<E>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.at_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.at_ms
                    .partial_cmp(&b.at_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(idx))
    }

    /// Invalidate every pending event and refuse new ones
    pub fn teardown(&mut self) {
        self.pending.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether anything is waiting to fire at `now_ms`
    pub fn has_due(&self, now_ms: f64) -> bool {
        self.next_due().is_some_and(|at| at <= now_ms)
    }

    /// Timestamp of the next pending event
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|s| s.at_ms)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut q = Scheduler::new();
        q.schedule(300.0, "c");
        q.schedule(100.0, "a");
        q.schedule(200.0, "b");

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(250.0))
            .map(|s| s.event)
            .collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(300.0));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut q = Scheduler::new();
        q.schedule(50.0, 1);
        q.schedule(50.0, 2);
        q.schedule(50.0, 3);
        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(50.0))
            .map(|s| s.event)
            .collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_teardown_invalidates_and_refuses() {
        let mut q = Scheduler::new();
        q.schedule(10.0, ());
        q.teardown();
        assert!(q.pop_due(1_000.0).is_none());
        assert!(!q.schedule(20.0, ()));
        assert!(q.is_empty());
        assert!(q.is_closed());
    }

    #[test]
    fn test_has_due() {
        let mut q = Scheduler::new();
        assert!(!q.has_due(100.0));
        q.schedule(50.0, ());
        assert!(!q.has_due(49.0));
        assert!(q.has_due(50.0));
        q.pop_due(50.0);
        assert!(!q.has_due(50.0));
    }
}
