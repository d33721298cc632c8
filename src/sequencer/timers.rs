use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Timer<T> {
    due_ms: u64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    // Reversed so the max-heap pops the earliest timer first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.due_ms.cmp(&self.due_ms).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deferred callbacks keyed by a millisecond deadline. Timers due at the
/// same instant fire in scheduling order. There is no cancellation.
pub struct TimerQueue<T> {
    heap: BinaryHeap<Timer<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 0 }
    }

    pub fn schedule(&mut self, due_ms: u64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { due_ms, seq, payload });
    }

    /// Removes and returns the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, T)> {
        if self.heap.peek()?.due_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|timer| (timer.due_ms, timer.payload))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
