/// Fires once when every tracked asset has reported ready, whether the
/// signals arrive before or after registration, and in any order.
#[derive(Debug, Clone)]
pub struct ReadinessGate<const N: usize> {
    ready: [bool; N],
    fired: bool,
}

impl<const N: usize> ReadinessGate<N> {
    pub fn new() -> Self {
        Self { ready: [false; N], fired: false }
    }

    /// Records that asset `index` is ready. Returns `true` exactly once: on
    /// the call that completes the set. Repeated signals are ignored.
    pub fn mark(&mut self, index: usize) -> bool {
        if let Some(slot) = self.ready.get_mut(index) {
            *slot = true;
        }
        if self.fired || !self.ready.iter().all(|r| *r) {
            return false;
        }
        self.fired = true;
        true
    }

    #[cfg(test)]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl<const N: usize> Default for ReadinessGate<N> {
    fn default() -> Self {
        Self::new()
    }
}
