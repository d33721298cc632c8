use std::collections::BTreeSet;

use crate::sequencer::state::StateFlag;

/// One of the two screens the sequencer cross-fades between.
///
/// Opacity changes are transitions: `set_opacity` starts a linear fade from
/// the currently displayed value, and `opacity_at` reports where that fade
/// is at a given time.
#[derive(Debug, Clone)]
pub struct Surface {
    ready: bool,
    flags: BTreeSet<StateFlag>,
    fade_ms: u64,
    from: f32,
    to: f32,
    fade_start_ms: u64,
}

impl Surface {
    pub fn new(fade_ms: u64) -> Self {
        Self {
            ready: false,
            flags: BTreeSet::new(),
            fade_ms,
            from: 0.0,
            to: 0.0,
            fade_start_ms: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn set_opacity(&mut self, target: f32, now_ms: u64) {
        self.from = self.opacity_at(now_ms);
        self.to = target.clamp(0.0, 1.0);
        self.fade_start_ms = now_ms;
    }

    /// Opacity the fade is heading to.
    #[cfg(test)]
    pub fn target_opacity(&self) -> f32 {
        self.to
    }

    pub fn opacity_at(&self, now_ms: u64) -> f32 {
        if self.fade_ms == 0 || now_ms >= self.fade_start_ms + self.fade_ms {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.fade_start_ms) as f32;
        let p = elapsed / self.fade_ms as f32;
        self.from + (self.to - self.from) * p
    }

    pub fn add_flag(&mut self, flag: StateFlag) {
        self.flags.insert(flag);
    }

    pub fn remove_flag(&mut self, flag: StateFlag) {
        self.flags.remove(&flag);
    }

    pub fn has_flag(&self, flag: StateFlag) -> bool {
        self.flags.contains(&flag)
    }
}
