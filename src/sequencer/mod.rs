pub mod readiness;
pub mod stage;
pub mod state;
pub mod surface;
pub mod timers;

use std::collections::BTreeSet;

use log::debug;

use crate::constants::*;
use crate::sequencer::readiness::ReadinessGate;
use crate::sequencer::state::{SequenceState, StateFlag};
use crate::sequencer::surface::Surface;
use crate::sequencer::timers::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceId {
    A,
    B,
}

impl SurfaceId {
    pub fn index(self) -> usize {
        match self {
            SurfaceId::A => 0,
            SurfaceId::B => 1,
        }
    }
}

/// Dwell times of the cross-fade cycle, plus the burst size fired when the
/// logo screen explodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTimings {
    pub show_a_ms: u64,
    pub explode_ms: u64,
    pub show_b_ms: u64,
    pub pause_ms: u64,
    pub fade_ms: u64,
    pub burst_count: usize,
}

impl Default for SequenceTimings {
    fn default() -> Self {
        Self {
            show_a_ms: SHOW_A_MS,
            explode_ms: EXPLODE_MS,
            show_b_ms: SHOW_B_MS,
            pause_ms: PAUSE_MS,
            fade_ms: FADE_MS,
            burst_count: BURST_PARTICLES,
        }
    }
}

/// Timer-driven state machine cross-fading between the logo screen (A) and
/// the alternate screen (B).
///
/// Nothing outside calls into a running cycle: the frame loop only moves the
/// clock forward with `advance`, which fires due timers. Data flows out
/// through the surfaces, the stage flags and the burst callback.
pub struct Sequencer {
    timings: SequenceTimings,
    state: SequenceState,
    surfaces: Option<[Surface; 2]>,
    stage_flags: BTreeSet<StateFlag>,
    gate: ReadinessGate<2>,
    timers: TimerQueue<SequenceState>,
    starts: u32,
    started_at: Option<u64>,
    entered_at: u64,
}

impl Sequencer {
    pub fn new(timings: SequenceTimings) -> Self {
        Self {
            timings,
            state: SequenceState::Idle,
            surfaces: Some([Surface::new(timings.fade_ms), Surface::new(timings.fade_ms)]),
            stage_flags: BTreeSet::new(),
            gate: ReadinessGate::new(),
            timers: TimerQueue::new(),
            starts: 0,
            started_at: None,
            entered_at: 0,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// When the current state was entered (scheduled time, ms).
    #[cfg(test)]
    pub fn entered_at(&self) -> u64 {
        self.entered_at
    }

    /// How many times the cycle was started. Never more than one.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    #[cfg(test)]
    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.as_ref().map(|s| &s[id.index()])
    }

    pub fn has_stage_flag(&self, flag: StateFlag) -> bool {
        self.stage_flags.contains(&flag)
    }

    /// Registers both surfaces with their readiness at this moment. Surfaces
    /// that are already ready count immediately; the rest must call
    /// `signal_ready` later.
    pub fn register(&mut self, now_ms: u64, a_ready: bool, b_ready: bool) {
        for (id, ready) in [(SurfaceId::A, a_ready), (SurfaceId::B, b_ready)] {
            if ready {
                self.signal_ready(id, now_ms);
            }
        }
    }

    /// Readiness signal for one surface's backing asset. Starts the cycle
    /// when this completes the pair.
    pub fn signal_ready(&mut self, id: SurfaceId, now_ms: u64) {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return;
        };
        surfaces[id.index()].mark_ready();
        if self.gate.mark(id.index()) {
            self.start(now_ms);
        }
    }

    fn start(&mut self, now_ms: u64) {
        debug!("sequence start at {} ms", now_ms);
        self.starts += 1;
        self.started_at = Some(now_ms);
        self.enter(SequenceState::ShowingA, now_ms);
    }

    /// Fires every timer due at or before `now_ms`, in deadline order.
    /// `on_burst` receives the particle count when the logo explodes.
    pub fn advance(&mut self, now_ms: u64, mut on_burst: impl FnMut(usize)) {
        while let Some((due_ms, next)) = self.timers.pop_due(now_ms) {
            if self.surfaces.is_none() {
                debug!("timer for {:?} fired after teardown, ignored", next);
                continue;
            }
            if let Some(count) = self.enter(next, due_ms) {
                on_burst(count);
            }
        }
    }

    /// Drops the surfaces. Pending timers still fire but do nothing.
    pub fn teardown(&mut self) {
        self.surfaces = None;
    }

    /// Runs the entry action of `state` and schedules its exit. Returns the
    /// burst size when entering the exploding state.
    fn enter(&mut self, state: SequenceState, at: u64) -> Option<usize> {
        let timings = self.timings;
        let surfaces = self.surfaces.as_mut()?;
        let [a, b] = surfaces;

        debug!("sequence {:?} -> {:?} at {} ms", self.state, state, at);
        self.state = state;
        self.entered_at = at;

        let (dwell, next, burst) = match state {
            SequenceState::Idle => return None,
            SequenceState::ShowingA => {
                self.stage_flags.clear();
                a.remove_flag(StateFlag::Shake);
                a.add_flag(StateFlag::Breathing);
                a.set_opacity(1.0, at);
                b.remove_flag(StateFlag::Breathing);
                b.set_opacity(0.0, at);
                (timings.show_a_ms, SequenceState::Exploding, None)
            }
            SequenceState::Exploding => {
                a.add_flag(StateFlag::Shake);
                self.stage_flags.insert(StateFlag::Exploding);
                (timings.explode_ms, SequenceState::ShowingB, Some(timings.burst_count))
            }
            SequenceState::ShowingB => {
                a.remove_flag(StateFlag::Breathing);
                a.remove_flag(StateFlag::Shake);
                a.set_opacity(0.0, at);
                self.stage_flags.remove(&StateFlag::Exploding);
                self.stage_flags.insert(StateFlag::Icy);
                b.set_opacity(1.0, at);
                b.add_flag(StateFlag::Breathing);
                (timings.show_b_ms, SequenceState::FadingOut, None)
            }
            SequenceState::FadingOut => {
                b.remove_flag(StateFlag::Breathing);
                b.set_opacity(0.0, at);
                (timings.pause_ms, SequenceState::ShowingA, None)
            }
        };

        self.timers.schedule(at + dwell, next);
        burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> Sequencer {
        Sequencer::new(SequenceTimings {
            show_a_ms: 4500,
            explode_ms: 900,
            show_b_ms: 5000,
            pause_ms: 1000,
            fade_ms: 600,
            burst_count: 60,
        })
    }

    #[test]
    fn test_waits_for_both_surfaces() {
        let mut seq = sequencer();
        seq.register(0, false, false);
        seq.advance(10_000, |_| {});
        assert_eq!(seq.state(), SequenceState::Idle);
        seq.signal_ready(SurfaceId::B, 10_000);
        seq.advance(20_000, |_| {});
        assert_eq!(seq.state(), SequenceState::Idle);
        assert_eq!(seq.starts(), 0);
    }

    #[test]
    fn test_async_readiness_starts_once() {
        let mut seq = sequencer();
        seq.register(0, false, false);
        seq.advance(10, |_| {});
        seq.signal_ready(SurfaceId::A, 10);
        assert_eq!(seq.starts(), 0);
        seq.advance(15, |_| {});
        seq.signal_ready(SurfaceId::B, 15);
        assert_eq!(seq.starts(), 1);
        assert_eq!(seq.started_at(), Some(15));
        assert_eq!(seq.state(), SequenceState::ShowingA);

        seq.signal_ready(SurfaceId::B, 20);
        seq.signal_ready(SurfaceId::A, 25);
        assert_eq!(seq.starts(), 1);
    }

    #[test]
    fn test_ready_at_registration_starts_once() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        assert_eq!(seq.starts(), 1);
        assert_eq!(seq.started_at(), Some(0));
        seq.signal_ready(SurfaceId::A, 5);
        seq.register(6, true, true);
        assert_eq!(seq.starts(), 1);
    }

    #[test]
    fn test_mixed_readiness_starts_once() {
        let mut seq = sequencer();
        seq.register(0, true, false);
        assert_eq!(seq.starts(), 0);
        seq.signal_ready(SurfaceId::B, 40);
        assert_eq!(seq.starts(), 1);
        assert_eq!(seq.started_at(), Some(40));
    }

    #[test]
    fn test_timing_scenario() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        let mut bursts = Vec::new();
        let mut at = |seq: &mut Sequencer, now: u64| {
            seq.advance(now, |n| bursts.push((now, n)));
            seq.state()
        };
        assert_eq!(at(&mut seq, 4000), SequenceState::ShowingA);
        assert_eq!(at(&mut seq, 4600), SequenceState::Exploding);
        assert_eq!(at(&mut seq, 5800), SequenceState::ShowingB);
        assert_eq!(at(&mut seq, 10700), SequenceState::FadingOut);
        assert_eq!(at(&mut seq, 11800), SequenceState::ShowingA);
        assert_eq!(bursts, vec![(4600, 60)]);
    }

    #[test]
    fn test_transitions_keep_schedule_under_coarse_ticks() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        // One large jump fires every due transition in order.
        let mut bursts = 0;
        seq.advance(11_400, |_| bursts += 1);
        assert_eq!(seq.state(), SequenceState::ShowingA);
        assert_eq!(seq.entered_at(), 11_400);
        assert_eq!(bursts, 1);
    }

    #[test]
    fn test_surface_flags_follow_states() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        let a = seq.surface(SurfaceId::A).unwrap();
        assert!(a.has_flag(StateFlag::Breathing));
        assert_eq!(a.target_opacity(), 1.0);
        assert_eq!(seq.surface(SurfaceId::B).unwrap().target_opacity(), 0.0);

        seq.advance(4500, |_| {});
        assert!(seq.surface(SurfaceId::A).unwrap().has_flag(StateFlag::Shake));
        assert!(seq.has_stage_flag(StateFlag::Exploding));
        // Both screens may show during the explosion.
        assert_eq!(seq.surface(SurfaceId::A).unwrap().target_opacity(), 1.0);

        seq.advance(5400, |_| {});
        let (a, b) = (seq.surface(SurfaceId::A).unwrap(), seq.surface(SurfaceId::B).unwrap());
        assert!(!a.has_flag(StateFlag::Breathing));
        assert_eq!(a.target_opacity(), 0.0);
        assert!(b.has_flag(StateFlag::Breathing));
        assert_eq!(b.target_opacity(), 1.0);
        assert!(seq.has_stage_flag(StateFlag::Icy));
        assert!(!seq.has_stage_flag(StateFlag::Exploding));

        seq.advance(10_400, |_| {});
        let b = seq.surface(SurfaceId::B).unwrap();
        assert!(!b.has_flag(StateFlag::Breathing));
        assert_eq!(b.target_opacity(), 0.0);

        seq.advance(11_400, |_| {});
        assert!(!seq.has_stage_flag(StateFlag::Icy));
        assert!(!seq.surface(SurfaceId::A).unwrap().has_flag(StateFlag::Shake));
    }

    #[test]
    fn test_exactly_one_dominant_outside_explosion() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        for now in (0..40_000).step_by(50) {
            seq.advance(now, |_| {});
            if seq.state() == SequenceState::Exploding {
                continue;
            }
            let (a, b) = (seq.surface(SurfaceId::A).unwrap(), seq.surface(SurfaceId::B).unwrap());
            assert!(!(a.target_opacity() > 0.0 && b.target_opacity() > 0.0), "both targeted at {} ms", now);

            // Displayed opacities overlap only while a cross-fade runs.
            if now >= seq.entered_at() + seq.timings.fade_ms {
                let (a, b) = (a.opacity_at(now), b.opacity_at(now));
                assert!(!(a > 0.0 && b > 0.0), "both visible at {} ms ({} / {})", now, a, b);
            }
        }
    }

    #[test]
    fn test_cross_fade_settles_after_fade_window() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        seq.advance(5400, |_| {});
        assert_eq!(seq.state(), SequenceState::ShowingB);
        let (a, b) = (seq.surface(SurfaceId::A).unwrap(), seq.surface(SurfaceId::B).unwrap());
        assert_eq!(a.opacity_at(5700), 0.5);
        assert_eq!(b.opacity_at(5700), 0.5);
        assert_eq!(a.opacity_at(6000), 0.0);
        assert_eq!(b.opacity_at(6000), 1.0);
    }

    #[test]
    fn test_timers_after_teardown_are_noops() {
        let mut seq = sequencer();
        seq.register(0, true, true);
        seq.teardown();
        let mut bursts = 0;
        seq.advance(60_000, |_| bursts += 1);
        assert_eq!(seq.state(), SequenceState::ShowingA);
        assert_eq!(bursts, 0);
        assert!(seq.surface(SurfaceId::A).is_none());
        seq.signal_ready(SurfaceId::A, 60_001);
        assert_eq!(seq.starts(), 1);
    }
}
