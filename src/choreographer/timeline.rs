use std::collections::BTreeMap;

use crate::choreographer::camera::Axis;
use crate::choreographer::easing::{lerp, Easing};
use crate::choreographer::scene::{NodeId, Property};

/// Something a phase can animate: one scalar of a node, or one axis of the
/// camera state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Node(NodeId, Property),
    Camera(Axis),
}

/// A time-bounded interpolation of one channel, keyed by absolute time
/// from loop start. The start value is implicit and baked at build time.
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    pub start: f32,
    pub duration: f32,
    pub to: f32,
    pub easing: Easing,
    from: f32,
}

impl Phase {
    fn progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 || t >= self.end() {
            return 1.0;
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }

    fn value_at(&self, t: f32) -> f32 {
        lerp(self.from, self.to, self.easing.apply(self.progress(t)))
    }

    pub fn end(&self) -> f32 {
        self.start + self.duration.max(0.0)
    }
}

/// All phases of one channel, ordered by start time.
#[derive(Debug, Clone)]
struct Track {
    initial: f32,
    phases: Vec<Phase>,
}

impl Track {
    /// Latest-started phase wins; before any phase starts the channel holds
    /// its initial value.
    fn value_at(&self, t: f32, phases: &[Phase]) -> f32 {
        phases
            .iter()
            .take_while(|phase| phase.start <= t)
            .last()
            .map_or(self.initial, |phase| phase.value_at(t))
    }

    fn sample(&self, t: f32) -> f32 {
        self.value_at(t, &self.phases)
    }
}

/// Collects phases before their start values are known.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    loop_length: f32,
    phases: Vec<(Channel, Phase)>,
}

impl TimelineBuilder {
    pub fn new(loop_length: f32) -> Self {
        Self { loop_length, phases: Vec::new() }
    }

    pub fn tween(&mut self, channel: Channel, start: f32, duration: f32, to: f32, easing: Easing) -> &mut Self {
        self.phases.push((channel, Phase { start, duration, to, easing, from: to }));
        self
    }

    /// Zero-duration phase: the channel jumps to `to` at `at`.
    pub fn snap(&mut self, channel: Channel, at: f32, to: f32) -> &mut Self {
        self.tween(channel, at, 0.0, to, Easing::Linear)
    }

    /// Bakes implicit start values. `initial` yields the loop-start value of
    /// every channel that appears in a phase.
    pub fn build(self, initial: impl Fn(Channel) -> f32) -> Timeline {
        let mut tracks: BTreeMap<Channel, Track> = BTreeMap::new();
        for (channel, phase) in self.phases {
            tracks
                .entry(channel)
                .or_insert_with(|| Track { initial: initial(channel), phases: Vec::new() })
                .phases
                .push(phase);
        }

        for track in tracks.values_mut() {
            // Stable: equal starts keep registration order.
            track.phases.sort_by(|a, b| a.start.total_cmp(&b.start));
            for i in 0..track.phases.len() {
                let from = track.value_at(track.phases[i].start, &track.phases[..i]);
                track.phases[i].from = from;
            }
        }

        Timeline { loop_length: self.loop_length, tracks }
    }
}

/// An immutable set of baked phases. Sampling is a pure function of time.
#[derive(Debug, Clone)]
pub struct Timeline {
    loop_length: f32,
    tracks: BTreeMap<Channel, Track>,
}

impl Timeline {
    pub fn loop_length(&self) -> f32 {
        self.loop_length
    }

    /// Folds any clock value into [0, loop_length).
    pub fn wrap(&self, t: f32) -> f32 {
        if !t.is_finite() || self.loop_length <= 0.0 {
            return 0.0;
        }
        let wrapped = t.rem_euclid(self.loop_length);
        // rem_euclid can round up to the modulus itself for tiny negatives.
        if wrapped >= self.loop_length { 0.0 } else { wrapped }
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.tracks.keys().copied()
    }

    /// Value of `channel` at loop-local time `t`, without wrapping.
    /// Channels without phases report `None`.
    pub fn sample(&self, channel: Channel, t: f32) -> Option<f32> {
        self.tracks.get(&channel).map(|track| track.sample(t))
    }

    #[cfg(test)]
    pub fn phases(&self, channel: Channel) -> &[Phase] {
        self.tracks.get(&channel).map_or(&[], |track| track.phases.as_slice())
    }
}
