use std::f32::consts::{PI, TAU};

use raylib::prelude::*;

use crate::choreographer::camera::{Axis, CameraState};
use crate::choreographer::easing::Easing;
use crate::choreographer::scene::{NodeId, Property, Scene, Transform};
use crate::choreographer::timeline::{Channel, Timeline, TimelineBuilder};
use crate::constants::LOOP_LENGTH;

pub const CAMERA_START: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 8.0 };
pub const HERO_CAMERA: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 6.0 };
pub const ACCENT_OFFSCREEN: Vector3 = Vector3 { x: 3.5, y: 2.2, z: 0.2 };

pub const HERO_SPIN_END: f32 = 4.3;
pub const ACCENT_SPIN_START: f32 = 1.1;
pub const ACCENT_SPIN_SECONDS: f32 = 3.0;
pub const RESET_START: f32 = 6.6;

/// Handles to the nodes of the logo hierarchy:
///
/// ```text
/// logo (group)
/// ├── aura
/// ├── primary
/// └── cluster (group)
///     ├── label
///     └── accent
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogoNodes {
    pub root: NodeId,
    pub aura: NodeId,
    pub primary: NodeId,
    pub cluster: NodeId,
    pub label: NodeId,
    pub accent: NodeId,
}

/// Builds the scene in its loop-start pose.
pub fn build_scene() -> (Scene, LogoNodes) {
    let mut scene = Scene::new();
    let root = scene.add_group("logo", None, Transform::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 1.0));
    let aura = scene.add_layer("aura", Some(root), Transform::new(Vector3::new(0.0, 0.0, -0.3), 0.6, 0.0));
    let primary = scene.add_layer("primary", Some(root), Transform::new(Vector3::new(0.0, 0.0, 0.0), 0.8, 0.0));
    let cluster = scene.add_group("cluster", Some(root), Transform::new(Vector3::new(0.0, 0.0, 0.1), 1.0, 1.0));
    let label = scene.add_layer("label", Some(cluster), Transform::new(Vector3::new(0.0, -1.15, 0.05), 0.5, 0.0));
    let accent = scene.add_layer("accent", Some(cluster), Transform::new(ACCENT_OFFSCREEN, 0.45, 0.0));

    (scene, LogoNodes { root, aura, primary, cluster, label, accent })
}

/// Initial value of any channel, read from the loop-start scene and camera.
pub fn initial_value(scene: &Scene, camera: &CameraState, channel: Channel) -> f32 {
    match channel {
        Channel::Node(id, property) => scene.get(id, property),
        Channel::Camera(axis) => camera.get(axis),
    }
}

/// Registers every phase of the logo loop.
pub fn build_timeline(scene: &Scene, camera: &CameraState, nodes: &LogoNodes) -> Timeline {
    use Property::*;

    let n = |id: NodeId, property: Property| Channel::Node(id, property);
    let cam = Channel::Camera;
    let mut tl = TimelineBuilder::new(LOOP_LENGTH);

    // Reveal
    tl.tween(n(nodes.primary, Scale), 0.0, 0.6, 1.0, Easing::BackOut)
        .tween(n(nodes.primary, Opacity), 0.0, 0.6, 1.0, Easing::CubicOut)
        .tween(cam(Axis::Z), 0.0, 0.6, HERO_CAMERA.z, Easing::CubicOut);

    // Label appear
    tl.tween(n(nodes.label, Scale), 0.6, 0.5, 1.0, Easing::BackOut)
        .tween(n(nodes.label, Opacity), 0.6, 0.5, 1.0, Easing::CubicOut)
        .tween(cam(Axis::X), 0.6, 0.5, 0.4, Easing::SineInOut);

    // Accent fly-in; the spin keeps going through the hero spin.
    tl.tween(n(nodes.accent, PositionX), 1.1, 0.7, 0.0, Easing::CubicOut)
        .tween(n(nodes.accent, PositionY), 1.1, 0.7, 0.0, Easing::CubicOut)
        .tween(n(nodes.accent, PositionZ), 1.1, 0.7, 0.15, Easing::CubicOut)
        .tween(n(nodes.accent, Opacity), 1.1, 0.3, 1.0, Easing::Linear)
        .tween(n(nodes.root, Scale), 1.1, 0.35, 1.08, Easing::BackOut)
        .tween(n(nodes.root, Scale), 1.45, 0.35, 1.0, Easing::SineInOut)
        .tween(cam(Axis::X), 1.1, 0.7, 0.0, Easing::SineInOut)
        .tween(n(nodes.accent, RotationZ), ACCENT_SPIN_START, ACCENT_SPIN_SECONDS, 4.0 * TAU, Easing::SineInOut)
        .snap(n(nodes.accent, RotationZ), ACCENT_SPIN_START + ACCENT_SPIN_SECONDS, 0.0);

    // Aura fade-in
    tl.tween(n(nodes.aura, Scale), 1.8, 0.4, 1.0, Easing::CubicOut)
        .tween(n(nodes.aura, Opacity), 1.8, 0.4, 0.6, Easing::CubicOut);

    // Hero spin, snapped back to zero so the angle never accumulates.
    tl.tween(n(nodes.root, RotationY), 1.8, HERO_SPIN_END - 1.8, TAU, Easing::SineInOut)
        .snap(n(nodes.root, RotationY), HERO_SPIN_END, 0.0)
        .tween(n(nodes.root, Scale), 1.8, 1.25, 1.15, Easing::SineInOut)
        .tween(n(nodes.root, Scale), 3.05, 1.25, 1.0, Easing::SineInOut)
        .tween(cam(Axis::Z), 1.8, HERO_SPIN_END - 1.8, 7.0, Easing::SineInOut)
        .tween(cam(Axis::Y), 1.8, HERO_SPIN_END - 1.8, 0.3, Easing::SineInOut);

    // Break-apart
    tl.tween(n(nodes.cluster, PositionX), 5.0, 0.6, 0.9, Easing::CubicOut)
        .tween(n(nodes.cluster, PositionY), 5.0, 0.6, -0.8, Easing::CubicOut)
        .tween(n(nodes.cluster, PositionZ), 5.0, 0.6, 1.2, Easing::CubicOut)
        .tween(n(nodes.cluster, Scale), 5.0, 0.6, 0.4, Easing::CubicOut)
        .tween(n(nodes.cluster, RotationZ), 5.0, 0.6, PI / 5.0, Easing::CubicOut);
    for id in scene.subtree(nodes.cluster) {
        tl.tween(n(id, Opacity), 5.0, 0.6, 0.0, Easing::QuadInOut);
    }
    tl.tween(n(nodes.aura, Scale), 5.0, 0.6, 1.6, Easing::ExpoOut)
        .tween(n(nodes.aura, Opacity), 5.0, 0.6, 0.0, Easing::QuadInOut)
        .tween(cam(Axis::Z), 5.0, 0.6, 6.4, Easing::CubicOut)
        .tween(cam(Axis::X), 5.0, 0.6, -0.3, Easing::CubicOut);

    // Hold: back to the hero framing, primary re-asserted.
    tl.tween(cam(Axis::X), 5.6, 1.0, HERO_CAMERA.x, Easing::SineInOut)
        .tween(cam(Axis::Y), 5.6, 1.0, HERO_CAMERA.y, Easing::SineInOut)
        .tween(cam(Axis::Z), 5.6, 1.0, HERO_CAMERA.z, Easing::SineInOut)
        .snap(n(nodes.primary, Scale), 5.6, 1.0)
        .snap(n(nodes.primary, Opacity), 5.6, 1.0);

    // Reset: every mutable channel back to its loop-start value.
    let reset_length = LOOP_LENGTH - RESET_START;
    for id in scene.ids() {
        for property in Property::ALL {
            let channel = n(id, property);
            tl.tween(channel, RESET_START, reset_length, initial_value(scene, camera, channel), Easing::Linear);
        }
    }
    for axis in Axis::ALL {
        let channel = cam(axis);
        tl.tween(channel, RESET_START, reset_length, initial_value(scene, camera, channel), Easing::Linear);
    }

    tl.build(|channel| initial_value(scene, camera, channel))
}
