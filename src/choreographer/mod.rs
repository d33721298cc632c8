pub mod camera;
pub mod easing;
pub mod layer;
pub mod logo;
pub mod scene;
pub mod timeline;

use log::debug;

use crate::choreographer::camera::{CameraState, Viewport};
use crate::choreographer::logo::{LogoNodes, CAMERA_START};
use crate::choreographer::scene::{NodeId, Scene, Transform};
use crate::choreographer::timeline::{Channel, Timeline};

/// Fully resolved local transforms of every node plus the camera state at
/// one clock value.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub nodes: Vec<Transform>,
    pub camera: CameraState,
}

impl Pose {
    pub fn node(&self, id: NodeId) -> &Transform {
        &self.nodes[id.index()]
    }
}

/// Owns the logo scene graph, its camera state and the looping timeline.
pub struct Choreographer {
    scene: Scene,
    nodes: LogoNodes,
    camera: CameraState,
    initial: Pose,
    timeline: Timeline,
    viewport: Viewport,
    clock: f32,
}

impl Choreographer {
    pub fn new(viewport: Viewport) -> Self {
        let (scene, nodes) = logo::build_scene();
        let camera = CameraState::new(CAMERA_START);
        let timeline = logo::build_timeline(&scene, &camera, &nodes);
        let initial = Pose {
            nodes: scene.ids().map(|id| scene.node(id).local).collect(),
            camera,
        };
        Self { scene, nodes, camera, initial, timeline, viewport, clock: 0.0 }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn nodes(&self) -> &LogoNodes {
        &self.nodes
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// The initial pose the loop starts from and returns to.
    #[cfg(test)]
    pub fn initial_pose(&self) -> &Pose {
        &self.initial
    }

    /// Pure evaluation of the timeline at `t` (wrapped into the loop).
    pub fn pose_at(&self, t: f32) -> Pose {
        let t = self.timeline.wrap(t);
        let mut pose = self.initial.clone();
        for channel in self.timeline.channels() {
            let Some(value) = self.timeline.sample(channel, t) else {
                continue;
            };
            match channel {
                Channel::Node(id, property) => pose.nodes[id.index()].set(property, value),
                Channel::Camera(axis) => pose.camera.set(axis, value),
            }
        }
        pose
    }

    /// Applies the pose for clock value `t` to the scene and camera state.
    pub fn advance(&mut self, t: f32) -> &Scene {
        self.clock = self.timeline.wrap(t);
        let pose = self.pose_at(self.clock);
        let ids: Vec<NodeId> = self.scene.ids().collect();
        for id in ids {
            self.scene.set_local(id, *pose.node(id));
        }
        self.camera = pose.camera;
        &self.scene
    }

    /// Moves the clock forward by `dt` seconds and applies the new pose.
    pub fn tick(&mut self, dt: f32) {
        let next = self.clock + dt.max(0.0);
        self.advance(next);
    }

    /// Locks a layer's aspect ratio from its image's natural size, once.
    pub fn lock_aspect(&mut self, id: NodeId, natural_size: Option<(u32, u32)>) {
        if !self.scene.lock_aspect(id, natural_size) {
            debug!("aspect of '{}' already locked", self.scene.node(id).name);
        }
    }

    /// Viewport change: only the projection aspect follows, the clock and
    /// pose stay untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        debug!("logo viewport {}x{} (aspect {:.3})", viewport.width, viewport.height, viewport.aspect());
        self.viewport = viewport;
    }
}
