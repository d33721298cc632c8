use std::collections::HashMap;

use raylib::prelude::*;

use crate::choreographer::camera::{Projection, Viewport};
use crate::choreographer::scene::NodeId;
use crate::choreographer::Choreographer;
use crate::constants::LAYER_WORLD_HEIGHT;
use crate::engine::Layer;
use crate::texture_loader::Asset;

/// Screen-space placement of one billboard for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub node: NodeId,
    pub center: Vector2,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
    /// Back face towards the camera; the image is mirrored.
    pub mirrored: bool,
    pub opacity: f32,
    pub depth: f32,
}

/// Projects every visible drawable node, sorted back to front.
pub fn billboards(choreographer: &Choreographer) -> Vec<Billboard> {
    let scene = choreographer.scene();
    let projection = Projection::new(choreographer.camera(), choreographer.viewport());
    let half_height = LAYER_WORLD_HEIGHT * 0.5;

    let mut out: Vec<Billboard> = scene
        .ids()
        .filter_map(|id| {
            let node = scene.node(id);
            if !node.drawable || node.local.opacity <= 0.0 {
                return None;
            }
            let world = scene.world_transform(id);
            let half_width = half_height * node.aspect();
            let center = projection.project(world.origin())?;
            let right = projection.project(world.transform_point(Vector3::new(half_width, 0.0, 0.0)))?;
            let up = projection.project(world.transform_point(Vector3::new(0.0, half_height, 0.0)))?;

            let ax = right.position - center.position;
            let ay = up.position - center.position;
            let up_len = ay.length();
            if up_len <= f32::EPSILON {
                return None;
            }
            // Screen "right" perpendicular to the projected up axis.
            let right_hat = Vector2::new(-ay.y / up_len, ay.x / up_len);
            let signed_half_width = ax.dot(right_hat);

            Some(Billboard {
                node: id,
                center: center.position,
                width: signed_half_width.abs() * 2.0,
                height: up_len * 2.0,
                rotation: ay.x.atan2(-ay.y).to_degrees(),
                mirrored: signed_half_width < 0.0,
                opacity: node.local.opacity,
                depth: center.depth,
            })
        })
        .collect();

    out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}

/// Paints the logo scene graph as textured billboards.
pub struct LogoLayer {
    choreographer: Choreographer,
    textures: HashMap<NodeId, Texture2D>,
}

impl LogoLayer {
    pub fn new(viewport: Viewport) -> Self {
        Self { choreographer: Choreographer::new(viewport), textures: HashMap::new() }
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreographer
    }

    /// Binds an image to a node and locks the node's aspect ratio. Without
    /// an asset the node keeps a flat placeholder quad at 1:1.
    pub fn attach(&mut self, node: NodeId, asset: Option<Asset>) {
        match asset {
            Some(asset) => {
                self.choreographer.lock_aspect(node, asset.natural_size());
                self.textures.insert(node, asset.texture);
            }
            None => self.choreographer.lock_aspect(node, None),
        }
    }
}

impl Layer for LogoLayer {
    fn update(&mut self, dt: f32) {
        self.choreographer.tick(dt);
    }

    fn draw<D: RaylibDraw>(&self, d: &mut D) {
        for billboard in billboards(&self.choreographer) {
            let alpha = (billboard.opacity.clamp(0.0, 1.0) * 255.0) as u8;
            let tint = Color::new(255, 255, 255, alpha);
            let dest = Rectangle::new(billboard.center.x, billboard.center.y, billboard.width, billboard.height);
            let origin = Vector2::new(billboard.width * 0.5, billboard.height * 0.5);

            match self.textures.get(&billboard.node) {
                Some(texture) => {
                    let tex_width = texture.width() as f32;
                    let tex_height = texture.height() as f32;
                    let source_width = if billboard.mirrored { -tex_width } else { tex_width };
                    d.draw_texture_pro(
                        texture,
                        Rectangle::new(0.0, 0.0, source_width, tex_height),
                        dest,
                        origin,
                        billboard.rotation,
                        tint,
                    );
                }
                None => {
                    d.draw_rectangle_pro(dest, origin, billboard.rotation, Color::new(200, 220, 255, alpha / 2));
                }
            }
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.choreographer.resize(Viewport::new(width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_nodes_are_not_drawn() {
        let c = Choreographer::new(Viewport::new(1280, 720));
        // At loop start every layer is transparent.
        assert!(billboards(&c).is_empty());
    }

    #[test]
    fn test_primary_is_centered_in_hero_framing() {
        let mut c = Choreographer::new(Viewport::new(1280, 720));
        // Camera is back on axis and the group is neutral when the spin starts.
        c.advance(1.8);
        let primary = c.nodes().primary;
        let board = billboards(&c).into_iter().find(|b| b.node == primary).unwrap();
        assert!((board.center.x - 640.0).abs() < 1e-2);
        assert!((board.center.y - 360.0).abs() < 1e-2);
        assert!(board.width > 0.0 && (board.width / board.height - 1.0).abs() < 1e-3);
        assert!(board.rotation.abs() < 1e-3);
        assert!(!board.mirrored);
    }

    #[test]
    fn test_billboards_sorted_back_to_front() {
        let mut c = Choreographer::new(Viewport::new(1280, 720));
        c.advance(3.0);
        let boards = billboards(&c);
        assert!(boards.len() >= 3);
        assert!(boards.windows(2).all(|w| w[0].depth >= w[1].depth));
    }

    #[test]
    fn test_half_spin_mirrors_layers() {
        let mut c = Choreographer::new(Viewport::new(1280, 720));
        // The hero spin is symmetric, so its midpoint faces backwards.
        c.advance(1.8 + (4.3 - 1.8) * 0.5);
        let primary = c.nodes().primary;
        let board = billboards(&c).into_iter().find(|b| b.node == primary).unwrap();
        assert!(board.mirrored);
    }

    #[test]
    fn test_locked_aspect_widens_billboard() {
        let mut c = Choreographer::new(Viewport::new(1280, 720));
        let primary = c.nodes().primary;
        c.lock_aspect(primary, Some((300, 100)));
        c.advance(1.8);
        let board = billboards(&c).into_iter().find(|b| b.node == primary).unwrap();
        assert!((board.width / board.height - 3.0).abs() < 1e-3);
    }
}
