use rand::Rng;

use crate::constants::FIELD_MARGIN;

/// One snow flake. Velocities are pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vy: f32,
    pub vx: f32,
    pub alpha: f32,
}

/// Half extents of the window burst particles are seeded in, around the
/// field's center.
pub const BURST_SPREAD_X: f32 = 60.0;
pub const BURST_SPREAD_Y: f32 = 40.0;

impl Particle {
    /// Ambient flake anywhere in the field.
    pub fn ambient<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        let mut p = Self::falling(rng, width);
        p.y = rng.random_range(0.0..=height.max(0.0));
        p
    }

    /// Ambient flake re-seeded just above the visible area.
    pub fn respawn<R: Rng>(rng: &mut R, width: f32) -> Self {
        let mut p = Self::falling(rng, width);
        p.y = -FIELD_MARGIN;
        p
    }

    fn falling<R: Rng>(rng: &mut R, width: f32) -> Self {
        Self {
            x: rng.random_range(0.0..=width.max(0.0)),
            y: 0.0,
            radius: rng.random_range(1.0..3.0),
            vy: rng.random_range(0.3..1.2),
            vx: rng.random_range(-0.3..0.3),
            alpha: rng.random_range(0.3..0.9),
        }
    }

    /// Burst shard: near the center, thrown outwards and falling faster,
    /// with smaller radii than ambient flakes. The window shrinks to the
    /// field when the field is smaller than it.
    pub fn burst<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        let (cx, cy) = (width * 0.5, height * 0.5);
        let spread_x = BURST_SPREAD_X.min(cx.max(0.0));
        let spread_y = BURST_SPREAD_Y.min(cy.max(0.0));
        Self {
            x: cx + rng.random_range(-spread_x..=spread_x),
            y: cy + rng.random_range(-spread_y..=spread_y),
            radius: rng.random_range(0.8..2.0),
            vy: rng.random_range(1.5..4.0),
            vx: rng.random_range(-3.0..3.0),
            alpha: rng.random_range(0.6..1.0),
        }
    }
}
