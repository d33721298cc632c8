use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::FIELD_MARGIN;
use crate::particles::particle::Particle;

/// Pool of snow particles over a `width` x `height` pixel field.
///
/// The ambient pool is filled once; bursts append on top of it and are
/// never pruned, they simply fall out the bottom and come back as ambient
/// flakes.
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: f32, height: f32, capacity: usize) -> Self {
        Self::with_rng(width, height, capacity, StdRng::from_os_rng())
    }

    /// Same as `new` with a reproducible random stream.
    pub fn with_seed(width: f32, height: f32, capacity: usize, seed: u64) -> Self {
        Self::with_rng(width, height, capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f32, height: f32, capacity: usize, mut rng: StdRng) -> Self {
        let particles = (0..capacity)
            .map(|_| Particle::ambient(&mut rng, width, height))
            .collect();
        Self { particles, width, height, rng }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[cfg(test)]
    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Advances every particle by one step of its velocity, then applies the
    /// bottom recycle and side wrap rules.
    pub fn tick(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in self.particles.iter_mut() {
            p.x += p.vx;
            p.y += p.vy;

            if p.y > height {
                *p = Particle::respawn(&mut self.rng, width);
                continue;
            }
            if p.x > width + FIELD_MARGIN {
                p.x = -FIELD_MARGIN;
            } else if p.x < -FIELD_MARGIN {
                p.x = width + FIELD_MARGIN;
            }
        }
    }

    /// Appends `count` burst particles around the field's center.
    pub fn burst(&mut self, count: usize) {
        let (width, height) = (self.width, self.height);
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::burst(&mut self.rng, width, height));
        }
    }

    /// New bounds take effect on the next tick; particles are kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::particle::{BURST_SPREAD_X, BURST_SPREAD_Y};

    fn assert_in_bounds(field: &ParticleField) {
        let (w, h) = field.bounds();
        for p in field.particles() {
            assert!(p.x >= -FIELD_MARGIN && p.x <= w + FIELD_MARGIN, "x = {}", p.x);
            assert!(p.y >= -FIELD_MARGIN && p.y <= h, "y = {}", p.y);
        }
    }

    #[test]
    fn test_initial_fill_matches_capacity() {
        let field = ParticleField::with_seed(800.0, 600.0, 140, 1);
        assert_eq!(field.len(), 140);
        assert_in_bounds(&field);
    }

    #[test]
    fn test_bounds_hold_on_every_tick() {
        let mut field = ParticleField::with_seed(640.0, 480.0, 140, 7);
        field.burst(60);
        for _ in 0..5000 {
            field.tick();
            assert_in_bounds(&field);
        }
    }

    #[test]
    fn test_burst_adds_exactly_count_in_center_window() {
        let mut field = ParticleField::with_seed(1000.0, 800.0, 140, 3);
        field.burst(60);
        assert_eq!(field.len(), 200);
        for p in &field.particles()[140..] {
            assert!((p.x - 500.0).abs() <= BURST_SPREAD_X);
            assert!((p.y - 400.0).abs() <= BURST_SPREAD_Y);
        }
    }

    #[test]
    fn test_burst_into_short_field_stays_in_bounds() {
        let mut field = ParticleField::with_seed(800.0, 60.0, 0, 1);
        field.burst(60);
        for p in field.particles() {
            assert!(p.y >= 0.0 && p.y <= 60.0, "y = {}", p.y);
        }
        for _ in 0..500 {
            field.tick();
            assert_in_bounds(&field);
        }
    }

    #[test]
    fn test_burst_shards_fall_faster_and_are_smaller() {
        let mut field = ParticleField::with_seed(800.0, 600.0, 200, 13);
        field.burst(200);
        let (ambient, burst) = field.particles().split_at(200);
        let max_by = |ps: &[Particle], f: fn(&Particle) -> f32| ps.iter().map(f).fold(f32::MIN, f32::max);
        let min_by = |ps: &[Particle], f: fn(&Particle) -> f32| ps.iter().map(f).fold(f32::MAX, f32::min);

        assert!(min_by(burst, |p| p.vy) > max_by(ambient, |p| p.vy));
        assert!(max_by(burst, |p| p.radius) <= max_by(ambient, |p| p.radius));
        assert!(min_by(burst, |p| p.radius) < min_by(ambient, |p| p.radius));
        assert!(max_by(burst, |p| p.vx.abs()) > max_by(ambient, |p| p.vx.abs()));
    }

    #[test]
    fn test_burst_particles_are_never_pruned() {
        let mut field = ParticleField::with_seed(300.0, 200.0, 10, 11);
        field.burst(25);
        for _ in 0..2000 {
            field.tick();
        }
        assert_eq!(field.len(), 35);
    }

    #[test]
    fn test_side_exit_wraps_and_keeps_velocity() {
        let mut field = ParticleField::with_seed(100.0, 100.0, 1, 5);
        field.particles[0] = Particle { x: 104.0, y: 10.0, radius: 1.0, vy: 0.5, vx: 2.0, alpha: 0.5 };
        field.tick();
        let p = field.particles()[0];
        assert_eq!(p.x, -FIELD_MARGIN);
        assert_eq!(p.vx, 2.0);
        assert_eq!(p.y, 10.5);

        field.particles[0] = Particle { x: -4.0, y: 10.0, radius: 1.0, vy: 0.5, vx: -2.0, alpha: 0.5 };
        field.tick();
        assert_eq!(field.particles()[0].x, 100.0 + FIELD_MARGIN);
    }

    #[test]
    fn test_bottom_exit_recycles_at_top() {
        let mut field = ParticleField::with_seed(100.0, 100.0, 1, 9);
        field.particles[0] = Particle { x: 50.0, y: 99.5, radius: 1.0, vy: 1.0, vx: 0.0, alpha: 0.5 };
        field.tick();
        let p = field.particles()[0];
        assert_eq!(p.y, -FIELD_MARGIN);
        assert!(p.vy >= 0.3 && p.vy < 1.2);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = ParticleField::with_seed(800.0, 600.0, 140, 2);
        let before = field.particles().to_vec();
        field.resize(400.0, 300.0);
        assert_eq!(field.particles(), before.as_slice());
        assert_eq!(field.bounds(), (400.0, 300.0));
        field.tick();
        assert_in_bounds(&field);
    }

    #[test]
    fn test_seeded_fields_are_reproducible() {
        let a = ParticleField::with_seed(800.0, 600.0, 20, 42);
        let b = ParticleField::with_seed(800.0, 600.0, 20, 42);
        assert_eq!(a.particles(), b.particles());
    }
}
