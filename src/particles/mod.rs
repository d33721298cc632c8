pub mod field;
pub mod particle;

use raylib::prelude::*;

use crate::engine::Layer;
use crate::particles::field::ParticleField;

/// Draws the particle field as filled circles. Ticks once per frame.
pub struct SnowLayer {
    field: ParticleField,
}

impl SnowLayer {
    pub fn new(field: ParticleField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn burst(&mut self, count: usize) {
        self.field.burst(count);
    }
}

impl Layer for SnowLayer {
    fn update(&mut self, _dt: f32) {
        self.field.tick();
    }

    fn draw<D: RaylibDraw>(&self, d: &mut D) {
        for p in self.field.particles() {
            let alpha = (p.alpha.clamp(0.0, 1.0) * 255.0) as u8;
            d.draw_circle_v(Vector2::new(p.x, p.y), p.radius, Color::new(255, 255, 255, alpha));
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.field.resize(width as f32, height as f32);
    }
}
