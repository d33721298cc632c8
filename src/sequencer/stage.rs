use std::f32::consts::TAU;

use raylib::prelude::*;

use crate::engine::Layer;
use crate::sequencer::state::StateFlag;
use crate::sequencer::surface::Surface;
use crate::sequencer::{Sequencer, SurfaceId};
use crate::texture_loader::Asset;

const BREATH_PERIOD: f32 = 3.0;   // Seconds per breathing pulse
const BREATH_AMPLITUDE: f32 = 0.03;
const SHAKE_PIXELS: f32 = 6.0;
const BAND_HEIGHT: f32 = 0.22;    // Fraction of the viewport height used by the screens
const BAND_CENTER: f32 = 0.82;    // Vertical center of the band

/// Paints the two sequencer screens and the stage-wide overlay tints.
pub struct StageLayer {
    sequencer: Sequencer,
    textures: [Option<Texture2D>; 2],
    elapsed: f64,
    width: f32,
    height: f32,
}

impl StageLayer {
    pub fn new(sequencer: Sequencer, width: i32, height: i32) -> Self {
        Self {
            sequencer,
            textures: [None, None],
            elapsed: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn now_ms(&self) -> u64 {
        (self.elapsed * 1000.0) as u64
    }

    /// Registers both screens with the sequencer. A loaded image signals
    /// ready right away; a missing one never does, so the cycle stays idle.
    pub fn register(&mut self, a: Option<Asset>, b: Option<Asset>) {
        let now = self.now_ms();
        self.sequencer.register(now, false, false);
        for (id, asset) in [(SurfaceId::A, a), (SurfaceId::B, b)] {
            if let Some(asset) = asset {
                self.textures[id.index()] = Some(asset.texture);
                self.sequencer.signal_ready(id, now);
            }
        }
    }

    /// Fires due sequencer timers; bursts are forwarded to `on_burst`.
    pub fn fire_timers(&mut self, on_burst: impl FnMut(usize)) {
        let now = self.now_ms();
        self.sequencer.advance(now, on_burst);
    }

    /// Drops the screens. Timers still pending from the cycle become no-ops.
    pub fn teardown(&mut self) {
        self.sequencer.teardown();
        self.textures = [None, None];
    }

    fn draw_surface<D: RaylibDraw>(&self, d: &mut D, surface: &Surface, texture: Option<&Texture2D>, seconds: f32) {
        let opacity = surface.opacity_at(self.now_ms());
        if !surface.is_ready() || opacity <= 0.0 {
            return;
        }

        let mut scale = 1.0;
        if surface.has_flag(StateFlag::Breathing) {
            scale += BREATH_AMPLITUDE * (seconds * TAU / BREATH_PERIOD).sin();
        }
        let mut offset = Vector2::new(0.0, 0.0);
        if surface.has_flag(StateFlag::Shake) {
            offset = Vector2::new((seconds * 53.0).sin() * SHAKE_PIXELS, (seconds * 41.0).cos() * SHAKE_PIXELS * 0.6);
        }

        let band = self.height * BAND_HEIGHT * scale;
        let (tex_w, tex_h) = texture
            .map(|t| (t.width() as f32, t.height() as f32))
            .unwrap_or((1.0, 1.0));
        let aspect = if tex_h > 0.0 { tex_w / tex_h } else { 1.0 };
        let dest = Rectangle::new(
            self.width * 0.5 + offset.x,
            self.height * BAND_CENTER + offset.y,
            band * aspect,
            band,
        );
        let origin = Vector2::new(dest.width * 0.5, dest.height * 0.5);
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;

        match texture {
            Some(texture) => d.draw_texture_pro(
                texture,
                Rectangle::new(0.0, 0.0, tex_w, tex_h),
                dest,
                origin,
                0.0,
                Color::new(255, 255, 255, alpha),
            ),
            None => d.draw_rectangle_pro(dest, origin, 0.0, Color::new(90, 90, 110, alpha)),
        }
    }
}

impl Layer for StageLayer {
    fn update(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0) as f64;
    }

    fn draw<D: RaylibDraw>(&self, d: &mut D) {
        let seconds = self.elapsed as f32;
        if self.sequencer.has_stage_flag(StateFlag::Icy) {
            d.draw_rectangle(0, 0, self.width as i32, self.height as i32, Color::new(150, 200, 255, 24));
        }
        if self.sequencer.has_stage_flag(StateFlag::Exploding) {
            d.draw_rectangle(0, 0, self.width as i32, self.height as i32, Color::new(255, 255, 255, 28));
        }
        for id in [SurfaceId::A, SurfaceId::B] {
            if let Some(surface) = self.sequencer.surface(id) {
                self.draw_surface(d, surface, self.textures[id.index()].as_ref(), seconds);
            }
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.width = width as f32;
        self.height = height as f32;
    }
}
