use raylib::prelude::*;

/// One independently animated part of the presentation. The frame loop
/// updates every layer, then draws them back to front on the same surface.
pub trait Layer {
    fn update(&mut self, dt: f32);
    fn draw<D: RaylibDraw>(&self, d: &mut D);
    /// Viewport change; must not reset animation state.
    fn resize(&mut self, width: i32, height: i32);
}
