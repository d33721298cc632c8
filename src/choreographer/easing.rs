use raylib::prelude::*;

/// Easing curves available to timeline phases.
///
/// Each variant maps onto one of raylib's Penner easing functions, evaluated
/// over a unit interval so the result is a reparameterized progress value.
/// `BackOut` overshoots past 1.0 before settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    SineInOut,
    QuadInOut,
    CubicOut,
    ExpoOut,
    BackOut,
}

impl Easing {
    fn curve(self) -> fn(f32, f32, f32, f32) -> f32 {
        match self {
            Easing::Linear    => ease::linear_none,
            Easing::SineInOut => ease::sine_in_out,
            Easing::QuadInOut => ease::quad_in_out,
            Easing::CubicOut  => ease::cubic_out,
            Easing::ExpoOut   => ease::expo_out,
            Easing::BackOut   => ease::back_out,
        }
    }

    /// Eased progress for linear progress `p`. Input is clamped to [0, 1] and
    /// the endpoints are exact so phases land on their literal end values.
    pub fn apply(self, p: f32) -> f32 {
        if !(p > 0.0) {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }
        (self.curve())(p, 0.0, 1.0, 1.0)
    }
}

/// Interpolates between `from` and `to`. `e` outside (0, 1) is allowed for
/// overshoot curves; the exact endpoints return the literal bounds.
pub fn lerp(from: f32, to: f32, e: f32) -> f32 {
    if e == 0.0 {
        from
    } else if e == 1.0 {
        to
    } else {
        from + (to - from) * e
    }
}
