pub const RENDER_WIDTH: i32 = 1280;           // Default window width
pub const RENDER_HEIGHT: i32 = 720;           // Default window height
pub const FPS: u32 = 60;                      // Frames per second

pub const LOOP_LENGTH: f32 = 6.8;             // Logo timeline loop length (seconds)
pub const CAMERA_FOVY: f32 = 45.0;            // Vertical field of view (degrees)
pub const LAYER_WORLD_HEIGHT: f32 = 2.0;      // Height of a unit-scale layer quad in world units

pub const AMBIENT_PARTICLES: usize = 140;     // Snow pool size
pub const BURST_PARTICLES: usize = 60;        // Particles injected on the exploding transition
pub const FIELD_MARGIN: f32 = 5.0;            // Wrap margin around the particle field (pixels)

pub const SHOW_A_MS: u64 = 4500;              // Logo screen dwell
pub const EXPLODE_MS: u64 = 900;              // Shake/burst dwell
pub const SHOW_B_MS: u64 = 5000;              // Alternate screen dwell
pub const PAUSE_MS: u64 = 1000;               // Fade-out dwell before restarting
pub const FADE_MS: u64 = 600;                 // Surface opacity transition
