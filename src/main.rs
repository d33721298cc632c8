use anyhow::{anyhow, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use raylib::prelude::*;

mod choreographer;
mod config;
mod constants;
mod engine;
mod ffmpeg;
mod particles;
mod sequencer;
mod texture_loader;

use crate::choreographer::camera::Viewport;
use crate::choreographer::layer::LogoLayer;
use crate::config::{AppConfig, Args};
use crate::engine::Layer;
use crate::ffmpeg::Ffmpeg;
use crate::particles::field::ParticleField;
use crate::particles::SnowLayer;
use crate::sequencer::stage::StageLayer;
use crate::sequencer::Sequencer;
use crate::texture_loader::load_asset;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = AppConfig::load(args)?;
    let (width, height, fps) = (cfg.window.width, cfg.window.height, cfg.window.fps);
    info!(
        "window {}x{} @ {} fps, assets in {:?}, {} ambient particles",
        width, height, fps, cfg.assets.dir, cfg.particles.ambient
    );

    let mut builder = raylib::init();
    builder.size(width, height).title("Logo Loop").vsync();
    if cfg.record.is_none() {
        builder.resizable();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Logo scene ---
    let mut logo = LogoLayer::new(Viewport::new(width, height));
    let nodes = *logo.choreographer().nodes();
    for (node, file) in [
        (nodes.primary, &cfg.assets.primary),
        (nodes.label, &cfg.assets.label),
        (nodes.accent, &cfg.assets.accent),
        (nodes.aura, &cfg.assets.aura),
    ] {
        let asset = load_asset(&mut rl, &thread, &cfg.assets.path(file));
        logo.attach(node, asset);
    }

    // --- Snow overlay ---
    let field = match cfg.seed {
        Some(seed) => ParticleField::with_seed(width as f32, height as f32, cfg.particles.ambient, seed),
        None => ParticleField::new(width as f32, height as f32, cfg.particles.ambient),
    };
    let mut snow = SnowLayer::new(field);

    // --- Cross-fading screens ---
    let mut stage = StageLayer::new(Sequencer::new(cfg.sequence), width, height);
    let screen_a = load_asset(&mut rl, &thread, &cfg.assets.path(&cfg.assets.screen_a));
    let screen_b = load_asset(&mut rl, &thread, &cfg.assets.path(&cfg.assets.screen_b));
    if screen_a.is_none() || screen_b.is_none() {
        warn!("a screen image is missing, the cross-fade sequence stays idle");
    }
    stage.register(screen_a, screen_b);

    match &cfg.record {
        Some(record) => {
            let loop_length = logo.choreographer().timeline().loop_length();
            let total_frames = (record.loops as f32 * loop_length * fps as f32).ceil() as u64;
            let mut ffmpeg = Ffmpeg::new(width, height, fps, &record.output)?;
            let mut framebuffer = rl
                .load_render_texture(&thread, width as u32, height as u32)
                .map_err(|e| anyhow!("Failed to create render texture: {}", e))?;
            let dt = 1.0 / fps as f32;

            while ffmpeg.frames() < total_frames && !rl.window_should_close() {
                step(&mut logo, &mut snow, &mut stage, dt);

                rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
                    let mut d = tmd.begin_drawing(&thread);
                    draw_layers(&mut d, &logo, &stage, &snow);
                });

                // Feedback copy of the framebuffer, flipped back upright.
                let mut d = rl.begin_drawing(&thread);
                let sw = d.get_screen_width() as f32;
                let sh = d.get_screen_height() as f32;
                d.draw_texture_pro(
                    &framebuffer,
                    Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
                    Rectangle::new(0.0, 0.0, sw, sh),
                    Vector2::new(0.0, 0.0),
                    0.0,
                    Color::WHITE,
                );
                drop(d);

                let image = framebuffer
                    .load_image()
                    .map_err(|e| anyhow!("Failed to read back framebuffer: {}", e))?;
                ffmpeg.write(&image)?;
            }
        }
        None => {
            let mut paused = false;
            while !rl.window_should_close() {
                if rl.is_window_resized() {
                    let (w, h) = (rl.get_screen_width(), rl.get_screen_height());
                    debug!("window resized to {}x{}", w, h);
                    logo.resize(w, h);
                    snow.resize(w, h);
                    stage.resize(w, h);
                }
                if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
                    paused = !paused;
                    let t = logo.choreographer().clock();
                    info!("{} at t={:.2}s", if paused { "paused" } else { "resumed" }, t);
                }

                let dt = rl.get_frame_time();
                if paused {
                    stage.update(dt);
                    stage.fire_timers(|n| snow.burst(n));
                } else {
                    step(&mut logo, &mut snow, &mut stage, dt);
                }

                let mut d = rl.begin_drawing(&thread);
                draw_layers(&mut d, &logo, &stage, &snow);
            }
        }
    }

    info!(
        "stopping: sequence {:?} (started {} time(s)), {} particles",
        stage.sequencer().state(),
        stage.sequencer().starts(),
        snow.field().len()
    );
    stage.teardown();
    Ok(())
}

/// One frame of simulation for every layer. Sequencer timers fire after the
/// clocks move so a burst lands on the frame its transition is due.
fn step(logo: &mut LogoLayer, snow: &mut SnowLayer, stage: &mut StageLayer, dt: f32) {
    logo.update(dt);
    snow.update(dt);
    stage.update(dt);
    stage.fire_timers(|n| snow.burst(n));
}

fn draw_layers<D: RaylibDraw>(d: &mut D, logo: &LogoLayer, stage: &StageLayer, snow: &SnowLayer) {
    d.clear_background(Color::BLACK);
    logo.draw(d);
    stage.draw(d);
    snow.draw(d);
}
