//! Command line and `logoloop.toml` configuration.
//!
//! Every file key has a default; a missing file means all defaults, a
//! malformed one is an error. Command line flags win over the file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::constants::*;
use crate::sequencer::SequenceTimings;

const DEFAULT_CONFIG_FILE: &str = "logoloop.toml";

#[derive(Parser, Debug, Default)]
#[command(version, about = "Looping 3D logo presentation with a snow overlay")]
pub struct Args {
    /// Configuration file (defaults to ./logoloop.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the layer and screen images
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<i32>,

    #[arg(long)]
    pub height: Option<i32>,

    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for the particle field
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render offline into this video file instead of opening a live window
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Number of logo loops to record
    #[arg(long, default_value_t = 1)]
    pub loops: u32,
}

// ── Resolved configuration ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub particles: ParticleConfig,
    pub sequence: SequenceTimings,
    pub seed: Option<u64>,
    pub record: Option<RecordConfig>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub primary: String,
    pub label: String,
    pub accent: String,
    pub aura: String,
    pub screen_a: String,
    pub screen_b: String,
}

impl AssetConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub ambient: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordConfig {
    pub output: PathBuf,
    pub loops: u32,
}

// ── TOML schema ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    window: TomlWindow,
    #[serde(default)]
    assets: TomlAssets,
    #[serde(default)]
    particles: TomlParticles,
    #[serde(default)]
    sequence: TomlSequence,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlWindow {
    width: i32,
    height: i32,
    fps: u32,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlAssets {
    dir: String,
    primary: String,
    label: String,
    accent: String,
    aura: String,
    screen_a: String,
    screen_b: String,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlParticles {
    ambient: usize,
    burst: usize,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlSequence {
    show_a_ms: u64,
    explode_ms: u64,
    show_b_ms: u64,
    pause_ms: u64,
    fade_ms: u64,
}

impl Default for TomlWindow {
    fn default() -> Self {
        TomlWindow { width: RENDER_WIDTH, height: RENDER_HEIGHT, fps: FPS }
    }
}

impl Default for TomlAssets {
    fn default() -> Self {
        TomlAssets {
            dir: "assets".into(),
            primary: "primary.png".into(),
            label: "label.png".into(),
            accent: "accent.png".into(),
            aura: "aura.png".into(),
            screen_a: "screen_a.png".into(),
            screen_b: "screen_b.png".into(),
        }
    }
}

impl Default for TomlParticles {
    fn default() -> Self {
        TomlParticles { ambient: AMBIENT_PARTICLES, burst: BURST_PARTICLES }
    }
}

impl Default for TomlSequence {
    fn default() -> Self {
        TomlSequence {
            show_a_ms: SHOW_A_MS,
            explode_ms: EXPLODE_MS,
            show_b_ms: SHOW_B_MS,
            pause_ms: PAUSE_MS,
            fade_ms: FADE_MS,
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Reads the config file named on the command line, or the default file
    /// when it exists, then applies the command line overrides.
    pub fn load(args: &Args) -> Result<Self> {
        let path = match &args.config {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        let Some(path) = path else {
            return Ok(Self::resolve(TomlConfig::default(), args));
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&text, args).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Parses a TOML document and applies the command line overrides.
    pub fn from_toml_str(text: &str, args: &Args) -> Result<Self> {
        let toml_cfg: TomlConfig = toml::from_str(text).context("Invalid configuration")?;
        Ok(Self::resolve(toml_cfg, args))
    }

    fn resolve(toml_cfg: TomlConfig, args: &Args) -> Self {
        let window = WindowConfig {
            width: args.width.unwrap_or(toml_cfg.window.width).max(1),
            height: args.height.unwrap_or(toml_cfg.window.height).max(1),
            fps: args.fps.unwrap_or(toml_cfg.window.fps).max(1),
        };

        let assets = AssetConfig {
            dir: args.assets.clone().unwrap_or_else(|| PathBuf::from(&toml_cfg.assets.dir)),
            primary: toml_cfg.assets.primary,
            label: toml_cfg.assets.label,
            accent: toml_cfg.assets.accent,
            aura: toml_cfg.assets.aura,
            screen_a: toml_cfg.assets.screen_a,
            screen_b: toml_cfg.assets.screen_b,
        };

        let sequence = SequenceTimings {
            show_a_ms: toml_cfg.sequence.show_a_ms,
            explode_ms: toml_cfg.sequence.explode_ms,
            show_b_ms: toml_cfg.sequence.show_b_ms,
            pause_ms: toml_cfg.sequence.pause_ms,
            fade_ms: toml_cfg.sequence.fade_ms,
            burst_count: toml_cfg.particles.burst,
        };

        let record = args.record.clone().map(|output| RecordConfig { output, loops: args.loops.max(1) });

        AppConfig {
            window,
            assets,
            particles: ParticleConfig { ambient: toml_cfg.particles.ambient },
            sequence,
            seed: args.seed,
            record,
        }
    }
}
