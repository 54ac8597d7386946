// Game settings, variant presets and command-line parsing
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game::WallMode;

const MIN_GRID_SIZE: i32 = 4;
const MAX_GRID_SIZE: i32 = 100;
const MIN_TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size {0} is outside 4..=100")]
    GridSize(i32),
    #[error("tick interval of {0}ms is below the 10ms minimum")]
    TickInterval(u64),
    #[error("score per food must be at least 1")]
    ScorePerFood,
    #[error("speed ramp step must be positive, got {0}")]
    RampStep(f32),
    #[error("max speed {max} is below the starting speed {initial}")]
    MaxSpeed { max: f32, initial: f32 },
}

/// Tunables for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub grid_size: i32,
    pub tick_interval_ms: u64,
    pub score_per_food: u32,
    pub speed_ramp_enabled: bool,
    /// Ticks per second added for every food eaten.
    pub speed_ramp_step: f32,
    /// Ticks per second.
    pub max_speed: f32,
    pub wall_mode: WallMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Variant::Canvas.preset()
    }
}

impl GameConfig {
    /// Starting speed in ticks per second.
    pub fn initial_speed(&self) -> f32 {
        1000.0 / self.tick_interval_ms as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::TickInterval(self.tick_interval_ms));
        }
        if self.score_per_food == 0 {
            return Err(ConfigError::ScorePerFood);
        }
        if self.speed_ramp_enabled {
            if self.speed_ramp_step.is_nan() || self.speed_ramp_step <= 0.0 {
                return Err(ConfigError::RampStep(self.speed_ramp_step));
            }
            let initial = self.initial_speed();
            if self.max_speed < initial {
                return Err(ConfigError::MaxSpeed { max: self.max_speed, initial });
            }
        }
        Ok(())
    }
}

/// On-disk overrides. Every field may be omitted; missing ones keep the
/// variant preset.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub grid_size: Option<i32>,
    pub tick_interval_ms: Option<u64>,
    pub score_per_food: Option<u32>,
    pub speed_ramp_enabled: Option<bool>,
    pub speed_ramp_step: Option<f32>,
    pub max_speed: Option<f32>,
    pub wall_mode: Option<WallMode>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn apply(self, config: &mut GameConfig) {
        if let Some(v) = self.grid_size {
            config.grid_size = v;
        }
        if let Some(v) = self.tick_interval_ms {
            config.tick_interval_ms = v;
        }
        if let Some(v) = self.score_per_food {
            config.score_per_food = v;
        }
        if let Some(v) = self.speed_ramp_enabled {
            config.speed_ramp_enabled = v;
        }
        if let Some(v) = self.speed_ramp_step {
            config.speed_ramp_step = v;
        }
        if let Some(v) = self.max_speed {
            config.max_speed = v;
        }
        if let Some(v) = self.wall_mode {
            config.wall_mode = v;
        }
    }
}

/// The two ways of playing: which renderer draws the board, and the
/// scoring and pacing that go with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Filled rectangles on a lined board; speeds up as the snake eats.
    Canvas,
    /// Glyph tiles; fixed pace, bigger rewards.
    Tiles,
}

impl Variant {
    pub fn preset(self) -> GameConfig {
        match self {
            Variant::Canvas => GameConfig {
                grid_size: 20,
                tick_interval_ms: 125,
                score_per_food: 1,
                speed_ramp_enabled: true,
                speed_ramp_step: 0.5,
                max_speed: 20.0,
                wall_mode: WallMode::Wrap,
            },
            Variant::Tiles => GameConfig {
                grid_size: 20,
                tick_interval_ms: 150,
                score_per_food: 10,
                speed_ramp_enabled: false,
                speed_ramp_step: 0.5,
                max_speed: 20.0,
                wall_mode: WallMode::Solid,
            },
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Classic snake on a square grid")]
pub struct Args {
    /// Renderer and preset to play with
    #[arg(long, value_enum, default_value_t = Variant::Canvas)]
    pub variant: Variant,

    /// JSON file overriding the preset
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cells per side
    #[arg(long)]
    pub grid_size: Option<i32>,

    /// Starting milliseconds between moves
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Points for each food eaten
    #[arg(long)]
    pub score_per_food: Option<u32>,

    /// Speed up on every food eaten
    #[arg(long)]
    pub speed_ramp: Option<bool>,

    /// Start with wrap-around walls
    #[arg(long)]
    pub wrap: bool,

    /// Start with solid walls
    #[arg(long, conflicts_with = "wrap")]
    pub solid: bool,

    /// Where the high score is kept
    #[arg(long)]
    pub save_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long, conflicts_with = "save_file")]
    pub no_save: bool,
}

impl Args {
    /// Preset, then config file, then command-line flags.
    pub fn resolve(&self) -> Result<GameConfig> {
        let mut config = self.variant.preset();
        if let Some(path) = &self.config {
            ConfigFile::load(path)?.apply(&mut config);
            log::info!("Loaded config from {:?}", path);
        }

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(score) = self.score_per_food {
            config.score_per_food = score;
        }
        if let Some(ramp) = self.speed_ramp {
            config.speed_ramp_enabled = ramp;
        }
        if self.wrap {
            config.wall_mode = WallMode::Wrap;
        } else if self.solid {
            config.wall_mode = WallMode::Solid;
        }

        config.validate()?;
        Ok(config)
    }
}
