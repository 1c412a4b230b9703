//! Course generation parameters
//!
//! Loaded once (defaults or JSON) and immutable for a generation run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MIN_SEGMENT_LENGTH, MIN_SEGMENT_WIDTH, MIN_THICKNESS};

/// Errors from reading a config file. Generation itself never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Opaque surface material handle, passed through to the geometry emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

/// Surface materials the generator may assign. Every slot is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPalette {
    /// Floor materials, cycled by segment index
    pub segments: Vec<MaterialId>,
    pub wall: Option<MaterialId>,
    pub finish: Option<MaterialId>,
    pub slime: Option<MaterialId>,
}

/// Course generation config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // === Course ===
    /// Number of segments between start and finish
    pub segment_count: u32,
    /// Nominal segment length before per-segment jitter
    pub base_segment_length: f32,
    /// Nominal segment width
    pub segment_width: f32,
    pub wall_height: f32,
    pub platform_thickness: f32,

    // === Difficulty ===
    pub start_difficulty: f32,
    pub max_difficulty: f32,
    /// Difficulty added per completed segment
    pub difficulty_ramp_per_segment: f32,

    // === Checkpoints ===
    /// Record a checkpoint after every N segments (0 disables)
    pub checkpoint_interval: u32,

    // === Visual ===
    pub materials: MaterialPalette,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            segment_count: 8,
            base_segment_length: 25.0,
            segment_width: 12.0,
            wall_height: 4.0,
            platform_thickness: 1.0,

            start_difficulty: 1.0,
            max_difficulty: 5.0,
            difficulty_ramp_per_segment: 0.5,

            checkpoint_interval: 3,

            materials: MaterialPalette::default(),
        }
    }
}

impl GenerationConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_segment_count(mut self, segment_count: u32) -> Self {
        self.segment_count = segment_count;
        self
    }

    pub fn with_difficulty(mut self, start: f32, max: f32, ramp_per_segment: f32) -> Self {
        self.start_difficulty = start;
        self.max_difficulty = max;
        self.difficulty_ramp_per_segment = ramp_per_segment;
        self
    }

    pub fn with_checkpoint_interval(mut self, interval: u32) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    pub fn with_materials(mut self, materials: MaterialPalette) -> Self {
        self.materials = materials;
        self
    }

    /// Copy with degenerate values clamped into a buildable range.
    ///
    /// Each substitution is logged; nothing here is an error.
    pub fn sanitized(&self) -> Self {
        let mut cfg = self.clone();

        cfg.base_segment_length = positive_or(
            "base_segment_length",
            cfg.base_segment_length,
            MIN_SEGMENT_LENGTH,
        );
        cfg.segment_width = positive_or("segment_width", cfg.segment_width, MIN_SEGMENT_WIDTH);
        cfg.platform_thickness =
            positive_or("platform_thickness", cfg.platform_thickness, MIN_THICKNESS);
        cfg.wall_height = positive_or("wall_height", cfg.wall_height, MIN_THICKNESS);

        if !cfg.start_difficulty.is_finite() {
            log::warn!(
                "start_difficulty {} is not finite, using 0",
                cfg.start_difficulty
            );
            cfg.start_difficulty = 0.0;
        }
        if !cfg.max_difficulty.is_finite() || cfg.max_difficulty < cfg.start_difficulty {
            log::warn!(
                "max_difficulty {} below start difficulty {}, raising it",
                cfg.max_difficulty,
                cfg.start_difficulty
            );
            cfg.max_difficulty = cfg.start_difficulty;
        }
        // Bridge narrowing divides by this
        cfg.max_difficulty = cfg.max_difficulty.max(f32::EPSILON);

        if !cfg.difficulty_ramp_per_segment.is_finite() || cfg.difficulty_ramp_per_segment < 0.0 {
            log::warn!(
                "difficulty_ramp_per_segment {} is invalid, using 0",
                cfg.difficulty_ramp_per_segment
            );
            cfg.difficulty_ramp_per_segment = 0.0;
        }

        if cfg.checkpoint_interval == 0 {
            log::warn!("checkpoint_interval is 0, intermediate checkpoints disabled");
        }

        cfg
    }
}

/// Keep any finite positive value; replace zero, negative or non-finite ones
fn positive_or(field: &str, value: f32, replacement: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{} = {} is degenerate, using {}", field, value, replacement);
        replacement
    }
}
