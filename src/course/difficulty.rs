//! Difficulty curve
//!
//! Difficulty is a pure function of segment index. The assembler advances it
//! only after a segment is fully built, so segment `i` sees the value computed
//! for index `i - 1` (segment 0 sees the start difficulty).

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

/// Linear clamped ramp from start to max difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    pub start: f32,
    pub max: f32,
    pub ramp_per_segment: f32,
}

impl DifficultyCurve {
    pub fn new(start: f32, max: f32, ramp_per_segment: f32) -> Self {
        Self {
            start,
            max: max.max(start),
            ramp_per_segment,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.start_difficulty,
            config.max_difficulty,
            config.difficulty_ramp_per_segment,
        )
    }

    /// Difficulty after completing segment `index`
    pub fn at(&self, index: u32) -> f32 {
        (self.start + index as f32 * self.ramp_per_segment).clamp(self.start, self.max)
    }
}

/// Difficulty band used to pick a segment probability table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// d < 2
    Low,
    /// 2 <= d < 4
    Mid,
    /// d >= 4
    High,
}

impl DifficultyTier {
    pub fn of(difficulty: f32) -> Self {
        if difficulty < 2.0 {
            DifficultyTier::Low
        } else if difficulty < 4.0 {
            DifficultyTier::Mid
        } else {
            DifficultyTier::High
        }
    }
}
