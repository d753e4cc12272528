//! Scoring module - line-clear rewards, level curve and gravity speed curve
//!
//! All numbers come from a [`Tuning`] value so they can be swapped without touching
//! the grid. The only structural requirements are checked by [`Tuning::validate`]:
//! rewards strictly increase with rows cleared, levels are a non-decreasing function of
//! cleared lines, and gravity never slows down as the level rises.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, HARD_DROP_POINTS, INITIAL_LEVEL, LINES_PER_LEVEL,
    LINE_SCORES, SOFT_DROP_POINTS,
};

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Base reward for clearing 0..=4 rows at once, multiplied by the level
    pub line_scores: [u32; 5],
    /// Cleared lines per level step
    pub lines_per_level: u32,
    /// Level at the start of each session (1-based)
    pub initial_level: u32,
    /// Gravity interval per level in ms; index 0 is level 1
    pub gravity_ms: Vec<u32>,
    /// Gravity interval once the level runs past `gravity_ms`
    pub gravity_floor_ms: u32,
    pub soft_drop_points: u32,
    pub hard_drop_points: u32,
    /// Allow only one hold per spawned piece
    pub hold_once_per_piece: bool,
    /// Try SRS wall kicks when a rotation collides
    pub wall_kicks: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            line_scores: LINE_SCORES,
            lines_per_level: LINES_PER_LEVEL,
            initial_level: INITIAL_LEVEL,
            gravity_ms: DROP_INTERVALS.to_vec(),
            gravity_floor_ms: DROP_INTERVAL_FLOOR_MS,
            soft_drop_points: SOFT_DROP_POINTS,
            hard_drop_points: HARD_DROP_POINTS,
            hold_once_per_piece: true,
            wall_kicks: true,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.line_scores.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::LineScoresNotIncreasing(self.line_scores));
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if self.initial_level == 0 {
            return Err(ConfigError::ZeroLevel);
        }

        let mut curve = self.gravity_ms.clone();
        curve.push(self.gravity_floor_ms);
        if curve.iter().any(|&ms| ms == 0) || !curve.windows(2).all(|w| w[0] >= w[1]) {
            return Err(ConfigError::GravityCurve(curve));
        }

        Ok(())
    }

    /// Reward for clearing `lines` rows at once at `level`
    pub fn line_clear_score(&self, lines: usize, level: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        let base = self.line_scores[lines.min(self.line_scores.len() - 1)];
        base.saturating_mul(level.max(1))
    }

    /// Level reached after `total_lines` cleared lines
    pub fn level_for_lines(&self, total_lines: u32) -> u32 {
        self.initial_level + total_lines / self.lines_per_level.max(1)
    }

    /// Gravity interval at `level`, in milliseconds
    pub fn gravity_interval_ms(&self, level: u32) -> u32 {
        let idx = level.saturating_sub(1) as usize;
        self.gravity_ms
            .get(idx)
            .copied()
            .unwrap_or(self.gravity_floor_ms)
    }

    /// Bonus for dropping `rows` rows
    pub fn drop_score(&self, rows: u32, hard: bool) -> u32 {
        let per_row = if hard {
            self.hard_drop_points
        } else {
            self.soft_drop_points
        };
        rows.saturating_mul(per_row)
    }
}
