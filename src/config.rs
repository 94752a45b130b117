//! Runtime gameplay configuration.
//!
//! [`GameConfig`] mirrors every tuning constant below. [`GameConfig::load`]
//! reads a TOML file and overwrites the defaults with any values present, so a
//! minimal file can override just the settings you care about.
//!
//! All distances are in surface pixels (one terminal cell is one pixel wide
//! and two pixels tall), all durations in milliseconds and all rates per
//! second.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GameError, GameResult};

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const FRAME_RATE: u32 = 30;
pub const STAR_COUNT: usize = 20;

pub const PLAYER_SPEED: f32 = 45.0;
pub const SHOOT_COOLDOWN_MS: u64 = 400;
pub const LASER_SPEED: f32 = 90.0;

pub const METEOR_SPAWN_INTERVAL_MS: u64 = 500;
pub const METEOR_CAP: usize = 12;
pub const METEOR_LIFETIME_MS: u64 = 3000;
pub const METEOR_SPEED_MIN: f32 = 25.0;
pub const METEOR_SPEED_MAX: f32 = 35.0;
pub const METEOR_ROTATION_SPEED_MIN: f32 = 40.0;
pub const METEOR_ROTATION_SPEED_MAX: f32 = 80.0;
/// Largest horizontal component of a freshly spawned meteor's direction,
/// before normalization (the vertical component is always 1).
pub const METEOR_DRIFT: f32 = 0.5;

pub const ROTATION_STEP_DEG: f32 = 5.0;
pub const EXPLOSION_FRAME_RATE: f32 = 20.0;
pub const BELL_THRESHOLD: f32 = 0.5;

pub const SCORE_DIVISOR_MS: u64 = 100;
pub const WIN_SCORE: u32 = 300;

pub const WIN_APPROACH_SPEED: f32 = 30.0;
pub const WIN_CENTER_EPSILON: f32 = 0.5;
pub const WIN_BOOST_SPEED: f32 = 60.0;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the matching constant in this module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // ── Frame loop ────────────────────────────────────────────────────────────
    pub frame_rate: u32,
    pub star_count: usize,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub shoot_cooldown_ms: u64,
    pub laser_speed: f32,

    // ── Meteors ───────────────────────────────────────────────────────────────
    pub meteor_spawn_interval_ms: u64,
    pub meteor_cap: usize,
    pub meteor_lifetime_ms: u64,
    pub meteor_speed_min: f32,
    pub meteor_speed_max: f32,
    pub meteor_rotation_speed_min: f32,
    pub meteor_rotation_speed_max: f32,
    pub meteor_drift: f32,
    pub rotation_step_deg: f32,

    // ── Effects ───────────────────────────────────────────────────────────────
    pub explosion_frame_rate: f32,
    pub sound: bool,
    /// Quietest effect volume that still rings the bell.
    pub bell_threshold: f32,

    // ── Scoring ───────────────────────────────────────────────────────────────
    pub score_divisor_ms: u64,
    pub win_score: u32,

    // ── Win animation ─────────────────────────────────────────────────────────
    pub win_approach_speed: f32,
    pub win_center_epsilon: f32,
    pub win_boost_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            star_count: STAR_COUNT,
            player_speed: PLAYER_SPEED,
            shoot_cooldown_ms: SHOOT_COOLDOWN_MS,
            laser_speed: LASER_SPEED,
            meteor_spawn_interval_ms: METEOR_SPAWN_INTERVAL_MS,
            meteor_cap: METEOR_CAP,
            meteor_lifetime_ms: METEOR_LIFETIME_MS,
            meteor_speed_min: METEOR_SPEED_MIN,
            meteor_speed_max: METEOR_SPEED_MAX,
            meteor_rotation_speed_min: METEOR_ROTATION_SPEED_MIN,
            meteor_rotation_speed_max: METEOR_ROTATION_SPEED_MAX,
            meteor_drift: METEOR_DRIFT,
            rotation_step_deg: ROTATION_STEP_DEG,
            explosion_frame_rate: EXPLOSION_FRAME_RATE,
            sound: true,
            bell_threshold: BELL_THRESHOLD,
            score_divisor_ms: SCORE_DIVISOR_MS,
            win_score: WIN_SCORE,
            win_approach_speed: WIN_APPROACH_SPEED,
            win_center_epsilon: WIN_CENTER_EPSILON,
            win_boost_speed: WIN_BOOST_SPEED,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> GameResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            reason: format!("cannot read '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml(text: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(text).map_err(|e| GameError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the frame loop cannot run with.
    pub fn validate(&self) -> GameResult<()> {
        positive("frame_rate", self.frame_rate as f64)?;
        positive("player_speed", self.player_speed as f64)?;
        positive("laser_speed", self.laser_speed as f64)?;
        positive("meteor_spawn_interval_ms", self.meteor_spawn_interval_ms as f64)?;
        positive("meteor_lifetime_ms", self.meteor_lifetime_ms as f64)?;
        positive("meteor_speed_min", self.meteor_speed_min as f64)?;
        positive("explosion_frame_rate", self.explosion_frame_rate as f64)?;
        positive("score_divisor_ms", self.score_divisor_ms as f64)?;
        positive("win_approach_speed", self.win_approach_speed as f64)?;
        positive("win_center_epsilon", self.win_center_epsilon as f64)?;
        positive("win_boost_speed", self.win_boost_speed as f64)?;

        range(
            ("meteor_speed_min", self.meteor_speed_min),
            ("meteor_speed_max", self.meteor_speed_max),
            "[meteor_speed_min, ∞)",
        )?;
        range(
            ("meteor_rotation_speed_min", self.meteor_rotation_speed_min),
            ("meteor_rotation_speed_max", self.meteor_rotation_speed_max),
            "[meteor_rotation_speed_min, ∞)",
        )?;
        if !(0.0..=1.0).contains(&self.meteor_drift) {
            return Err(GameError::UnsafeSetting {
                name: "meteor_drift",
                value: self.meteor_drift as f64,
                expected: "[0.0, 1.0]",
            });
        }
        if !(0.0..=1.0).contains(&self.bell_threshold) {
            return Err(GameError::UnsafeSetting {
                name: "bell_threshold",
                value: self.bell_threshold as f64,
                expected: "[0.0, 1.0]",
            });
        }

        let step = self.rotation_step_deg;
        let buckets = 360.0 / step;
        if !(step > 0.0 && step <= 360.0) || (buckets - buckets.round()).abs() > 1e-4 {
            return Err(GameError::UnsafeSetting {
                name: "rotation_step_deg",
                value: step as f64,
                expected: "(0, 360] and dividing 360",
            });
        }
        Ok(())
    }

    /// Frame budget implied by `frame_rate`.
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}

fn positive(name: &'static str, value: f64) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeSetting {
            name,
            value,
            expected: "(0, ∞)",
        })
    }
}

/// Both ends finite, `min <= max`, and a span `rand` can sample.
fn range(
    (min_name, min): (&'static str, f32),
    (max_name, max): (&'static str, f32),
    expected: &'static str,
) -> GameResult<()> {
    if !min.is_finite() {
        return Err(GameError::UnsafeSetting {
            name: min_name,
            value: min as f64,
            expected: "a finite number",
        });
    }
    let span = max - min;
    if max.is_finite() && span.is_finite() && span >= 0.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeSetting {
            name: max_name,
            value: max as f64,
            expected,
        })
    }
}
