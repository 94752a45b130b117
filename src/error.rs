//! Game-specific error types.
//!
//! Everything fallible happens at startup: reading the config file, loading
//! sprite assets, and sizing the display surface. Once the frame loop runs,
//! game logic is total and never returns these.

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for the space shooter.
#[derive(Debug)]
pub enum GameError {
    /// An asset file could not be read.
    AssetLoad {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying reason (I/O error text or a nested parse error).
        reason: String,
    },

    /// A sprite source contained a character outside the palette.
    InvalidSprite {
        line: usize,
        column: usize,
        found: char,
    },

    /// A sprite source had no pixels at all.
    EmptySprite,

    /// The config file could not be read or parsed.
    Config { reason: String },

    /// A config value is outside its accepted range.
    UnsafeSetting {
        /// Name of the setting (as spelled in the TOML file).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The terminal is too small to host the play field.
    SurfaceTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset '{}': {}", path.display(), reason)
            }
            GameError::InvalidSprite {
                line,
                column,
                found,
            } => write!(
                f,
                "unknown sprite pixel '{}' at line {}, column {}",
                found, line, column
            ),
            GameError::EmptySprite => write!(f, "sprite has no rows"),
            GameError::Config { reason } => write!(f, "invalid config: {}", reason),
            GameError::UnsafeSetting {
                name,
                value,
                expected,
            } => write!(
                f,
                "setting '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
            GameError::SurfaceTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "play field {}x{} px is too small (need at least {}x{} px)",
                width, height, min_width, min_height
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;
