//! Error types for sector generation, configuration, and export.

use thiserror::Error;

/// Rejected configuration values.
///
/// Recoverable problems (a malformed seed, an out-of-range level count) are
/// repaired during decoding and never reach this type; these are the values
/// that would poison the simulation with NaN or empty grids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("saturate factor must be a finite value > 0 (got {0})")]
    SaturateFactor(f64),

    #[error("simulation scale must be a finite value > 0 (got {0})")]
    SimulationScale(f64),

    #[error("{name} must be at least 1 (got {value})")]
    ZeroDimension { name: &'static str, value: usize },

    #[error("trail parameter `{name}` out of range: {value}")]
    TrailParam { name: &'static str, value: f64 },

    #[error("share code has {0} fields; expected 2, 4 or 9")]
    ShareCode(usize),
}

/// Top-level error for generation and export.
#[derive(Debug, Error)]
pub enum SectorError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SectorError>;
