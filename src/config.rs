//! Sector configuration, validation, and share codes.
//!
//! A share code packs the seed and the knobs that affect output into one
//! `_`-separated string:
//!
//! `seed_levels_saturate_threshold_agents_iterations_scale_subSectorCols_subSectorRows`
//!
//! Older codes carried only `seed_levels` or `seed_levels_saturate_threshold`;
//! decoding fills the missing trailing fields with defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::quantize::{NormalizationScope, Quantizer, MAX_LEVELS, MIN_LEVELS};
use crate::sector::SectorLayout;
use crate::trail::{TrailParams, TrailPreset};

const SHARE_SEPARATOR: char = '_';
const SHARE_FIELDS_V1: usize = 2;
const SHARE_FIELDS_V2: usize = 4;
const SHARE_FIELDS_CURRENT: usize = 9;

/// Upper bound on agents per subsector run
pub const MAX_AGENTS: usize = 20_000;
/// Upper bound on iterations per subsector run
pub const MAX_ITERATIONS: usize = 5_000;

/// Everything the core needs for one generation pass and its redraws
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorConfig {
    pub seed: u32,
    pub agent_count: usize,
    pub iterations: usize,
    /// Number of display levels (2-16)
    pub levels: u8,
    /// Normalization bias; must be > 0
    pub saturate_factor: f64,
    /// Scales sensor distance, step size and rotation; must be > 0
    pub simulation_scale: f64,
    /// Minimum `level + 1` for a world (1..=levels)
    pub presence_threshold: u8,
    /// Hex cells per subsector
    pub sub_cols: usize,
    pub sub_rows: usize,
    /// Subsector grid shape
    pub sub_sector_cols: usize,
    pub sub_sector_rows: usize,
    pub normalization: NormalizationScope,
    pub generate_worlds: bool,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            agent_count: 300,
            iterations: 200,
            levels: 8,
            saturate_factor: 1.0,
            simulation_scale: 1.0,
            presence_threshold: 6,
            sub_cols: 8,
            sub_rows: 10,
            sub_sector_cols: 4,
            sub_sector_rows: 4,
            normalization: NormalizationScope::Subsector,
            generate_worlds: true,
        }
    }
}

impl SectorConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Take agent count, run length and scale from a trail preset.
    pub fn with_preset(self, preset: TrailPreset) -> Self {
        let params = TrailParams::from_preset(preset);
        Self {
            agent_count: params.agent_count,
            iterations: params.iterations,
            simulation_scale: params.simulation_scale,
            ..self
        }
    }

    /// Reject values that cannot be repaired by clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.saturate_factor.is_finite() && self.saturate_factor > 0.0) {
            return Err(ConfigError::SaturateFactor(self.saturate_factor));
        }
        if !(self.simulation_scale.is_finite() && self.simulation_scale > 0.0) {
            return Err(ConfigError::SimulationScale(self.simulation_scale));
        }
        for (name, value) in [
            ("sub_cols", self.sub_cols),
            ("sub_rows", self.sub_rows),
            ("sub_sector_cols", self.sub_sector_cols),
            ("sub_sector_rows", self.sub_sector_rows),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension { name, value });
            }
        }
        Ok(())
    }

    /// Copy with `levels` in [2,16], the threshold in [1,levels], and the run
    /// shape capped at [`MAX_AGENTS`] agents and [`MAX_ITERATIONS`] iterations.
    pub fn sanitized(&self) -> Self {
        let levels = self.levels.clamp(MIN_LEVELS, MAX_LEVELS);
        Self {
            levels,
            presence_threshold: self.presence_threshold.clamp(1, levels),
            agent_count: self.agent_count.min(MAX_AGENTS),
            iterations: self.iterations.min(MAX_ITERATIONS),
            ..self.clone()
        }
    }

    pub fn layout(&self) -> SectorLayout {
        SectorLayout {
            sub_cols: self.sub_cols,
            sub_rows: self.sub_rows,
            sub_sector_cols: self.sub_sector_cols,
            sub_sector_rows: self.sub_sector_rows,
        }
    }

    pub fn trail_params(&self) -> TrailParams {
        TrailParams {
            agent_count: self.agent_count,
            iterations: self.iterations,
            simulation_scale: self.simulation_scale,
            ..Default::default()
        }
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.levels, self.saturate_factor, self.presence_threshold)
    }

    /// Encode as a current-format share code.
    pub fn share_code(&self) -> String {
        [
            self.seed.to_string(),
            self.levels.to_string(),
            self.saturate_factor.to_string(),
            self.presence_threshold.to_string(),
            self.agent_count.to_string(),
            self.iterations.to_string(),
            self.simulation_scale.to_string(),
            self.sub_sector_cols.to_string(),
            self.sub_sector_rows.to_string(),
        ]
        .join(&SHARE_SEPARATOR.to_string())
    }

    /// Decode a share code of 2, 4 or 9 fields.
    ///
    /// Bad fields are repaired: a non-numeric seed becomes a random seed, other
    /// unparsable numbers take their defaults, and the result is sanitized.
    /// Values that are numeric but invalid (e.g. a zero saturate factor, or an
    /// agent count above [`MAX_AGENTS`]) are also replaced by defaults so a
    /// decoded config always validates.
    pub fn from_share_code(code: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = code.trim().split(SHARE_SEPARATOR).collect();
        match fields.len() {
            SHARE_FIELDS_V1 | SHARE_FIELDS_V2 | SHARE_FIELDS_CURRENT => {}
            n => return Err(ConfigError::ShareCode(n)),
        }

        let defaults = SectorConfig::default();
        let field = |i: usize| fields.get(i).map(|s| s.trim());

        let seed = match field(0).map(str::parse::<u32>) {
            Some(Ok(seed)) => seed,
            _ => {
                warn!(value = ?field(0), seed = defaults.seed, "unreadable seed, using random");
                defaults.seed
            }
        };

        let config = SectorConfig {
            seed,
            levels: parse_or(field(1), "levels", defaults.levels as i64, |v: &i64| *v >= 0)
                .min(u8::MAX as i64) as u8,
            saturate_factor: parse_or(field(2), "saturate", defaults.saturate_factor, |v: &f64| {
                v.is_finite() && *v > 0.0
            }),
            presence_threshold: parse_or(
                field(3),
                "threshold",
                defaults.presence_threshold as i64,
                |v: &i64| *v >= 0,
            )
            .min(u8::MAX as i64) as u8,
            agent_count: parse_or(field(4), "agents", defaults.agent_count, |v| {
                *v <= MAX_AGENTS
            }),
            iterations: parse_or(field(5), "iterations", defaults.iterations, |v| {
                *v <= MAX_ITERATIONS
            }),
            simulation_scale: parse_or(field(6), "scale", defaults.simulation_scale, |v: &f64| {
                v.is_finite() && *v > 0.0
            }),
            sub_sector_cols: parse_or(field(7), "sub_sector_cols", defaults.sub_sector_cols, |v| {
                *v > 0
            }),
            sub_sector_rows: parse_or(field(8), "sub_sector_rows", defaults.sub_sector_rows, |v| {
                *v > 0
            }),
            ..defaults
        };
        Ok(config.sanitized())
    }
}

fn parse_or<T>(raw: Option<&str>, name: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(s) => match s.parse::<T>() {
            Ok(v) if valid(&v) => v,
            _ => {
                warn!(field = name, value = s, default = ?default, "unreadable share-code field");
                default
            }
        },
    }
}

impl std::fmt::Display for SectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SectorConfig {{ seed: {}, agents: {}, iterations: {}, levels: {}, saturate: {}, \
             scale: {}, threshold: {}, subsector: {}x{}, sector: {}x{} subsectors, \
             normalization: {}, worlds: {} }}",
            self.seed,
            self.agent_count,
            self.iterations,
            self.levels,
            self.saturate_factor,
            self.simulation_scale,
            self.presence_threshold,
            self.sub_cols,
            self.sub_rows,
            self.sub_sector_cols,
            self.sub_sector_rows,
            self.normalization,
            self.generate_worlds,
        )
    }
}
