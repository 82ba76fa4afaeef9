//! Normalization and quantization of raw intensities into display levels.
//!
//! Contrast is local by default: each subsector is stretched over its own
//! min/max so detail survives in large sectors.

use serde::{Deserialize, Serialize};

use crate::sector::SectorGrid;

pub const MIN_LEVELS: u8 = 2;
pub const MAX_LEVELS: u8 = 16;

/// Which cells share a normalization range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationScope {
    /// One range per subsector
    #[default]
    Subsector,
    /// One range for the whole sector
    Sector,
}

impl std::fmt::Display for NormalizationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subsector => write!(f, "subsector"),
            Self::Sector => write!(f, "sector"),
        }
    }
}

/// Closed range of raw intensities
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn of(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if min > max {
            Self { min: 0.0, max: 0.0 }
        } else {
            Self { min, max }
        }
    }

    /// Position of `val` within the range; 0 for a degenerate range.
    pub fn normalize(&self, val: f64) -> f64 {
        if self.max == self.min {
            0.0
        } else {
            (val - self.min) / (self.max - self.min)
        }
    }
}

/// Display-side settings: independent of the simulation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantizer {
    /// Number of discrete bands (2-16)
    pub levels: u8,
    /// Bias exponent divisor; > 1 brightens, < 1 darkens, 1 is linear
    pub saturate_factor: f64,
    /// Minimum `level + 1` for a cell to hold a world (1..=levels)
    pub presence_threshold: u8,
}

impl Quantizer {
    /// Build with `levels` and `presence_threshold` clamped into range.
    /// `saturate_factor` must already be validated as finite and > 0.
    pub fn new(levels: u8, saturate_factor: f64, presence_threshold: u8) -> Self {
        let levels = levels.clamp(MIN_LEVELS, MAX_LEVELS);
        Self {
            levels,
            saturate_factor,
            presence_threshold: presence_threshold.clamp(1, levels),
        }
    }

    /// Discrete level in `0..levels`.
    pub fn level(&self, val: f64, range: &Range) -> u8 {
        let mut norm = range.normalize(val);
        if self.saturate_factor != 1.0 {
            norm = norm.powf(1.0 / self.saturate_factor).clamp(0.0, 1.0);
        }
        let top = (self.levels - 1) as f64;
        let level = (norm * top).floor();
        if level.is_nan() {
            return 0;
        }
        level.clamp(0.0, top) as u8
    }

    pub fn is_present(&self, level: u8) -> bool {
        level as u16 + 1 >= self.presence_threshold as u16
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(8, 1.0, 6)
    }
}

/// One range per subsector (row-major), or a single sector-wide range.
pub fn normalization_ranges(grid: &SectorGrid, scope: NormalizationScope) -> Vec<Range> {
    match scope {
        NormalizationScope::Sector => vec![Range::of(&grid.intensities)],
        NormalizationScope::Subsector => grid
            .layout
            .subsectors()
            .map(|id| Range::of(&grid.subsector_values(id)))
            .collect(),
    }
}

/// Level for every cell of the sector, row-major.
pub fn quantize_sector(
    grid: &SectorGrid,
    quantizer: &Quantizer,
    scope: NormalizationScope,
) -> Vec<u8> {
    let layout = grid.layout;
    let ranges = normalization_ranges(grid, scope);
    let mut levels = vec![0u8; grid.intensities.len()];
    for (idx, &val) in grid.intensities.iter().enumerate() {
        let range = match scope {
            NormalizationScope::Sector => &ranges[0],
            NormalizationScope::Subsector => {
                let (col, row) = layout.cell_coords(idx);
                &ranges[layout.subsector_of(col, row).index(&layout)]
            }
        };
        levels[idx] = quantizer.level(val, range);
    }
    levels
}

/// Count of cells at each level.
pub fn level_histogram(levels: &[u8], n_levels: u8) -> Vec<usize> {
    let mut hist = vec![0usize; n_levels as usize];
    for &l in levels {
        if let Some(slot) = hist.get_mut(l as usize) {
            *slot += 1;
        }
    }
    hist
}
