//! Hex star-sector generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod aggregate;
pub mod ascii;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod grid_export;
pub mod hexgrid;
pub mod map_export;
pub mod quantize;
pub mod rng;
pub mod sector;
pub mod tilemap;
pub mod trail;
pub mod traveller;

pub use config::SectorConfig;
pub use context::{GenerationContext, SectorSnapshot};
pub use error::{ConfigError, SectorError};
pub use rng::{LcgRng, RandomSource};
