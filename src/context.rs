//! Generation context: the only owner of mutable state across passes.
//!
//! Call order on the shared random stream (part of the reproducibility
//! contract):
//! 1. `regenerate` seeds the LCG with the config seed and runs every
//!    subsector simulation in row-major subsector order
//! 2. each `snapshot` then rolls worlds for newly present cells, in row-major
//!    cell order, continuing the same stream
//!
//! The intensity grid and the world cache are replaced together inside one
//! `&mut self` call, so any snapshot sees one complete generation.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::SectorConfig;
use crate::error::ConfigError;
use crate::quantize::{quantize_sector, NormalizationScope, Quantizer};
use crate::rng::LcgRng;
use crate::sector::{compose_sector, CompositionStats, SectorGrid, SectorLayout};
use crate::traveller::{generate_world, WorldRecord};

/// Monotonic id of a composed sector; bumped on every regeneration
pub type GenerationId = u64;

/// Lazily rolled worlds, keyed by the generation they belong to
#[derive(Debug, Default, Clone)]
pub struct WorldCache {
    worlds: HashMap<(GenerationId, usize), WorldRecord>,
}

impl WorldCache {
    pub fn get(&self, generation: GenerationId, cell: usize) -> Option<&WorldRecord> {
        self.worlds.get(&(generation, cell))
    }

    pub fn insert(&mut self, generation: GenerationId, cell: usize, world: WorldRecord) {
        self.worlds.insert((generation, cell), world);
    }

    pub fn contains(&self, generation: GenerationId, cell: usize) -> bool {
        self.worlds.contains_key(&(generation, cell))
    }

    /// Drop every entry not belonging to `generation`.
    pub fn retain_generation(&mut self, generation: GenerationId) {
        self.worlds.retain(|&(g, _), _| g == generation);
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

/// What a renderer needs for one cell
#[derive(Clone, Debug, PartialEq)]
pub struct CellView {
    pub col: usize,
    pub row: usize,
    pub level: u8,
    pub present: bool,
    pub world: Option<WorldRecord>,
}

/// A consistent, owned view of one generation under one display setting
#[derive(Clone, Debug)]
pub struct SectorSnapshot {
    pub generation: GenerationId,
    pub layout: SectorLayout,
    pub levels: u8,
    pub seed: u32,
    pub share_code: String,
    pub cells: Vec<CellView>,
}

impl SectorSnapshot {
    pub fn cell(&self, col: usize, row: usize) -> &CellView {
        &self.cells[self.layout.cell_index(col, row)]
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.present).count()
    }

    pub fn worlds(&self) -> impl Iterator<Item = (&CellView, &WorldRecord)> {
        self.cells
            .iter()
            .filter_map(|c| c.world.as_ref().map(|w| (c, w)))
    }
}

pub struct GenerationContext {
    config: SectorConfig,
    rng: LcgRng,
    grid: SectorGrid,
    stats: CompositionStats,
    generation: GenerationId,
    worlds: WorldCache,
}

impl GenerationContext {
    /// Validate, seed, and run the first pass.
    pub fn new(config: SectorConfig) -> Result<Self, ConfigError> {
        let config = config.sanitized();
        config.validate()?;
        config.trail_params().validate()?;
        let mut ctx = Self {
            rng: LcgRng::new(config.seed),
            grid: SectorGrid::zeroed(config.layout()),
            stats: CompositionStats::default(),
            generation: 0,
            worlds: WorldCache::default(),
            config,
        };
        ctx.regenerate();
        Ok(ctx)
    }

    /// Re-run the full pass from the configured seed.
    pub fn regenerate(&mut self) -> GenerationId {
        self.rng.set_seed(self.config.seed);
        let (grid, stats) = compose_sector(
            &self.config.layout(),
            &self.config.trail_params(),
            &mut self.rng,
        );
        self.generation += 1;
        self.grid = grid;
        self.stats = stats;
        self.worlds.retain_generation(self.generation);
        info!(generation = self.generation, seed = self.config.seed, "sector regenerated");
        self.generation
    }

    pub fn regenerate_with_seed(&mut self, seed: u32) -> GenerationId {
        self.config.seed = seed;
        self.regenerate()
    }

    /// Change display settings only; the intensity grid is untouched.
    pub fn set_display(
        &mut self,
        levels: u8,
        saturate_factor: f64,
        presence_threshold: u8,
    ) -> Result<(), ConfigError> {
        let candidate = SectorConfig {
            levels,
            saturate_factor,
            presence_threshold,
            ..self.config.clone()
        }
        .sanitized();
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    pub fn set_normalization(&mut self, scope: NormalizationScope) {
        self.config.normalization = scope;
    }

    pub fn set_generate_worlds(&mut self, enabled: bool) {
        self.config.generate_worlds = enabled;
    }

    pub fn config(&self) -> &SectorConfig {
        &self.config
    }

    pub fn grid(&self) -> &SectorGrid {
        &self.grid
    }

    pub fn stats(&self) -> &CompositionStats {
        &self.stats
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn world_cache(&self) -> &WorldCache {
        &self.worlds
    }

    pub fn quantizer(&self) -> Quantizer {
        self.config.quantizer()
    }

    /// Levels for the current grid and display settings. Pure; no draws.
    pub fn levels(&self) -> Vec<u8> {
        quantize_sector(&self.grid, &self.quantizer(), self.config.normalization)
    }

    /// Quantize and attach worlds, rolling any missing ones in row-major order.
    pub fn snapshot(&mut self) -> SectorSnapshot {
        let quantizer = self.quantizer();
        let levels = self.levels();
        let layout = self.grid.layout;
        let generation = self.generation;

        let mut rolled = 0usize;
        let cells = levels
            .iter()
            .enumerate()
            .map(|(idx, &level)| {
                let (col, row) = layout.cell_coords(idx);
                let present = quantizer.is_present(level);
                let world = if present && self.config.generate_worlds {
                    if !self.worlds.contains(generation, idx) {
                        self.worlds.insert(generation, idx, generate_world(&mut self.rng));
                        rolled += 1;
                    }
                    self.worlds.get(generation, idx).cloned()
                } else {
                    None
                };
                CellView { col, row, level, present, world }
            })
            .collect();

        if rolled > 0 {
            debug!(generation, rolled, cached = self.worlds.len(), "rolled new worlds");
        }

        SectorSnapshot {
            generation,
            layout,
            levels: quantizer.levels,
            seed: self.config.seed,
            share_code: self.config.share_code(),
            cells,
        }
    }
}
