//! JSON export of sector snapshots

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SectorConfig;
use crate::context::{GenerationId, SectorSnapshot};
use crate::error::Result;
use crate::hexgrid::hex_label;
use crate::sector::{SectorGrid, SectorLayout};
use crate::traveller::WorldRecord;

/// One hex in the exported document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexRecord {
    pub hex: String,
    pub col: usize,
    pub row: usize,
    pub subsector: char,
    pub level: u8,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uwp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub world: Option<WorldRecord>,
}

/// A self-describing sector export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorDocument {
    pub seed: u32,
    pub share_code: String,
    pub generation: GenerationId,
    pub layout: SectorLayout,
    pub levels: u8,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub config: Option<SectorConfig>,
    /// Raw per-hex intensities, row-major, when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub intensities: Option<Vec<f64>>,
    pub hexes: Vec<HexRecord>,
}

impl SectorDocument {
    pub fn from_snapshot(snapshot: &SectorSnapshot) -> Self {
        let layout = snapshot.layout;
        let hexes = snapshot
            .cells
            .iter()
            .map(|cell| HexRecord {
                hex: hex_label(cell.col, cell.row),
                col: cell.col,
                row: cell.row,
                subsector: layout.subsector_of(cell.col, cell.row).letter(&layout),
                level: cell.level,
                present: cell.present,
                uwp: cell.world.as_ref().map(WorldRecord::uwp),
                world: cell.world.clone(),
            })
            .collect();

        Self {
            seed: snapshot.seed,
            share_code: snapshot.share_code.clone(),
            generation: snapshot.generation,
            layout,
            levels: snapshot.levels,
            config: None,
            intensities: None,
            hexes,
        }
    }

    pub fn with_config(mut self, config: &SectorConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    pub fn with_intensities(mut self, grid: &SectorGrid) -> Self {
        self.intensities = Some(grid.intensities.clone());
        self
    }

    pub fn world_count(&self) -> usize {
        self.hexes.iter().filter(|h| h.world.is_some()).count()
    }
}

/// Write a document as pretty-printed JSON.
pub fn export_sector_json(document: &SectorDocument, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a document written by [`export_sector_json`].
pub fn load_sector_json(path: impl AsRef<Path>) -> Result<SectorDocument> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationContext;

    fn context() -> GenerationContext {
        let config = SectorConfig {
            agent_count: 25,
            iterations: 15,
            sub_cols: 3,
            sub_rows: 4,
            sub_sector_cols: 2,
            sub_sector_rows: 2,
            ..SectorConfig::with_seed(31337)
        };
        GenerationContext::new(config).unwrap()
    }

    #[test]
    fn test_document_covers_every_hex() {
        let mut ctx = context();
        let snap = ctx.snapshot();
        let doc = SectorDocument::from_snapshot(&snap);
        assert_eq!(doc.hexes.len(), snap.layout.cell_count());
        assert_eq!(doc.hexes[0].hex, "0101");
        assert_eq!(doc.hexes[0].subsector, 'A');
        assert_eq!(doc.hexes.last().map(|h| h.subsector), Some('D'));
        assert_eq!(doc.world_count(), snap.worlds().count());
        for h in doc.hexes.iter().filter(|h| h.world.is_some()) {
            assert!(h.present);
            assert_eq!(h.uwp.as_deref().map(str::len), Some(9));
        }
    }

    #[test]
    fn test_empty_hexes_omit_world_fields() {
        let mut ctx = context();
        let snap = ctx.snapshot();
        let doc = SectorDocument::from_snapshot(&snap);
        let json = serde_json::to_value(&doc).unwrap();
        let hexes = json["hexes"].as_array().unwrap();
        for (h, v) in doc.hexes.iter().zip(hexes) {
            assert_eq!(v.get("world").is_some(), h.world.is_some());
        }
        assert!(json.get("intensities").is_none());
    }

    #[test]
    fn test_file_roundtrip() {
        let mut ctx = context();
        let snap = ctx.snapshot();
        let doc = SectorDocument::from_snapshot(&snap)
            .with_config(ctx.config())
            .with_intensities(ctx.grid());
        let path = std::env::temp_dir()
            .join(format!("sector_json_test_{}.json", std::process::id()));
        export_sector_json(&doc, &path).unwrap();
        let loaded = load_sector_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.hexes, doc.hexes);
        assert_eq!(loaded.share_code, doc.share_code);
        assert_eq!(loaded.config.map(|c| c.seed), Some(31337));
    }
}
