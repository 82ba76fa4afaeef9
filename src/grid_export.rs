//! Comparison sheets for display and trail settings
//!
//! - Levels x saturate: one intensity grid redrawn under several display
//!   settings (no resimulation)
//! - Trail presets: the same seed run under every [`TrailPreset`]

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::config::SectorConfig;
use crate::context::GenerationContext;
use crate::error::Result;
use crate::map_export::{draw_text, render_sector, ExportOptions};
use crate::trail::TrailPreset;

const SHEET_BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);
const LABEL_BACKGROUND: Rgb<u8> = Rgb([30, 30, 35]);
const HEADER_COLOR: Rgb<u8> = Rgb([180, 180, 180]);

/// Configuration for comparison sheets
#[derive(Clone, Debug)]
pub struct GridExportConfig {
    /// Row values for the levels axis
    pub levels: Vec<u8>,
    /// Column values for the saturate axis
    pub saturate_factors: Vec<f64>,
    /// How each tile is drawn
    pub tile: ExportOptions,
    /// Padding between tiles in pixels
    pub cell_padding: u32,
    /// Height of label area
    pub label_height: u32,
}

impl Default for GridExportConfig {
    fn default() -> Self {
        Self {
            levels: vec![2, 4, 8, 16],
            saturate_factors: vec![0.5, 1.0, 2.0, 4.0],
            tile: ExportOptions {
                radius: 6.0,
                show_grid: false,
                show_starports: false,
                ..Default::default()
            },
            cell_padding: 4,
            label_height: 16,
        }
    }
}

fn blit(sheet: &mut RgbImage, tile: &RgbImage, x_offset: u32, y_offset: u32) {
    for (x, y, pixel) in tile.enumerate_pixels() {
        if x + x_offset < sheet.width() && y + y_offset < sheet.height() {
            sheet.put_pixel(x + x_offset, y + y_offset, *pixel);
        }
    }
}

/// Draw label with background, centred in `bg_width`
fn draw_label(img: &mut RgbImage, x: u32, y: u32, text: &str, bg_width: u32, height: u32) {
    for dy in 0..height {
        for dx in 0..bg_width {
            if x + dx < img.width() && y + dy < img.height() {
                img.put_pixel(x + dx, y + dy, LABEL_BACKGROUND);
            }
        }
    }

    let text_width = (text.len() * 6) as u32;
    let text_x = x + bg_width.saturating_sub(text_width) / 2;
    let text_y = y + height.saturating_sub(7) / 2;
    draw_text(img, text_x as i32, text_y as i32, text, Rgb([220, 220, 220]), 1);
}

fn blank_sheet(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_pixel(width, height, SHEET_BACKGROUND)
}

/// Render the levels x saturate sheet for the context's current grid.
///
/// Display settings are restored afterwards, also when a tile's settings are
/// rejected; the grid and generation id are untouched. Worlds rolled for the
/// tiles stay cached for this generation.
pub fn render_levels_grid(
    ctx: &mut GenerationContext,
    config: &GridExportConfig,
) -> Result<RgbImage> {
    let original = ctx.config().clone();
    let layout = config.tile.layout();
    let (cell_w, cell_h) = layout.canvas_size(ctx.grid().layout.cols(), ctx.grid().layout.rows());
    let padding = config.cell_padding;

    let cols = config.saturate_factors.len() as u32;
    let rows = config.levels.len() as u32;
    if cols == 0 || rows == 0 {
        return Ok(RgbImage::new(0, 0));
    }

    let row_label_w = 50u32;
    let col_label_h = config.label_height;
    let grid_w = row_label_w + cols * cell_w + (cols - 1) * padding;
    let grid_h = col_label_h + rows * cell_h + (rows - 1) * padding;
    let mut sheet = blank_sheet(grid_w, grid_h);

    for (col, sat) in config.saturate_factors.iter().enumerate() {
        let x = row_label_w + col as u32 * (cell_w + padding);
        draw_text(&mut sheet, (x + 4) as i32, 4, &format!("SAT {}", sat), HEADER_COLOR, 1);
    }

    let total = config.levels.len() * config.saturate_factors.len();
    let mut count = 0;
    println!("Generating levels comparison grid ({} combinations)...", total);
    let drawn = (|| -> Result<()> {
        for (row, &levels) in config.levels.iter().enumerate() {
            let y = col_label_h + row as u32 * (cell_h + padding);
            let label_y = (y + cell_h / 2).saturating_sub(3) as i32;
            draw_text(&mut sheet, 4, label_y, &format!("LV {}", levels), HEADER_COLOR, 1);

            for (col, &sat) in config.saturate_factors.iter().enumerate() {
                count += 1;
                println!("  [{}/{}] levels={}, saturate={}...", count, total, levels, sat);

                // Keep the threshold at the same distance from the top level
                let gap = original.levels.saturating_sub(original.presence_threshold);
                let threshold = levels.saturating_sub(gap).max(1);
                ctx.set_display(levels, sat, threshold)?;
                let tile = render_sector(&ctx.snapshot(), &config.tile);

                let x = row_label_w + col as u32 * (cell_w + padding);
                blit(&mut sheet, &tile, x, y);
            }
        }
        Ok(())
    })();

    ctx.set_display(original.levels, original.saturate_factor, original.presence_threshold)?;
    drawn?;
    Ok(sheet)
}

/// Export the levels x saturate sheet as PNG
pub fn export_levels_grid(
    ctx: &mut GenerationContext,
    config: &GridExportConfig,
    path: impl AsRef<Path>,
) -> Result<(u32, u32)> {
    let sheet = render_levels_grid(ctx, config)?;
    sheet.save(path.as_ref())?;
    println!("Exported levels grid to {}", path.as_ref().display());
    Ok(sheet.dimensions())
}

/// Render one tile per trail preset, same seed and display settings.
pub fn render_preset_grid(base: &SectorConfig, config: &GridExportConfig) -> Result<RgbImage> {
    let presets = TrailPreset::all();
    let layout = config.tile.layout();
    let (cell_w, map_h) = layout.canvas_size(base.layout().cols(), base.layout().rows());
    let cell_h = map_h + config.label_height;
    let padding = config.cell_padding;

    let grid_w = presets.len() as u32 * cell_w + (presets.len() as u32 - 1) * padding;
    let mut sheet = blank_sheet(grid_w, cell_h);

    println!("Generating trail preset comparison grid...");
    for (i, &preset) in presets.iter().enumerate() {
        println!("  Generating {} ({}/{})...", preset, i + 1, presets.len());

        let mut ctx = GenerationContext::new(base.clone().with_preset(preset))?;
        let tile = render_sector(&ctx.snapshot(), &config.tile);

        let x_offset = i as u32 * (cell_w + padding);
        blit(&mut sheet, &tile, x_offset, 0);

        let label = preset.to_string().to_uppercase();
        draw_label(&mut sheet, x_offset, map_h, &label, cell_w, config.label_height);
    }

    Ok(sheet)
}

/// Export the trail preset sheet as PNG
pub fn export_preset_grid(
    base: &SectorConfig,
    config: &GridExportConfig,
    path: impl AsRef<Path>,
) -> Result<(u32, u32)> {
    let sheet = render_preset_grid(base, config)?;
    sheet.save(path.as_ref())?;
    println!("Exported preset grid to {}", path.as_ref().display());
    Ok(sheet.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u32) -> SectorConfig {
        SectorConfig {
            agent_count: 20,
            iterations: 10,
            sub_cols: 4,
            sub_rows: 4,
            sub_sector_cols: 1,
            sub_sector_rows: 1,
            ..SectorConfig::with_seed(seed)
        }
    }

    #[test]
    fn test_levels_grid_restores_display() {
        let mut ctx = GenerationContext::new(small_config(17)).unwrap();
        let before = ctx.config().clone();
        let grid_before = ctx.grid().clone();
        let generation = ctx.generation();

        let config = GridExportConfig {
            levels: vec![2, 8],
            saturate_factors: vec![1.0, 3.0, 0.5],
            ..Default::default()
        };
        let sheet = render_levels_grid(&mut ctx, &config).unwrap();

        let (tw, th) = config.tile.layout().canvas_size(4, 4);
        assert_eq!(sheet.width(), 50 + 3 * tw + 2 * config.cell_padding);
        assert_eq!(sheet.height(), config.label_height + 2 * th + config.cell_padding);
        assert_eq!(*ctx.config(), before);
        assert_eq!(*ctx.grid(), grid_before);
        assert_eq!(ctx.generation(), generation);
    }

    #[test]
    fn test_rejected_tile_settings_restore_display() {
        let mut ctx = GenerationContext::new(small_config(23)).unwrap();
        ctx.set_display(6, 1.5, 4).unwrap();
        let before = ctx.config().clone();

        let config = GridExportConfig {
            levels: vec![4, 8],
            saturate_factors: vec![1.0, 0.0],
            ..Default::default()
        };
        assert!(render_levels_grid(&mut ctx, &config).is_err());
        assert_eq!(*ctx.config(), before);
    }

    #[test]
    fn test_empty_axes_give_empty_sheet() {
        let mut ctx = GenerationContext::new(small_config(1)).unwrap();
        let config = GridExportConfig {
            levels: Vec::new(),
            ..Default::default()
        };
        assert_eq!(render_levels_grid(&mut ctx, &config).unwrap().dimensions(), (0, 0));
    }

    #[test]
    fn test_preset_grid_has_one_tile_per_preset() {
        let base = SectorConfig {
            sub_cols: 2,
            sub_rows: 2,
            ..small_config(5)
        };
        let config = GridExportConfig::default();
        let sheet = render_preset_grid(&base, &config).unwrap();
        let (tw, _) = config.tile.layout().canvas_size(2, 2);
        let n = TrailPreset::all().len() as u32;
        assert_eq!(sheet.width(), n * tw + (n - 1) * config.cell_padding);
    }
}
