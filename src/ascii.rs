//! ASCII rendering and export for sector snapshots
//!
//! Hex rows are drawn as two text lines: even columns on the first, odd
//! columns (which sit half a hex lower) on the second.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::context::SectorSnapshot;
use crate::error::Result;
use crate::hexgrid::hex_label;
use crate::quantize::level_histogram;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AsciiMode {
    /// Density gradient by level
    #[default]
    Levels,
    /// Starport letter for worlds, `*` for present cells without one
    Worlds,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Levels => "Levels",
            AsciiMode::Worlds => "Worlds",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Levels, AsciiMode::Worlds]
    }
}

/// Get ASCII character for a level (sparse to dense)
pub fn level_char(level: u8, levels: u8) -> char {
    const CHARS: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
    let top = levels.saturating_sub(1).max(1) as f32;
    let normalized = (level as f32 / top).clamp(0.0, 1.0);
    let idx = (normalized * (CHARS.len() - 1) as f32).round() as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

fn cell_char(snapshot: &SectorSnapshot, col: usize, row: usize, mode: AsciiMode) -> char {
    let cell = snapshot.cell(col, row);
    match mode {
        AsciiMode::Levels => level_char(cell.level, snapshot.levels),
        AsciiMode::Worlds => match (&cell.world, cell.present) {
            (Some(world), _) => world.starport.letter(),
            (None, true) => '*',
            (None, false) => '.',
        },
    }
}

/// Render a snapshot to an ASCII string, two lines per hex row.
pub fn render_ascii_sector(snapshot: &SectorSnapshot, mode: AsciiMode) -> String {
    let cols = snapshot.layout.cols();
    let rows = snapshot.layout.rows();
    let mut result = String::with_capacity((2 * cols + 1) * 2 * rows);

    for row in 0..rows {
        for parity in 0..2 {
            let mut line = String::with_capacity(2 * cols);
            for col in 0..cols {
                let ch = if col % 2 == parity {
                    cell_char(snapshot, col, row, mode)
                } else {
                    ' '
                };
                line.push(ch);
                line.push(' ');
            }
            result.push_str(line.trim_end());
            result.push('\n');
        }
    }

    result
}

/// One line per world: hex, subsector, UWP, bases, trade codes, gas giant.
pub fn world_listing(snapshot: &SectorSnapshot) -> String {
    let mut out = String::new();
    for (cell, world) in snapshot.worlds() {
        let subsector = snapshot.layout.subsector_of(cell.col, cell.row);
        out.push_str(&format!(
            "{} {} {} {:2} {:<20} {}\n",
            hex_label(cell.col, cell.row),
            subsector.letter(&snapshot.layout),
            world.uwp(),
            world.base_string(),
            world.trade_code_string(),
            if world.gas_giant { "G" } else { "-" },
        ));
    }
    out
}

/// Export a snapshot to a text file: header, both map views, stats, worlds.
pub fn export_sector_file(snapshot: &SectorSnapshot, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    let layout = &snapshot.layout;
    let total = layout.cell_count();

    // Header
    writeln!(file, "=== SECTOR GENERATOR SECTOR FILE ===")?;
    writeln!(file, "Seed: {}", snapshot.seed)?;
    writeln!(file, "Share code: {}", snapshot.share_code)?;
    writeln!(
        file,
        "Size: {}x{} hexes ({}x{} subsectors of {}x{})",
        layout.cols(),
        layout.rows(),
        layout.sub_sector_cols,
        layout.sub_sector_rows,
        layout.sub_cols,
        layout.sub_rows,
    )?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_sector(snapshot, mode))?;
        writeln!(file)?;
    }

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total hexes: {}", total)?;
    let present = snapshot.present_count();
    writeln!(
        file,
        "Occupied: {} ({:.1}%)",
        present,
        100.0 * present as f64 / total.max(1) as f64
    )?;
    writeln!(file, "Level distribution:")?;
    let levels: Vec<u8> = snapshot.cells.iter().map(|c| c.level).collect();
    for (level, count) in level_histogram(&levels, snapshot.levels).iter().enumerate() {
        writeln!(
            file,
            "  {:>2} '{}' {:>6} ({:>5.1}%)",
            level,
            level_char(level as u8, snapshot.levels),
            count,
            100.0 * *count as f64 / total.max(1) as f64
        )?;
    }
    writeln!(file)?;

    writeln!(file, "=== WORLDS ===")?;
    writeln!(file, "[hex subsector uwp bases trade-codes gas-giant]")?;
    write!(file, "{}", world_listing(snapshot))?;

    file.flush()?;
    Ok(())
}

/// Print ASCII map to stdout
pub fn print_ascii_sector(snapshot: &SectorSnapshot, mode: AsciiMode) {
    print!("{}", render_ascii_sector(snapshot, mode));
}

// ============================================================================
// COLORIZED ASCII RENDERING
// ============================================================================

/// Format a single character with ANSI true color (24-bit) - foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Background colour for a level, matching the PNG ramp
pub fn level_color(level: u8, levels: u8) -> (u8, u8, u8) {
    let [r, g, b] = crate::map_export::level_color(level, levels).0;
    (r, g, b)
}

/// Render a colorized ASCII map to string with ANSI codes
pub fn render_colored_ascii_sector(snapshot: &SectorSnapshot, mode: AsciiMode) -> String {
    let cols = snapshot.layout.cols();
    let rows = snapshot.layout.rows();
    // Each cell needs ~40 bytes for ANSI codes
    let mut result = String::with_capacity(cols * rows * 2 * 45);
    let blank = (8, 8, 14);

    for row in 0..rows {
        for parity in 0..2 {
            for col in 0..cols {
                if col % 2 != parity {
                    result.push_str(&ansi_colored_char(' ', blank, blank));
                    result.push_str(&ansi_colored_char(' ', blank, blank));
                    continue;
                }
                let cell = snapshot.cell(col, row);
                let bg = level_color(cell.level, snapshot.levels);
                let fg = if cell.present {
                    (255, 214, 120)
                } else {
                    (bg.0.saturating_sub(40), bg.1.saturating_sub(40), bg.2.saturating_sub(40))
                };
                result.push_str(&ansi_colored_char(cell_char(snapshot, col, row, mode), fg, bg));
                result.push_str(&ansi_colored_char(' ', fg, bg));
            }
            result.push_str("\x1b[0m\n");
        }
    }

    result
}

/// Print colorized ASCII map to stdout
pub fn print_colored_ascii_sector(snapshot: &SectorSnapshot, mode: AsciiMode) {
    print!("{}", render_colored_ascii_sector(snapshot, mode));
}
