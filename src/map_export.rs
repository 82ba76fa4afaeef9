//! PNG rendering of sector snapshots
//!
//! Each hex is filled by its level on a grey ramp; present cells get
//! a star marker and, optionally, their starport letter. Colours depend only
//! on the snapshot, so an on-screen preview and a scaled export show the same
//! levels in the same hexes.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;

use crate::context::SectorSnapshot;
use crate::error::Result;
use crate::hexgrid::HexLayout;

/// Rendering options
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    /// Hex radius at scale 1, in pixels
    pub radius: f32,
    /// Multiplier for export resolution (1 = preview size)
    pub scale: f32,
    /// Draw hex outlines
    pub show_grid: bool,
    /// Draw star markers on present cells
    pub show_worlds: bool,
    /// Draw starport letters above the markers
    pub show_starports: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            radius: 14.0,
            scale: 1.0,
            show_grid: true,
            show_worlds: true,
            show_starports: true,
        }
    }
}

impl ExportOptions {
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.radius).scaled(self.scale.max(0.1))
    }
}

const BACKGROUND: Rgb<u8> = Rgb([8, 8, 14]);
const GRID_COLOR: Rgb<u8> = Rgb([70, 80, 110]);
const STAR_COLOR: Rgb<u8> = Rgb([255, 214, 120]);
const LABEL_COLOR: Rgb<u8> = Rgb([235, 235, 240]);

/// Fill colour for `level` out of `levels`: a grey ramp with a faint blue cast.
pub fn level_color(level: u8, levels: u8) -> Rgb<u8> {
    let top = levels.saturating_sub(1).max(1) as f32;
    let t = (level as f32 / top).clamp(0.0, 1.0);
    let v = 18.0 + 212.0 * t;
    Rgb([v.round() as u8, v.round() as u8, (v + 12.0).min(255.0).round() as u8])
}

/// Render a snapshot to an image.
pub fn render_sector(snapshot: &SectorSnapshot, options: &ExportOptions) -> RgbImage {
    let layout = options.layout();
    let cols = snapshot.layout.cols();
    let rows = snapshot.layout.rows();
    let (width, height) = layout.canvas_size(cols, rows);
    if width == 0 || height == 0 {
        return RgbImage::new(0, 0);
    }

    let outline = (layout.radius * 0.08).max(1.0);
    let row_bytes = width as usize * 3;
    let mut buffer = vec![0u8; row_bytes * height as usize];

    buffer
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(py, row)| {
            let fy = py as f32 + 0.5;
            for px in 0..width as usize {
                let fx = px as f32 + 0.5;
                let color = match layout.hex_at(fx, fy, cols, rows) {
                    Some((col, hrow)) => {
                        if options.show_grid && layout.edge_distance(col, hrow, fx, fy) < outline {
                            GRID_COLOR
                        } else {
                            level_color(snapshot.cell(col, hrow).level, snapshot.levels)
                        }
                    }
                    None => BACKGROUND,
                };
                row[px * 3..px * 3 + 3].copy_from_slice(&color.0);
            }
        });

    let mut img: RgbImage = match ImageBuffer::from_raw(width, height, buffer) {
        Some(img) => img,
        None => return RgbImage::new(width, height),
    };

    if options.show_worlds {
        draw_worlds(&mut img, snapshot, &layout, options.show_starports);
    }
    img
}

fn draw_worlds(img: &mut RgbImage, snapshot: &SectorSnapshot, layout: &HexLayout, starports: bool) {
    let dot = (layout.radius * 0.2).max(1.0);
    for cell in snapshot.cells.iter().filter(|c| c.present) {
        let (cx, cy) = layout.center(cell.col, cell.row);
        fill_circle(img, cx, cy, dot, STAR_COLOR);
        if let (true, Some(world)) = (starports, cell.world.as_ref()) {
            let glyph_scale = ((layout.radius / 14.0).round() as i32).max(1);
            let x = cx as i32 - (5 * glyph_scale) / 2;
            let y = (cy - dot - 2.0) as i32 - 7 * glyph_scale;
            draw_char(img, x, y, world.starport.letter(), LABEL_COLOR, glyph_scale);
        }
    }
}

fn fill_circle(img: &mut RgbImage, cx: f32, cy: f32, r: f32, color: Rgb<u8>) {
    let x0 = (cx - r).floor().max(0.0) as u32;
    let y0 = (cy - r).floor().max(0.0) as u32;
    let x1 = ((cx + r).ceil() as u32).min(img.width().saturating_sub(1));
    let y1 = ((cy + r).ceil() as u32).min(img.height().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// 5x7 glyphs for labels: starport classes, digits, and the letters the
/// comparison sheets use.
const FONT_5X7: &[(char, [u8; 7])] = &[
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
];

/// Draw one glyph with its top-left at `(x, y)`, each font pixel `scale` wide.
pub fn draw_char(img: &mut RgbImage, x: i32, y: i32, ch: char, color: Rgb<u8>, scale: i32) {
    let ch = ch.to_ascii_uppercase();
    let Some((_, bits)) = FONT_5X7.iter().find(|(c, _)| *c == ch) else {
        return;
    };
    for (row, &byte) in bits.iter().enumerate() {
        for col in 0..5 {
            if byte & (0b10000 >> col) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let px = x + col * scale + sx;
                    let py = y + row as i32 * scale + sy;
                    let inside = px >= 0 && py >= 0;
                    if inside && (px as u32) < img.width() && (py as u32) < img.height() {
                        img.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}

/// Draw a string left to right.
pub fn draw_text(img: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: i32) {
    let mut cx = x;
    for ch in text.chars() {
        draw_char(img, cx, y, ch, color, scale);
        cx += 6 * scale;
    }
}

/// Render and save a snapshot as PNG.
pub fn export_sector_png(
    snapshot: &SectorSnapshot,
    options: &ExportOptions,
    path: impl AsRef<Path>,
) -> Result<(u32, u32)> {
    let img = render_sector(snapshot, options);
    img.save(path.as_ref())?;
    Ok(img.dimensions())
}
