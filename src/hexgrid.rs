//! Flat-topped hex geometry for sector maps.
//!
//! Columns are vertical; odd columns sit half a hex lower than even ones
//! ("odd-q" offset), the usual layout for printed sector maps.

const SQRT_3: f32 = 1.732_050_8;

/// Pixel geometry for an offset hex grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    /// Centre-to-corner distance in pixels
    pub radius: f32,
    /// Blank border around the grid in pixels
    pub margin: f32,
}

impl HexLayout {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            margin: radius * 0.5,
        }
    }

    /// Same geometry scaled by `factor` (export vs on-screen size).
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            radius: self.radius * factor,
            margin: self.margin * factor,
        }
    }

    pub fn col_spacing(&self) -> f32 {
        self.radius * 1.5
    }

    pub fn row_spacing(&self) -> f32 {
        self.radius * SQRT_3
    }

    /// Pixel centre of hex `(col, row)`.
    pub fn center(&self, col: usize, row: usize) -> (f32, f32) {
        let x = self.margin + self.radius + col as f32 * self.col_spacing();
        let shift = if col % 2 == 1 { 0.5 } else { 0.0 };
        let y = self.margin + self.row_spacing() * (row as f32 + 0.5 + shift);
        (x, y)
    }

    /// Six corners, starting at the right-hand vertex, clockwise in screen space.
    pub fn corners(&self, col: usize, row: usize) -> [(f32, f32); 6] {
        let (cx, cy) = self.center(col, row);
        let mut out = [(0.0, 0.0); 6];
        for (i, corner) in out.iter_mut().enumerate() {
            let angle = std::f32::consts::PI / 3.0 * i as f32;
            *corner = (cx + self.radius * angle.cos(), cy + self.radius * angle.sin());
        }
        out
    }

    /// Whether pixel `(px, py)` lies inside hex `(col, row)`.
    pub fn contains(&self, col: usize, row: usize, px: f32, py: f32) -> bool {
        let (cx, cy) = self.center(col, row);
        let dx = (px - cx).abs();
        let dy = (py - cy).abs();
        let half_height = self.radius * SQRT_3 / 2.0;
        dy <= half_height && SQRT_3 * dx + dy <= SQRT_3 * self.radius
    }

    /// Distance from `(px, py)` to the nearest edge of hex `(col, row)`;
    /// negative outside.
    pub fn edge_distance(&self, col: usize, row: usize, px: f32, py: f32) -> f32 {
        let (cx, cy) = self.center(col, row);
        let dx = (px - cx).abs();
        let dy = (py - cy).abs();
        let flat = self.radius * SQRT_3 / 2.0 - dy;
        let slanted = (SQRT_3 * self.radius - SQRT_3 * dx - dy) / 2.0;
        flat.min(slanted)
    }

    /// Hex under pixel `(px, py)` for a `cols x rows` grid, if any.
    pub fn hex_at(&self, px: f32, py: f32, cols: usize, rows: usize) -> Option<(usize, usize)> {
        if cols == 0 || rows == 0 {
            return None;
        }
        let approx_col = ((px - self.margin - self.radius) / self.col_spacing()).round() as i64;
        for col in (approx_col - 1)..=(approx_col + 1) {
            if col < 0 || col as usize >= cols {
                continue;
            }
            let col = col as usize;
            let shift = if col % 2 == 1 { 0.5 } else { 0.0 };
            let approx_row = ((py - self.margin) / self.row_spacing() - 0.5 - shift).round() as i64;
            for row in (approx_row - 1)..=(approx_row + 1) {
                if row < 0 || row as usize >= rows {
                    continue;
                }
                if self.contains(col, row as usize, px, py) {
                    return Some((col, row as usize));
                }
            }
        }
        None
    }

    /// Pixel size of a canvas holding `cols x rows` hexes.
    pub fn canvas_size(&self, cols: usize, rows: usize) -> (u32, u32) {
        if cols == 0 || rows == 0 {
            return (0, 0);
        }
        let width = 2.0 * self.margin + 2.0 * self.radius + (cols - 1) as f32 * self.col_spacing();
        let extra = if cols > 1 { 0.5 } else { 0.0 };
        let height = 2.0 * self.margin + self.row_spacing() * (rows as f32 + extra);
        (width.ceil() as u32, height.ceil() as u32)
    }
}

/// Four-digit hex label, 1-based column then row: (0, 0) -> "0101".
pub fn hex_label(col: usize, row: usize) -> String {
    format!("{:02}{:02}", col + 1, row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(hex_label(0, 0), "0101");
        assert_eq!(hex_label(31, 39), "3240");
    }

    #[test]
    fn test_centers_hit_their_own_hex() {
        let layout = HexLayout::new(12.0);
        for col in 0..8 {
            for row in 0..10 {
                let (x, y) = layout.center(col, row);
                assert_eq!(layout.hex_at(x, y, 8, 10), Some((col, row)));
            }
        }
    }

    #[test]
    fn test_odd_columns_shift_down() {
        let layout = HexLayout::new(10.0);
        let (_, y0) = layout.center(0, 0);
        let (_, y1) = layout.center(1, 0);
        assert!((y1 - y0 - layout.row_spacing() / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_canvas_holds_all_corners() {
        let layout = HexLayout::new(9.0);
        let (w, h) = layout.canvas_size(8, 10);
        for col in 0..8 {
            for row in 0..10 {
                for (x, y) in layout.corners(col, row) {
                    assert!(x >= 0.0 && x <= w as f32);
                    assert!(y >= 0.0 && y <= h as f32);
                }
            }
        }
    }

    #[test]
    fn test_edge_distance() {
        let layout = HexLayout::new(10.0);
        let (cx, cy) = layout.center(2, 3);
        let apothem = 10.0 * SQRT_3 / 2.0;
        assert!((layout.edge_distance(2, 3, cx, cy) - apothem).abs() < 1e-3);
        assert!(layout.edge_distance(2, 3, cx, cy + apothem + 1.0) < 0.0);
        let (rx, ry) = layout.corners(2, 3)[0];
        assert!(layout.edge_distance(2, 3, rx, ry).abs() < 1e-3);
    }

    #[test]
    fn test_margin_is_outside() {
        let layout = HexLayout::new(10.0);
        assert_eq!(layout.hex_at(1.0, 1.0, 4, 4), None);
    }

    #[test]
    fn test_scaled_layout_keeps_proportions() {
        let small = HexLayout::new(8.0);
        let big = small.scaled(3.0);
        let (sx, sy) = small.center(5, 7);
        let (bx, by) = big.center(5, 7);
        assert!((bx - 3.0 * sx).abs() < 1e-3);
        assert!((by - 3.0 * sy).abs() < 1e-3);
    }
}
