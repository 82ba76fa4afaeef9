//! Downsampling of a deposit field into per-hex intensities.

use crate::tilemap::Tilemap;

/// Hex column/row owning field cell `(x, y)`.
///
/// Equivalent to `floor(x / (width / n_cols))` but in integer arithmetic so
/// every field cell lands in exactly one in-range block.
#[inline]
pub fn block_of(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    n_cols: usize,
    n_rows: usize,
) -> (usize, usize) {
    ((x * n_cols) / width, (y * n_rows) / height)
}

/// Sum each proportional block of `field` into one value per hex, row-major.
pub fn aggregate(field: &Tilemap<f64>, n_cols: usize, n_rows: usize) -> Vec<f64> {
    let mut cells = vec![0.0f64; n_cols * n_rows];
    if n_cols == 0 || n_rows == 0 || field.is_empty() {
        return cells;
    }
    for (x, y, &v) in field.iter() {
        let (col, row) = block_of(x, y, field.width, field.height, n_cols, n_rows);
        cells[row * n_cols + col] += v;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{LcgRng, RandomSource};

    #[test]
    fn test_blocks_cover_every_cell() {
        let (w, h, c, r) = (83, 102, 8, 10);
        let mut counts = vec![0usize; c * r];
        for y in 0..h {
            for x in 0..w {
                let (col, row) = block_of(x, y, w, h, c, r);
                assert!(col < c && row < r);
                counts[row * c + col] += 1;
            }
        }
        assert_eq!(counts.iter().sum::<usize>(), w * h);
        assert!(counts.iter().all(|&n| n > 0));
    }

    #[test]
    fn test_mass_is_conserved() {
        let mut rng = LcgRng::new(31337);
        let mut field = Tilemap::new_with(84, 101, 0.0f64);
        for (_, _, v) in field.iter_mut() {
            *v = rng.next_f64() * 5.0;
        }
        let cells = aggregate(&field, 8, 10);
        let total: f64 = cells.iter().sum();
        assert!((total - field.sum()).abs() < 1e-6 * field.sum());
    }

    #[test]
    fn test_single_hot_cell_lands_in_its_block() {
        let mut field = Tilemap::new_with(20, 20, 0.0f64);
        field.set(15, 4, 2.0);
        let cells = aggregate(&field, 2, 2);
        assert_eq!(cells, vec![0.0, 2.0, 0.0, 0.0]);
    }
}
