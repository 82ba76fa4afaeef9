//! Synchronous diffuse-and-decay pass over the deposit field.

use crate::tilemap::Tilemap;

/// Replace `field` with its diffused, decayed successor.
///
/// Every output cell reads only the input buffer:
/// `new = (old + rate * (mean4 - old)) * decay`, where `mean4` wraps
/// toroidally. With `rate` and `decay` in [0, 1] the result is a convex blend
/// of non-negative values scaled down, so the field stays non-negative.
pub fn diffuse_and_decay(field: &mut Tilemap<f64>, diffusion_rate: f64, decay_rate: f64) {
    if field.is_empty() {
        return;
    }
    let mut next = Tilemap::new_with(field.width, field.height, 0.0f64);
    for (x, y, out) in next.iter_mut() {
        let old = *field.get(x, y);
        let avg = field.neighbor_average(x, y);
        *out = (old + diffusion_rate * (avg - old)) * decay_rate;
    }
    *field = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_field_only_decays() {
        let mut field = Tilemap::new_with(6, 4, 2.0);
        diffuse_and_decay(&mut field, 0.5, 0.9);
        for (_, _, &v) in field.iter() {
            assert!((v - 1.8).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spike_spreads_and_conserves_without_decay() {
        let mut field = Tilemap::new_with(5, 5, 0.0);
        field.set(2, 2, 4.0);
        diffuse_and_decay(&mut field, 1.0, 1.0);
        assert_eq!(*field.get(2, 2), 0.0);
        assert!((*field.get(1, 2) - 1.0).abs() < 1e-12);
        assert!((*field.get(2, 3) - 1.0).abs() < 1e-12);
        assert!((field.sum() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_diffusion_wraps_at_edges() {
        let mut field = Tilemap::new_with(4, 4, 0.0);
        field.set(0, 0, 4.0);
        diffuse_and_decay(&mut field, 1.0, 1.0);
        assert!((*field.get(3, 0) - 1.0).abs() < 1e-12);
        assert!((*field.get(0, 3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_synchronous_update() {
        // A sequential in-place pass would let (1,0) see the updated (0,0).
        let mut field = Tilemap::from_vec(3, 1, vec![3.0, 0.0, 0.0]).unwrap();
        diffuse_and_decay(&mut field, 0.5, 1.0);
        // (1,0): neighbours (0,0)=3, (2,0)=0, up/down wrap to itself = 0
        assert!((*field.get(1, 0) - 0.375).abs() < 1e-12);
        assert!((*field.get(2, 0) - 0.375).abs() < 1e-12);
    }
}
