/// A dense 2D grid stored row-major.
///
/// Plain indexing does not wrap. Callers opt into edge behaviour explicitly:
/// `sample` treats anything outside the grid as absent, `neighbors_toroidal`
/// wraps on both axes.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` on a size mismatch.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Bounded lookup with signed coordinates; `None` outside the grid.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<&T> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// The four axis-adjacent cells (left, right, up, down), wrapping on both axes.
    pub fn neighbors_toroidal(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        let left = if x == 0 { self.width - 1 } else { x - 1 };
        let right = if x + 1 == self.width { 0 } else { x + 1 };
        let up = if y == 0 { self.height - 1 } else { y - 1 };
        let down = if y + 1 == self.height { 0 } else { y + 1 };
        [(left, y), (right, y), (x, up), (x, down)]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

impl Tilemap<f64> {
    /// Nearest-cell (floor) sample at a continuous position; zero outside the grid.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        self.get_signed(x.floor() as i64, y.floor() as i64)
            .copied()
            .unwrap_or(0.0)
    }

    /// Mean of the four toroidal neighbours.
    pub fn neighbor_average(&self, x: usize, y: usize) -> f64 {
        let sum: f64 = self
            .neighbors_toroidal(x, y)
            .iter()
            .map(|&(nx, ny)| *self.get(nx, ny))
            .sum();
        sum / 4.0
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// (min, max) over all cells; `None` when empty.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_access() {
        let mut map = Tilemap::new_with(4, 3, 0.0f64);
        map.set(3, 2, 5.0);
        assert_eq!(*map.get(3, 2), 5.0);
        assert_eq!(map.get_signed(3, 2), Some(&5.0));
        assert_eq!(map.get_signed(-1, 0), None);
        assert_eq!(map.get_signed(4, 0), None);
        assert_eq!(map.get_signed(0, 3), None);
    }

    #[test]
    fn test_sample_outside_is_zero() {
        let map = Tilemap::new_with(5, 5, 1.0f64);
        assert_eq!(map.sample(2.7, 4.99), 1.0);
        assert_eq!(map.sample(-0.1, 2.0), 0.0);
        assert_eq!(map.sample(5.0, 2.0), 0.0);
        assert_eq!(map.sample(f64::NAN, 2.0), 0.0);
    }

    #[test]
    fn test_toroidal_neighbors() {
        let map: Tilemap<f64> = Tilemap::new(4, 3);
        let n = map.neighbors_toroidal(0, 0);
        assert_eq!(n, [(3, 0), (1, 0), (0, 2), (0, 1)]);
        let n = map.neighbors_toroidal(3, 2);
        assert_eq!(n, [(2, 2), (0, 2), (3, 1), (3, 0)]);
    }

    #[test]
    fn test_neighbor_average_wraps() {
        let mut map = Tilemap::new_with(3, 3, 0.0f64);
        map.set(2, 0, 4.0); // left of (0,0) when wrapping
        assert!((map.neighbor_average(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_vec_size_check() {
        assert!(Tilemap::from_vec(2, 2, vec![0u8; 4]).is_some());
        assert!(Tilemap::from_vec(2, 2, vec![0u8; 3]).is_none());
    }
}
