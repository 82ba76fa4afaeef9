//! Agent-based trail deposition simulation
//!
//! A simplified slime-mould model over a scalar field:
//! - **Agents** sense the field ahead and to each side, turn toward the
//!   strongest signal, move, and deposit trail
//! - **Boundaries** reflect agents; sensing treats out-of-bounds as zero
//! - **Diffusion** blends each cell toward its 4-neighbour mean (toroidally)
//!   and decays the whole field once per iteration
//!
//! The run is strictly sequential: agents move in index order and every
//! random draw comes from the injected source, so a seed fixes the result.

pub mod agent;
pub mod diffusion;
pub mod params;

pub use agent::{Agent, StepOutcome, Turn};
pub use diffusion::diffuse_and_decay;
pub use params::{TrailParams, TrailPreset};

use crate::rng::RandomSource;
use crate::tilemap::Tilemap;

/// Statistics from one trail simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailStats {
    pub iterations: usize,
    pub agents: usize,
    /// Total agent steps taken (agents * iterations)
    pub steps_taken: u64,
    pub straight_turns: u64,
    pub left_turns: u64,
    pub right_turns: u64,
    pub random_turns: u64,
    /// Steps where an agent bounced off a field edge
    pub reflections: u64,
    /// Total trail deposited by agents (before decay)
    pub total_deposited: f64,
    /// Field mass after the last iteration
    pub final_mass: f64,
    pub min_value: f64,
    pub max_value: f64,
}

/// A finished simulation: the deposit field and what happened building it
#[derive(Debug, Clone)]
pub struct TrailRun {
    pub field: Tilemap<f64>,
    pub stats: TrailStats,
}

impl TrailRun {
    pub fn width(&self) -> usize {
        self.field.width
    }

    pub fn height(&self) -> usize {
        self.field.height
    }
}

/// Field dimensions for an `n_cols x n_rows` hex block, with 1-4 cells of jitter
/// per axis. Draw order: jitter x, jitter y.
pub fn field_dimensions(
    n_cols: usize,
    n_rows: usize,
    cell_size: usize,
    rng: &mut impl RandomSource,
) -> (usize, usize) {
    let jitter_x = rng.next_int(1, 4) as usize;
    let jitter_y = rng.next_int(1, 4) as usize;
    (n_cols * cell_size + jitter_x, n_rows * cell_size + jitter_y)
}

/// Run the trail simulation for one block of hex cells.
///
/// Algorithm:
/// 1. Size the field from the hex dimensions plus seeded jitter
/// 2. Seed every cell with low-amplitude noise (row-major draws)
/// 3. Spawn agents uniformly (x, y, heading per agent)
/// 4. For each iteration:
///    a. Step every agent in order (sense, turn, move, reflect, deposit)
///    b. Diffuse and decay the whole field in one synchronous pass
pub fn simulate(
    n_cols: usize,
    n_rows: usize,
    params: &TrailParams,
    rng: &mut impl RandomSource,
) -> TrailRun {
    let (width, height) = field_dimensions(n_cols, n_rows, params.cell_size, rng);

    let mut field = Tilemap::new_with(width, height, 0.0f64);
    for (_, _, cell) in field.iter_mut() {
        *cell = rng.next_f64() * params.noise_amplitude;
    }

    let mut agents: Vec<Agent> = (0..params.agent_count)
        .map(|_| Agent::spawn(width, height, rng))
        .collect();

    let mut stats = TrailStats {
        iterations: params.iterations,
        agents: agents.len(),
        ..Default::default()
    };

    for _ in 0..params.iterations {
        for agent in agents.iter_mut() {
            let outcome = agent.step(&mut field, params, rng);
            match outcome.turn {
                Turn::Straight => stats.straight_turns += 1,
                Turn::Left => stats.left_turns += 1,
                Turn::Right => stats.right_turns += 1,
                Turn::Random => stats.random_turns += 1,
            }
            if outcome.reflected {
                stats.reflections += 1;
            }
            stats.steps_taken += 1;
            stats.total_deposited += params.deposit_amount;
        }
        diffuse_and_decay(&mut field, params.diffusion_rate, params.decay_rate);
    }

    stats.final_mass = field.sum();
    if let Some((lo, hi)) = field.min_max() {
        stats.min_value = lo;
        stats.max_value = hi;
    }

    TrailRun { field, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LcgRng;

    #[test]
    fn test_field_dimensions_jitter() {
        let mut rng = LcgRng::new(5);
        for _ in 0..200 {
            let (w, h) = field_dimensions(8, 10, 10, &mut rng);
            assert!((81..=84).contains(&w));
            assert!((101..=104).contains(&h));
        }
    }

    #[test]
    fn test_field_dimensions_golden_seed() {
        let mut rng = LcgRng::new(12345);
        assert_eq!(field_dimensions(8, 10, 10, &mut rng), (81, 101));
        // Noise starts right after the two jitter draws
        assert_eq!(rng.next_f64(), 0.5431557944975793);

        let run = simulate(4, 5, &TrailParams::fast(), &mut LcgRng::new(12345));
        assert_eq!((run.width(), run.height()), (17, 21));
    }

    #[test]
    fn test_deterministic_run() {
        let params = TrailParams::fast();
        let a = simulate(8, 10, &params, &mut LcgRng::new(12345));
        let b = simulate(8, 10, &params, &mut LcgRng::new(12345));
        assert_eq!(a.field, b.field);
        assert_eq!(a.stats, b.stats);

        let c = simulate(8, 10, &params, &mut LcgRng::new(54321));
        assert_ne!(a.field, c.field);
    }

    #[test]
    fn test_field_stays_non_negative() {
        let params = TrailParams::fast();
        let run = simulate(6, 6, &params, &mut LcgRng::new(777));
        assert!(run.field.iter().all(|(_, _, &v)| v >= 0.0));
        assert!(run.stats.min_value >= 0.0);
        assert_eq!(run.stats.steps_taken, (params.agent_count * params.iterations) as u64);
        let turns = run.stats.straight_turns
            + run.stats.left_turns
            + run.stats.right_turns
            + run.stats.random_turns;
        assert_eq!(turns, run.stats.steps_taken);
    }

    #[test]
    fn test_degenerate_run_is_near_zero() {
        let params = TrailParams {
            agent_count: 0,
            iterations: 0,
            ..TrailParams::fast()
        };
        let run = simulate(4, 4, &params, &mut LcgRng::new(1));
        assert!(run.field.iter().all(|(_, _, &v)| (0.0..params.noise_amplitude).contains(&v)));
        assert_eq!(run.stats.steps_taken, 0);

        // Iterations without agents only diffuse the noise
        let params = TrailParams { iterations: 5, ..params };
        let run = simulate(4, 4, &params, &mut LcgRng::new(1));
        assert!(run.stats.max_value < params.noise_amplitude);
    }

    #[test]
    fn test_agents_build_mass() {
        let params = TrailParams::fast();
        let run = simulate(6, 6, &params, &mut LcgRng::new(2024));
        let noise_budget = params.noise_amplitude * (run.width() * run.height()) as f64;
        assert!(run.stats.final_mass > noise_budget);
        assert!(run.stats.max_value > params.deposit_amount * params.decay_rate * 0.5);
    }
}
