//! Trail-following agents.
//!
//! Each step: probe the field ahead and to either side, steer toward the
//! strongest probe, move, bounce off the field edges, and deposit.

use std::f64::consts::PI;

use crate::rng::RandomSource;
use crate::tilemap::Tilemap;
use crate::trail::params::TrailParams;

/// An agent drifting over the deposit field
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    /// Position in field coordinates
    pub x: f64,
    pub y: f64,
    /// Heading in radians
    pub heading: f64,
}

/// How the turning rule resolved for one step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Left,
    Right,
    Random,
}

/// Result of a single agent step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub turn: Turn,
    pub reflected: bool,
}

impl Agent {
    /// Spawn uniformly over the field with a uniform heading.
    /// Draw order: x, y, heading.
    pub fn spawn(width: usize, height: usize, rng: &mut impl RandomSource) -> Self {
        let x = rng.next_f64() * width as f64;
        let y = rng.next_f64() * height as f64;
        let heading = rng.angle();
        Self { x, y, heading }
    }

    fn probe(&self, field: &Tilemap<f64>, offset: f64, distance: f64) -> f64 {
        let angle = self.heading + offset;
        field.sample(
            self.x + angle.cos() * distance,
            self.y + angle.sin() * distance,
        )
    }

    /// Steer from three probes. Draws from `rng` only on the random branch.
    pub fn steer(
        &mut self,
        field: &Tilemap<f64>,
        params: &TrailParams,
        rng: &mut impl RandomSource,
    ) -> Turn {
        let distance = params.scaled_sensor_distance();
        let rotation = params.scaled_rotation();

        let forward = self.probe(field, 0.0, distance);
        let left = self.probe(field, -params.sensor_angle, distance);
        let right = self.probe(field, params.sensor_angle, distance);

        if forward > left && forward > right {
            Turn::Straight
        } else if left > right {
            self.heading -= rotation;
            Turn::Left
        } else if right > left {
            self.heading += rotation;
            Turn::Right
        } else {
            self.heading += (rng.next_f64() - 0.5) * rotation;
            Turn::Random
        }
    }

    /// Advance along the heading, reflecting off the field bounds.
    /// Returns true if either axis bounced.
    pub fn advance(&mut self, width: usize, height: usize, step: f64) -> bool {
        self.x += self.heading.cos() * step;
        self.y += self.heading.sin() * step;

        let max_x = (width as f64 - 1.0).max(0.0);
        let max_y = (height as f64 - 1.0).max(0.0);
        let mut reflected = false;

        if self.x < 0.0 || self.x >= max_x {
            self.x = self.x.clamp(0.0, max_x);
            self.heading = PI - self.heading;
            reflected = true;
        }
        if self.y < 0.0 || self.y >= max_y {
            self.y = self.y.clamp(0.0, max_y);
            self.heading = -self.heading;
            reflected = true;
        }
        reflected
    }

    /// Add `amount` to the cell under the agent.
    pub fn deposit(&self, field: &mut Tilemap<f64>, amount: f64) {
        let cx = (self.x.floor() as usize).min(field.width - 1);
        let cy = (self.y.floor() as usize).min(field.height - 1);
        *field.get_mut(cx, cy) += amount;
    }

    /// Full step: steer, move, reflect, deposit.
    pub fn step(
        &mut self,
        field: &mut Tilemap<f64>,
        params: &TrailParams,
        rng: &mut impl RandomSource,
    ) -> StepOutcome {
        let turn = self.steer(field, params, rng);
        let reflected = self.advance(field.width, field.height, params.scaled_step());
        self.deposit(field, params.deposit_amount);
        StepOutcome { turn, reflected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LcgRng;

    fn agent(x: f64, y: f64, heading: f64) -> Agent {
        Agent { x, y, heading }
    }

    #[test]
    fn test_keeps_heading_toward_strong_forward() {
        let mut field = Tilemap::new_with(20, 20, 0.0);
        // Forward probe from (5,5) heading 0 at distance 4 lands on (9,5)
        field.set(9, 5, 10.0);
        let mut a = agent(5.5, 5.5, 0.0);
        let mut rng = LcgRng::new(1);
        let turn = a.steer(&field, &TrailParams::default(), &mut rng);
        assert_eq!(turn, Turn::Straight);
        assert_eq!(a.heading, 0.0);
        // No random draw consumed
        assert_eq!(rng.state(), 1);
    }

    #[test]
    fn test_turns_toward_stronger_side() {
        let params = TrailParams::default();
        let d = params.scaled_sensor_distance();
        let mut field = Tilemap::new_with(30, 30, 0.0);
        let (x, y) = (15.5, 15.5);

        let lx = x + (-params.sensor_angle).cos() * d;
        let ly = y + (-params.sensor_angle).sin() * d;
        field.set(lx.floor() as usize, ly.floor() as usize, 3.0);

        let mut a = agent(x, y, 0.0);
        let mut rng = LcgRng::new(1);
        assert_eq!(a.steer(&field, &params, &mut rng), Turn::Left);
        assert!((a.heading + params.scaled_rotation()).abs() < 1e-12);

        let mut field = Tilemap::new_with(30, 30, 0.0);
        let rx = x + params.sensor_angle.cos() * d;
        let ry = y + params.sensor_angle.sin() * d;
        field.set(rx.floor() as usize, ry.floor() as usize, 3.0);
        let mut a = agent(x, y, 0.0);
        assert_eq!(a.steer(&field, &params, &mut rng), Turn::Right);
        assert!((a.heading - params.scaled_rotation()).abs() < 1e-12);
    }

    #[test]
    fn test_tie_draws_random_perturbation() {
        let params = TrailParams::default();
        let field = Tilemap::new_with(30, 30, 0.0);
        let mut a = agent(15.0, 15.0, 1.0);
        let mut rng = LcgRng::new(42);
        let mut mirror = LcgRng::new(42);
        let expected = 1.0 + (mirror.next_f64() - 0.5) * params.scaled_rotation();
        assert_eq!(a.steer(&field, &params, &mut rng), Turn::Random);
        assert!((a.heading - expected).abs() < 1e-12);
        assert_eq!(rng.state(), mirror.state());
    }

    #[test]
    fn test_reflects_on_x_edge() {
        let mut a = agent(0.2, 5.0, PI);
        let reflected = a.advance(10, 10, 1.0);
        assert!(reflected);
        assert_eq!(a.x, 0.0);
        assert!(a.heading.abs() < 1e-12);
    }

    #[test]
    fn test_reflects_on_y_edge() {
        let mut a = agent(5.0, 8.5, PI / 2.0);
        let reflected = a.advance(10, 10, 1.0);
        assert!(reflected);
        assert_eq!(a.y, 9.0);
        assert!((a.heading + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_deposit_accumulates() {
        let mut field = Tilemap::new_with(4, 4, 0.0);
        let a = agent(2.9, 1.1, 0.0);
        a.deposit(&mut field, 1.0);
        a.deposit(&mut field, 0.5);
        assert_eq!(*field.get(2, 1), 1.5);
        assert!((field.sum() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_inside_field() {
        let mut rng = LcgRng::new(3);
        for _ in 0..100 {
            let a = Agent::spawn(33, 21, &mut rng);
            assert!(a.x >= 0.0 && a.x < 33.0);
            assert!(a.y >= 0.0 && a.y < 21.0);
            assert!(a.heading >= 0.0 && a.heading < 2.0 * PI);
        }
    }
}
