//! Trail simulation parameters and presets

use std::f64::consts::PI;

use crate::error::ConfigError;

/// Trail density preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrailPreset {
    /// Few agents, short run - faint isolated filaments
    Sparse,
    /// Balanced agent count and run length
    #[default]
    Normal,
    /// Many agents - thick, merged networks
    Dense,
    /// Long run with short steps - fine, detailed veins
    Fine,
}

impl TrailPreset {
    pub fn all() -> &'static [Self] {
        &[Self::Sparse, Self::Normal, Self::Dense, Self::Fine]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sparse => "Faint isolated filaments",
            Self::Normal => "Balanced trail network",
            Self::Dense => "Thick merged clusters",
            Self::Fine => "Fine detailed veins",
        }
    }
}

impl std::fmt::Display for TrailPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sparse => write!(f, "sparse"),
            Self::Normal => write!(f, "normal"),
            Self::Dense => write!(f, "dense"),
            Self::Fine => write!(f, "fine"),
        }
    }
}

impl std::str::FromStr for TrailPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown trail preset `{}`", s))
    }
}

/// Agent trail simulation parameters
#[derive(Clone, Debug, PartialEq)]
pub struct TrailParams {
    // =========================================================================
    // Run Shape
    // =========================================================================

    /// Number of agents per subsector run (default: 300)
    pub agent_count: usize,

    /// Number of move/deposit/diffuse iterations (default: 200)
    pub iterations: usize,

    /// Field cells per hex along each axis
    pub cell_size: usize,

    // =========================================================================
    // Agent Behaviour
    // =========================================================================

    /// Angle between the forward probe and each side probe (radians)
    pub sensor_angle: f64,

    /// Probe distance along the heading, before scaling
    pub sensor_distance: f64,

    /// Heading change per turn (radians), before scaling
    pub rotation: f64,

    /// Distance moved per iteration, before scaling
    pub step_size: f64,

    /// Trail added to the agent's cell after each move
    pub deposit_amount: f64,

    /// Multiplier for sensor distance, step size and rotation
    pub simulation_scale: f64,

    // =========================================================================
    // Field Evolution
    // =========================================================================

    /// Blend toward the 4-neighbour mean per iteration (0.0-1.0)
    pub diffusion_rate: f64,

    /// Multiplier applied after diffusion (0.0-1.0)
    pub decay_rate: f64,

    /// Amplitude of the seeded initial noise
    pub noise_amplitude: f64,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            agent_count: 300,
            iterations: 200,
            cell_size: 10,

            sensor_angle: PI / 4.0,
            sensor_distance: 4.0,
            rotation: PI / 8.0,
            step_size: 1.0,
            deposit_amount: 1.0,
            simulation_scale: 1.0,

            diffusion_rate: 0.5,
            decay_rate: 0.95,
            noise_amplitude: 0.01,
        }
    }
}

impl TrailParams {
    /// Create a fast configuration for testing (tiny runs)
    pub fn fast() -> Self {
        Self {
            agent_count: 40,
            iterations: 20,
            cell_size: 4,
            ..Default::default()
        }
    }

    /// Create parameters from a preset. Presets only set the run shape
    /// (agents, iterations, scale); field dynamics stay at the defaults.
    pub fn from_preset(preset: TrailPreset) -> Self {
        match preset {
            TrailPreset::Sparse => Self {
                agent_count: 120,
                iterations: 120,
                ..Default::default()
            },
            TrailPreset::Normal => Self::default(),
            TrailPreset::Dense => Self {
                agent_count: 900,
                iterations: 250,
                ..Default::default()
            },
            TrailPreset::Fine => Self {
                iterations: 400,
                simulation_scale: 0.6,
                ..Default::default()
            },
        }
    }

    pub fn scaled_sensor_distance(&self) -> f64 {
        self.sensor_distance * self.simulation_scale
    }

    pub fn scaled_step(&self) -> f64 {
        self.step_size * self.simulation_scale
    }

    pub fn scaled_rotation(&self) -> f64 {
        self.rotation * self.simulation_scale
    }

    /// Reject values that would make the field negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroDimension { name: "cell_size", value: 0 });
        }
        if !(self.simulation_scale.is_finite() && self.simulation_scale > 0.0) {
            return Err(ConfigError::SimulationScale(self.simulation_scale));
        }
        let unit = |name: &'static str, value: f64| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::TrailParam { name, value })
            }
        };
        unit("diffusion_rate", self.diffusion_rate)?;
        unit("decay_rate", self.decay_rate)?;
        let non_negative = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::TrailParam { name, value })
            }
        };
        non_negative("deposit_amount", self.deposit_amount)?;
        non_negative("noise_amplitude", self.noise_amplitude)?;
        non_negative("sensor_distance", self.sensor_distance)?;
        non_negative("step_size", self.step_size)?;
        if !self.sensor_angle.is_finite() {
            return Err(ConfigError::TrailParam { name: "sensor_angle", value: self.sensor_angle });
        }
        if !self.rotation.is_finite() {
            return Err(ConfigError::TrailParam { name: "rotation", value: self.rotation });
        }
        Ok(())
    }
}
