//! Synthetic folded profiles: background noise plus injected pulses,
//! described by a JSON document such as
//! ```json
//! {
//!     "num-profiles": 4,
//!     "num-bins": 256,
//!     "seed": 42,
//!     "noise": { "noise-type": "gaussian", "mean": 0, "sd": 1 },
//!     "pulses": [
//!         { "profile": 2, "bin": 100, "amplitude": 8, "shape": { "shape-type": "gaussian", "fwhm": 4 } }
//!     ]
//! }
//! ```
mod noise;
mod pulse;

pub use noise::NoiseSource;
pub use pulse::{InjectedPulse, PulseShape};

use ndarray::{Array2, Axis};
use pulse_snr_common::Real;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::Distribution;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("A simulation needs at least one profile of at least one bin")]
    Empty,
    #[error("Invalid noise source: {0}")]
    InvalidNoise(String),
    #[error("Invalid pulse {pulse}: {reason}")]
    InvalidPulse { pulse: usize, reason: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationConfig {
    pub num_profiles: usize,
    pub num_bins: usize,
    /// Seed of the random number generator, drawn from the OS if absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub noise: Option<NoiseSource>,
    #[serde(default)]
    pub pulses: Vec<InjectedPulse>,
}

impl SimulationConfig {
    pub fn new(num_profiles: usize, num_bins: usize) -> Self {
        Self {
            num_profiles,
            num_bins,
            seed: None,
            noise: None,
            pulses: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_noise(mut self, noise: NoiseSource) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn with_pulse(mut self, pulse: InjectedPulse) -> Self {
        self.pulses.push(pulse);
        self
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if self.num_profiles == 0 || self.num_bins == 0 {
            return Err(SimulationError::Empty);
        }
        self.pulses
            .iter()
            .enumerate()
            .try_for_each(|(index, pulse)| pulse.validate(index, self.num_profiles, self.num_bins))
    }
}

/// Simulates the profiles of `config`, seeding the generator from
/// `config.seed` when present.
pub fn simulate(config: &SimulationConfig) -> Result<Array2<Real>, SimulationError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    simulate_with_rng(config, &mut rng)
}

/// Simulates the profiles of `config` drawing noise from `rng`, ignoring
/// `config.seed`. Noise is drawn profile by profile, bin by bin.
#[instrument(skip_all, fields(num_profiles = config.num_profiles, num_bins = config.num_bins))]
pub fn simulate_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Array2<Real>, SimulationError> {
    config.validate()?;
    let mut profiles = match &config.noise {
        Some(noise) => {
            let distribution = noise.distribution()?;
            Array2::from_shape_simple_fn((config.num_profiles, config.num_bins), || {
                distribution.sample(&mut *rng)
            })
        }
        None => Array2::zeros((config.num_profiles, config.num_bins)),
    };

    for (index, pulse) in config.pulses.iter().enumerate() {
        debug!(pulse = index, profile = ?pulse.profile, bin = pulse.bin, "Injecting pulse");
        let targets = profiles
            .axis_iter_mut(Axis(0))
            .enumerate()
            .filter(|(profile, _)| pulse.profile.is_none_or(|p| p == *profile));
        for (_, mut row) in targets {
            if let Some(row) = row.as_slice_mut() {
                pulse.add_to(row);
            }
        }
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const JSON_INPUT: &str = r#"
    {
        "num-profiles": 3,
        "num-bins": 32,
        "seed": 7,
        "noise": { "noise-type": "gaussian", "mean": 2, "sd": 0.5 },
        "pulses": [
            { "profile": 1, "bin": 10, "amplitude": 20, "shape": { "shape-type": "boxcar", "width": 2 } },
            { "bin": 30, "amplitude": 5, "shape": { "shape-type": "gaussian", "fwhm": 3 } }
        ]
    }
    "#;

    #[test]
    fn config_from_json() {
        let config: SimulationConfig = serde_json::from_str(JSON_INPUT).unwrap();
        assert_eq!(config.num_profiles, 3);
        assert_eq!(config.num_bins, 32);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pulses.len(), 2);
        assert_eq!(config.pulses[1].profile, None);
    }

    #[test]
    fn seeded_simulation_is_reproducible() {
        let config: SimulationConfig = serde_json::from_str(JSON_INPUT).unwrap();
        let first = simulate(&config).unwrap();
        let second = simulate(&config).unwrap();
        assert_eq!(first.dim(), (3, 32));
        assert_eq!(first, second);
    }

    #[test]
    fn pulses_land_where_configured() {
        let config = SimulationConfig::new(2, 16)
            .with_pulse(InjectedPulse::new(Some(1), 15, 4.0, PulseShape::Boxcar { width: 2 }))
            .with_pulse(InjectedPulse::new(None, 8, 1.0, PulseShape::Boxcar { width: 1 }));
        let profiles = simulate(&config).unwrap();
        assert_eq!(profiles.row(0).sum(), 1.0);
        assert_eq!(profiles[[0, 8]], 1.0);
        assert_eq!(profiles[[1, 15]], 4.0);
        assert_eq!(profiles[[1, 0]], 4.0);
        assert_eq!(profiles.row(1).sum(), 9.0);
    }

    #[test]
    fn noise_statistics() {
        let config = SimulationConfig::new(1, 20_000)
            .with_seed(11)
            .with_noise(NoiseSource::Gaussian { mean: 3.0, sd: 2.0 });
        let profiles = simulate(&config).unwrap();
        let row = profiles.row(0);
        assert_approx_eq!(row.mean().unwrap(), 3.0, 0.1);
        assert_approx_eq!(row.std(1.0), 2.0, 0.1);
    }

    #[test]
    fn bundled_config() {
        let config: SimulationConfig =
            serde_json::from_str(include_str!("../configs/two_pulses.json")).unwrap();
        let profiles = simulate(&config).unwrap();
        assert_eq!(profiles.dim(), (4, 512));
        assert_eq!(config.pulses[2].profile, None);
    }

    #[test]
    fn empty_and_invalid_configs() {
        assert!(matches!(
            simulate(&SimulationConfig::new(0, 16)),
            Err(SimulationError::Empty)
        ));
        let config = SimulationConfig::new(1, 16)
            .with_pulse(InjectedPulse::new(None, 20, 1.0, PulseShape::Boxcar { width: 1 }));
        assert!(matches!(
            simulate(&config),
            Err(SimulationError::InvalidPulse { pulse: 0, .. })
        ));
    }
}
