use crate::SimulationError;
use pulse_snr_common::Real;
use rand::{Rng, distr::Uniform};
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

/// Additive background noise, drawn independently for every bin.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "noise-type")]
pub enum NoiseSource {
    Gaussian { mean: Real, sd: Real },
    Uniform { min: Real, max: Real },
}

pub(crate) enum NoiseDistribution {
    Gaussian(Normal<Real>),
    Uniform(Uniform<Real>),
}

impl NoiseSource {
    pub(crate) fn distribution(&self) -> Result<NoiseDistribution, SimulationError> {
        match self {
            Self::Gaussian { mean, sd } => Normal::new(*mean, *sd)
                .map(NoiseDistribution::Gaussian)
                .map_err(|e| SimulationError::InvalidNoise(e.to_string())),
            Self::Uniform { min, max } => Uniform::new(*min, *max)
                .map(NoiseDistribution::Uniform)
                .map_err(|e| SimulationError::InvalidNoise(e.to_string())),
        }
    }
}

impl Distribution<Real> for NoiseDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Real {
        match self {
            Self::Gaussian(normal) => normal.sample(rng),
            Self::Uniform(uniform) => uniform.sample(rng),
        }
    }
}
