use crate::SimulationError;
use pulse_snr_common::{Bin, Real};
use serde::Deserialize;

const FWHM_PER_SIGMA: Real = 2.354_820_045_030_949_3;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "shape-type")]
pub enum PulseShape {
    /// Peaks at the pulse bin, extending over the whole profile.
    Gaussian { fwhm: Real },
    /// Starts at the pulse bin.
    Boxcar { width: usize },
    /// Arbitrary samples, `reference_bin` landing on the pulse bin.
    #[serde(rename_all = "kebab-case")]
    Samples {
        values: Vec<Real>,
        reference_bin: Bin,
    },
}

/// A pulse added on top of the noise.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct InjectedPulse {
    /// Profile the pulse is added to, or every profile if absent.
    #[serde(default)]
    pub profile: Option<usize>,
    pub bin: Bin,
    /// Scale applied to the shape, the peak height for gaussians and boxcars.
    pub amplitude: Real,
    pub shape: PulseShape,
}

impl InjectedPulse {
    pub fn new(profile: Option<usize>, bin: Bin, amplitude: Real, shape: PulseShape) -> Self {
        Self {
            profile,
            bin,
            amplitude,
            shape,
        }
    }

    pub(crate) fn validate(
        &self,
        index: usize,
        num_profiles: usize,
        num_bins: usize,
    ) -> Result<(), SimulationError> {
        let invalid = |reason: String| SimulationError::InvalidPulse {
            pulse: index,
            reason,
        };
        if let Some(profile) = self.profile.filter(|&p| p >= num_profiles) {
            return Err(invalid(format!(
                "profile {profile} is outside the {num_profiles} profiles"
            )));
        }
        if self.bin >= num_bins {
            return Err(invalid(format!("bin {} is outside the {num_bins} bins", self.bin)));
        }
        if !self.amplitude.is_finite() {
            return Err(invalid(format!("amplitude {} is not finite", self.amplitude)));
        }
        match &self.shape {
            PulseShape::Gaussian { fwhm } if !fwhm.is_finite() || *fwhm <= 0.0 => {
                Err(invalid(format!("FWHM {fwhm} is not strictly positive")))
            }
            PulseShape::Boxcar { width } if *width == 0 || *width > num_bins => Err(invalid(
                format!("boxcar width {width} is not within 1..={num_bins}"),
            )),
            PulseShape::Samples {
                values,
                reference_bin,
            } if values.is_empty() || values.len() > num_bins || *reference_bin >= values.len() => {
                Err(invalid(format!(
                    "{} samples with reference bin {reference_bin} do not fit {num_bins} bins",
                    values.len()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Adds the pulse to `profile`, wrapping around its ends.
    pub(crate) fn add_to(&self, profile: &mut [Real]) {
        let num_bins = profile.len();
        let wrapped =
            |offset: usize, reference: usize| (self.bin + num_bins + offset - reference) % num_bins;
        match &self.shape {
            PulseShape::Gaussian { fwhm } => {
                let sigma = fwhm / FWHM_PER_SIGMA;
                for (bin, value) in profile.iter_mut().enumerate() {
                    let distance = bin.abs_diff(self.bin);
                    let distance = distance.min(num_bins - distance) as Real;
                    *value += self.amplitude * (-0.5 * (distance / sigma).powi(2)).exp();
                }
            }
            PulseShape::Boxcar { width } => {
                for offset in 0..*width {
                    profile[wrapped(offset, 0)] += self.amplitude;
                }
            }
            PulseShape::Samples {
                values,
                reference_bin,
            } => {
                for (offset, sample) in values.iter().enumerate() {
                    profile[wrapped(offset, *reference_bin)] += self.amplitude * sample;
                }
            }
        }
    }
}
