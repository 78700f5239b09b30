//! Robust estimation of the noise background of a profile.
//!
//! Pulses occupy a small fraction of the bins of a profile, so location and
//! scale are estimated from order statistics, which the pulse samples barely
//! move, rather than from the sample mean and variance.
mod order_statistics;

use crate::error::{Parameter, SnrError, SnrResult};
use itertools::Itertools;
use ndarray::ArrayView1;
use order_statistics::{median, quantile, sorted};
use pulse_snr_common::{Bin, Real};
use std::fmt::Display;
use thiserror::Error;
use tracing::trace;

/// Fewest bins a profile may have for its noise to be estimated from data.
pub const MIN_PROFILE_BINS: usize = 8;

/// Width of the interquartile range of a standard normal distribution.
pub const IQR_PER_SIGMA: Real = 1.348_979_500_392_163_4;

/// Scale factor making the median absolute deviation consistent with the
/// standard deviation of a normal distribution.
pub const MAD_TO_SIGMA: Real = 1.482_602_218_505_602;

#[derive(Debug, Error, PartialEq)]
pub enum NoiseError {
    #[error("{len} samples, at least {min} required for a robust estimate")]
    InsufficientData { len: usize, min: usize },
    #[error("{method} estimate of the noise standard deviation is {sigma}")]
    DegenerateInput { method: StdMethod, sigma: Real },
    #[error("sample {bin} is not finite")]
    NonFiniteSample { bin: Bin },
}

impl NoiseError {
    pub(crate) fn at_profile(self, profile: usize) -> SnrError {
        SnrError::Noise {
            profile,
            source: self,
        }
    }
}

/// How the noise mean of a profile is obtained.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum MeanMethod {
    #[default]
    Median,
    /// The same caller-supplied value for every profile.
    Fixed(Real),
}

/// How the noise standard deviation of a profile is obtained.
#[derive(Debug, Default, Clone, Copy, PartialEq, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum StdMethod {
    /// From the interquartile range. Robust to outliers, not to red noise.
    #[default]
    Iqr,
    /// From the median absolute deviation. Robust to outliers, not to red noise.
    Mad,
    /// From the covariance of consecutive first differences. Robust to red
    /// noise, not to outliers.
    DiffCov,
    /// The same caller-supplied value for every profile.
    #[strum(disabled)]
    Fixed(Real),
}

impl Display for StdMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iqr => f.write_str("iqr"),
            Self::Mad => f.write_str("mad"),
            Self::DiffCov => f.write_str("diff-cov"),
            Self::Fixed(sigma) => write!(f, "fixed({sigma})"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NoiseSettings {
    pub mean: MeanMethod,
    pub std: StdMethod,
}

impl NoiseSettings {
    pub fn new(mean: MeanMethod, std: StdMethod) -> Self {
        Self { mean, std }
    }

    /// Checks any caller-supplied fixed values.
    pub fn validate(&self) -> SnrResult<()> {
        if let MeanMethod::Fixed(mu) = self.mean {
            if !mu.is_finite() {
                return Err(SnrError::invalid(
                    Parameter::FixedMean,
                    format!("{mu} is not finite"),
                ));
            }
        }
        if let StdMethod::Fixed(sigma) = self.std {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(SnrError::not_positive(Parameter::FixedStd, sigma));
            }
        }
        Ok(())
    }

    fn reads_data(&self) -> bool {
        !matches!(
            (self.mean, self.std),
            (MeanMethod::Fixed(_), StdMethod::Fixed(_))
        )
    }
}

/// Background level and white-noise standard deviation of one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseEstimate {
    pub mu: Real,
    pub sigma: Real,
}

fn std_iqr(sorted: &[Real]) -> Option<Real> {
    Some((quantile(sorted, 0.75)? - quantile(sorted, 0.25)?) / IQR_PER_SIGMA)
}

fn std_mad(sorted: &[Real]) -> Option<Real> {
    let centre = median(sorted)?;
    let deviations = self::sorted(sorted.iter().map(|x| (x - centre).abs()));
    Some(MAD_TO_SIGMA * median(&deviations)?)
}

/// If `x` is white noise of variance `s_w^2` plus a red noise process whose
/// steps have variance `s_r^2`, the first differences `y` satisfy
/// `Cov(y[i], y[i+1]) = -s_w^2` whatever `s_r`.
fn std_diff_cov(profile: &ArrayView1<Real>) -> Option<Real> {
    let diffs: Vec<Real> = profile.iter().tuple_windows().map(|(a, b)| b - a).collect();
    let pairs: Vec<(Real, Real)> = diffs.iter().copied().tuple_windows().collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as Real;
    let mean_lead = pairs.iter().map(|(a, _)| a).sum::<Real>() / n;
    let mean_lag = pairs.iter().map(|(_, b)| b).sum::<Real>() / n;
    let covariance = pairs
        .iter()
        .map(|(a, b)| (a - mean_lead) * (b - mean_lag))
        .sum::<Real>()
        / (n - 1.0);
    Some((-covariance).max(0.0).sqrt())
}

/// Estimates the noise mean and standard deviation of one profile.
pub fn estimate(
    profile: ArrayView1<Real>,
    settings: &NoiseSettings,
) -> Result<NoiseEstimate, NoiseError> {
    if settings.reads_data() && profile.len() < MIN_PROFILE_BINS {
        return Err(NoiseError::InsufficientData {
            len: profile.len(),
            min: MIN_PROFILE_BINS,
        });
    }
    if let Some(bin) = profile.iter().position(|x| !x.is_finite()) {
        return Err(NoiseError::NonFiniteSample { bin });
    }

    let sorted = sorted(profile.iter().copied());
    let insufficient = || NoiseError::InsufficientData {
        len: profile.len(),
        min: MIN_PROFILE_BINS,
    };

    let mu = match settings.mean {
        MeanMethod::Median => median(&sorted).ok_or_else(insufficient)?,
        MeanMethod::Fixed(mu) => mu,
    };
    let sigma = match settings.std {
        StdMethod::Iqr => std_iqr(&sorted).ok_or_else(insufficient)?,
        StdMethod::Mad => std_mad(&sorted).ok_or_else(insufficient)?,
        StdMethod::DiffCov => std_diff_cov(&profile).ok_or_else(insufficient)?,
        StdMethod::Fixed(sigma) => sigma,
    };
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(NoiseError::DegenerateInput {
            method: settings.std,
            sigma,
        });
    }
    trace!(mu, sigma, "Noise estimated");
    Ok(NoiseEstimate { mu, sigma })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{Array1, array};

    #[test]
    fn constant_profile_is_degenerate() {
        let profile = Array1::from_elem(64, 3.5);
        for std in [StdMethod::Iqr, StdMethod::Mad, StdMethod::DiffCov] {
            let err = estimate(profile.view(), &NoiseSettings::new(MeanMethod::Median, std))
                .unwrap_err();
            assert!(matches!(err, NoiseError::DegenerateInput { method, .. } if method == std));
        }
    }

    #[test]
    fn short_profile_is_insufficient() {
        let profile = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(
            estimate(profile.view(), &NoiseSettings::default()),
            Err(NoiseError::InsufficientData { len: 7, min: 8 })
        );
    }

    #[test]
    fn short_profile_with_fixed_values() {
        let settings = NoiseSettings::new(MeanMethod::Fixed(1.0), StdMethod::Fixed(2.0));
        let profile = array![1.0, 2.0, 3.0];
        assert_eq!(
            estimate(profile.view(), &settings),
            Ok(NoiseEstimate { mu: 1.0, sigma: 2.0 })
        );
    }

    #[test]
    fn non_finite_sample() {
        let mut profile = Array1::linspace(0.0, 1.0, 16);
        profile[5] = Real::NAN;
        assert_eq!(
            estimate(profile.view(), &NoiseSettings::default()),
            Err(NoiseError::NonFiniteSample { bin: 5 })
        );
    }

    #[test]
    fn median_and_iqr_of_ramp() {
        // 0, 1, ..., 100: quartiles at 25 and 75, median 50.
        let profile = Array1::linspace(0.0, 100.0, 101);
        let noise = estimate(profile.view(), &NoiseSettings::default()).unwrap();
        assert_approx_eq!(noise.mu, 50.0);
        assert_approx_eq!(noise.sigma, 50.0 / IQR_PER_SIGMA);
    }

    #[test]
    fn mad_of_ramp() {
        // Absolute deviations from 50 are 0, 1, 1, 2, 2, ..., 50, 50: median 25.
        let profile = Array1::linspace(0.0, 100.0, 101);
        let settings = NoiseSettings::new(MeanMethod::Median, StdMethod::Mad);
        let noise = estimate(profile.view(), &settings).unwrap();
        assert_approx_eq!(noise.sigma, 25.0 * MAD_TO_SIGMA);
    }

    #[test]
    fn diff_cov_of_alternating_signal() {
        // Differences alternate +2, -2 so consecutive differences have
        // covariance -4 * m / (m - 1) over m pairs.
        let profile: Array1<Real> = (0..10).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let settings = NoiseSettings::new(MeanMethod::Fixed(0.0), StdMethod::DiffCov);
        let noise = estimate(profile.view(), &settings).unwrap();
        let m: Real = 8.0;
        assert_approx_eq!(noise.sigma, (4.0 * m / (m - 1.0)).sqrt());
        assert_eq!(noise.mu, 0.0);
    }

    #[test]
    fn fixed_values_are_validated() {
        assert!(NoiseSettings::new(MeanMethod::Fixed(Real::NAN), StdMethod::Iqr)
            .validate()
            .is_err());
        assert!(NoiseSettings::new(MeanMethod::Median, StdMethod::Fixed(0.0))
            .validate()
            .is_err());
        assert!(NoiseSettings::new(MeanMethod::Fixed(-3.0), StdMethod::Fixed(0.5))
            .validate()
            .is_ok());
    }

    #[test]
    fn std_method_from_str() {
        assert_eq!("iqr".parse::<StdMethod>().unwrap(), StdMethod::Iqr);
        assert_eq!("mad".parse::<StdMethod>().unwrap(), StdMethod::Mad);
        assert_eq!("diff-cov".parse::<StdMethod>().unwrap(), StdMethod::DiffCov);
        assert!("fixed".parse::<StdMethod>().is_err());
    }
}
