//! Matched-filter search of a stack of profiles against a template bank.
//!
//! Every profile is background-subtracted and scaled by its own robust noise
//! estimate, then cyclically correlated with the unit-norm kernel of every
//! template. Profiles are treated as periodic in bin index, so a pulse near
//! one edge is matched by the kernel wrapping onto the other.
mod correlate;
mod model;
mod profiles;

pub use profiles::profiles_from_rows;

use crate::{
    error::{ShapeMismatchError, SnrError, SnrResult},
    noise::{NoiseEstimate, NoiseSettings, estimate},
    template::TemplateBank,
};
use correlate::correlate_cyclic;
use itertools::iproduct;
use metrics::counter;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis, s};
use pulse_snr_common::{
    Bin, Real,
    metrics::{failures, names},
};
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

/// Best alignment of one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Index of the template in the bank.
    pub template: usize,
    /// Profile bin the template's reference bin is aligned with.
    pub bin: Bin,
    pub snr: Real,
    /// Least-squares amplitude of the template's raw kernel, in data units.
    pub amplitude: Real,
}

impl Peak {
    /// Position of the peak as a fraction of the profile length.
    pub fn phase(&self, num_bins: usize) -> Real {
        self.bin as Real / num_bins as Real
    }
}

/// Output of a matched-filter search.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// S/N indexed by (profile, template, bin).
    pub snr: Array3<Real>,
    /// Noise mean of every profile.
    pub mu: Array1<Real>,
    /// Noise standard deviation of every profile.
    pub sigma: Array1<Real>,
    /// Best-fit model of every profile, indexed by (profile, bin).
    pub models: Array2<Real>,
    /// Best alignment of every profile.
    pub peaks: Vec<Peak>,
}

impl Detection {
    pub fn num_profiles(&self) -> usize {
        self.snr.dim().0
    }

    pub fn num_templates(&self) -> usize {
        self.snr.dim().1
    }

    pub fn num_bins(&self) -> usize {
        self.snr.dim().2
    }

    pub fn best_fit(&self, profile: usize) -> Option<&Peak> {
        self.peaks.get(profile)
    }

    /// The highest peak over all profiles, the first profile winning ties.
    pub fn global_peak(&self) -> Option<(usize, &Peak)> {
        self.peaks
            .iter()
            .enumerate()
            .fold(None::<(usize, &Peak)>, |best, (profile, peak)| match best {
                Some((_, current)) if current.snr >= peak.snr => best,
                _ => Some((profile, peak)),
            })
    }
}

/// Position of the maximum of a (template, bin) S/N plane, scanning
/// templates in bank order and bins in increasing order and keeping the
/// first maximum found.
fn argmax(plane: ArrayView2<Real>) -> (usize, Bin, Real) {
    plane
        .indexed_iter()
        .fold((0, 0, Real::NEG_INFINITY), |best, ((template, bin), &snr)| {
            if snr > best.2 { (template, bin, snr) } else { best }
        })
}

/// Matched-filter engine configured with a noise estimation policy.
///
/// A failure in any profile fails the whole search; the error names the
/// lowest failing profile index.
#[derive(Debug, Default, Clone)]
pub struct MatchedFilter {
    noise: NoiseSettings,
}

impl MatchedFilter {
    pub fn new(noise: NoiseSettings) -> Self {
        Self { noise }
    }

    pub fn noise_settings(&self) -> &NoiseSettings {
        &self.noise
    }

    fn check_shapes(profiles: &ArrayView2<Real>, bank: &TemplateBank) -> SnrResult<()> {
        let (num_profiles, num_bins) = profiles.dim();
        if num_profiles == 0 || num_bins == 0 {
            return Err(ShapeMismatchError::Empty.into());
        }
        if let Some((template, t)) = bank.iter().enumerate().find(|(_, t)| t.size() > num_bins) {
            return Err(ShapeMismatchError::TemplateLargerThanProfile {
                template,
                size: t.size(),
                num_bins,
            }
            .into());
        }
        Ok(())
    }

    fn estimate_noise(&self, profiles: &ArrayView2<Real>) -> SnrResult<Vec<NoiseEstimate>> {
        let estimates: Vec<_> = profiles
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|profile| estimate(profile, &self.noise))
            .collect();
        // Sequential pass so the lowest failing profile is the one reported.
        estimates
            .into_iter()
            .enumerate()
            .map(|(profile, result)| {
                result
                    .inspect(|noise| {
                        debug!(profile, mu = noise.mu, sigma = noise.sigma, "Noise estimate");
                    })
                    .map_err(|e| e.at_profile(profile))
            })
            .collect()
    }

    /// Searches every profile (row) of `profiles` with every template of
    /// `bank`.
    #[instrument(skip_all, fields(num_profiles = profiles.nrows(), num_templates = bank.len(), num_bins = profiles.ncols()))]
    pub fn detect(&self, profiles: ArrayView2<Real>, bank: &TemplateBank) -> SnrResult<Detection> {
        let result = self.try_detect(profiles, bank);
        match &result {
            Ok(detection) => {
                counter!(names::PROFILES_PROCESSED).increment(detection.num_profiles() as u64);
                counter!(names::TEMPLATES_EVALUATED)
                    .increment((detection.num_profiles() * detection.num_templates()) as u64);
            }
            Err(e) => {
                counter!(names::FAILURES, &[failures::get_label(e.kind().into())]).increment(1);
            }
        }
        result
    }

    fn try_detect(&self, profiles: ArrayView2<Real>, bank: &TemplateBank) -> SnrResult<Detection> {
        self.noise.validate()?;
        Self::check_shapes(&profiles, bank)?;
        let (num_profiles, num_bins) = profiles.dim();
        let num_templates = bank.len();

        let noise = self.estimate_noise(&profiles)?;

        let normalised: Vec<Array1<Real>> = profiles
            .axis_iter(Axis(0))
            .zip(&noise)
            .map(|(profile, noise)| profile.mapv(|x| (x - noise.mu) / noise.sigma))
            .collect();

        let cells: Vec<(usize, usize)> = iproduct!(0..num_profiles, 0..num_templates).collect();
        let responses: Vec<Vec<Real>> = cells
            .into_par_iter()
            .map(|(profile, index)| {
                let template = &bank[index];
                trace!(profile, template = index, "Correlating");
                correlate_cyclic(
                    normalised[profile].view(),
                    template.normalized(),
                    template.reference_bin(),
                )
            })
            .collect();

        let snr = Array3::from_shape_vec(
            (num_profiles, num_templates, num_bins),
            responses.concat(),
        )
        .map_err(|_| SnrError::from(ShapeMismatchError::Empty))?;

        let mut models = Array2::from_elem((num_profiles, num_bins), 0.0);
        let mut peaks = Vec::with_capacity(num_profiles);
        for (profile, noise) in noise.iter().enumerate() {
            let (template, bin, best) = argmax(snr.slice(s![profile, .., ..]));
            let peak = Peak {
                template,
                bin,
                snr: best,
                amplitude: model::amplitude(&bank[template], best, noise),
            };
            debug!(profile, template, bin, snr = best, "Best fit");
            models
                .row_mut(profile)
                .assign(&model::reconstruct(&bank[template], &peak, noise, num_bins));
            peaks.push(peak);
        }

        Ok(Detection {
            snr,
            mu: noise.iter().map(|n| n.mu).collect(),
            sigma: noise.iter().map(|n| n.sigma).collect(),
            models,
            peaks,
        })
    }
}

/// Searches `profiles` with the default noise estimators (median, IQR).
pub fn detect(profiles: ArrayView2<Real>, bank: &TemplateBank) -> SnrResult<Detection> {
    MatchedFilter::default().detect(profiles, bank)
}

/// Searches a single profile, treated as a stack of one.
pub fn detect_profile(profile: ArrayView1<Real>, bank: &TemplateBank) -> SnrResult<Detection> {
    detect(profile.insert_axis(Axis(0)), bank)
}
