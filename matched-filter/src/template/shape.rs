use super::{PulseKind, Reference};
use crate::error::{Parameter, SnrError, SnrResult};
use pulse_snr_common::Real;

/// Number of Gaussian standard deviations sampled on either side of the peak.
pub const GAUSSIAN_HALF_EXTENT_SIGMAS: Real = 3.5;

/// Most bins sampled on either side of a Gaussian peak.
pub const MAX_GAUSSIAN_HALF_EXTENT: usize = 1 << 20;

/// Ratio of a Gaussian's FWHM to its standard deviation, `2 sqrt(2 ln 2)`.
pub const FWHM_PER_SIGMA: Real = 2.354_820_045_030_949_3;

/// A family of pulse shapes that can be sampled into a [`super::Template`].
pub trait PulseShape {
    fn kind(&self) -> PulseKind;

    /// The shape parameter reported alongside the template, in bins.
    fn width(&self) -> Real;

    /// Which feature of the pulse the reference bin marks.
    fn reference(&self) -> Reference;

    /// Samples the un-normalised kernel.
    fn sample(&self) -> SnrResult<Vec<Real>>;

    /// Index of the alignment anchor within a kernel of `size` samples.
    fn reference_bin(&self, size: usize) -> usize;
}

/// Gaussian pulse of given full width at half maximum, in bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub fwhm: Real,
}

impl Gaussian {
    pub fn new(fwhm: Real) -> Self {
        Self { fwhm }
    }

    pub fn sigma(&self) -> Real {
        self.fwhm / FWHM_PER_SIGMA
    }

    /// Number of bins sampled on either side of the peak, at least 1, or
    /// `None` beyond [`MAX_GAUSSIAN_HALF_EXTENT`].
    pub fn half_extent(&self) -> Option<usize> {
        let extent = (GAUSSIAN_HALF_EXTENT_SIGMAS * self.sigma()).ceil();
        (extent <= MAX_GAUSSIAN_HALF_EXTENT as Real).then(|| (extent as usize).max(1))
    }
}

impl PulseShape for Gaussian {
    fn kind(&self) -> PulseKind {
        PulseKind::Gaussian
    }

    fn width(&self) -> Real {
        self.fwhm
    }

    fn reference(&self) -> Reference {
        Reference::Peak
    }

    fn sample(&self) -> SnrResult<Vec<Real>> {
        if !(self.fwhm.is_finite() && self.fwhm > 0.0) {
            return Err(SnrError::not_positive(Parameter::GaussianWidth, self.fwhm));
        }
        let sigma = self.sigma();
        let half_extent = self.half_extent().ok_or_else(|| {
            SnrError::invalid(
                Parameter::GaussianWidth,
                format!(
                    "{} needs more than {MAX_GAUSSIAN_HALF_EXTENT} samples either side of the peak",
                    self.fwhm
                ),
            )
        })? as isize;
        Ok((-half_extent..=half_extent)
            .map(|x| {
                let x = x as Real;
                (-x * x / (2.0 * sigma * sigma)).exp()
            })
            .collect())
    }

    fn reference_bin(&self, size: usize) -> usize {
        size / 2
    }
}

/// Top-hat pulse of `width` bins, anchored at its first bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boxcar {
    pub width: usize,
}

impl Boxcar {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl PulseShape for Boxcar {
    fn kind(&self) -> PulseKind {
        PulseKind::Boxcar
    }

    fn width(&self) -> Real {
        self.width as Real
    }

    fn reference(&self) -> Reference {
        Reference::Start
    }

    fn sample(&self) -> SnrResult<Vec<Real>> {
        if self.width == 0 {
            return Err(SnrError::not_positive(Parameter::BoxcarWidth, 0.0));
        }
        Ok(vec![1.0; self.width])
    }

    fn reference_bin(&self, _size: usize) -> usize {
        0
    }
}
