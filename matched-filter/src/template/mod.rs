//! Pulse templates: sampled, immutable kernels with an alignment anchor.
mod bank;
mod shape;

pub use bank::{TemplateBank, geomspace};
pub use shape::{
    Boxcar, FWHM_PER_SIGMA, GAUSSIAN_HALF_EXTENT_SIGMAS, Gaussian, MAX_GAUSSIAN_HALF_EXTENT, PulseShape,
};

use crate::error::{Parameter, SnrError, SnrResult};
use pulse_snr_common::{Bin, Real};
use std::fmt::Display;

/// Tag of the family a template was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PulseKind {
    Gaussian,
    Boxcar,
    Custom,
}

/// What the reference bin of a template corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Reference {
    Start,
    Peak,
    Custom,
}

/// A noise-free pulse template.
///
/// If `S` is the S/N obtained by correlating this template with a profile,
/// `S[k]` is the S/N when profile bin `k` is aligned with `reference_bin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    kind: PulseKind,
    width: Option<Real>,
    reference: Reference,
    reference_bin: Bin,
    values: Vec<Real>,
    norm: Real,
    normalized: Vec<Real>,
}

impl Template {
    fn from_parts(
        kind: PulseKind,
        width: Option<Real>,
        reference: Reference,
        reference_bin: Bin,
        values: Vec<Real>,
    ) -> SnrResult<Self> {
        if values.is_empty() {
            return Err(SnrError::invalid(Parameter::TemplateValues, "no samples"));
        }
        if let Some(bin) = values.iter().position(|v| !v.is_finite()) {
            return Err(SnrError::invalid(
                Parameter::TemplateValues,
                format!("sample {bin} is not finite"),
            ));
        }
        if reference_bin >= values.len() {
            return Err(SnrError::invalid(
                Parameter::ReferenceBin,
                format!("{reference_bin} is outside a kernel of {} samples", values.len()),
            ));
        }
        // Scaled by the largest magnitude so squaring neither overflows nor underflows.
        let max_abs = values.iter().fold(0.0, |max: Real, v| max.max(v.abs()));
        if max_abs == 0.0 {
            return Err(SnrError::invalid(Parameter::TemplateValues, "all samples are zero"));
        }
        let scaled_norm = values.iter().map(|v| (v / max_abs).powi(2)).sum::<Real>().sqrt();
        let norm = max_abs * scaled_norm;
        if !norm.is_finite() {
            return Err(SnrError::invalid(
                Parameter::TemplateValues,
                "the L2 norm of the samples overflows",
            ));
        }
        let normalized = values.iter().map(|v| v / max_abs / scaled_norm).collect();
        Ok(Self {
            kind,
            width,
            reference,
            reference_bin,
            values,
            norm,
            normalized,
        })
    }

    /// Samples `shape` into a template.
    pub fn generate<S: PulseShape + ?Sized>(shape: &S) -> SnrResult<Self> {
        let values = shape.sample()?;
        let reference_bin = shape.reference_bin(values.len());
        Self::from_parts(
            shape.kind(),
            Some(shape.width()),
            shape.reference(),
            reference_bin,
            values,
        )
    }

    /// Gaussian of full width at half maximum `fwhm` bins, anchored at its peak.
    pub fn gaussian(fwhm: Real) -> SnrResult<Self> {
        Self::generate(&Gaussian::new(fwhm))
    }

    /// Boxcar of `width` bins, anchored at its first bin.
    pub fn boxcar(width: usize) -> SnrResult<Self> {
        Self::generate(&Boxcar::new(width))
    }

    /// Wraps an arbitrary kernel.
    pub fn custom(values: Vec<Real>, reference_bin: Bin) -> SnrResult<Self> {
        Self::from_parts(PulseKind::Custom, None, Reference::Custom, reference_bin, values)
    }

    pub fn kind(&self) -> PulseKind {
        self.kind
    }

    pub fn width(&self) -> Option<Real> {
        self.width
    }

    pub fn reference(&self) -> Reference {
        self.reference
    }

    pub fn reference_bin(&self) -> Bin {
        self.reference_bin
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The raw, un-normalised kernel samples.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// L2 norm of the raw kernel.
    pub fn norm(&self) -> Real {
        self.norm
    }

    /// The kernel scaled to unit square sum.
    ///
    /// Correlating this with unit-variance white noise gives unit-variance
    /// output, so the correlation reads directly as an S/N. The kernel is not
    /// de-meaned: profiles are background-subtracted before correlation and
    /// the zero padding outside the kernel must stay at the background level.
    pub fn normalized(&self) -> &[Real] {
        &self.normalized
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template(size={}, kind={}", self.size(), self.kind)?;
        if let Some(width) = self.width {
            write!(f, ", w={width:.3}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn normalized_has_unit_norm() {
        for template in [
            Template::gaussian(0.7).unwrap(),
            Template::gaussian(12.0).unwrap(),
            Template::boxcar(9).unwrap(),
            Template::custom(vec![0.0, 3.0, -4.0], 1).unwrap(),
        ] {
            let sqsum: Real = template.normalized().iter().map(|v| v * v).sum();
            assert_approx_eq!(sqsum, 1.0, 1e-12);
            assert_eq!(template.normalized().len(), template.size());
        }
    }

    #[test]
    fn unit_norm_at_extreme_magnitudes() {
        for scale in [1e200, 1e-170, 1e-310] {
            let values = vec![scale, 2.0 * scale, scale];
            let template = Template::custom(values, 1).unwrap();
            let sqsum: Real = template.normalized().iter().map(|v| v * v).sum();
            assert_approx_eq!(sqsum, 1.0, 1e-12);
            assert_approx_eq!(template.normalized()[1], 2.0 / 6.0_f64.sqrt(), 1e-12);
            assert!(template.norm().is_finite() && template.norm() > 0.0);
        }
    }

    #[test]
    fn norm_overflow_rejected() {
        let result = Template::custom(vec![Real::MAX, Real::MAX], 0);
        assert!(matches!(
            result,
            Err(SnrError::InvalidParameter {
                parameter: Parameter::TemplateValues,
                ..
            })
        ));
    }

    #[test]
    fn custom_keeps_raw_values() {
        let template = Template::custom(vec![0.0, 3.0, -4.0], 1).unwrap();
        assert_eq!(template.values(), &[0.0, 3.0, -4.0]);
        assert_approx_eq!(template.norm(), 5.0);
        assert_approx_eq!(template.normalized()[2], -0.8);
        assert_eq!(template.kind(), PulseKind::Custom);
        assert_eq!(template.width(), None);
        assert_eq!(template.reference(), Reference::Custom);
    }

    #[test]
    fn custom_rejects_bad_input() {
        let invalid = |result: SnrResult<Template>, expected: Parameter| match result {
            Err(SnrError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, expected),
            other => panic!("expected InvalidParameter, got {other:?}"),
        };
        invalid(Template::custom(vec![], 0), Parameter::TemplateValues);
        invalid(Template::custom(vec![0.0; 4], 0), Parameter::TemplateValues);
        invalid(Template::custom(vec![1.0, Real::NAN], 0), Parameter::TemplateValues);
        invalid(Template::custom(vec![1.0, 2.0], 2), Parameter::ReferenceBin);
    }

    #[test]
    fn huge_gaussian_names_width() {
        let err = Template::gaussian(1e19).unwrap_err();
        assert!(matches!(
            err,
            SnrError::InvalidParameter {
                parameter: Parameter::GaussianWidth,
                ..
            }
        ));
    }

    #[test]
    fn gaussian_metadata() {
        let template = Template::gaussian(5.0).unwrap();
        assert_eq!(template.kind(), PulseKind::Gaussian);
        assert_eq!(template.reference(), Reference::Peak);
        assert_eq!(template.reference_bin(), template.size() / 2);
        assert_eq!(template.width(), Some(5.0));
        assert_eq!(template.to_string(), "Template(size=17, kind=gaussian, w=5.000)");
    }

    #[test]
    fn boxcar_metadata() {
        let template = Template::boxcar(5).unwrap();
        assert_eq!(template.size(), 5);
        assert_eq!(template.reference_bin(), 0);
        assert_eq!(template.reference(), Reference::Start);
        assert_eq!(template.to_string(), "Template(size=5, kind=boxcar, w=5.000)");
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("gaussian".parse::<PulseKind>().unwrap(), PulseKind::Gaussian);
        assert_eq!("boxcar".parse::<PulseKind>().unwrap(), PulseKind::Boxcar);
        assert!("lorentzian".parse::<PulseKind>().is_err());
    }
}
