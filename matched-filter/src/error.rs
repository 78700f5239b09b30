use crate::noise::NoiseError;
use pulse_snr_common::{Real, metrics::failures::FailureKind};
use thiserror::Error;

pub type SnrResult<T> = Result<T, SnrError>;

/// Construction input named by [`SnrError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Parameter {
    #[strum(to_string = "Gaussian FWHM")]
    GaussianWidth,
    #[strum(to_string = "boxcar width")]
    BoxcarWidth,
    #[strum(to_string = "template values")]
    TemplateValues,
    #[strum(to_string = "reference bin")]
    ReferenceBin,
    #[strum(to_string = "template bank")]
    TemplateBank,
    #[strum(to_string = "width range")]
    WidthRange,
    #[strum(to_string = "number of templates")]
    NumTemplates,
    #[strum(to_string = "fixed noise mean")]
    FixedMean,
    #[strum(to_string = "fixed noise standard deviation")]
    FixedStd,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShapeMismatchError {
    #[error("no profiles, or profiles with no bins, were supplied")]
    Empty,
    #[error("profile {profile} has {len} bins, expected {expected}")]
    InconsistentProfileLength {
        profile: usize,
        len: usize,
        expected: usize,
    },
    #[error("template {template} has {size} samples, more than the {num_bins} bins of each profile")]
    TemplateLargerThanProfile {
        template: usize,
        size: usize,
        num_bins: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SnrError {
    #[error("Invalid {parameter}: {reason}")]
    InvalidParameter { parameter: Parameter, reason: String },
    #[error("Profile {profile}: {source}")]
    Noise { profile: usize, source: NoiseError },
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),
}

/// The failure taxonomy every [`SnrError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    InvalidParameter,
    InsufficientData,
    DegenerateInput,
    ShapeMismatch,
}

impl SnrError {
    pub(crate) fn invalid(parameter: Parameter, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_positive(parameter: Parameter, value: Real) -> Self {
        Self::invalid(parameter, format!("{value} is not a finite, strictly positive number"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Noise { source, .. } => match source {
                NoiseError::InsufficientData { .. } => ErrorKind::InsufficientData,
                NoiseError::DegenerateInput { .. } | NoiseError::NonFiniteSample { .. } => {
                    ErrorKind::DegenerateInput
                }
            },
            Self::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
        }
    }
}

impl From<ErrorKind> for FailureKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidParameter => FailureKind::InvalidParameter,
            ErrorKind::InsufficientData => FailureKind::InsufficientData,
            ErrorKind::DegenerateInput => FailureKind::DegenerateInput,
            ErrorKind::ShapeMismatch => FailureKind::ShapeMismatch,
        }
    }
}
