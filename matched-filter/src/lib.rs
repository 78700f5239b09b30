//! This crate searches folded pulse profiles for pulses with a bank of
//! matched-filter templates, reporting the signal-to-noise ratio of every
//! template at every alignment.
//!
//! A profile is a fixed-length sequence of scalar samples. Typical usage of
//! this crate may look like:
//! ```rust
//! use matched_filter::{MatchedFilter, NoiseSettings, TemplateBank};
//! use ndarray::Array2;
//!
//! # fn main() -> Result<(), matched_filter::SnrError> {
//! let mut profiles = Array2::from_shape_fn((2, 64), |(_, i)| (i % 3) as f64);
//! profiles[[1, 30]] += 40.0;
//! let bank = TemplateBank::log_spaced_boxcars(1, 8, 4)?;   // boxcars of width 1, 2, 4 and 8
//! let detection = MatchedFilter::new(NoiseSettings::default())
//!     .detect(profiles.view(), &bank)?;                     // median and IQR noise estimates
//! let (profile, peak) = detection.global_peak().expect("non-empty");
//! assert_eq!((profile, peak.bin), (1, 30));
//! # Ok(())
//! # }
//! ```
pub mod engine;
pub mod error;
pub mod noise;
pub mod template;

pub use engine::{Detection, MatchedFilter, Peak, detect, detect_profile, profiles_from_rows};
pub use error::{ErrorKind, Parameter, ShapeMismatchError, SnrError, SnrResult};
pub use noise::{MeanMethod, NoiseEstimate, NoiseError, NoiseSettings, StdMethod};
pub use template::{PulseKind, Reference, Template, TemplateBank};
