pub mod metrics;
pub mod profile_file;
pub mod tracer;

/// Scalar type of every sample, template value and S/N.
pub type Real = f64;

/// Index of a bin (phase/time sample) within a profile.
pub type Bin = usize;
