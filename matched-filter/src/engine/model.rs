use super::{Peak, correlate::wrapped_bin};
use crate::{noise::NoiseEstimate, template::Template};
use ndarray::Array1;
use pulse_snr_common::Real;

/// Least-squares amplitude of the raw kernel of `template` given the S/N of
/// its best alignment: the S/N is the amplitude of the unit-norm kernel in
/// units of `sigma`.
pub(crate) fn amplitude(template: &Template, snr: Real, noise: &NoiseEstimate) -> Real {
    noise.sigma * snr / template.norm()
}

/// The raw kernel of `template` scaled by `peak.amplitude`, its reference bin
/// on `peak.bin`, offset by the noise mean. Bins the kernel does not reach
/// hold the noise mean.
pub(crate) fn reconstruct(
    template: &Template,
    peak: &Peak,
    noise: &NoiseEstimate,
    num_bins: usize,
) -> Array1<Real> {
    let mut model = Array1::from_elem(num_bins, noise.mu);
    for (j, value) in template.values().iter().enumerate() {
        model[wrapped_bin(peak.bin, j, template.reference_bin(), num_bins)] +=
            peak.amplitude * value;
    }
    model
}
