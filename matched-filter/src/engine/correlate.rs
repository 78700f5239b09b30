use ndarray::ArrayView1;
use pulse_snr_common::{Bin, Real};

/// Index of the profile bin that kernel sample `j` overlaps when the kernel's
/// reference bin sits on profile bin `bin`, wrapping around the profile.
pub(crate) fn wrapped_bin(bin: Bin, j: usize, reference_bin: Bin, num_bins: usize) -> Bin {
    (bin + num_bins + j - reference_bin) % num_bins
}

/// Cyclic cross-correlation of `kernel` with the normalised profile `z`.
///
/// Element `bin` of the output is `sum_j kernel[j] * z[bin + j - reference_bin]`
/// with indices taken modulo the profile length. Requires
/// `reference_bin < kernel.len() <= z.len()`.
///
/// Summed directly in `O(z.len() * kernel.len())`: kernels span a few widths
/// and are much shorter than the profile, and direct sums carry no FFT
/// round-off. Banks of kernels close to the profile length would be cheaper
/// through an FFT.
pub(crate) fn correlate_cyclic(z: ArrayView1<Real>, kernel: &[Real], reference_bin: Bin) -> Vec<Real> {
    let num_bins = z.len();
    (0..num_bins)
        .map(|bin| {
            kernel
                .iter()
                .enumerate()
                .map(|(j, k)| k * z[wrapped_bin(bin, j, reference_bin, num_bins)])
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    #[test]
    fn impulse_response() {
        // An impulse at bin 3 is seen when kernel sample j overlaps it,
        // i.e. at bin 3 + reference_bin - j.
        let z = array![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let kernel = [1.0, 2.0, 3.0];
        let output = correlate_cyclic(z.view(), &kernel, 1);
        assert_eq!(output, vec![0.0, 0.0, 3.0, 2.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn wraps_around_edges() {
        let z = array![1.0, 0.0, 0.0, 0.0, 0.0];
        let kernel = [1.0, 2.0, 3.0];
        let output = correlate_cyclic(z.view(), &kernel, 0);
        assert_eq!(output, vec![1.0, 0.0, 0.0, 3.0, 2.0]);
    }

    #[test]
    fn kernel_as_long_as_profile() {
        let z = array![1.0, 2.0, 3.0, 4.0];
        let kernel = [0.5; 4];
        let output = correlate_cyclic(z.view(), &kernel, 2);
        for value in output {
            assert_approx_eq!(value, 5.0);
        }
    }
}
