use pulse_snr_common::Real;

/// Returns a sorted copy of `values`.
pub(crate) fn sorted(values: impl IntoIterator<Item = Real>) -> Vec<Real> {
    let mut sorted: Vec<Real> = values.into_iter().collect();
    sorted.sort_by(Real::total_cmp);
    sorted
}

/// Quantile `q` in `[0, 1]` of already sorted data, interpolating linearly
/// between the two nearest order statistics.
pub(crate) fn quantile(sorted: &[Real], q: Real) -> Option<Real> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as Real;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as Real;
    let (low, high) = (*sorted.get(lower)?, *sorted.get(upper)?);
    Some(low + fraction * (high - low))
}

pub(crate) fn median(sorted: &[Real]) -> Option<Real> {
    quantile(sorted, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn empty() {
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn single_value() {
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(quantile(&[3.0], 0.9), Some(3.0));
    }

    #[test]
    fn linear_interpolation() {
        // numpy.percentile(range(10), (25, 50, 75)) == (2.25, 4.5, 6.75)
        let data = sorted((0..10).rev().map(|i| i as Real));
        assert_approx_eq!(quantile(&data, 0.25).unwrap(), 2.25);
        assert_approx_eq!(median(&data).unwrap(), 4.5);
        assert_approx_eq!(quantile(&data, 0.75).unwrap(), 6.75);
        assert_eq!(quantile(&data, 0.0), Some(0.0));
        assert_eq!(quantile(&data, 1.0), Some(9.0));
    }
}
