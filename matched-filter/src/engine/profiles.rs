use crate::error::{ShapeMismatchError, SnrResult};
use ndarray::Array2;
use pulse_snr_common::Real;

/// Stacks `rows` into a (profiles x bins) array. Every row must have the
/// same, non-zero, length.
pub fn profiles_from_rows<R: AsRef<[Real]>>(rows: &[R]) -> SnrResult<Array2<Real>> {
    let num_bins = rows.first().map(|row| row.as_ref().len()).unwrap_or_default();
    if num_bins == 0 {
        return Err(ShapeMismatchError::Empty.into());
    }
    if let Some((profile, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.as_ref().len() != num_bins)
    {
        return Err(ShapeMismatchError::InconsistentProfileLength {
            profile,
            len: row.as_ref().len(),
            expected: num_bins,
        }
        .into());
    }
    let values = rows.iter().flat_map(|row| row.as_ref().iter().copied()).collect();
    Array2::from_shape_vec((rows.len(), num_bins), values)
        .map_err(|_| ShapeMismatchError::Empty.into())
}
