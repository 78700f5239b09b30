use pulse_snr_common::Real;

#[derive(Default, Clone, Debug, PartialEq)]
pub(crate) struct Bound {
    pub(crate) min: Real,
    pub(crate) max: Real,
}

impl Bound {
    /// The range of `data`, widened by `margin` of its extent on both sides.
    pub(crate) fn from<I: Iterator<Item = Real> + Clone>(margin: Real, data: I) -> Bound {
        let min = data.clone().fold(Real::INFINITY, Real::min);
        let max = data.fold(Real::NEG_INFINITY, Real::max);
        if !min.is_finite() || !max.is_finite() {
            return Bound { min: 0.0, max: 1.0 };
        }
        let pad = match margin * (max - min) {
            pad if pad > 0.0 => pad,
            _ => 1.0,
        };
        Bound {
            min: min - pad,
            max: max + pad,
        }
    }
}

#[derive(Default, Clone, Debug)]
pub(crate) struct Bounds {
    pub(crate) bin: Bound,
    pub(crate) value: Bound,
}

impl Bounds {
    pub(crate) fn of_profile(data: &[Real], model: &[Real]) -> Self {
        Self {
            bin: Bound {
                min: 0.0,
                max: data.len().saturating_sub(1).max(1) as Real,
            },
            value: Bound::from(0.05, data.iter().chain(model).copied()),
        }
    }
}
