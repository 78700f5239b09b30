use super::Template;
use crate::error::{Parameter, SnrError, SnrResult};
use itertools::Itertools;
use pulse_snr_common::Real;
use std::ops::Index;

/// `num` values spaced geometrically from `min` to `max`, both included.
pub fn geomspace(min: Real, max: Real, num: usize) -> SnrResult<Vec<Real>> {
    if !(min.is_finite() && min > 0.0) {
        return Err(SnrError::not_positive(Parameter::WidthRange, min));
    }
    if !(max.is_finite() && max >= min) {
        return Err(SnrError::invalid(
            Parameter::WidthRange,
            format!("maximum {max} is below minimum {min}"),
        ));
    }
    if num == 0 {
        return Err(SnrError::invalid(Parameter::NumTemplates, "must be at least 1"));
    }
    if num == 1 {
        return Ok(vec![min]);
    }
    let ratio = (max / min).ln() / (num - 1) as Real;
    Ok((0..num)
        .map(|i| {
            if i == num - 1 {
                max
            } else {
                min * (ratio * i as Real).exp()
            }
        })
        .collect())
}

/// An ordered, non-empty collection of templates.
///
/// Templates keep the order they were supplied in, which is the order
/// template indices refer to in detection results.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBank {
    templates: Vec<Template>,
}

impl TemplateBank {
    pub fn new(templates: Vec<Template>) -> SnrResult<Self> {
        if templates.is_empty() {
            return Err(SnrError::invalid(Parameter::TemplateBank, "no templates"));
        }
        Ok(Self { templates })
    }

    /// One Gaussian per FWHM in `widths`, in the given order.
    pub fn gaussians(widths: &[Real]) -> SnrResult<Self> {
        Self::new(
            widths
                .iter()
                .copied()
                .map(Template::gaussian)
                .collect::<SnrResult<_>>()?,
        )
    }

    /// One boxcar per width in `widths`, in the given order.
    pub fn boxcars(widths: &[usize]) -> SnrResult<Self> {
        Self::new(
            widths
                .iter()
                .copied()
                .map(Template::boxcar)
                .collect::<SnrResult<_>>()?,
        )
    }

    /// Gaussians with FWHMs geometrically spaced over `[min, max]`.
    pub fn log_spaced_gaussians(min: Real, max: Real, num: usize) -> SnrResult<Self> {
        Self::gaussians(&geomspace(min, max, num)?)
    }

    /// Boxcars with widths geometrically spaced over `[min, max]`, rounded to
    /// whole bins. Duplicate widths after rounding are dropped.
    pub fn log_spaced_boxcars(min: usize, max: usize, num: usize) -> SnrResult<Self> {
        let widths = geomspace(min as Real, max as Real, num)?
            .into_iter()
            .map(|w| w.round() as usize)
            .dedup()
            .collect::<Vec<_>>();
        Self::boxcars(&widths)
    }

    /// A new bank with `template` appended.
    pub fn with(&self, template: Template) -> Self {
        let mut templates = self.templates.clone();
        templates.push(template);
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false for a constructed bank.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    /// Size of the largest template.
    pub fn max_size(&self) -> usize {
        self.templates.iter().map(Template::size).max().unwrap_or_default()
    }
}

impl Index<usize> for TemplateBank {
    type Output = Template;

    fn index(&self, index: usize) -> &Template {
        &self.templates[index]
    }
}

impl<'a> IntoIterator for &'a TemplateBank {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}
