use matched_filter::{Detection, TemplateBank};

pub(crate) const HEADER: &str = "profile\tmu\tsigma\ttemplate\tbin\tphase\tsnr\tamplitude";

/// One tab-separated line describing the best fit of `profile`.
pub(crate) fn best_fit_line(
    detection: &Detection,
    bank: &TemplateBank,
    profile: usize,
) -> Option<String> {
    let peak = detection.best_fit(profile)?;
    let template = bank.get(peak.template)?;
    Some(format!(
        "{profile}\t{:.6}\t{:.6}\t{template}\t{}\t{:.6}\t{:.3}\t{:.6}",
        detection.mu.get(profile)?,
        detection.sigma.get(profile)?,
        peak.bin,
        peak.phase(detection.num_bins()),
        peak.snr,
        peak.amplitude,
    ))
}
