mod graphics;
mod report;

use clap::Parser;
use graphics::{Bounds, FileFormat, GraphSaver, ProfilePlot, SvgSaver};
use matched_filter::{
    MatchedFilter, MeanMethod, NoiseSettings, PulseKind, StdMethod, TemplateBank,
    profiles_from_rows,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use miette::{IntoDiagnostic, miette};
use pulse_snr_common::{
    Real, init_tracer,
    metrics::{component_info_metric, describe_metrics},
    profile_file::load_profiles,
};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Text file of profiles, one profile per line
    #[clap(long)]
    input: PathBuf,

    /// Template family of the bank: gaussian or boxcar
    #[clap(long, default_value = "gaussian")]
    shape: PulseKind,

    /// Smallest template width in bins (FWHM for gaussians)
    #[clap(long, default_value = "1.0")]
    min_width: Real,

    /// Largest template width in bins (FWHM for gaussians)
    #[clap(long, default_value = "32.0")]
    max_width: Real,

    /// Number of log-spaced template widths
    #[clap(long, default_value = "16")]
    num_templates: usize,

    /// Fixed noise mean, otherwise the median of each profile
    #[clap(long)]
    mu: Option<Real>,

    /// Estimator of the noise standard deviation: iqr, mad or diff-cov
    #[clap(long, default_value = "iqr")]
    sigma_method: StdMethod,

    /// Fixed noise standard deviation, overriding --sigma-method
    #[clap(long)]
    sigma: Option<Real>,

    /// If set, a plot of every profile and its best-fit model is saved to this directory
    #[clap(long)]
    plot_path: Option<PathBuf>,

    /// Width of the plots in pixels
    #[clap(long, default_value = "800")]
    plot_width: u32,

    /// Height of the plots in pixels
    #[clap(long, default_value = "600")]
    plot_height: u32,

    /// If set, counters are written to this file in Prometheus text format at exit
    #[clap(long)]
    metrics_file: Option<PathBuf>,
}

impl Cli {
    fn noise_settings(&self) -> NoiseSettings {
        NoiseSettings::new(
            self.mu.map(MeanMethod::Fixed).unwrap_or_default(),
            self.sigma.map(StdMethod::Fixed).unwrap_or(self.sigma_method),
        )
    }

    fn template_bank(&self) -> miette::Result<TemplateBank> {
        match self.shape {
            PulseKind::Gaussian => TemplateBank::log_spaced_gaussians(
                self.min_width,
                self.max_width,
                self.num_templates,
            ),
            PulseKind::Boxcar => TemplateBank::log_spaced_boxcars(
                self.min_width.round().max(0.0) as usize,
                self.max_width.round().max(0.0) as usize,
                self.num_templates,
            ),
            PulseKind::Custom => {
                return Err(miette!("Custom templates cannot be built from the command line"));
            }
        }
        .into_diagnostic()
    }
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(LevelFilter::INFO);

    let metrics = match &args.metrics_file {
        Some(_) => Some(install_metrics()?),
        None => None,
    };

    let rows = load_profiles(&args.input).into_diagnostic()?;
    let profiles = profiles_from_rows(&rows).into_diagnostic()?;
    let bank = args.template_bank()?;
    info!(
        "Searching {} profiles of {} bins with {} templates",
        profiles.nrows(),
        profiles.ncols(),
        bank.len()
    );

    let engine = MatchedFilter::new(args.noise_settings());
    info!("Noise estimation: {:?}", engine.noise_settings());
    let result = engine.detect(profiles.view(), &bank);

    // Failures are counted too, so the metrics are written before the result is checked.
    if let (Some(handle), Some(path)) = (&metrics, &args.metrics_file) {
        write_metrics(handle, path)?;
    }
    let detection = result.into_diagnostic()?;

    println!("{}", report::HEADER);
    for profile in 0..detection.num_profiles() {
        if let Some(line) = report::best_fit_line(&detection, &bank, profile) {
            println!("{line}");
        }
    }

    if let Some(plot_path) = &args.plot_path {
        let rows = profiles.rows().into_iter().zip(detection.models.rows());
        for (profile, (data, model)) in rows.enumerate() {
            let data = data.to_vec();
            let model = model.to_vec();
            let plot = ProfilePlot {
                title: format!("Profile {profile}"),
                data: &data,
                model: &model,
            };
            let path = FileFormat::Svg.build_path(plot_path, profile)?;
            SvgSaver::save_as_svg(
                &plot,
                path,
                (args.plot_width, args.plot_height),
                Bounds::of_profile(&data, &model),
            )?;
        }
        info!("Plots saved to {}", plot_path.display());
    }
    Ok(())
}

fn install_metrics() -> miette::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().into_diagnostic()?;
    describe_metrics();
    component_info_metric("snr-search");
    Ok(handle)
}

fn write_metrics(handle: &PrometheusHandle, path: &Path) -> miette::Result<()> {
    std::fs::write(path, handle.render()).into_diagnostic()?;
    info!("Metrics written to {}", path.display());
    Ok(())
}
