use anyhow::Context;
use clap::Parser;
use profile_simulator::{SimulationConfig, simulate};
use pulse_snr_common::{init_tracer, profile_file::save_profiles};
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file describing the profiles to simulate
    #[clap(long)]
    config: PathBuf,

    /// File the simulated profiles are written to, one profile per line
    #[clap(long)]
    output: PathBuf,

    /// Seed of the random number generator, overriding the one in the config file
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(LevelFilter::INFO);

    let file = File::open(&args.config)
        .with_context(|| format!("Cannot open {}", args.config.display()))?;
    let mut config: SimulationConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let profiles = simulate(&config)?;
    save_profiles(&args.output, profiles.rows())?;
    info!(
        "Wrote {} profiles of {} bins to {}",
        config.num_profiles,
        config.num_bins,
        args.output.display()
    );
    Ok(())
}
