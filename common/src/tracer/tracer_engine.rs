use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

pub struct TracerOptions {
    /// Level used when `RUST_LOG` is unset or unparsable.
    pub default_level: LevelFilter,
}

/// This object initialises the console tracer, given a TracerOptions struct.
pub struct TracerEngine {}

impl TracerEngine {
    /// Initialises the stderr tracer for the binary
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the binary, recorded in the first log line.
    /// #Returns
    /// An instance of TracerEngine
    pub fn new(options: TracerOptions, service_name: &str) -> Self {
        let console_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        // This filter is applied to the console tracer
        let log_filter = EnvFilter::builder()
            .with_default_directive(options.default_level.into())
            .from_env_lossy();

        let subscriber =
            tracing_subscriber::Registry::default().with(console_tracer.with_filter(log_filter));

        // A second initialisation (e.g. from tests) keeps the first subscriber
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            debug!("Tracer initialised for {service_name}");
        }

        Self {}
    }
}
