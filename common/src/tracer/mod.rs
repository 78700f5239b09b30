mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerOptions};

/// Should be called at the start of each binary.
/// Expands to a `TracerEngine` named after the calling binary, logging at
/// `$level` unless `RUST_LOG` says otherwise.
#[macro_export]
macro_rules! init_tracer {
    ($level:expr) => {{
        $crate::tracer::TracerEngine::new(
            $crate::tracer::TracerOptions {
                default_level: $level,
            },
            env!("CARGO_BIN_NAME"),
        )
    }};
}
