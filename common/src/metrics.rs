use metrics::{describe_counter, describe_gauge, gauge};

pub fn component_info_metric(name: &'static str) {
    static NAME: &str = "pulse_snr_component_info";

    describe_gauge!(NAME, "Basic information about the component");

    let version = env!("CARGO_PKG_VERSION");
    gauge!(NAME, "component" => name, "version" => version).set(1);
}

/// Registers descriptions for the counters emitted by the matched filter.
pub fn describe_metrics() {
    describe_counter!(
        names::PROFILES_PROCESSED,
        metrics::Unit::Count,
        "Number of profiles searched"
    );
    describe_counter!(
        names::TEMPLATES_EVALUATED,
        metrics::Unit::Count,
        "Number of (profile, template) pairs correlated"
    );
    describe_counter!(
        names::FAILURES,
        metrics::Unit::Count,
        "Number of failures encountered"
    );
}

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "pulse_snr_";

    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const PROFILES_PROCESSED: &str = concatcp!(METRIC_NAME_PREFIX, "profiles_processed");
    pub const TEMPLATES_EVALUATED: &str = concatcp!(METRIC_NAME_PREFIX, "templates_evaluated");
}

pub mod failures {
    #[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        InvalidParameter,
        InsufficientData,
        DegenerateInput,
        ShapeMismatch,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::InvalidParameter => "invalid_parameter",
                FailureKind::InsufficientData => "insufficient_data",
                FailureKind::DegenerateInput => "degenerate_input",
                FailureKind::ShapeMismatch => "shape_mismatch",
            },
        )
    }
}
