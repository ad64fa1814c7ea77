//! Prometheus publication of check results.
//!
//! ## Metrics
//!
//! - `probe_nagios_result{output}`: result code of the check, labelled with
//!   the plugin message
//! - `probe_nagios_perfdata{key}`: one series per performance data key

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

use super::output::CheckResult;

pub const RESULT_METRIC: &str = "probe_nagios_result";
pub const PERFDATA_METRIC: &str = "probe_nagios_perfdata";

const RESULT_HELP: &str =
    "Returns the Nagios probe result (0=success, 1=warning, 2=error, 3=unknown)";
const PERFDATA_HELP: &str = "Holds Nagios probe performance data";

/// Metric registration or encoding failure.
#[derive(Debug, Error)]
#[error("failed to publish probe metrics: {0}")]
pub struct PublishError(#[from] pub prometheus::Error);

/// Gauges for one probe, registered against the caller's registry.
#[derive(Clone)]
pub struct ResultPublisher {
    result: GaugeVec,
    perf_data: GaugeVec,
}

impl ResultPublisher {
    /// Register both gauge families. Fails if the registry already has them.
    pub fn register(registry: &Registry) -> Result<Self, PublishError> {
        let result = GaugeVec::new(Opts::new(RESULT_METRIC, RESULT_HELP), &["output"])?;
        registry.register(Box::new(result.clone()))?;

        let perf_data = GaugeVec::new(Opts::new(PERFDATA_METRIC, PERFDATA_HELP), &["key"])?;
        registry.register(Box::new(perf_data.clone()))?;

        Ok(Self { result, perf_data })
    }

    /// Set the result gauge and one perfdata series per key.
    pub fn publish(&self, check: &CheckResult) {
        self.result
            .with_label_values(&[check.message.as_str()])
            .set(f64::from(check.kind.code()));

        for (key, value) in &check.perf_data {
            self.perf_data.with_label_values(&[key.as_str()]).set(*value);
        }
    }
}

/// Render a registry in the Prometheus text exposition format.
pub fn render(registry: &Registry) -> Result<String, PublishError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::output::ResultKind;

    #[test]
    fn test_publish_result_and_perfdata() {
        let registry = Registry::new();
        let publisher = ResultPublisher::register(&registry).unwrap();

        let check = CheckResult::from_exit(1, "WARN - slow | time=120ms;500 load=3.2");
        publisher.publish(&check);

        let text = render(&registry).unwrap();
        assert!(text.contains("probe_nagios_result{output=\"WARN - slow\"} 1"));
        assert!(text.contains("probe_nagios_perfdata{key=\"time\"} 120"));
        assert!(text.contains("probe_nagios_perfdata{key=\"load\"} 3.2"));
    }

    #[test]
    fn test_help_texts() {
        let registry = Registry::new();
        let publisher = ResultPublisher::register(&registry).unwrap();
        publisher.publish(&CheckResult::from_exit(0, "OK | up=1"));

        let text = render(&registry).unwrap();
        assert!(text.contains("# HELP probe_nagios_perfdata Holds Nagios probe performance data"));
        assert!(text.contains(&format!("# HELP probe_nagios_result {RESULT_HELP}")));
    }

    #[test]
    fn test_publish_without_perfdata() {
        let registry = Registry::new();
        let publisher = ResultPublisher::register(&registry).unwrap();
        publisher.publish(&CheckResult::new(ResultKind::Unknown, "boom"));

        let text = render(&registry).unwrap();
        assert!(text.contains("probe_nagios_result{output=\"boom\"} 3"));
        assert!(!text.contains("probe_nagios_perfdata{"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        ResultPublisher::register(&registry).unwrap();
        assert!(ResultPublisher::register(&registry).is_err());
    }
}
