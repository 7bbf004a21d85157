//! Logging and metrics setup, plus per-operation instrumentation.

use errors::{ConfigurationError, ServiceError};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::future::Future;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be set when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}

/// Installs the Prometheus recorder behind the `metrics` facade and
/// returns the handle used to render `/metrics`.
pub fn install_metrics_recorder() -> Result<PrometheusHandle, ConfigurationError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ConfigurationError::DependencyUnavailable {
            dependency: "metrics recorder".to_string(),
            reason: e.to_string(),
        })
}

/// Runs one orchestrator operation, recording its count, duration and
/// failure kind. Failures are logged here once.
pub async fn record_operation<T, F>(operation: &'static str, work: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    counter!("mindnote_requests_total", "operation" => operation).increment(1);
    let started = Instant::now();

    let result = work.await;

    histogram!("mindnote_request_duration_ms", "operation" => operation)
        .record(started.elapsed().as_secs_f64() * 1000.0);

    if let Err(err) = &result {
        record_failure(operation, err);
    }
    result
}

/// Counts and logs a failure raised outside an orchestrator operation,
/// such as an unreadable request body.
pub fn record_failure(operation: &'static str, err: &ServiceError) {
    counter!(
        "mindnote_errors_total",
        "operation" => operation,
        "kind" => err.kind().as_str()
    )
    .increment(1);
    err.log(operation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::ValidationError;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn test_record_operation_counts_failures() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(async {
                let ok =
                    record_operation("analyze", async { Ok::<u8, ServiceError>(1) }).await;
                assert!(ok.is_ok());

                let err = record_operation("analyze", async {
                    Err::<u8, ServiceError>(ValidationError::EmptyText.into())
                })
                .await;
                assert!(err.is_err());
            });
        });

        let snapshot = snapshotter.snapshot().into_vec();
        let counter_value = |name: &str| {
            snapshot.iter().find_map(|(key, _, _, value)| {
                (key.key().name() == name).then(|| match value {
                    DebugValue::Counter(v) => *v,
                    _ => 0,
                })
            })
        };

        assert_eq!(counter_value("mindnote_requests_total"), Some(2));
        assert_eq!(counter_value("mindnote_errors_total"), Some(1));
    }
}
