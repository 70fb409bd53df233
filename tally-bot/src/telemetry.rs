use std::time::Duration;

use opentelemetry_otlp::MetricExporter;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use tracing::{info, warn};

use crate::config::MetricsExporter;

const SERVICE_NAME: &str = "tally-bot";

/// Periodic reader push cadence.
const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

fn meter_provider<E: PushMetricExporter>(exporter: E, interval: Duration) -> SdkMeterProvider {
    let reader = PeriodicReader::builder(exporter)
        .with_interval(interval)
        .build();

    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build()
}

/// Install the global meter provider for the configured exporter.
///
/// Returns `None` when export is disabled; the global meter then stays a no-op.
pub fn init_metrics(exporter: MetricsExporter) -> anyhow::Result<Option<SdkMeterProvider>> {
    let provider = match exporter {
        MetricsExporter::Otlp => {
            let exporter = MetricExporter::builder().with_http().build()?;
            meter_provider(exporter, METRIC_EXPORT_INTERVAL)
        }
        MetricsExporter::None => {
            info!("metrics export disabled");
            return Ok(None);
        }
    };

    opentelemetry::global::set_meter_provider(provider.clone());
    info!(?exporter, "metrics export enabled");

    Ok(Some(provider))
}

/// Flush pending gauges and stop the exporter.
pub fn shutdown_metrics(provider: Option<SdkMeterProvider>) {
    if let Some(provider) = provider
        && let Err(source) = provider.shutdown()
    {
        warn!(?source, "failed to shut down meter provider");
    }
}
