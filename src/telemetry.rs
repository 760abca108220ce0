//! Tracing subscriber setup
//!
//! Console output is pretty or JSON per `logging.format`; `RUST_LOG` overrides
//! the configured level. Spans are additionally exported over OTLP/HTTP when
//! `logging.otlp_endpoint` is set.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::VERSION;
use crate::config::LoggingConfig;

const SERVICE_NAME: &str = "weatherdesk";

/// Keeps the span exporter alive; call [`Telemetry::shutdown`] before exit
#[must_use]
pub struct Telemetry {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    /// Flush pending spans and stop the exporter
    pub fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down span exporter: {e}");
            }
        }
    }
}

/// Install the global subscriber
pub fn init(logging: &LoggingConfig) -> Result<Telemetry> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},tower_http=debug", logging.level)))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    // stdout is reserved for command output
    let (pretty, json) = if logging.format == "json" {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    let tracer_provider = logging
        .otlp_endpoint
        .as_deref()
        .map(tracer_provider)
        .transpose()?;
    let otel = tracer_provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(otel)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = &logging.otlp_endpoint {
        tracing::info!("Exporting spans to {endpoint}");
    }

    Ok(Telemetry { tracer_provider })
}

fn tracer_provider(endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .context("Failed to build OTLP span exporter")?;

    let resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attribute(KeyValue::new(SERVICE_VERSION, VERSION))
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}
