use std::time::Instant;

use agora_config::AppConfig;
use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, propagation::Extractor, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

/// Logs every request and wraps its handling in a span joined to the caller's trace, if any.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %matched_path,
    );
    let parent =
        global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(req.headers())));
    span.set_parent(parent);

    info!(parent: &span, "Incoming request");

    let mut response = next.run(req).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(parent: &span, status, latency_ms, "Server error"),
        400..=499 => warn!(parent: &span, status, latency_ms, "Client error"),
        _ => info!(parent: &span, status, latency_ms, "Request completed"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn init_tracer(endpoint: &str) -> Result<Tracer, TraceError> {
    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

fn default_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{name}={level},agora_auth={level},agora_db={level},agora_core={level},tower_http=warn,hyper=info,tonic=info",
            name = env!("CARGO_CRATE_NAME"),
        ))
    })
}

/// Installs the global subscriber.
///
/// The console gets compact human readable lines in debug mode and JSON
/// otherwise. `log_dir` adds a daily rolling JSON file, and a non-empty
/// `otel_collector_url` exports spans over OTLP/gRPC. A collector that cannot
/// be set up is reported and skipped; the server still starts.
pub fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = if config.debug {
        fmt::layer()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .with_filter(default_filter(true))
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_filter(default_filter(false))
            .boxed()
    };
    layers.push(console_layer);

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;
        let json_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(env!("CARGO_PKG_NAME"))
            .filename_suffix("json")
            .build(log_dir)?;

        layers.push(
            fmt::layer()
                .json()
                .with_writer(json_appender)
                .with_ansi(false)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(default_filter(config.debug))
                .boxed(),
        );
    }

    let mut otel_error = None;
    if !config.otel_collector_url.is_empty() {
        match init_tracer(&config.otel_collector_url) {
            Ok(tracer) => layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed()),
            Err(e) => otel_error = Some(e),
        }
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    match otel_error {
        Some(e) => warn!(
            endpoint = %config.otel_collector_url,
            error = %e,
            "Failed to initialize OpenTelemetry, continuing without span export"
        ),
        None if config.otel_collector_url.is_empty() => {
            info!("Tracing initialized without OpenTelemetry export")
        }
        None => info!(endpoint = %config.otel_collector_url, "Tracing initialized with OpenTelemetry"),
    }

    Ok(())
}

/// Flushes pending spans. Call once, after the server has stopped.
pub fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer");
    global::shutdown_tracer_provider();
}
