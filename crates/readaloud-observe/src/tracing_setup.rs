//! Tracing subscriber initialization with an optional OpenTelemetry bridge.
//!
//! ```no_run
//! let filter = readaloud_observe::verbosity_filter(0, false);
//! readaloud_observe::init_tracing(&filter, false).unwrap();
//! // ...
//! readaloud_observe::shutdown_tracing();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Filter directive for the CLI verbosity flags.
///
/// `RUST_LOG`, when set, takes precedence over the flags.
pub fn verbosity_filter(verbose: u8, quiet: bool) -> String {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !env.trim().is_empty()
    {
        return env;
    }
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "trace",
    }
    .to_string()
}

/// Install the global subscriber.
///
/// - Always installs a `fmt` layer on stderr, so page text and JSON on
///   stdout stay clean. Span close timing is included: each page cycle and
///   each vision call is logged with its duration.
/// - With `enable_otel`, spans are also exported through OpenTelemetry
///   using the stdout exporter.
///
/// # Errors
///
/// Fails if `filter` is not a valid directive or a global subscriber is
/// already installed.
pub fn init_tracing(filter: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(filter)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("readaloud");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending spans and shut down the tracer provider.
///
/// No-op when OpenTelemetry was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get()
        && let Err(e) = provider.shutdown()
    {
        eprintln!("Warning: OTel tracer provider shutdown error: {e}");
    }
}
