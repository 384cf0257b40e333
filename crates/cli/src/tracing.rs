use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_log::AsTrace;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Console output honours the verbosity flags, the optional trace file receives everything.
pub fn configure_tracing(trace: Option<PathBuf>, verbose: Verbosity<InfoLevel>) -> anyhow::Result<()> {
    const SPAN_EVENTS: FmtSpan = FmtSpan::NONE;

    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_span_events(SPAN_EVENTS)
        .without_time()
        .with_target(false)
        .with_filter(verbose.log_level_filter().as_trace());

    let trace_layer = match trace {
        Some(path) => {
            let file = File::create(&path)?;

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_span_events(SPAN_EVENTS)
                .with_filter(LevelFilter::TRACE);

            Some(layer)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(trace_layer)
        .try_init()?;

    Ok(())
}
