use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "patient_lookup=info";

/// Install the global tracing subscriber.
///
/// The terminal is owned by the UI, so events only go to `log_file`. Without
/// a file nothing is installed and every event is dropped.
pub fn init_tracing(log_file: Option<&Path>, json: bool) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let writer = Mutex::new(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(writer).with_ansi(false))
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }
    Ok(())
}
