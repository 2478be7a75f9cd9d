use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use patient_lookup::{
    DirectoryLookup, FieldConfig, FieldSettings, InteractiveField, SettingsManager,
    sample_directory, telemetry,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "patient-lookup",
    version,
    about = "Debounced incremental patient search in the terminal",
    long_about = None
)]
struct Cli {
    /// Characters required before a lookup is issued
    #[arg(long)]
    min_chars: Option<usize>,

    /// Quiet period after typing before a lookup fires (ms)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Maximum number of candidates to show
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Delay between losing focus and closing the list (ms)
    #[arg(long)]
    blur_grace_ms: Option<u64>,

    /// Simulated lookup latency (ms)
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Fail every n-th lookup, to try the silent failure path
    #[arg(long)]
    fail_every: Option<u64>,

    /// JSON file with an array of patient records (default: built-in sample)
    #[arg(short, long, env = "PATIENT_LOOKUP_DIRECTORY")]
    directory: Option<PathBuf>,

    /// Settings file (default: <config dir>/patient-lookup/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the merged settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Write tracing output to this file
    #[arg(long, env = "PATIENT_LOOKUP_LOG")]
    log_file: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,

    /// Exit as soon as a patient is selected
    #[arg(short = 'x', long)]
    exit_on_select: bool,

    /// Label shown on the search input
    #[arg(long, default_value = "Select Patient")]
    label: String,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut FieldSettings) {
        if let Some(min_chars) = self.min_chars {
            settings.minimum_query_length = min_chars;
        }
        if let Some(debounce_ms) = self.debounce_ms {
            settings.search_debounce_ms = debounce_ms;
        }
        if let Some(max_results) = self.max_results {
            settings.max_results = max_results;
        }
        if let Some(blur_grace_ms) = self.blur_grace_ms {
            settings.blur_grace_ms = blur_grace_ms;
        }
        if let Some(latency_ms) = self.latency_ms {
            settings.lookup_latency_ms = latency_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing(cli.log_file.as_deref(), cli.log_json)?;

    let manager = match &cli.settings {
        Some(path) => SettingsManager::with_path(path.clone()),
        None => SettingsManager::new(),
    };
    let mut settings = manager.load()?;
    cli.apply_overrides(&mut settings);
    if cli.save_settings {
        manager.save(&settings)?;
        eprintln!("Settings saved to {}", manager.path().display());
    }

    let directory = match &cli.directory {
        Some(path) => DirectoryLookup::from_json_file(path)?,
        None => DirectoryLookup::new(sample_directory()),
    };
    let mut directory =
        directory.with_latency(Duration::from_millis(settings.lookup_latency_ms));
    if let Some(n) = cli.fail_every {
        directory = directory.with_fail_every(n);
    }
    tracing::info!(records = directory.len(), "directory loaded");

    let mut interactive =
        InteractiveField::new(FieldConfig::from(&settings), Arc::new(directory), &cli.label)
            .exit_on_select(cli.exit_on_select);
    let selection = interactive.run().await?;

    match selection {
        Some(candidate) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &candidate)?;
            writeln!(&mut handle)?;

            eprintln!(
                "{} {}",
                "Selected".green().bold(),
                candidate.display_label().cyan()
            );
        }
        None => {
            eprintln!("{}", "No patient selected".yellow());
        }
    }

    Ok(())
}
