//! Command-line host: upload spreadsheets and print chart series as JSON.

use anyhow::{Context, Result};
use chartsheet::constants::LOG_ENV_VAR;
use chartsheet::data::{AxisSelection, project_selection};
use chartsheet::registry::TableRegistry;
use chartsheet::settings::{Settings, default_settings_path};
use chartsheet::types::ChartKind;
use chartsheet::upload::{UploadFile, UploadManager, UploadStatus};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chartsheet", version, about = "Decode spreadsheets into chart series")]
struct Cli {
    /// Spreadsheet files (.xls / .xlsx) to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Header used for the X axis (defaults to the first column)
    #[arg(long)]
    x: Option<String>,

    /// Header used for the Y axis (defaults to the second column)
    #[arg(long)]
    y: Option<String>,

    /// Chart kind: bar, line, pie or scatter
    #[arg(long, default_value = "bar")]
    kind: ChartKind,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(default_settings_path);
    let settings = Settings::load_or_default(settings_path.as_deref());
    init_tracing(&settings.log_filter);

    let registry = Arc::new(TableRegistry::new());
    let manager = UploadManager::new(Arc::clone(&registry), settings.upload.clone());

    let mut status = manager.subscribe();
    tokio::spawn(async move {
        while let Ok(task) = status.recv().await {
            tracing::info!(
                file = %task.filename,
                status = task.status.label(),
                progress = task.progress,
                message = task.message.as_deref().unwrap_or(""),
                "Upload status"
            );
        }
    });

    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let file = UploadFile::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        files.push(file);
    }

    let mut failed = 0usize;
    for handle in manager.submit_all(files) {
        let task = handle.wait().await.context("Upload task panicked")?;
        if task.status != UploadStatus::Completed {
            failed += 1;
            eprintln!(
                "{}: {}",
                task.filename,
                task.message.as_deref().unwrap_or("failed")
            );
            continue;
        }
        let Some(table) = task.result_table_id.and_then(|id| registry.get(id)) else {
            continue;
        };

        let mut selection = AxisSelection::default_for(&table);
        if let Some(x) = &cli.x {
            selection.set_x(&table, x.as_str());
        }
        if let Some(y) = &cli.y {
            if !selection.set_y(&table, y) {
                tracing::warn!(file = %task.filename, y = %y, "Y column is not a candidate, keeping {}", selection.y);
            }
        }

        let series = project_selection(&table, &selection, cli.kind);
        let output = serde_json::json!({
            "file": table.name(),
            "summary": table.summary(),
            "headers": table.headers(),
            "axes": selection,
            "title": cli.kind.title(),
            "series": series,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} uploads failed", cli.files.len());
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(chartsheet::constants::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
