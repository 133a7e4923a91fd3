use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pdfglance_core::config_file::load_config;
use pdfglance_core::{
    DocumentEngine, Osc52Host, SelectedFile, Settings, SystemClipboard, ViewerController,
    format_file_size,
};
use pdfglance_mupdf::MupdfEngine;

mod output;

use output::{ColorMode, InfoReport};

/// pdfglance - inspect PDFs and extract their text
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a file's name, type, size, page count and whether it is accepted
    Info {
        /// Path to the file to inspect
        file_path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract the text of every page
    Extract {
        /// Path to the PDF
        file_path: PathBuf,

        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also copy the text to the clipboard
        #[arg(long)]
        copy: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Log to stderr so stdout carries only the requested output
    let filter = EnvFilter::try_from_env("PDFGLANCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_config(&load_config());
    let engine: Arc<dyn DocumentEngine> = Arc::new(MupdfEngine::new());

    match cli.command {
        Command::Info {
            file_path,
            json,
            no_color,
        } => {
            let mut controller = ViewerController::new(engine, Arc::new(SystemClipboard::new()));
            let report = inspect(&mut controller, &file_path).await?;
            let mut stdout = std::io::stdout();
            if json {
                output::print_info_json(&mut stdout, &report)?;
            } else {
                output::print_info(&mut stdout, &report, ColorMode(!no_color))?;
            }
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Extract {
            file_path,
            output,
            copy,
            no_color,
        } => {
            let color = ColorMode(!no_color);
            let mut controller = ViewerController::new(engine, Arc::new(SystemClipboard::new()))
                .with_copy_feedback(Duration::from_millis(settings.copy_feedback_ms));
            if settings.osc52_fallback {
                controller = controller.with_fallback(Box::new(Osc52Host::new(std::io::stderr())));
            }
            let ok = extract(&mut controller, &file_path, output.as_deref(), copy, color).await?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Select the file, load its preview and report what the viewer would show.
async fn inspect(controller: &mut ViewerController, path: &Path) -> anyhow::Result<InfoReport> {
    let file = SelectedFile::from_path(path)?;
    controller.on_file_selected(Some(file.clone()));

    let mut page_count = None;
    if let Some(request) = controller.preview_request() {
        let handle = request.handle;
        match request.load(controller.engine(), 0).await {
            Ok(summary) => {
                page_count = Some(summary.page_count);
                controller.on_preview_loaded(handle, summary);
            }
            Err(e) => controller.on_preview_failed(handle, e),
        }
    }

    let state = controller.state();
    Ok(InfoReport {
        size_display: format_file_size(file.size),
        name: file.name,
        declared_type: file.declared_type,
        size: file.size,
        page_count,
        valid: state.error.is_none(),
        error: state.error.clone(),
    })
}

/// Run the viewer's extraction and emit the text. Returns false when the
/// controller ends up with an error.
async fn extract(
    controller: &mut ViewerController,
    path: &Path,
    output: Option<&Path>,
    copy: bool,
    color: ColorMode,
) -> anyhow::Result<bool> {
    let mut stderr = std::io::stderr();
    let file = SelectedFile::from_path(path)?;
    let size_display = format_file_size(file.size);

    controller.on_file_selected(Some(file));
    if controller.state().error.is_none() {
        controller.extract_text().await;
    }
    if let Some(error) = &controller.state().error {
        output::print_error(&mut stderr, error, color)?;
        return Ok(false);
    }

    let state = controller.state();
    let name = state
        .selected_file
        .as_ref()
        .map(|f| f.name.clone())
        .unwrap_or_default();
    match output {
        Some(out_path) => {
            std::fs::write(out_path, &state.extracted_text)?;
            tracing::info!(path = %out_path.display(), "wrote extracted text");
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(state.extracted_text.as_bytes())?;
            stdout.flush()?;
        }
    }
    output::print_extract_summary(
        &mut stderr,
        &name,
        &size_display,
        state.extracted_text.chars().count(),
        color,
    )?;

    if copy {
        controller.copy_text().await;
        output::print_copy_result(&mut stderr, controller.state().copy_success, color)?;
    }
    Ok(true)
}
