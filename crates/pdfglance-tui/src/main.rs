use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pdfglance_core::config_file::load_config;
use pdfglance_core::{
    DocumentEngine, Osc52Host, Settings, SystemClipboard, ViewerController, ViewerEvent,
};
use pdfglance_mupdf::MupdfEngine;

mod action;
mod app;
mod input;
mod theme;
mod tui_event;
mod view;

use app::{App, Screen};
use tui_event::{BackendCommand, BackendEvent};

/// pdfglance TUI: pick a PDF, preview it, extract and copy its text.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF to open on startup
    file: Option<PathBuf>,

    /// Color theme: hacker or modern
    #[arg(long)]
    theme: Option<String>,

    /// Directory the file picker starts in (default: current directory)
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Route tracing output to a daily-rolling file; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = settings.log_dir.as_ref()?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: cannot create log dir {}: {}", dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::daily(dir, "pdfglance-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = std::env::var("PDFGLANCE_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_new(&settings.log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Some(path) = &args.file
        && !path.exists()
    {
        anyhow::bail!("File not found: {}", path.display());
    }

    // Resolve config from CLI flags > env vars > config file > defaults
    let settings = Settings::from_config(&load_config());
    let _log_guard = init_logging(&settings);

    let theme_name = args
        .theme
        .clone()
        .or_else(|| std::env::var("PDFGLANCE_THEME").ok())
        .unwrap_or_else(|| settings.theme.clone());
    let theme = theme::Theme::from_name(&theme_name);

    let start_dir = match args.dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let engine: Arc<dyn DocumentEngine> = Arc::new(MupdfEngine::new());
    let mut controller = ViewerController::new(Arc::clone(&engine), Arc::new(SystemClipboard::new()))
        .with_copy_feedback(Duration::from_millis(settings.copy_feedback_ms));
    if settings.osc52_fallback {
        controller = controller.with_fallback(Box::new(Osc52Host::stdout()));
    }
    tracing::info!(theme = %theme_name, "starting pdfglance-tui");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(controller, theme, start_dir).with_preview_lines(settings.preview_lines);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    // Spawn backend command listener; each command runs as its own task
    let listener_engine = Arc::clone(&engine);
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let engine = Arc::clone(&listener_engine);
            let tx = event_tx.clone();
            match cmd {
                BackendCommand::LoadPreview { request, max_lines } => {
                    tokio::spawn(async move {
                        let handle = request.handle;
                        let event = match request.load(engine, max_lines).await {
                            Ok(summary) => ViewerEvent::PreviewLoaded { handle, summary },
                            Err(error) => ViewerEvent::PreviewFailed { handle, error },
                        };
                        let _ = tx.send(BackendEvent::Viewer(event));
                    });
                }
                BackendCommand::Extract(job) => {
                    tokio::spawn(async move {
                        let outcome = job.run(engine).await;
                        let _ = tx.send(BackendEvent::ExtractionFinished(outcome));
                    });
                }
            }
        }
    });

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // A file named on the command line is picked straight away
    if let Some(path) = &args.file
        && !app.select_path(path)
    {
        app.screen = Screen::FilePicker;
    }

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
        }

        app.flush_pending().await;
        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    tracing::info!("pdfglance-tui exiting");
    Ok(())
}
