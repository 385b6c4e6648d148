use board_editor::analysis::CannedAnalysis;
use board_editor::cli::{run_command, Cli, Command};
use board_editor::config;
use board_editor::persistence::{InMemoryBackend, JsonSavedGames, PersistenceBackend};
use board_editor::recognition::StubRecognizer;
use board_editor::App;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it logs to a file; one-shot commands log to stderr.
    let _guard = match cli.command {
        None => {
            let log_dir = config::get_log_dir();
            std::fs::create_dir_all(&log_dir).ok();
            let file_appender = tracing_appender::rolling::daily(&log_dir, "board-editor");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .init();
            Some(guard)
        }
        Some(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                .init();
            None
        }
    };

    if cli.no_persist {
        run(cli.command, InMemoryBackend::new()).await
    } else {
        let data_dir = config::get_data_dir();
        tracing::info!(data_dir = %data_dir.display(), "Using saved-games storage");
        run(cli.command, JsonSavedGames::new(data_dir)).await
    }
}

async fn run<B: PersistenceBackend>(command: Option<Command>, backend: B) -> anyhow::Result<()> {
    let mut app = App::new(backend)?;
    let provider = CannedAnalysis::new(config::get_analysis_delay());
    let recognizer = StubRecognizer::new(config::get_recognition_delay());

    match command {
        None => {
            tracing::info!("Board editor starting up");
            board_editor::ui::run_app(app, provider, recognizer).await?;
            tracing::info!("Board editor shutting down");
        }
        Some(command) => {
            let mut stdout = std::io::stdout().lock();
            run_command(command, &mut app, &provider, &recognizer, &mut stdout).await?;
        }
    }
    Ok(())
}
