mod audio;
mod catalog;
mod config;
mod controller;
mod logging;
mod model;
mod session;
mod theme;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use audio::{AudioBackend, SilentBackend, SourceFetcher};
use catalog::Catalog;
use config::{AppConfig, Cli};
use controller::AppController;
use model::{AppModel, FavoritesStore};
use session::PlaybackSession;
use view::AppView;

const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Lessons-RS Starting ===");

    let config = AppConfig::from_cli(cli)?;
    tracing::info!(
        catalog = %config.catalog,
        settings = %config.paths.settings.display(),
        skip_secs = config.skip.as_secs(),
        "Configuration loaded"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let backend = build_backend(SourceFetcher::new(client.clone()), config.silent);
    tracing::info!(backend = backend.name(), "Audio backend ready");

    let session = PlaybackSession::new(backend, config.session);
    let catalog = Arc::new(Catalog::new(client, config.catalog.clone()));

    let app_model = AppModel::new(
        config.settings.theme,
        config.skip,
        FavoritesStore::new(&config.paths.favorites),
    );
    let model = Arc::new(Mutex::new(app_model));

    let controller = AppController::new(
        model.clone(),
        session,
        catalog,
        config.settings.clone(),
        config.paths.settings.clone(),
        config.skip,
    );

    controller.load_favorites().await;
    let _session_listener = controller.start_session_listener();

    let controller_for_catalog = controller.clone();
    tokio::spawn(async move {
        controller_for_catalog.load_catalog().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let res = run_app(&mut terminal, model, controller.clone()).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Lessons-RS shutting down");
    Ok(())
}

#[cfg(feature = "audio")]
fn build_backend(fetcher: SourceFetcher, silent: bool) -> Arc<dyn AudioBackend> {
    if silent {
        return Arc::new(SilentBackend::new(fetcher));
    }
    match audio::RodioBackend::start(fetcher.clone()) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::warn!(error = %e, "No audio device, continuing without sound");
            Arc::new(SilentBackend::new(fetcher))
        }
    }
}

#[cfg(not(feature = "audio"))]
fn build_backend(fetcher: SourceFetcher, silent: bool) -> Arc<dyn AudioBackend> {
    if !silent {
        tracing::info!("Built without the audio feature, playback is silent");
    }
    Arc::new(SilentBackend::new(fetcher))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (playback, ui_state, content_state, should_quit) = {
            let model_guard = model.lock().await;

            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info().await,
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.should_quit().await,
            )
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &content_state);
        })?;

        // Poll off the runtime thread so session and catalog tasks keep running
        let input = tokio::task::spawn_blocking(|| -> io::Result<Option<Event>> {
            if event::poll(INPUT_POLL)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await
        .map_err(io::Error::other)??;

        if let Some(Event::Key(key)) = input {
            if let Err(e) = controller.handle_key_event(key).await {
                tracing::warn!(error = %e, "Key handling failed");
            }
        }
    }

    Ok(())
}
