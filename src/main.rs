mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use config::{Args, Command};
use controller::AppController;
use model::{AppModel, Catalog, CatalogClient, HttpFetcher, ImageLoader, ImageSize};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(&args.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(base_url = %args.base_url, "=== deezer-rs starting ===");

    let fetcher = HttpFetcher::new(args.timeout()).context("could not build the HTTP client")?;
    let catalog = Arc::new(CatalogClient::new(args.base_url.clone(), fetcher.clone()));

    if let Some(command) = args.command.clone() {
        return run_command(&catalog, command).await;
    }

    let images = ImageLoader::new(fetcher);
    let model = Arc::new(Mutex::new(AppModel::new()));
    let controller = AppController::new(model.clone(), catalog, images, args.debounce());
    controller.start_results_listener();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("deezer-rs shutting down");
    Ok(())
}

/// One-shot query printed as plain text
async fn run_command(catalog: &CatalogClient, command: Command) -> Result<()> {
    match command {
        Command::Search { query } => {
            for artist in catalog.search_artists(&query, false).await? {
                println!("{:>10}  {}", artist.id, artist.name);
            }
        }
        Command::Albums { artist_id } => {
            for album in catalog.list_albums(artist_id).await? {
                let year = album.release_year().map(|y| y.to_string()).unwrap_or_default();
                println!("{:>10}  {:<4}  {}  ({})", album.id, year, album.title, album.record_type);
            }
        }
        Command::Tracks { album_id } => {
            for track in catalog.list_tracks(album_id).await? {
                println!(
                    "{:>3}  {}  {:>6}  {}",
                    track.position,
                    track.id,
                    view::format_duration(track.duration_seconds),
                    track.title
                );
            }
        }
        Command::Artist { id } => {
            let artist = catalog.artist(id).await?;
            println!("{}  {}", artist.id, artist.name);
            println!("picture: {}", artist.picture(ImageSize::Big));
            if let Some(link) = &artist.link {
                println!("link: {}", link);
            }
        }
        Command::Album { id } => {
            let album = catalog.album(id).await?;
            println!("{}  {}  ({}, {})", album.id, album.title, album.record_type, album.release_date);
            println!("cover: {}", album.cover(ImageSize::Big));
            println!("tracklist: {}", album.tracklist_url);
            println!("link: {}", album.link);
        }
        Command::Track { id } => {
            let track = catalog.track(id).await?;
            let explicit = if track.is_explicit { " [explicit]" } else { "" };
            println!(
                "{}  {} - {}  {}{}",
                track.id,
                track.artist_name,
                track.title,
                view::format_duration(track.duration_seconds),
                explicit
            );
        }
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (ui_state, artwork, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_artwork().await,
                model_guard.should_quit().await,
            )
        };
        let results = controller.results();
        let content_state = controller.content().await;

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &results, &content_state, &artwork);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
