//! Foody TUI - terminal food catalogue with persistent star ratings.
//!
//! Main entry point and event loop for the application.

mod app;
mod catalogue;
mod config;
mod demo;
mod error;
mod logging;
mod ratings;
mod stars;
mod storage;
mod ui;

use app::{Action, App, Tab, UiMode};
use catalogue::{Catalogue, CatalogueClient, Item};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use demo::RatingDemo;
use ratatui::{Terminal, backend::CrosstermBackend};
use ratings::{CARD_RATINGS_KEY, ITEM_RATINGS_KEY, RatingStore};
use std::io;
use std::time::Duration;
use storage::FileStore;
use tokio::task::{JoinError, JoinHandle};
use ui::{CardHit, HitTarget, ScreenLayout};

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration, starts logging, restores persisted ratings, starts the
/// catalogue fetch in the background and runs the event loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(None)?;

    match logging::init_logging(&config) {
        Ok(path) => tracing::info!(log_file = %path.display(), "logging initialized"),
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    let config_path = Config::default_config_path()?;
    if !config_path.exists() {
        match config.save(Some(config_path.as_path())) {
            Ok(()) => tracing::info!(path = %config_path.display(), "wrote default config"),
            Err(e) => tracing::warn!(error = %e, "could not write default config"),
        }
    }

    // Restore persisted ratings
    let store = FileStore::new(config.storage_dir_path()?);
    tracing::debug!(dir = %store.dir().display(), "using rating storage");
    let catalogue = Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY));
    let demo = RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY));
    if catalogue.ratings().is_empty() {
        tracing::debug!("no saved catalogue ratings");
    } else {
        tracing::info!(count = catalogue.ratings().len(), "restored catalogue ratings");
    }
    tracing::debug!(ratings = ?demo.ratings(), "restored demo ratings");

    let mut app = App::new(
        catalogue,
        demo,
        config.categories.clone(),
        config.base_url.trim().to_string(),
    );
    let fetch = start_fetch(&config, &mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, fetch).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "event loop failed");
    }
    result
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
/// * `fetch` - Pending catalogue fetch, if one was started
///
/// # Details
/// Redraws, picks up the fetch result once it is ready and turns keyboard
/// and mouse events into [`Action`]s.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut fetch: Option<CatalogueFetch>,
) -> anyhow::Result<()> {
    // Updated on each render, used for mouse hit testing
    let mut layout = ScreenLayout::default();

    loop {
        terminal.draw(|f| {
            layout = ui::render_ui(f, app);
        })?;

        if fetch.as_ref().is_some_and(JoinHandle::is_finished)
            && let Some(handle) = fetch.take()
        {
            app.dispatch(fetch_outcome(handle.await));
        }

        // Use non-blocking event polling with timeout to keep UI responsive
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(app, key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &layout),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Background catalogue request.
type CatalogueFetch = JoinHandle<error::Result<Vec<Item>>>;

/// Spawn the catalogue fetch.
///
/// # Returns
/// * `Option<CatalogueFetch>` - The running fetch, `None` when no client
///   could be built
///
/// # Details
/// An unusable client configuration is reported like a failed fetch: the
/// catalogue stays empty and the status bar shows the error.
fn start_fetch(config: &Config, app: &mut App) -> Option<CatalogueFetch> {
    match CatalogueClient::new(config) {
        Ok(client) => {
            app.set_status(format!("Fetching catalogue from {}...", client.base_url()));
            Some(tokio::spawn(async move { client.fetch_items().await }))
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot create catalogue client");
            app.dispatch(Action::FetchFailed(e.to_string()));
            None
        }
    }
}

/// Turn the finished fetch into an action.
///
/// # Details
/// Failures are logged and leave the catalogue empty; there is no retry.
fn fetch_outcome(result: Result<error::Result<Vec<Item>>, JoinError>) -> Action {
    match result {
        Ok(Ok(items)) => Action::ItemsLoaded(items),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "catalogue fetch failed");
            Action::FetchFailed(e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "catalogue fetch task failed");
            Action::FetchFailed(e.to_string())
        }
    }
}

/// Handle one key press.
///
/// # Returns
/// * `bool` - True when the application should quit
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let action = match app.mode {
        UiMode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => Action::SwitchTab,
            KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
            KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
            KeyCode::Left | KeyCode::Char('h') => Action::HoverPrev,
            KeyCode::Right | KeyCode::Char('l') => Action::HoverNext,
            KeyCode::Char(' ') => Action::ClickHovered,
            KeyCode::Char(ch @ '1'..='5') => Action::ClickStar(ch as u8 - b'0'),
            KeyCode::Enter => Action::Submit,
            KeyCode::Char('/') if app.tab == Tab::Catalogue => Action::EnterSearch,
            KeyCode::Char('c') if app.tab == Tab::Catalogue => Action::EnterCategories,
            _ => return false,
        },
        UiMode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => Action::ExitSearch,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(ch) => Action::SearchInput(ch),
            _ => return false,
        },
        UiMode::Categories => match key.code {
            KeyCode::Esc | KeyCode::Char('c') => Action::ExitCategories,
            KeyCode::Left | KeyCode::Char('h') => Action::CategoryPrev,
            KeyCode::Right | KeyCode::Char('l') => Action::CategoryNext,
            KeyCode::Enter => Action::ApplyCategory,
            _ => return false,
        },
    };

    app.dispatch(action);
    false
}

/// Handle mouse events (scroll, hover and click).
///
/// # Arguments
/// * `mouse` - Mouse event
/// * `app` - Application state
/// * `layout` - Layout of the last rendered frame
///
/// # Details
/// Moving over a star hovers it, clicking a star selects it, clicking a
/// card's submit button submits it and clicking a category button applies it.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, layout: &ScreenLayout) {
    match mouse.kind {
        MouseEventKind::ScrollUp if app.mode == UiMode::List => app.dispatch(Action::MoveUp),
        MouseEventKind::ScrollDown if app.mode == UiMode::List => app.dispatch(Action::MoveDown),
        MouseEventKind::Moved => match ui::hit_test(app, layout, mouse.column, mouse.row) {
            // Hover leaves the selection, and so the scroll offset, unchanged
            Some(CardHit { position, target: HitTarget::Star(star) }) => {
                app.dispatch(Action::HoverCardStar { position, star });
            }
            _ => app.dispatch(Action::LeaveStars),
        },
        MouseEventKind::Down(MouseButton::Left) => {
            if app.tab == Tab::Catalogue
                && let Some(index) =
                    ui::categories::hit_test(app, layout.categories, mouse.column, mouse.row)
            {
                app.dispatch(Action::ChooseCategory(index));
                return;
            }

            if let Some(hit) = ui::hit_test(app, layout, mouse.column, mouse.row) {
                app.dispatch(Action::Select(hit.position));
                match hit.target {
                    HitTarget::Star(position) => app.dispatch(Action::ClickStar(position)),
                    HitTarget::Submit => app.dispatch(Action::Submit),
                    HitTarget::Card => {}
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_app(dir: &TempDir) -> App {
        let store = FileStore::new(dir.path());
        App::new(
            Catalogue::new(RatingStore::load(store.clone(), ITEM_RATINGS_KEY)),
            RatingDemo::new(RatingStore::load(store, CARD_RATINGS_KEY)),
            Vec::new(),
            String::new(),
        )
    }

    #[test]
    fn test_bad_base_url_starts_with_empty_catalogue() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);
        let config = Config {
            base_url: "localhost:9000".to_string(),
            ..Config::default()
        };

        assert!(start_fetch(&config, &mut app).is_none());
        assert!(!app.loading);
        assert_eq!(app.card_count(), 0);
        let status = app.status_message.as_deref().unwrap();
        assert!(status.starts_with("Could not load catalogue: Configuration error"));
    }

    #[tokio::test]
    async fn test_valid_base_url_spawns_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = new_app(&temp_dir);
        let config = Config {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };

        let fetch = start_fetch(&config, &mut app).unwrap();
        assert!(app.loading);
        assert!(matches!(fetch_outcome(fetch.await), Action::FetchFailed(_)));
    }
}
