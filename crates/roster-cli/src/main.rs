//! `roster`: terminal UI for browsing and editing a user directory.
//!
//! # Usage
//!
//! ```
//! roster --url https://jsonplaceholder.typicode.com
//! roster --config ~/.config/roster/config.toml --log-file /tmp/roster.log
//! ```

mod app;
mod settings;
mod ui;


use std::{fs::OpenOptions, io, path::Path, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use roster_client::{ApiClient, StoreHandle};
use roster_core::UserStore;
use settings::{Args, Settings};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref())?;

  let settings = Settings::load(&args)?;
  info!(base_url = %settings.base_url, "starting");

  let client = ApiClient::new(settings.api_config()).context("building HTTP client")?;
  let store = StoreHandle::spawn(UserStore::new());
  let mut app = App::new(client, store, settings.initial_view());

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.start_load();
  let run_result = run_event_loop(&mut terminal, &mut app).await;
  app.shutdown();

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

/// Logs go to `path` when given; the terminal is owned by the UI.
fn init_tracing(path: Option<&Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  match path {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::sink)
        .init();
    }
  }
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.refresh();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    // Resize needs nothing; the next iteration redraws.
    if let Some(Event::Key(key)) = maybe_event {
      if key.kind == KeyEventKind::Press && !app.handle_key(key).await? {
        break;
      }
    }
  }

  Ok(())
}
