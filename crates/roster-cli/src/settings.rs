//! Layered configuration: defaults, then an optional TOML file, then
//! `ROSTER_*` environment variables, then command-line flags.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use roster_client::{ApiConfig, client::DEFAULT_BASE_URL};
use roster_core::view::{SortDirection, SortKey, ViewState};
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "roster", about = "Terminal user directory")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Base URL of the user API; `/users` is appended.
  #[arg(long)]
  pub url: Option<String>,

  /// Request timeout in seconds.
  #[arg(long)]
  pub timeout: Option<u64>,

  /// Initial sort column: name, email or company.
  #[arg(long)]
  pub sort: Option<SortKey>,

  /// Initial sort direction: asc or desc.
  #[arg(long)]
  pub direction: Option<SortDirection>,

  /// Write logs to this file. The terminal belongs to the UI, so logs are
  /// discarded without it.
  #[arg(long, value_name = "FILE")]
  pub log_file: Option<PathBuf>,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  pub base_url:       String,
  pub timeout_secs:   u64,
  pub sort_key:       SortKey,
  pub sort_direction: SortDirection,
}

impl Settings {
  pub fn load(args: &Args) -> Result<Self> {
    let mut builder = config::Config::builder()
      .set_default("base_url", DEFAULT_BASE_URL)?
      .set_default("timeout_secs", 30)?
      .set_default("sort_key", "name")?
      .set_default("sort_direction", "ascending")?;

    if let Some(path) = &args.config {
      builder = builder.add_source(config::File::from(path.as_path()));
    }

    let mut settings: Self = builder
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()
      .context("reading configuration")?
      .try_deserialize()
      .context("parsing configuration")?;

    // Flags win over everything else.
    if let Some(url) = &args.url {
      settings.base_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
      settings.timeout_secs = timeout;
    }
    if let Some(key) = args.sort {
      settings.sort_key = key;
    }
    if let Some(direction) = args.direction {
      settings.sort_direction = direction;
    }

    Ok(settings)
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }

  pub fn initial_view(&self) -> ViewState {
    ViewState {
      sort_key: self.sort_key,
      direction: self.sort_direction,
      ..ViewState::default()
    }
  }
}
