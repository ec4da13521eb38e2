//! TUI rendering: header, the active screen, status bar and popups.

pub mod modal;
pub mod user_detail;
pub mod user_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Modal, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  match app.screen {
    Screen::List => user_table::draw(f, rows[1], app),
    Screen::Detail(_) => user_detail::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  if let Some(modal) = &app.modal {
    modal::draw(f, area, modal);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " roster  [/] search  [a] add  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (&app.modal, app.screen) {
    (Some(Modal::Form { .. }), _) => ("FORM", "Tab next field  Enter save  Esc cancel"),
    (Some(Modal::ConfirmDelete(_)), _) => ("DELETE", "y confirm  n cancel"),
    (Some(Modal::SavedPrompt(_)), _) => ("SAVED", "Enter view details  Esc stay"),
    (None, Screen::List) if app.search_active => {
      ("SEARCH", "Type to filter  Esc clear  Enter done")
    }
    (None, Screen::List) => (
      "NORMAL",
      "↑↓/jk move  Enter detail  1-3 sort  s cycle  S reverse  a add  e edit  d delete",
    ),
    (None, Screen::Detail(_)) => ("DETAIL", "Esc back  e edit  d delete  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints
  } else {
    app.status_msg.as_str()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

/// Dim text used for hints and empty states.
pub(crate) fn muted() -> Style { Style::default().fg(Color::DarkGray) }
