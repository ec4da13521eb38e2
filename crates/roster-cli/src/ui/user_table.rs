//! The user table on the list screen.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use roster_core::{
  RequestStatus,
  view::{EmptyState, SortDirection, SortKey},
};
use strum::IntoEnumIterator;

use super::muted;
use crate::app::App;

/// Render the list screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Users ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match app.state.status() {
    RequestStatus::Loading => {
      f.render_widget(Paragraph::new("Loading users...").style(muted()), inner);
      return;
    }
    RequestStatus::Errored => {
      draw_error(f, inner, app.state.error.as_deref().unwrap_or_default());
      return;
    }
    RequestStatus::Idle | RequestStatus::Loaded => {}
  }

  let [search_area, table_area, count_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(0),
    Constraint::Length(1),
  ])
  .areas(inner);

  draw_search(f, search_area, app);

  let visible = app.visible_users();
  let total = app.state.users.len();

  if let Some(empty) = EmptyState::classify(total, visible.len()) {
    let text = match empty {
      EmptyState::NoUsers => "No users found",
      EmptyState::NoMatches => "No users found. Try a different search.",
    };
    f.render_widget(Paragraph::new(text).style(muted()), table_area);
  } else {
    let header = Row::new(SortKey::iter().enumerate().map(|(i, key)| {
      Cell::from(format!(
        "[{}] {} {}",
        i + 1,
        key.label(),
        indicator(app, key)
      ))
    }))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = visible.iter().map(|user| {
      let mut name = vec![Span::raw(user.name.clone())];
      if user.is_new {
        name.push(Span::styled(
          " New",
          Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
      }
      Row::new(vec![
        Cell::from(Line::from(name)),
        Cell::from(user.email.clone()),
        Cell::from(user.company_name().to_owned()),
      ])
    });

    let table = Table::new(rows, [
      Constraint::Percentage(35),
      Constraint::Percentage(35),
      Constraint::Percentage(30),
    ])
    .header(header)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.cursor));
    f.render_stateful_widget(table, table_area, &mut state);
  }

  f.render_widget(
    Paragraph::new(format!("Showing {} of {} users", visible.len(), total)).style(muted()),
    count_area,
  );
}

/// `↑`/`↓` on the active column, `↕` on the others.
fn indicator(app: &App, key: SortKey) -> &'static str {
  if app.view.sort_key != key {
    return "↕";
  }
  match app.view.direction {
    SortDirection::Ascending => "↑",
    SortDirection::Descending => "↓",
  }
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
  let text = if app.search_active {
    format!("/{}_", app.view.query)
  } else if app.view.query.is_empty() {
    "Search by name or email (/)".to_owned()
  } else {
    format!("/{}", app.view.query)
  };
  let style = if app.search_active || !app.view.query.is_empty() {
    Style::default().fg(Color::Yellow)
  } else {
    muted()
  };
  f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_error(f: &mut Frame, area: Rect, message: &str) {
  let lines = vec![
    Line::from(Span::styled(
      "Error loading users",
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )),
    Line::from(message.to_owned()),
    Line::from(""),
    Line::from(Span::styled(
      "Check your network and try refreshing. Press r to retry.",
      muted(),
    )),
  ];
  f.render_widget(Paragraph::new(lines), area);
}
