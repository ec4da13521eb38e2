//! User detail card.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::{
  User,
  user::{Address, PLACEHOLDER},
};

use super::muted;
use crate::app::App;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(user) = app.selected_user() else {
    let block = Block::default()
      .title(" Detail ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(vec![
        Line::from(Span::styled(
          "User not found",
          Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
          "The user you're looking for doesn't exist. Press Esc to go back.",
          muted(),
        )),
      ]),
      inner,
    );
    return;
  };

  let block = Block::default()
    .title(format!(" {}  {} ", user.initials(), user.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  f.render_widget(Paragraph::new(lines(user)).wrap(Wrap { trim: false }), inner);
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn lines(user: &User) -> Vec<Line<'static>> {
  let mut lines = Vec::new();

  if let Some(username) = &user.username {
    lines.push(Line::from(Span::styled(format!("@{username}"), muted())));
    lines.push(Line::from(""));
  }

  section(&mut lines, "Contact");
  row(&mut lines, "email", &user.email);
  row(&mut lines, "phone", user.phone.as_deref().unwrap_or(PLACEHOLDER));
  row(&mut lines, "website", user.website.as_deref().unwrap_or(PLACEHOLDER));

  lines.push(Line::from(""));
  section(&mut lines, "Company");
  row(&mut lines, "name", user.company_name());
  if let Some(details) = user.company.as_ref().and_then(|c| c.details()) {
    if let Some(phrase) = &details.catch_phrase {
      row(&mut lines, "motto", phrase);
    }
    if let Some(bs) = &details.bs {
      row(&mut lines, "business", bs);
    }
  }

  lines.push(Line::from(""));
  section(&mut lines, "Address");
  match &user.address {
    Some(address) if !address.is_empty() => address_rows(&mut lines, address),
    _ => lines.push(Line::from(Span::styled("No address on file.", muted()))),
  }

  lines
}

fn address_rows(lines: &mut Vec<Line<'static>>, address: &Address) {
  let street = [address.street.as_deref(), address.suite.as_deref()]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");
  if !street.is_empty() {
    row(lines, "street", &street);
  }
  let city = [address.city.as_deref(), address.zipcode.as_deref()]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
  if !city.is_empty() {
    row(lines, "city", &city);
  }
  if let Some(geo) = &address.geo {
    row(lines, "geo", &format!("{}, {}", geo.lat, geo.lng));
  }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
  lines.push(Line::from(Span::styled(
    title.to_owned(),
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  )));
}

fn row(lines: &mut Vec<Line<'static>>, label: &str, value: &str) {
  lines.push(Line::from(vec![
    Span::styled(
      format!("  {label:<10}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.to_owned()),
  ]));
}
