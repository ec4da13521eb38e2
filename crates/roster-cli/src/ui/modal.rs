//! Popups drawn over the current screen.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use roster_core::form::{Field, UserForm, ValidationErrors};
use strum::IntoEnumIterator;

use super::muted;
use crate::app::{FormMode, Modal};

pub fn draw(f: &mut Frame, area: Rect, modal: &Modal) {
  match modal {
    Modal::Form {
      mode,
      form,
      focus,
      errors,
    } => draw_form(f, area, mode, form, *focus, errors),
    Modal::ConfirmDelete(user) => draw_prompt(
      f,
      area,
      " Delete user? ",
      Color::Red,
      vec![
        Line::from(format!("{} will be removed from the list.", user.name)),
        Line::from(""),
        Line::from(Span::styled("[y] delete   [n] cancel", muted())),
      ],
    ),
    Modal::SavedPrompt(user) => draw_prompt(
      f,
      area,
      " Saved changes ",
      Color::Green,
      vec![
        Line::from(format!("{} was updated.", user.name)),
        Line::from(""),
        Line::from(Span::styled("[Enter] go to details   [Esc] stay here", muted())),
      ],
    ),
  }
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

fn framed(f: &mut Frame, area: Rect, title: &str, accent: Color) -> Rect {
  let block = Block::default()
    .title(title.to_owned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(accent));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);
  inner
}

fn draw_prompt(f: &mut Frame, area: Rect, title: &str, accent: Color, lines: Vec<Line>) {
  let area = popup(area, 50, lines.len() as u16 + 2);
  let inner = framed(f, area, title, accent);
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_form(
  f: &mut Frame,
  area: Rect,
  mode: &FormMode,
  form: &UserForm,
  focus: Field,
  errors: &ValidationErrors,
) {
  let title = match mode {
    FormMode::Add => " Add user ".to_owned(),
    FormMode::Edit(user) => format!(" Edit {} ", user.name),
  };

  let mut lines = Vec::new();
  for field in Field::iter() {
    let required = if field.is_required() { " *" } else { "" };
    let label_style = if field == focus {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    let value = form.field(field);
    let value_span = match (value.is_empty(), field == focus) {
      (true, false) => Span::styled(field.placeholder(), muted()),
      (_, true) => Span::raw(format!("{value}_")),
      (false, false) => Span::raw(value.to_owned()),
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{:<12}", format!("{}{required}", field.label())), label_style),
      value_span,
    ]));
    if let Some(err) = errors.get(field) {
      lines.push(Line::from(Span::styled(
        format!("{:12}{err}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled("[Enter] save   [Esc] cancel", muted())));

  let area = popup(area, 64, lines.len() as u16 + 2);
  let inner = framed(f, area, &title, Color::Cyan);
  f.render_widget(Paragraph::new(lines), inner);
}
