//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_client::{ApiClient, CancelToken, StoreHandle, load};
use roster_core::{
  RequestStatus, StoreState, User, UserId,
  form::{Field, UserForm, ValidationErrors},
  view::{SortKey, ViewState},
};
use strum::IntoEnumIterator;
use tracing::{debug, info};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// The user table.
  List,
  /// One user's detail card, looked up by id on every frame.
  Detail(UserId),
}

// ─── Modals ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
  Add,
  /// Holds the record as it was when the form opened.
  Edit(User),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
  Form {
    mode:   FormMode,
    form:   UserForm,
    focus:  Field,
    errors: ValidationErrors,
  },
  ConfirmDelete(User),
  /// Shown after an edit is saved; offers a jump to the detail view.
  SavedPrompt(User),
}

impl Modal {
  fn add() -> Self {
    Self::Form {
      mode:   FormMode::Add,
      form:   UserForm::default(),
      focus:  Field::Name,
      errors: ValidationErrors::default(),
    }
  }

  fn edit(user: User) -> Self {
    Self::Form {
      form:   UserForm::for_user(&user),
      mode:   FormMode::Edit(user),
      focus:  Field::Name,
      errors: ValidationErrors::default(),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen.
  pub screen: Screen,

  /// Handle to the store actor. All mutations go through it.
  pub store: StoreHandle,

  /// Store state as of the last [`App::refresh`].
  pub state: StoreState,

  /// Search and sort parameters.
  pub view: ViewState,

  /// Whether the user is typing a search query.
  pub search_active: bool,

  /// Cursor position within the *projected* list.
  pub cursor: usize,

  /// Popup drawn over the current screen, if any.
  pub modal: Option<Modal>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Token for the most recent load. Cancelled on quit or when superseded.
  load_token: CancelToken,

  /// Shared HTTP client.
  client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, store: StoreHandle, view: ViewState) -> Self {
    Self {
      screen: Screen::List,
      state: store.snapshot(),
      store,
      view,
      search_active: false,
      cursor: 0,
      modal: None,
      status_msg: String::new(),
      load_token: CancelToken::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Start a load in the background. Any earlier load still in flight is
  /// cancelled so its result cannot overwrite this one.
  pub fn start_load(&mut self) {
    self.load_token.cancel();
    self.load_token = CancelToken::new();

    let token = self.load_token.clone();
    let client = Arc::clone(&self.client);
    let mut sink = self.store.clone();
    tokio::spawn(async move {
      let outcome = load(client.as_ref(), &mut sink, &token).await;
      debug!(?outcome, "background load finished");
    });
  }

  /// Pull the latest published store state.
  pub fn refresh(&mut self) {
    self.state = self.store.snapshot();
    self.clamp_cursor();
  }

  /// Cancel outstanding work before the app exits.
  pub fn shutdown(&self) {
    self.load_token.cancel();
    info!("shutting down");
  }

  // ── Projected list ────────────────────────────────────────────────────────

  /// Users matching the current query, in the current sort order.
  pub fn visible_users(&self) -> Vec<&User> { self.view.project(&self.state.users) }

  /// The user under the list cursor in the projected view, if any.
  pub fn cursor_user(&self) -> Option<&User> {
    self.visible_users().get(self.cursor).copied()
  }

  /// The user the detail screen points at, if it still exists.
  pub fn selected_user(&self) -> Option<&User> {
    match self.screen {
      Screen::Detail(id) => self.state.find(id),
      Screen::List => None,
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible_users().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  /// Move the cursor onto `id` if it is visible.
  fn select(&mut self, id: UserId) {
    if let Some(pos) = self.visible_users().iter().position(|u| u.id == id) {
      self.cursor = pos;
    }
  }

  /// Wait for queued mutations to land, then take the resulting state.
  async fn sync(&mut self) -> anyhow::Result<()> {
    self.state = self.store.settled().await?;
    self.clamp_cursor();
    Ok(())
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if let Some(modal) = self.modal.take() {
      self.handle_modal_key(modal, key).await?;
      return Ok(true);
    }

    // Outcome messages last until the next key outside a popup.
    self.status_msg.clear();

    if self.search_active {
      self.handle_search_key(key);
      return Ok(true);
    }

    match self.screen {
      Screen::List => self.handle_list_key(key).await,
      Screen::Detail(id) => self.handle_detail_key(id, key).await,
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.view.query.clear();
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        self.view.query.pop();
      }
      KeyCode::Char(c) => self.view.query.push(c),
      _ => return,
    }
    self.cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.visible_users().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_user().map(|u| u.id) {
          self.screen = Screen::Detail(id);
        }
      }

      // Search
      KeyCode::Char('/') => {
        self.search_active = true;
        self.cursor = 0;
      }
      KeyCode::Esc if !self.view.query.is_empty() => {
        self.view.query.clear();
        self.cursor = 0;
      }

      // Sorting
      KeyCode::Char('1') => self.sort_by(SortKey::Name),
      KeyCode::Char('2') => self.sort_by(SortKey::Email),
      KeyCode::Char('3') => self.sort_by(SortKey::Company),
      KeyCode::Char('s') => {
        let next = SortKey::iter()
          .cycle()
          .skip_while(|k| *k != self.view.sort_key)
          .nth(1)
          .unwrap_or_default();
        self.sort_by(next);
      }
      KeyCode::Char('S') => {
        self.view.direction = self.view.direction.flipped();
      }

      // Editing
      KeyCode::Char('a') => self.modal = Some(Modal::add()),
      KeyCode::Char('e') => {
        if let Some(user) = self.cursor_user().cloned() {
          self.modal = Some(Modal::edit(user));
        }
      }
      KeyCode::Char('d') => {
        if let Some(user) = self.cursor_user().cloned() {
          self.modal = Some(Modal::ConfirmDelete(user));
        }
      }

      KeyCode::Char('r') if self.state.status() == RequestStatus::Errored => {
        self.start_load();
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, id: UserId, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::List;
        self.select(id);
      }

      KeyCode::Char('e') => {
        if let Some(user) = self.state.find(id).cloned() {
          self.modal = Some(Modal::edit(user));
        }
      }
      KeyCode::Char('d') => {
        if let Some(user) = self.state.find(id).cloned() {
          self.modal = Some(Modal::ConfirmDelete(user));
        }
      }

      _ => {}
    }
    Ok(true)
  }

  /// Sorting by the active key flips direction; otherwise it switches key.
  fn sort_by(&mut self, key: SortKey) {
    let selected = self.cursor_user().map(|u| u.id);
    self.view.sort_by(key);
    if let Some(id) = selected {
      self.select(id);
    }
  }

  // ── Modals ────────────────────────────────────────────────────────────────

  /// `modal` has already been taken out of `self.modal`; put it back to keep
  /// it open.
  async fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> anyhow::Result<()> {
    match modal {
      Modal::Form {
        mode,
        mut form,
        mut focus,
        mut errors,
      } => {
        match key.code {
          KeyCode::Esc => return Ok(()),
          KeyCode::Enter => return self.submit(mode, form).await,
          KeyCode::Tab | KeyCode::Down => focus = step(focus, 1),
          KeyCode::BackTab | KeyCode::Up => focus = step(focus, -1),
          KeyCode::Backspace => {
            form.field_mut(focus).pop();
            errors.clear(focus);
          }
          KeyCode::Char(c) => {
            form.field_mut(focus).push(c);
            errors.clear(focus);
          }
          _ => {}
        }
        self.modal = Some(Modal::Form {
          mode,
          form,
          focus,
          errors,
        });
      }

      Modal::ConfirmDelete(user) => match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
          self.store.remove(user.id)?;
          self.sync().await?;
          if self.screen == Screen::Detail(user.id) {
            self.screen = Screen::List;
          }
          self.status_msg = format!("Deleted {}", user.name);
        }
        KeyCode::Char('n') | KeyCode::Esc => {}
        _ => self.modal = Some(Modal::ConfirmDelete(user)),
      },

      Modal::SavedPrompt(user) => match key.code {
        KeyCode::Enter | KeyCode::Char('g') => self.screen = Screen::Detail(user.id),
        KeyCode::Esc | KeyCode::Char('n') => {}
        _ => self.modal = Some(Modal::SavedPrompt(user)),
      },
    }
    Ok(())
  }

  /// Validate and apply a form. On validation failure the form stays open
  /// with its errors.
  async fn submit(&mut self, mode: FormMode, form: UserForm) -> anyhow::Result<()> {
    let result = match &mode {
      FormMode::Add => match form.submit_new() {
        Ok(input) => {
          let user = self.store.add(input).await?;
          self.sync().await?;
          self.select(user.id);
          self.status_msg = format!("Added {}", user.name);
          Ok(())
        }
        Err(e) => Err(e),
      },
      FormMode::Edit(original) => match form.submit_edit(original) {
        Ok(updated) => {
          self.store.update(updated.clone())?;
          self.sync().await?;
          self.status_msg = format!("Saved {}", updated.name);
          self.modal = Some(Modal::SavedPrompt(updated));
          Ok(())
        }
        Err(e) => Err(e),
      },
    };

    match result {
      Ok(()) => Ok(()),
      Err(roster_core::Error::Validation(errors)) => {
        let focus = Field::iter()
          .find(|f| errors.get(*f).is_some())
          .unwrap_or(Field::Name);
        self.modal = Some(Modal::Form {
          mode,
          form,
          focus,
          errors,
        });
        Ok(())
      }
      Err(e) => Err(e.into()),
    }
  }
}

/// Move focus `delta` fields forward, wrapping at either end.
fn step(focus: Field, delta: isize) -> Field {
  let fields: Vec<Field> = Field::iter().collect();
  let len = fields.len() as isize;
  let pos = fields.iter().position(|f| *f == focus).unwrap_or(0) as isize;
  fields[(pos + delta).rem_euclid(len) as usize]
}
