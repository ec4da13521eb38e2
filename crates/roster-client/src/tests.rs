//! Tests for the fetch coordinator, the store actor, and the HTTP client
//! against a local axum server.

use std::sync::Mutex;

use axum::{Json, Router, http::StatusCode, routing::get};
use roster_core::{NewUser, RequestStatus, User, UserId, UserStore};
use serde_json::json;
use tokio::{net::TcpListener, sync::oneshot};

use crate::{
  ApiClient, ApiConfig, CancelToken, Error, FetchError, LoadOutcome, StoreHandle,
  UserSource, load,
};

fn user(id: UserId, name: &str) -> User {
  User {
    id,
    name: name.into(),
    email: format!("{}@example.com", name.to_lowercase()),
    username: None,
    phone: None,
    website: None,
    company: None,
    address: None,
    is_new: false,
  }
}

// ─── Fake sources ────────────────────────────────────────────────────────────

/// Returns a fixed result immediately.
struct Fixed(Result<Vec<User>, FetchError>);

impl UserSource for Fixed {
  async fn fetch_users(&self) -> Result<Vec<User>, FetchError> { self.0.clone() }
}

/// Simulates the consumer going away while the read is in flight.
struct TornDownMidFlight {
  token:  CancelToken,
  result: Result<Vec<User>, FetchError>,
}

impl UserSource for TornDownMidFlight {
  async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
    self.token.cancel();
    self.result.clone()
  }
}

/// Blocks until the test releases it.
struct Gated(Mutex<Option<oneshot::Receiver<Result<Vec<User>, FetchError>>>>);

impl Gated {
  fn new() -> (Self, oneshot::Sender<Result<Vec<User>, FetchError>>) {
    let (tx, rx) = oneshot::channel();
    (Self(Mutex::new(Some(rx))), tx)
  }
}

impl UserSource for Gated {
  async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
    let rx = self.0.lock().unwrap().take().expect("fetched twice");
    rx.await
      .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into())))
  }
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_load_commits_users() {
  let mut store = UserStore::new();
  let data = vec![user(1, "Leanne"), user(2, "Ervin")];

  let outcome = load(&Fixed(Ok(data.clone())), &mut store, &CancelToken::new()).await;

  assert_eq!(outcome, LoadOutcome::Loaded(2));
  let state = store.state();
  assert!(!state.loading);
  assert_eq!(state.error, None);
  assert_eq!(state.users, data);
  assert_eq!(state.status(), RequestStatus::Loaded);
}

#[tokio::test]
async fn failed_load_records_message_and_leaves_users_empty() {
  let mut store = UserStore::new();
  let failure = FetchError::Status {
    status_code: 500,
    status_text: "Internal Server Error".into(),
  };

  let outcome = load(&Fixed(Err(failure)), &mut store, &CancelToken::new()).await;

  let message = "Failed to fetch users: 500 Internal Server Error";
  assert_eq!(outcome, LoadOutcome::Failed(message.into()));
  let state = store.state();
  assert!(!state.loading);
  assert_eq!(state.error.as_deref(), Some(message));
  assert!(state.users.is_empty());
}

#[tokio::test]
async fn transport_failure_message_is_the_error_text() {
  let mut store = UserStore::new();
  let source = Fixed(Err(FetchError::Transport("connection refused".into())));

  load(&source, &mut store, &CancelToken::new()).await;

  assert_eq!(store.state().error.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn cancelled_success_is_discarded() {
  let token = CancelToken::new();
  let source = TornDownMidFlight {
    token:  token.clone(),
    result: Ok(vec![user(1, "Leanne")]),
  };
  let mut store = UserStore::new();

  let outcome = load(&source, &mut store, &token).await;

  assert_eq!(outcome, LoadOutcome::Discarded);
  let state = store.state();
  assert!(state.loading);
  assert_eq!(state.error, None);
  assert!(state.users.is_empty());
}

#[tokio::test]
async fn cancelled_failure_is_discarded() {
  let token = CancelToken::new();
  let source = TornDownMidFlight {
    token:  token.clone(),
    result: Err(FetchError::Transport("timed out".into())),
  };
  let mut store = UserStore::new();

  let outcome = load(&source, &mut store, &token).await;

  assert_eq!(outcome, LoadOutcome::Discarded);
  assert!(store.state().loading);
  assert_eq!(store.state().error, None);
}

#[test]
fn guard_cancels_on_drop() {
  let token = CancelToken::new();
  let guard = token.guard();
  assert!(!token.is_cancelled());
  drop(guard);
  assert!(token.is_cancelled());
}

// ─── Actor ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn actor_applies_commands_in_arrival_order() {
  let handle = StoreHandle::spawn(UserStore::new());

  handle.set_all(vec![user(1, "A"), user(2, "B")]).unwrap();
  let first = handle.add(NewUser::new("C", "c@c.io")).await.unwrap();
  handle.remove(1).unwrap();
  let second = handle.add(NewUser::new("D", "d@d.io")).await.unwrap();

  let state = handle.settled().await.unwrap();
  let ids: Vec<UserId> = state.users.iter().map(|u| u.id).collect();
  assert_eq!(ids, vec![second.id, first.id, 2]);
  assert_ne!(first.id, second.id);
  assert_eq!(handle.snapshot(), state);
  assert_eq!(handle.find(2).map(|u| u.name), Some("B".into()));
}

#[tokio::test]
async fn concurrent_adds_get_distinct_ids() {
  let handle = StoreHandle::spawn(UserStore::new());

  let tasks: Vec<_> = (0..16)
    .map(|i| {
      let h = handle.clone();
      tokio::spawn(async move {
        h.add(NewUser::new(format!("U{i}"), "u@u.io")).await.unwrap().id
      })
    })
    .collect();

  let mut ids = Vec::new();
  for task in tasks {
    ids.push(task.await.unwrap());
  }
  ids.sort_unstable();
  ids.dedup();
  assert_eq!(ids.len(), 16);
  assert_eq!(handle.settled().await.unwrap().users.len(), 16);
}

#[tokio::test]
async fn load_through_actor_and_subscriber_sees_it() {
  let mut handle = StoreHandle::spawn(UserStore::new());
  let mut sink = handle.clone();
  let (source, release) = Gated::new();
  let token = CancelToken::new();

  let task = {
    let token = token.clone();
    tokio::spawn(async move { load(&source, &mut sink, &token).await })
  };

  handle.changed().await.unwrap();
  assert!(handle.snapshot().loading);

  release.send(Ok(vec![user(1, "Leanne")])).unwrap();
  assert_eq!(task.await.unwrap(), LoadOutcome::Loaded(1));

  let state = handle.settled().await.unwrap();
  assert!(!state.loading);
  assert_eq!(state.users.len(), 1);
}

#[tokio::test]
async fn stale_load_through_actor_leaves_store_loading() {
  let handle = StoreHandle::spawn(UserStore::new());
  let mut sink = handle.clone();
  let (source, release) = Gated::new();
  let token = CancelToken::new();
  let guard = token.guard();

  let task = {
    let token = token.clone();
    tokio::spawn(async move { load(&source, &mut sink, &token).await })
  };

  // Consumer goes away, then the read resolves.
  drop(guard);
  release.send(Ok(vec![user(1, "Leanne")])).unwrap();
  assert_eq!(task.await.unwrap(), LoadOutcome::Discarded);

  let state = handle.settled().await.unwrap();
  assert!(state.loading);
  assert!(state.users.is_empty());
  assert_eq!(state.error, None);
}

// ─── HTTP client ─────────────────────────────────────────────────────────────

async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });
  format!("http://{addr}")
}

fn client(base_url: String) -> ApiClient {
  ApiClient::new(ApiConfig {
    base_url,
    ..ApiConfig::default()
  })
  .unwrap()
}

#[tokio::test]
async fn api_client_reads_users() {
  let router = Router::new().route(
    "/users",
    get(|| async {
      Json(json!([
        {
          "id": 1,
          "name": "Leanne Graham",
          "email": "Sincere@april.biz",
          "company": { "name": "Romaguera-Crona", "catchPhrase": "x", "bs": "y" }
        },
        { "id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv", "company": "Deckow" }
      ]))
    }),
  );
  let base = serve(router).await;

  let users = client(format!("{base}/")).list_users().await.unwrap();

  assert_eq!(users.len(), 2);
  assert_eq!(users[0].company_name(), "Romaguera-Crona");
  assert_eq!(users[1].company_name(), "Deckow");
  assert!(users.iter().all(|u| !u.is_new));
}

#[tokio::test]
async fn api_client_maps_status_failure() {
  let router = Router::new().route(
    "/users",
    get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
  );
  let base = serve(router).await;

  let err = client(base).list_users().await.unwrap_err();

  assert_eq!(
    err,
    FetchError::Status {
      status_code: 503,
      status_text: "Service Unavailable".into(),
    }
  );
  assert_eq!(err.to_string(), "Failed to fetch users: 503 Service Unavailable");
}

#[tokio::test]
async fn api_client_maps_bad_body_to_decode_failure() {
  let router = Router::new().route("/users", get(|| async { Json(json!({ "not": "a list" })) }));
  let base = serve(router).await;

  let err = client(base).list_users().await.unwrap_err();
  assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn api_client_maps_transport_failure() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let err = client(format!("http://{addr}")).list_users().await.unwrap_err();
  assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn end_to_end_load_from_server() {
  let router = Router::new().route(
    "/users",
    get(|| async { Json(json!([{ "id": 3, "name": "Clementine", "email": "n@y.org" }])) }),
  );
  let api = client(serve(router).await);
  let mut store = UserStore::new();

  let outcome = load(&api, &mut store, &CancelToken::new()).await;

  assert_eq!(outcome, LoadOutcome::Loaded(1));
  assert_eq!(store.find(3).map(|u| u.name.as_str()), Some("Clementine"));
}

#[test]
fn stopped_store_reports_closed() {
  // The store task dies with the runtime it was spawned on.
  let runtime = tokio::runtime::Runtime::new().unwrap();
  let handle = runtime.block_on(async {
    let handle = StoreHandle::spawn(UserStore::new());
    handle.set_all(vec![user(1, "Leanne")]).unwrap();
    handle.settled().await.unwrap();
    handle
  });
  drop(runtime);

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .unwrap();
  runtime.block_on(async {
    let err = handle.add(NewUser::new("Ervin", "e@h.tv")).await.unwrap_err();
    assert!(matches!(err, Error::StoreClosed), "{err:?}");
    assert_eq!(err.to_string(), "store actor has stopped");

    assert!(matches!(handle.remove(1), Err(Error::StoreClosed)));
    assert!(matches!(handle.settled().await, Err(Error::StoreClosed)));

    // The last published state is still readable.
    assert_eq!(handle.find(1).map(|u| u.name), Some("Leanne".into()));

    // A load into a closed store finishes without panicking.
    let mut sink = handle.clone();
    let outcome = load(&Fixed(Ok(vec![])), &mut sink, &CancelToken::new()).await;
    assert_eq!(outcome, LoadOutcome::Loaded(0));
  });
}
