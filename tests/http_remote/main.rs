//! HTTP remote integration tests.
//!
//! Starts an axum server mimicking the seed API and exercises the stores
//! through `HttpRemote` with reqwest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use taskdeck::{
    HttpRemote, InMemoryKeyValueStore, KeyValueStore, Project, ProjectStore, RemoteError,
    RemoteSource, StoreError, Task, TaskStore,
};

#[derive(Default)]
struct Hits {
    users: AtomicUsize,
    todos: AtomicUsize,
}

fn users() -> Value {
    json!([
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "company": { "name": "Deckow-Crist", "catchPhrase": "Proactive didactic contingency", "bs": "" }
        }
    ])
}

fn todos() -> Vec<Value> {
    vec![
        json!({ "userId": 1, "id": 1, "title": "delectus aut autem", "completed": false }),
        json!({ "userId": 1, "id": 2, "title": "quis ut nam facilis", "completed": true }),
        json!({ "userId": 2, "id": 21, "title": "suscipit repellat esse", "completed": false }),
    ]
}

async fn list_users(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
    hits.users.fetch_add(1, Ordering::SeqCst);
    Json(users())
}

async fn get_user(Path(id): Path<u64>) -> impl IntoResponse {
    let found = users()
        .as_array()
        .and_then(|all| all.iter().find(|u| u["id"] == id).cloned());
    match found {
        Some(user) => (StatusCode::OK, Json(user)),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn list_todos(
    State(hits): State<Arc<Hits>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.todos.fetch_add(1, Ordering::SeqCst);
    let user_id: Option<u64> = query.get("userId").and_then(|v| v.parse().ok());
    let filtered: Vec<Value> = todos()
        .into_iter()
        .filter(|t| user_id.map_or(true, |uid| t["userId"] == uid))
        .collect();
    Json(filtered)
}

async fn get_todo(Path(id): Path<u64>) -> impl IntoResponse {
    match todos().into_iter().find(|t| t["id"] == id) {
        Some(todo) => (StatusCode::OK, Json(todo)),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Bind to port 0 and return the base URL.
async fn start_server(hits: Arc<Hits>) -> String {
    let app = Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/todos", get(list_todos))
        .route("/todos/:id", get(get_todo))
        .route(
            "/broken/users",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbled/users", get(|| async { Json(json!({ "not": "a list" })) }))
        .with_state(hits);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn remote<M: taskdeck::Resource>(base: &str) -> Arc<HttpRemote<M>> {
    Arc::new(HttpRemote::new(base, Duration::from_secs(5)).unwrap())
}

fn backend() -> Arc<dyn KeyValueStore> {
    Arc::new(InMemoryKeyValueStore::new())
}

#[tokio::test]
async fn project_store_seeds_from_users_endpoint() {
    let hits = Arc::new(Hits::default());
    let base = start_server(hits.clone()).await;
    let store = ProjectStore::new(backend(), remote::<Project>(&base));

    let projects = store.fetch_all().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].address.geo.lat, "-37.3159");
    assert_eq!(projects[1].description(), "Proactive didactic contingency");
    assert_eq!(projects[1].email, "");

    store.fetch_all().await.unwrap();
    assert_eq!(hits.users.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn task_store_filters_by_user_id_query() {
    let hits = Arc::new(Hits::default());
    let base = start_server(hits.clone()).await;
    let store = TaskStore::new(backend(), remote::<Task>(&base));

    let tasks = store.fetch_by_parent(1).await.unwrap();
    let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let none = store.fetch_by_parent(9).await.unwrap();
    assert!(none.is_empty());
    store.fetch_by_parent(9).await.unwrap();
    assert_eq!(hits.todos.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn single_reads_map_404_to_none() {
    let base = start_server(Arc::new(Hits::default())).await;
    let projects = remote::<Project>(&base);
    let tasks = remote::<Task>(&base);

    assert_eq!(projects.get(2).await.unwrap().unwrap().name, "Ervin Howell");
    assert!(projects.get(50).await.unwrap().is_none());
    assert!(tasks.get(21).await.unwrap().is_some());
    assert!(tasks.get(500).await.unwrap().is_none());

    let store = TaskStore::new(backend(), tasks);
    assert!(matches!(
        store.fetch_one(500).await,
        Err(StoreError::NotFound { id: 500, .. })
    ));
}

#[tokio::test]
async fn server_errors_surface_as_status() {
    let base = start_server(Arc::new(Hits::default())).await;
    let broken = remote::<Project>(&format!("{base}/broken"));

    let err = broken.list(None).await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 500, .. }));

    let store = ProjectStore::new(backend(), broken);
    assert!(store.fetch_all().await.unwrap_err().is_network());
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let base = start_server(Arc::new(Hits::default())).await;
    let garbled = remote::<Project>(&format!("{base}/garbled"));

    let err = garbled.list(None).await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dead = remote::<Task>(&format!("http://{addr}"));
    let err = dead.list(Some(1)).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport { .. }));
}
