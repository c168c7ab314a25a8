//! JSON API and page routes for the local web UI.
//!
//! - `GET /` serves the single-page UI
//! - `GET /api/project` reports the project name and root
//! - `GET|POST /api/todos` lists or creates todos
//! - `GET|PUT|DELETE /api/todos/{id}` reads, updates, or removes one todo
//! - `POST /api/todos/{id}/toggle` flips done/open
//!
//! Every handler reloads the collection from disk, so edits made by the CLI
//! while the server runs are picked up on the next request.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::io::git;
use crate::io::project_io::ProjectError;
use crate::io::store::TodoStore;
use crate::model::{ParseError, Priority, Status, Todo};
use crate::ops::todo_ops;

const INDEX_HTML: &str = include_str!("index.html");

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TodoStore>,
    /// Serializes load-modify-save cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        AppState {
            store: Arc::new(store),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/api/project", get(get_project))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/{id}/toggle", post(toggle_todo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("todo not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Invalid(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] ProjectError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                error!(error = %e, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Task(e) => {
                error!(error = %e, "blocking task failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodosResponse {
    pub todos: Vec<Todo>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<Todo>,
}

impl TodoResponse {
    fn with(todo: Todo) -> Self {
        TodoResponse {
            success: true,
            todo: Some(todo),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateRequest {
    pub text: String,
    /// Comma-separated paths
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Absent fields are left alone. An empty `path` clears paths; an empty
/// `text` is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<Status>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_project(State(state): State<AppState>) -> Json<ProjectResponse> {
    let root = state.store.root();
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Project".to_string());
    Json(ProjectResponse {
        name,
        path: root.display().to_string(),
    })
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state.store.load()?;
    let count = todos.len();
    Ok(Json(TodosResponse { todos, count }))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todos = state.store.load()?;
    let (_, todo) = todo_ops::find_by_id(&todos, &id).ok_or(ApiError::NotFound)?;
    Ok(Json(TodoResponse::with(todo.clone())))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("todo text is required".into()));
    }
    let priority = parse_priority(req.priority.as_deref())?;

    let config = state.store.load_config()?;
    // git runs as a child process; keep it off the async workers.
    let git_info = if config.auto_git {
        let root = state.store.root().to_path_buf();
        let fallback = config.default_branch.clone();
        let info =
            tokio::task::spawn_blocking(move || git::capture_with_fallback(&root, fallback))
                .await?;
        Some(info)
    } else {
        None
    };

    let _guard = state.write_lock.lock().await;
    let mut todos = state.store.load()?;

    let mut todo = Todo::new(todo_ops::generate_id(), text);
    todo.meta.source = "web".to_string();
    if let Some(priority) = priority {
        todo.priority = priority;
    }
    if let Some(path) = &req.path {
        todo.context.paths = todo_ops::normalize_paths(&[path]);
    }
    if let Some(info) = git_info {
        todo.context.branch = info.branch;
        todo.context.commit = info.commit;
    }

    todos.push(todo.clone());
    state.store.save(&todos)?;
    debug!(id = %todo.id, "created todo");

    Ok((StatusCode::CREATED, Json(TodoResponse::with(todo))))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let status = parse_status(req.status.as_deref())?;
    let priority = parse_priority(req.priority.as_deref())?;

    let _guard = state.write_lock.lock().await;
    let mut todos = state.store.load()?;
    let (pos, _) = todo_ops::find_by_id(&todos, &id).ok_or(ApiError::NotFound)?;
    let todo = &mut todos[pos];

    if let Some(text) = req.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        todo.set_text(text);
    }
    if let Some(status) = status {
        todo.set_status(status);
    }
    if let Some(priority) = priority {
        todo.set_priority(priority);
    }
    if let Some(path) = &req.path {
        todo.set_paths(todo_ops::normalize_paths(&[path]));
    }

    let updated = todo.clone();
    state.store.save(&todos)?;
    debug!(id = %updated.id, "updated todo");
    Ok(Json(TodoResponse::with(updated)))
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let mut todos = state.store.load()?;
    let (pos, _) = todo_ops::find_by_id(&todos, &id).ok_or(ApiError::NotFound)?;
    todos[pos].toggle();
    let toggled = todos[pos].clone();
    state.store.save(&todos)?;
    Ok(Json(TodoResponse::with(toggled)))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let todos = state.store.load()?;
    let (pos, _) = todo_ops::find_by_id(&todos, &id).ok_or(ApiError::NotFound)?;
    state.store.save(&todo_ops::delete_at(&todos, pos))?;
    debug!(id = %id, "deleted todo");
    Ok(Json(TodoResponse {
        success: true,
        todo: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::project_io;
    use axum::body::Body;
    use axum::http::{Request, header};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let root = project_io::init_project(tmp.path(), false).unwrap();
        let store = TodoStore::open(root);
        let mut config = store.load_config().unwrap();
        config.auto_git = false;
        store.save_config(&config).unwrap();
        (tmp, AppState::new(store))
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn index_serves_page() {
        let (_tmp, state) = test_state();
        let response = create_router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn project_reports_root_name() {
        let (tmp, state) = test_state();
        let (status, json) = send(&state, "GET", "/api/project", None).await;
        assert_eq!(status, StatusCode::OK);
        let expected = tmp.path().file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(json["name"], expected);
    }

    #[tokio::test]
    async fn create_update_toggle_delete_flow() {
        let (_tmp, state) = test_state();

        let (status, json) = send(
            &state,
            "POST",
            "/api/todos",
            Some(serde_json::json!({ "text": "  write docs ", "path": "README.md, docs/", "priority": "HIGH" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["todo"]["text"], "write docs");
        assert_eq!(json["todo"]["priority"], "high");
        assert_eq!(json["todo"]["context"]["paths"], serde_json::json!(["README.md", "docs/"]));
        let id = json["todo"]["id"].as_str().unwrap().to_string();

        let (_, json) = send(&state, "GET", "/api/todos", None).await;
        assert_eq!(json["count"], 1);

        let (status, json) = send(
            &state,
            "PUT",
            &format!("/api/todos/{id}"),
            Some(serde_json::json!({ "status": "blocked", "path": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["todo"]["status"], "blocked");
        assert_eq!(json["todo"]["text"], "write docs");
        assert!(json["todo"]["context"].get("paths").is_none());

        let (_, json) = send(&state, "POST", &format!("/api/todos/{id}/toggle"), None).await;
        assert_eq!(json["todo"]["status"], "done");
        let (_, json) = send(&state, "POST", &format!("/api/todos/{id}/toggle"), None).await;
        assert_eq!(json["todo"]["status"], "open");

        let (status, json) = send(&state, "GET", &format!("/api/todos/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["todo"]["id"], id.as_str());

        let (status, json) = send(&state, "DELETE", &format!("/api/todos/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);

        let (_, json) = send(&state, "GET", "/api/todos", None).await;
        assert_eq!(json["count"], 0);
        assert_eq!(state.store.load().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn rejects_empty_text_and_bad_values() {
        let (_tmp, state) = test_state();

        let (status, json) = send(&state, "POST", "/api/todos", Some(serde_json::json!({ "text": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "todo text is required");

        let (status, _) = send(
            &state,
            "POST",
            "/api/todos",
            Some(serde_json::json!({ "text": "x", "priority": "urgent" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = send(&state, "POST", "/api/todos", Some(serde_json::json!({ "text": "x" }))).await;
        let id = json["todo"]["id"].as_str().unwrap().to_string();
        let (status, json) = send(
            &state,
            "PUT",
            &format!("/api/todos/{id}"),
            Some(serde_json::json!({ "status": "someday" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("invalid status: someday"));
        assert_eq!(state.store.load().unwrap()[0].status, Status::Open);
    }

    #[tokio::test]
    async fn create_records_default_branch_outside_repo() {
        let (tmp, state) = test_state();
        if git::is_repo(tmp.path()) {
            return;
        }
        let mut config = state.store.load_config().unwrap();
        config.auto_git = true;
        config.default_branch = Some("trunk".into());
        state.store.save_config(&config).unwrap();

        let (status, json) = send(&state, "POST", "/api/todos", Some(serde_json::json!({ "text": "x" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["todo"]["context"]["branch"], "trunk");
        assert_eq!(json["todo"]["meta"]["source"], "web");
        assert!(json["todo"]["context"].get("commit").is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (_tmp, state) = test_state();
        for (method, uri) in [
            ("GET", "/api/todos/deadbeef"),
            ("DELETE", "/api/todos/deadbeef"),
            ("POST", "/api/todos/deadbeef/toggle"),
        ] {
            let (status, json) = send(&state, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(json["error"], "todo not found");
        }
    }
}
