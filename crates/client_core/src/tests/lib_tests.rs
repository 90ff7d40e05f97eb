use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    profile_paths: Arc<Mutex<Vec<String>>>,
    profile_updates: Arc<Mutex<Vec<Value>>>,
}

async fn handle_login(Json(body): Json<LoginRequest>) -> impl IntoResponse {
    if body.password == "correct-horse" {
        (
            StatusCode::OK,
            Json(json!({ "message": "Login successful!", "username": body.username })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
    }
}

async fn handle_register(Json(body): Json<RegisterRequest>) -> impl IntoResponse {
    if body.username == "taken@mindzap.io" {
        (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists" })),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully" })),
        )
    }
}

async fn handle_profile(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    state.profile_paths.lock().await.push(username.clone());
    match username.as_str() {
        "ghost@mindzap.io" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "User not found" })),
        )
            .into_response(),
        "list@mindzap.io" => (StatusCode::OK, Json(json!(["not", "an", "object"]))).into_response(),
        _ => (
            StatusCode::OK,
            Json(json!({ "username": username, "full_name": "Alice Example", "age": 31 })),
        )
            .into_response(),
    }
}

async fn handle_profile_update(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Json(fields): Json<Value>,
) -> impl IntoResponse {
    let renamed = fields
        .get("username")
        .and_then(Value::as_str)
        .filter(|name| *name != username)
        .map(str::to_string);
    state.profile_updates.lock().await.push(fields);
    Json(json!({ "message": "Profile updated", "username": renamed }))
}

async fn spawn_backend() -> anyhow::Result<(Url, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/login", post(handle_login))
        .route("/register", post(handle_register))
        .route(
            "/profile/:username",
            get(handle_profile).put(handle_profile_update),
        )
        .route("/broken/login", post(|| async { "<html>oops</html>" }))
        .route(
            "/crashing/login",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}"))?, state))
}

fn backend_at(base: &Url, path: &str) -> HttpBackend {
    HttpBackend::new(base.join(path).expect("join base url"))
}

#[tokio::test]
async fn login_returns_identity_on_success() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let response = backend
        .login("alice@mindzap.io", "correct-horse")
        .await
        .expect("login");
    assert_eq!(response.username.as_deref(), Some("alice@mindzap.io"));
    assert_eq!(response.message.as_deref(), Some("Login successful!"));
}

#[tokio::test]
async fn login_rejection_carries_status_and_backend_message() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let err = backend
        .login("alice@mindzap.io", "wrong")
        .await
        .expect_err("rejected");
    assert_eq!(
        err,
        BackendError::Http {
            status: 401,
            message: "Invalid email or password".to_string(),
        }
    );
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = backend_at(&base, "/broken/");

    let err = backend
        .login("alice@mindzap.io", "correct-horse")
        .await
        .expect_err("malformed");
    assert_eq!(err.kind(), BackendErrorKind::MalformedResponse);
    assert!(err.to_string().contains("<html>oops</html>"));
}

#[tokio::test]
async fn plain_text_error_body_is_kept_as_message() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = backend_at(&base, "/crashing");

    let err = backend
        .login("alice@mindzap.io", "correct-horse")
        .await
        .expect_err("server error");
    assert_eq!(
        err,
        BackendError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    );
}

#[tokio::test]
async fn refused_connection_is_connection_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = HttpBackend::new(Url::parse(&format!("http://{addr}")).expect("url"));
    let err = backend
        .login("alice@mindzap.io", "correct-horse")
        .await
        .expect_err("refused");
    assert_eq!(err.kind(), BackendErrorKind::ConnectionFailure);
}

#[tokio::test]
async fn fetch_profile_keeps_email_as_single_path_segment() {
    let (base, state) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let profile = backend
        .fetch_profile("alice+test@mindzap.io")
        .await
        .expect("profile");
    assert_eq!(profile.username(), Some("alice+test@mindzap.io"));
    assert_eq!(profile.get("age"), Some(&json!(31)));
    assert_eq!(
        *state.profile_paths.lock().await,
        vec!["alice+test@mindzap.io".to_string()]
    );
}

#[tokio::test]
async fn fetch_profile_requires_username() {
    let backend = HttpBackend::new(Url::parse("http://127.0.0.1:9").expect("url"));
    let err = backend.fetch_profile("  ").await.expect_err("missing username");
    assert_eq!(err, BackendError::MissingUsername);
}

#[tokio::test]
async fn fetch_profile_reports_http_and_shape_errors() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let missing = backend
        .fetch_profile("ghost@mindzap.io")
        .await
        .expect_err("not found");
    assert_eq!(
        missing,
        BackendError::Http {
            status: 404,
            message: "User not found".to_string(),
        }
    );

    let not_object = backend
        .fetch_profile("list@mindzap.io")
        .await
        .expect_err("array body");
    assert_eq!(not_object.kind(), BackendErrorKind::MalformedResponse);
}

#[tokio::test]
async fn register_reports_conflict() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let ok = backend
        .register("new@mindzap.io", "pw")
        .await
        .expect("register");
    assert_eq!(ok.message.as_deref(), Some("User registered successfully"));

    let err = backend
        .register("taken@mindzap.io", "pw")
        .await
        .expect_err("conflict");
    assert!(err.is_client_rejection());
}

#[tokio::test]
async fn update_profile_puts_fields_and_reports_rename() {
    let (base, state) = spawn_backend().await.expect("spawn backend");
    let backend = HttpBackend::new(base);

    let mut fields = ProfileData::new();
    fields.insert("username", "alice@newmail.io");
    fields.insert("full_name", "Alice N.");
    let response = backend
        .update_profile("alice@mindzap.io", &fields)
        .await
        .expect("update");

    assert_eq!(response.username.as_deref(), Some("alice@newmail.io"));
    assert_eq!(
        *state.profile_updates.lock().await,
        vec![json!({ "username": "alice@newmail.io", "full_name": "Alice N." })]
    );
}

#[tokio::test]
async fn driver_runs_full_session_against_http_backend() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let mut driver = SessionDriver::new(HttpBackend::new(base));

    driver
        .send(AppEvent::LoginSubmitted {
            username: "alice@mindzap.io".to_string(),
            password: "correct-horse".to_string(),
        })
        .await;
    let state = driver.send(AppEvent::ProfileIconClicked).await;

    assert_eq!(state.view(), shared::domain::View::Profile);
    assert_eq!(
        state.profile().and_then(|p| p.get("full_name")),
        Some(&json!("Alice Example"))
    );
}

#[test]
fn endpoint_appends_to_base_path() {
    let backend = HttpBackend::new(Url::parse("http://localhost:5000/api/").expect("url"));
    let url = backend.endpoint(&["profile", "a b@c.io"]).expect("endpoint");
    assert_eq!(url.as_str(), "http://localhost:5000/api/profile/a%20b@c.io");
}
