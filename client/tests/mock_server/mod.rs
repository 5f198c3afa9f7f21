//! In-process stand-in for the batch server, just enough of its HTTP
//! surface to drive the client against.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use client::{workspace, JobStatus, JobStatusResponse, LoginRequest, LoginResponse};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const USERNAME: &str = "tester";
pub const PASSWORD: &str = "secret";
/// Accepted credentials whose login answer carries no token.
pub const TOKENLESS_USERNAME: &str = "tokenless";

pub const COMPLETING_JOB: &str = "job-ok";
pub const FAILING_JOB: &str = "job-bad";
pub const STUCK_JOB: &str = "job-stuck";

const JWT_SECRET: &str = "mock-server-secret";

#[derive(Serialize, Deserialize)]
struct TokenClaims {
    iat: i64,
    exp: i64,
    user_id: String,
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub job_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Clone, Default)]
pub struct MockState {
    polls: Arc<Mutex<HashMap<String, u32>>>,
    pub images: Arc<Mutex<Vec<StoredImage>>>,
}

pub async fn spawn() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/repositories", get(repositories))
        .route("/jobs/:job_id", get(job_status))
        .route("/jobs/:job_id/images", post(upload_image))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn issue_token(user_id: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        iat: now,
        exp: now + 3600,
        user_id: user_id.to_string(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_ref()),
    )
    .unwrap()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    let Some(token) = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return false;
    };
    jsonwebtoken::decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_ref()),
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .is_ok()
}

async fn login(Json(login_request): Json<LoginRequest>) -> Response {
    if login_request.username == TOKENLESS_USERNAME {
        return (StatusCode::OK, Json(LoginResponse { token: None })).into_response();
    }
    if login_request.username != USERNAME || login_request.password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    }
    let token = issue_token(&login_request.username);
    (StatusCode::OK, Json(LoginResponse { token: Some(token) })).into_response()
}

async fn repositories(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (StatusCode::OK, Json(vec!["sample-repo"])).into_response()
}

async fn job_status(
    State(state): State<MockState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let poll = {
        let mut polls = state.polls.lock().unwrap();
        let count = polls.entry(job_id.clone()).or_insert(0);
        *count += 1;
        *count
    };
    let (status, output) = match (job_id.as_str(), poll) {
        (COMPLETING_JOB, 1) => ("Created", None),
        (COMPLETING_JOB, 2) => ("Running", None),
        (COMPLETING_JOB, _) => (
            "Completed",
            Some("A blue rectangle, a red circle and a green triangle."),
        ),
        (FAILING_JOB, 1) => ("Created", None),
        (FAILING_JOB, _) => ("Failed", Some("execution error")),
        (STUCK_JOB, _) => ("Running", None),
        _ => return (StatusCode::NOT_FOUND, "Job not found").into_response(),
    };
    (
        StatusCode::OK,
        Json(JobStatusResponse {
            job_id: Some(job_id),
            status: status.parse::<JobStatus>().unwrap(),
            output: output.map(str::to_string),
        }),
    )
        .into_response()
}

async fn upload_image(
    State(state): State<MockState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut stored = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            return StatusCode::BAD_REQUEST.into_response();
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
        };
        let Some(content_type) = field.content_type().map(str::to_owned) else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        let Ok(data) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        let image = StoredImage {
            job_id: job_id.clone(),
            file_name,
            content_type,
            size: data.len(),
        };
        state.images.lock().unwrap().push(image.clone());
        stored = Some(image);
    }
    let Some(image) = stored else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Ok(path) = workspace::job_image_path(
        std::path::Path::new(workspace::DEFAULT_WORKSPACE_ROOT),
        &image.job_id,
        &image.file_name,
    ) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "fileName": image.file_name,
            "path": path,
        })),
    )
        .into_response()
}
