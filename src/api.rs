use axum::{
    extract::{Json, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    codegen,
    crawler::{self, CrawlError, CrawlReport},
    github::{GitHubRepository, GitHubUser},
    models::{CodeFile, GeneratedArtifact, TestPlanEntry},
    planner,
    publish::{self, PublishOutcome, PublishRequest},
    store::{self, Post},
};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct GitHubAuthPayload {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Serialize)]
pub struct UserInfo {
    login: String,
    name: String,
    avatar_url: String,
}

#[derive(Serialize)]
pub struct RepositoryInfo {
    id: i64,
    name: String,
    full_name: String,
    description: String,
    language: String,
}

#[derive(Serialize)]
pub struct GitHubAuthResponse {
    success: bool,
    user: UserInfo,
    repositories: Vec<RepositoryInfo>,
}

#[derive(Deserialize)]
pub struct FilesQuery {
    repo: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    max_depth: Option<usize>,
}

#[derive(Deserialize)]
pub struct SummariesPayload {
    files: Vec<CodeFile>,
    #[serde(default)]
    repository: Option<String>,
}

#[derive(Deserialize)]
pub struct TestCodePayload {
    summary: TestPlanEntry,
    files: Vec<CodeFile>,
}

#[derive(Deserialize)]
pub struct CreatePrPayload {
    repository: String,
    test: GeneratedArtifact,
    #[serde(default)]
    branch: Option<String>,
    token: String,
}

#[derive(Deserialize)]
pub struct PostsQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostPayload {
    #[serde(default)]
    content: String,
    #[serde(default)]
    author_id: String,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/github/auth", post(github_auth_handler))
        .route("/api/github/files", get(github_files_handler))
        .route("/api/github/create-pr", post(create_pr_handler))
        .route("/api/ai/generate-summaries", post(generate_summaries_handler))
        .route("/api/ai/generate-test-code", post(generate_test_code_handler))
        .route("/api/posts", get(list_posts_handler).post(create_post_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[axum::debug_handler]
async fn github_auth_handler(
    State(state): State<AppState>,
    Json(payload): Json<GitHubAuthPayload>,
) -> Result<Json<GitHubAuthResponse>, ApiError> {
    let token = match payload.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Se requiere un token.")),
    };

    let client = state.github(&token);
    let user: GitHubUser = client.current_user().await.map_err(|e| {
        warn!("Token de GitHub rechazado: {}", e);
        api_error(StatusCode::UNAUTHORIZED, "Token de GitHub no válido.")
    })?;

    let repositories: Vec<GitHubRepository> = client.list_repositories().await.map_err(|e| {
        error!("Error obteniendo repositorios de {}: {}", user.login, e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "No se pudieron obtener los repositorios.",
        )
    })?;

    info!("Usuario {} autenticado con {} repositorios.", user.login, repositories.len());
    Ok(Json(GitHubAuthResponse {
        success: true,
        user: UserInfo {
            name: user.name.clone().unwrap_or_else(|| user.login.clone()),
            login: user.login,
            avatar_url: user.avatar_url,
        },
        repositories: repositories
            .into_iter()
            .map(|repo| RepositoryInfo {
                id: repo.id,
                name: repo.name,
                full_name: repo.full_name,
                description: repo.description.unwrap_or_default(),
                language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect(),
    }))
}

#[axum::debug_handler]
async fn github_files_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FilesQuery>,
) -> Result<Json<CrawlReport>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        api_error(
            StatusCode::UNAUTHORIZED,
            "No se encontró un token de GitHub. Vuelva a autenticarse.",
        )
    })?;
    let repo = match query.repo.as_deref().map(str::trim) {
        Some(repo) if !repo.is_empty() => repo.to_string(),
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "El parámetro 'repo' es obligatorio.",
            ))
        }
    };

    let limit = state.config.crawl_max_depth;
    let max_depth = query.max_depth.map_or(limit, |d| d.min(limit));
    let root = query.path.unwrap_or_default();

    let client = state.github(&token);
    match crawler::crawl(&client, &repo, &root, max_depth).await {
        Ok(report) => Ok(Json(report)),
        Err(err @ CrawlError::Unauthorized { .. }) => {
            warn!("Crawl rechazado: {}", err);
            Err(api_error(
                StatusCode::UNAUTHORIZED,
                "Token de GitHub no válido o caducado.",
            ))
        }
    }
}

#[axum::debug_handler]
async fn generate_summaries_handler(
    Json(payload): Json<SummariesPayload>,
) -> Result<Json<Vec<TestPlanEntry>>, ApiError> {
    planner::synthesize(&payload.files, payload.repository.as_deref())
        .map(Json)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

#[axum::debug_handler]
async fn generate_test_code_handler(
    Json(payload): Json<TestCodePayload>,
) -> Result<Json<GeneratedArtifact>, ApiError> {
    codegen::render(&payload.summary, &payload.files)
        .map(Json)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

#[axum::debug_handler]
async fn create_pr_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrPayload>,
) -> Result<Json<PublishOutcome>, ApiError> {
    let branch = payload
        .branch
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(publish::default_branch_name);

    let request = PublishRequest {
        repository: payload.repository,
        artifact: payload.test,
        branch,
        credential: payload.token,
    };

    state
        .publisher
        .publish(request)
        .await
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

#[axum::debug_handler]
async fn list_posts_handler(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Json<Vec<Post>> {
    let author = query.user_id.as_deref().filter(|id| !id.is_empty());
    Json(store::list_posts(state.posts.as_ref(), author))
}

#[axum::debug_handler]
async fn create_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "El contenido es obligatorio."));
    }
    if payload.author_id.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "El autor es obligatorio."));
    }

    let post = state.posts.insert(Post::new(payload.author_id.trim(), content));
    Ok((StatusCode::CREATED, Json(post)))
}

// --- Handler de Apagado y Utilidades ---

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    let sender = state
        .shutdown_sender
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(());
    }
    StatusCode::OK
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("token "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}
