//! Cliente mínimo de la API REST de GitHub (v3) sobre `reqwest`.
//!
//! Implementa `RepoContents` para el crawler y expone la verificación de la
//! credencial y el listado de repositorios del usuario.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::{
    crawler::{FetchError, Listing, RepoContents},
    models::RemoteNode,
};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Cliente ligado a una credencial concreta. `Client` se comparte entre peticiones.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    user_agent: String,
    token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl GitHubClient {
    pub fn new(http: Client, api_base: &Url, user_agent: &str, token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.clone(),
            user_agent: user_agent.to_string(),
            token: token.into(),
        }
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT_V3)
            .header("User-Agent", &self.user_agent)
    }

    /// Comprueba la credencial devolviendo el usuario autenticado.
    pub async fn current_user(&self) -> Result<GitHubUser, FetchError> {
        let url = self.endpoint(["user"])?;
        let response = self.send(url).await?;
        response
            .json::<GitHubUser>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Últimos 50 repositorios del usuario, ordenados por actualización.
    pub async fn list_repositories(&self) -> Result<Vec<GitHubRepository>, FetchError> {
        let mut url = self.endpoint(["user", "repos"])?;
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", "50");
        let response = self.send(url).await?;
        response
            .json::<Vec<GitHubRepository>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// URL bajo la base de la API; cada segmento se codifica por separado.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("URL base no válida: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// `repos/{owner}/{name}/contents/{path}`. Caracteres como `#` o `?` en la
    /// ruta se escapan y no se confunden con fragmento o query.
    fn contents_url(&self, repo: &str, path: &str) -> Result<Url, FetchError> {
        let segments = std::iter::once("repos")
            .chain(repo.split('/'))
            .chain(std::iter::once("contents"))
            .chain(path.split('/'));
        self.endpoint(segments)
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, FetchError> {
        debug!("GET {url}");
        let response = self
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = is_rate_limited(response.headers());
        let body = response.text().await.unwrap_or_default();
        error!("GitHub respondió {status} para {url}: {body}");
        Err(match status {
            StatusCode::NOT_FOUND => FetchError::NotFound,
            // Un 403 por límite de peticiones no dice nada de la credencial.
            StatusCode::FORBIDDEN if rate_limited => FetchError::Status {
                status: status.as_u16(),
                body,
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                FetchError::Unauthorized(status.as_u16())
            }
            other => FetchError::Status {
                status: other.as_u16(),
                body,
            },
        })
    }
}

#[async_trait]
impl RepoContents for GitHubClient {
    async fn list(&self, repo: &str, path: &str) -> Result<Listing, FetchError> {
        let url = self.contents_url(repo, path)?;
        let response = self.send(url).await?;
        let data: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        parse_listing(data)
    }
}

fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Un array es un directorio; un objeto es un único fichero.
fn parse_listing(data: Value) -> Result<Listing, FetchError> {
    match data {
        Value::Array(_) => serde_json::from_value::<Vec<RemoteNode>>(data)
            .map(Listing::Directory)
            .map_err(|e| FetchError::Decode(e.to_string())),
        Value::Object(_) => serde_json::from_value::<RemoteNode>(data)
            .map(Listing::File)
            .map_err(|e| FetchError::Decode(e.to_string())),
        other => Err(FetchError::Decode(format!(
            "se esperaba un array u objeto, se recibió {other}"
        ))),
    }
}
