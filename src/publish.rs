//! Frontera de publicación: contrato para llevar un artefacto a un repositorio.
//!
//! La creación de ramas, commits y pull requests queda fuera de este servicio;
//! aquí sólo vive el contrato y una implementación que lo valida y rechaza.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::GeneratedArtifact;

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub repository: String,
    pub artifact: GeneratedArtifact,
    pub branch: String,
    /// Credencial opaca proporcionada por el llamante.
    pub credential: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub success: bool,
    #[serde(rename = "pr_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("el repositorio debe tener el formato 'owner/name': {0}")]
    InvalidRepository(String),
    #[error("la rama de destino no puede estar vacía")]
    MissingBranch,
    #[error("se requiere una credencial para publicar")]
    MissingCredential,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<PublishOutcome, PublishError>;
}

/// Comprueba la forma de la petición, común a cualquier publicador.
pub fn validate(request: &PublishRequest) -> Result<(), PublishError> {
    let parts: Vec<&str> = request.repository.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(PublishError::InvalidRepository(request.repository.clone()));
    }
    if request.branch.trim().is_empty() {
        return Err(PublishError::MissingBranch);
    }
    if request.credential.trim().is_empty() {
        return Err(PublishError::MissingCredential);
    }
    Ok(())
}

/// Nombre de rama por defecto: `test-cases-<milisegundos unix>`.
pub fn default_branch_name() -> String {
    format!("test-cases-{}", chrono::Utc::now().timestamp_millis())
}

/// Publicador por defecto: valida la petición y responde que la publicación
/// no está habilitada en este despliegue.
#[derive(Debug, Clone, Default)]
pub struct DisabledPublisher;

#[async_trait]
impl Publisher for DisabledPublisher {
    async fn publish(&self, request: PublishRequest) -> Result<PublishOutcome, PublishError> {
        validate(&request)?;
        info!(
            "Publicación solicitada de '{}' en {}@{} (deshabilitada).",
            request.artifact.filename, request.repository, request.branch
        );
        Ok(PublishOutcome {
            success: false,
            url: None,
            message: "La publicación de pull requests no está habilitada en este servidor."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn request(repository: &str, branch: &str, credential: &str) -> PublishRequest {
        PublishRequest {
            repository: repository.into(),
            artifact: GeneratedArtifact {
                id: "test-1".into(),
                plan_entry_id: "unit-go-1".into(),
                code: "// code".into(),
                filename: "unit.test.js".into(),
                framework: "Go testing package".into(),
            },
            branch: branch.into(),
            credential: credential.into(),
        }
    }

    #[test]
    fn validates_request_shape() {
        assert!(validate(&request("octo/app", "b", "t")).is_ok());
        assert_eq!(
            validate(&request("octo", "b", "t")),
            Err(PublishError::InvalidRepository("octo".into()))
        );
        assert_eq!(
            validate(&request("octo/app/x", "b", "t")),
            Err(PublishError::InvalidRepository("octo/app/x".into()))
        );
        assert_eq!(validate(&request("octo/app", " ", "t")), Err(PublishError::MissingBranch));
        assert_eq!(validate(&request("octo/app", "b", "")), Err(PublishError::MissingCredential));
    }

    #[test]
    fn default_branch_has_prefix_and_timestamp() {
        let branch = default_branch_name();
        let millis = branch.strip_prefix("test-cases-").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn disabled_publisher_reports_failure_without_url() {
        let outcome = assert_ok!(DisabledPublisher.publish(request("octo/app", "b", "t")).await);
        assert!(!outcome.success);
        assert_eq!(outcome.url, None);
    }

    #[tokio::test]
    async fn disabled_publisher_still_rejects_bad_requests() {
        let result = DisabledPublisher.publish(request("bad", "b", "t")).await;
        assert!(matches!(result, Err(PublishError::InvalidRepository(_))));
    }
}
