//! Recorrido acotado del árbol de un repositorio remoto.
//!
//! Cada directorio se lista con una sola llamada remota y las llamadas se
//! hacen de una en una. El recorrido usa una pila explícita de iteradores
//! (uno por directorio abierto), de modo que el orden de salida es el mismo
//! pre-orden en profundidad que daría una versión recursiva.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    language,
    models::{CodeFile, RemoteKind, RemoteNode},
};

/// Directorios que nunca se recorren (además de los que empiezan por `.`).
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "__pycache__",
    "target",
    "vendor",
];

/// Respuesta de una llamada de listado.
#[derive(Debug, Clone)]
pub enum Listing {
    Directory(Vec<RemoteNode>),
    /// La ruta apunta a un fichero, no a un directorio.
    File(RemoteNode),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("ruta no encontrada")]
    NotFound,
    #[error("credencial rechazada por el host remoto (HTTP {0})")]
    Unauthorized(u16),
    #[error("el host remoto respondió HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("error de red: {0}")]
    Transport(String),
    #[error("respuesta mal formada: {0}")]
    Decode(String),
}

/// Fuente de listados remotos. `repo` es opaco para el crawler (`owner/name`).
#[async_trait]
pub trait RepoContents: Send + Sync {
    async fn list(&self, repo: &str, path: &str) -> Result<Listing, FetchError>;
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("no se pudo autenticar contra el repositorio {repo}: {source}")]
    Unauthorized {
        repo: String,
        #[source]
        source: FetchError,
    },
}

/// Resultado de un crawl. `partial` indica que algún subárbol no pudo leerse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    pub files: Vec<CodeFile>,
    pub partial: bool,
    pub failed_paths: Vec<String>,
    pub directories_visited: usize,
}

impl std::fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ficheros de código en {} directorios ({} subárboles con error)",
            self.files.len(),
            self.directories_visited,
            self.failed_paths.len()
        )
    }
}

pub fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

/// Recorre `repo` desde `root_path` sin bajar de `max_depth` (la raíz es profundidad 0).
///
/// Un 404 es un listado vacío a cualquier profundidad. Un rechazo de la
/// credencial en la raíz aborta el crawl; por debajo de la raíz cualquier
/// fallo, incluida la autenticación, sólo vacía ese subárbol.
pub async fn crawl(
    source: &dyn RepoContents,
    repo: &str,
    root_path: &str,
    max_depth: usize,
) -> Result<CrawlReport, CrawlError> {
    info!("Iniciando crawl de {repo} desde '{root_path}' (profundidad máx. {max_depth})");

    let mut report = CrawlReport::default();
    let mut seen_files: HashSet<String> = HashSet::new();
    let mut visited_dirs: HashSet<String> = HashSet::new();
    visited_dirs.insert(root_path.to_string());

    let root_entries = match source.list(repo, root_path).await {
        Ok(listing) => entries_of(listing),
        Err(FetchError::NotFound) => {
            debug!("La ruta raíz '{root_path}' no existe en {repo}; listado vacío.");
            Vec::new()
        }
        Err(err @ FetchError::Unauthorized(_)) => {
            return Err(CrawlError::Unauthorized {
                repo: repo.to_string(),
                source: err,
            });
        }
        Err(err) => {
            warn!("Error listando la raíz '{root_path}' de {repo}: {err}. Se continúa sin ella.");
            report.partial = true;
            report.failed_paths.push(root_path.to_string());
            Vec::new()
        }
    };
    report.directories_visited += 1;

    let mut stack: Vec<(std::vec::IntoIter<RemoteNode>, usize)> =
        vec![(root_entries.into_iter(), 0)];

    while let Some((entries, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(node) = entries.next() else {
            stack.pop();
            continue;
        };

        match node.kind {
            RemoteKind::File => {
                if !language::is_code_file(&node.name) {
                    continue;
                }
                if !seen_files.insert(node.path.clone()) {
                    debug!("Fichero repetido ignorado: {}", node.path);
                    continue;
                }
                report.files.push(CodeFile {
                    language: Some(language::classify(&node.name)),
                    path: node.path,
                    name: node.name,
                });
            }
            RemoteKind::Directory => {
                if is_excluded_dir(&node.name) {
                    debug!("Directorio excluido: {}", node.path);
                    continue;
                }
                let child_depth = depth + 1;
                if child_depth > max_depth {
                    warn!("Profundidad máxima alcanzada en '{}'; no se desciende.", node.path);
                    continue;
                }
                if !visited_dirs.insert(node.path.clone()) {
                    debug!("Directorio ya visitado: {}", node.path);
                    continue;
                }

                report.directories_visited += 1;
                let children = match source.list(repo, &node.path).await {
                    Ok(listing) => entries_of(listing),
                    Err(FetchError::NotFound) => Vec::new(),
                    Err(err) => {
                        warn!("Error procesando '{}': {err}. Se omite el subárbol.", node.path);
                        report.partial = true;
                        report.failed_paths.push(node.path.clone());
                        Vec::new()
                    }
                };
                stack.push((children.into_iter(), child_depth));
            }
            RemoteKind::Other => {}
        }
    }

    info!("Crawl de {repo} terminado: {report}");
    Ok(report)
}

fn entries_of(listing: Listing) -> Vec<RemoteNode> {
    match listing {
        Listing::Directory(entries) => entries,
        Listing::File(node) => {
            debug!("'{}' es un fichero, no un directorio; listado vacío.", node.path);
            Vec::new()
        }
    }
}
