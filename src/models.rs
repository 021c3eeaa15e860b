//! Modelos de dominio (nodos remotos, ficheros de código, plan de tests y artefactos).

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Tipo de un nodo del árbol remoto tal y como lo devuelve la API de contenidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    File,
    #[serde(rename = "dir", alias = "directory")]
    Directory,
    /// symlink, submodule... nunca se recorren.
    #[serde(other)]
    Other,
}

/// Entrada transitoria de un listado remoto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNode {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RemoteKind,
}

/// Fichero de código aceptado por el crawler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl CodeFile {
    /// Lenguaje efectivo: un fichero sin etiqueta cuenta como `Unknown`.
    pub fn language_or_unknown(&self) -> Language {
        self.language.unwrap_or(Language::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Unidad de trabajo de testing descrita pero aún no renderizada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlanEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub framework: String,
    pub files: Vec<String>,
    pub complexity: Complexity,
}

/// Código de test generado a partir de una única entrada del plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub id: String,
    #[serde(rename = "summaryId", alias = "planEntryId")]
    pub plan_entry_id: String,
    pub code: String,
    pub filename: String,
    pub framework: String,
}
