//! Síntesis del código de test para una entrada del plan.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::{
    language::Language,
    models::{CodeFile, GeneratedArtifact, TestPlanEntry},
    planner::SynthesisError,
    templates,
};

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("regex estática válida"));

const FALLBACK_SUFFIX: &str = ".test.js";

/// Variante de plantilla. El despacho se hace sobre el lenguaje del primer
/// fichero suministrado, no sobre la entrada del plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    JavaScript,
    Python,
    Java,
    Generic,
}

impl Template {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::JavaScript | Language::TypeScript => Self::JavaScript,
            Language::Python => Self::Python,
            Language::Java => Self::Java,
            _ => Self::Generic,
        }
    }

    fn render(self, entry: &TestPlanEntry, files: &[CodeFile]) -> String {
        match self {
            Self::JavaScript => templates::javascript(entry, files),
            Self::Python => templates::python(entry, files),
            Self::Java => templates::java(entry, files),
            Self::Generic => templates::generic(entry, files),
        }
    }
}

fn filename_suffix(language: Language) -> &'static str {
    match language {
        Language::JavaScript => ".test.js",
        Language::TypeScript => ".test.ts",
        Language::Python => "_test.py",
        Language::Java => "Test.java",
        _ => FALLBACK_SUFFIX,
    }
}

/// Título en minúsculas con cada tramo no alfanumérico reducido a un guion.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALPHANUMERIC.replace_all(&lower, "-").into_owned()
}

pub fn test_filename(title: &str, language: Language) -> String {
    format!("{}{}", slugify(title), filename_suffix(language))
}

/// Genera el artefacto de test para `entry` a partir de `files`.
pub fn render(
    entry: &TestPlanEntry,
    files: &[CodeFile],
) -> Result<GeneratedArtifact, SynthesisError> {
    if entry.files.is_empty() {
        return Err(SynthesisError::EntryWithoutFiles(entry.id.clone()));
    }
    let first = files.first().ok_or(SynthesisError::NoFilesSupplied)?;
    let language = first.language_or_unknown();

    let code = Template::for_language(language).render(entry, files);

    Ok(GeneratedArtifact {
        id: format!("test-{}", Uuid::new_v4()),
        plan_entry_id: entry.id.clone(),
        code,
        filename: test_filename(&entry.title, language),
        framework: entry.framework.clone(),
    })
}
