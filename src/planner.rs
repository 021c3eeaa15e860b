//! Síntesis del plan de tests: agrupa los ficheros por lenguaje y genera
//! entradas de plan con su complejidad estimada.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    language::Language,
    models::{CodeFile, Complexity, TestPlanEntry},
};

pub const GENERIC_FRAMEWORK: &str = "Generic Testing Framework";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("no se ha proporcionado ningún fichero para generar el plan de tests")]
    EmptyFileSet,
    #[error("la entrada del plan '{0}' no referencia ningún fichero")]
    EntryWithoutFiles(String),
    #[error("no se ha proporcionado ningún fichero para generar el código de test")]
    NoFilesSupplied,
}

/// Framework de testing recomendado para cada lenguaje.
pub fn framework_for(language: Language) -> &'static str {
    match language {
        Language::JavaScript | Language::TypeScript => "Jest + React Testing Library",
        Language::Python => "pytest + unittest",
        Language::Java => "JUnit 5",
        Language::CSharp => "NUnit",
        Language::Go => "Go testing package",
        Language::Rust => "Rust built-in testing",
        _ => GENERIC_FRAMEWORK,
    }
}

/// Genera el plan de tests para `files`. `repository` sólo enriquece las descripciones.
pub fn synthesize(
    files: &[CodeFile],
    repository: Option<&str>,
) -> Result<Vec<TestPlanEntry>, SynthesisError> {
    if files.is_empty() {
        return Err(SynthesisError::EmptyFileSet);
    }

    let mut entries = Vec::new();
    for (language, bucket) in bucket_by_language(files) {
        let n = bucket.len();
        let framework = framework_for(language).to_string();
        let paths: Vec<String> = bucket.iter().map(|f| f.path.clone()).collect();
        let scope = match repository {
            Some(repo) if !repo.trim().is_empty() => format!(" of {}", repo.trim()),
            _ => String::new(),
        };

        entries.push(TestPlanEntry {
            id: entry_id("unit", language),
            title: format!("Unit Tests for {language} Components"),
            description: format!(
                "Comprehensive unit tests covering individual functions, methods, and components in {n} {language} files{scope}. Includes parameter validation, return value testing, and isolated functionality verification."
            ),
            framework: framework.clone(),
            files: paths.clone(),
            complexity: unit_complexity(n),
        });

        if n > 1 {
            entries.push(TestPlanEntry {
                id: entry_id("integration", language),
                title: format!("Integration Tests for {language} Modules"),
                description: format!(
                    "Integration tests to verify interactions between the {n} {language} modules{scope}. Tests data flow, API calls, and cross-component functionality."
                ),
                framework: framework.clone(),
                files: paths.clone(),
                complexity: Complexity::Medium,
            });
        }

        entries.push(TestPlanEntry {
            id: entry_id("error", language),
            title: "Error Handling & Edge Cases".to_string(),
            description: format!(
                "Error handling tests for {language} code{scope} including invalid inputs, boundary conditions, network failures, and exception scenarios. Ensures robust error recovery and user feedback."
            ),
            framework,
            files: paths,
            complexity: Complexity::High,
        });
    }

    Ok(entries)
}

fn unit_complexity(n: usize) -> Complexity {
    if n > 3 {
        Complexity::High
    } else if n > 1 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

fn entry_id(kind: &str, language: Language) -> String {
    format!("{kind}-{}-{}", language.slug(), Uuid::new_v4())
}

/// Agrupa conservando el orden de primera aparición de cada lenguaje.
fn bucket_by_language(files: &[CodeFile]) -> Vec<(Language, Vec<&CodeFile>)> {
    let mut buckets: Vec<(Language, Vec<&CodeFile>)> = Vec::new();
    for file in files {
        let language = file.language_or_unknown();
        match buckets.iter_mut().find(|(lang, _)| *lang == language) {
            Some((_, bucket)) => bucket.push(file),
            None => buckets.push((language, vec![file])),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::classify;
    use std::collections::HashSet;

    fn file(path: &str) -> CodeFile {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        CodeFile {
            path: path.to_string(),
            language: Some(classify(&name)),
            name,
        }
    }

    fn shape(entries: &[TestPlanEntry]) -> Vec<(String, Complexity)> {
        entries
            .iter()
            .map(|e| (e.title.clone(), e.complexity))
            .collect()
    }

    #[test]
    fn single_file_bucket_yields_unit_and_error_entries() {
        let entries = synthesize(&[file("main.go")], None).unwrap();
        assert_eq!(
            shape(&entries),
            vec![
                ("Unit Tests for Go Components".to_string(), Complexity::Low),
                ("Error Handling & Edge Cases".to_string(), Complexity::High),
            ]
        );
        assert!(entries.iter().all(|e| e.framework == "Go testing package"));
    }

    #[test]
    fn five_file_bucket_yields_three_entries() {
        let files: Vec<CodeFile> = (0..5).map(|i| file(&format!("src/m{i}.rs"))).collect();
        let entries = synthesize(&files, Some("acme/app")).unwrap();
        let complexities: Vec<Complexity> = entries.iter().map(|e| e.complexity).collect();
        assert_eq!(
            complexities,
            vec![Complexity::High, Complexity::Medium, Complexity::High]
        );
        assert!(entries[0].description.contains("acme/app"));
    }

    #[test]
    fn mixed_typescript_and_python_scenario() {
        let files = vec![file("a/b.ts"), file("a/c.ts"), file("x.py")];
        let entries = synthesize(&files, None).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(
            shape(&entries),
            vec![
                ("Unit Tests for TypeScript Components".to_string(), Complexity::Medium),
                ("Integration Tests for TypeScript Modules".to_string(), Complexity::Medium),
                ("Error Handling & Edge Cases".to_string(), Complexity::High),
                ("Unit Tests for Python Components".to_string(), Complexity::Low),
                ("Error Handling & Edge Cases".to_string(), Complexity::High),
            ]
        );
        assert_eq!(entries[0].files, vec!["a/b.ts", "a/c.ts"]);
        assert_eq!(entries[3].files, vec!["x.py"]);
        assert_eq!(entries[0].framework, "Jest + React Testing Library");
        assert_eq!(entries[3].framework, "pytest + unittest");
    }

    #[test]
    fn files_keep_input_order_and_are_subset_of_input() {
        let files = vec![file("z.java"), file("m.kt"), file("a.java"), file("k.java")];
        let inputs: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
        let entries = synthesize(&files, None).unwrap();
        assert_eq!(entries[0].files, vec!["z.java", "a.java", "k.java"]);
        for entry in &entries {
            assert!(!entry.files.is_empty());
            assert!(entry.files.iter().all(|p| inputs.contains(p.as_str())));
        }
    }

    #[test]
    fn untagged_and_unmapped_languages_use_generic_path() {
        let files = vec![
            CodeFile { path: "notes".into(), name: "notes".into(), language: None },
            file("view.vue"),
        ];
        let entries = synthesize(&files, None).unwrap();
        assert_eq!(entries[0].title, "Unit Tests for Unknown Components");
        assert!(entries.iter().all(|e| e.framework == GENERIC_FRAMEWORK));
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn ids_are_unique_even_for_same_language_in_one_call() {
        let files: Vec<CodeFile> = (0..4).map(|i| file(&format!("s{i}.py"))).collect();
        let mut ids = HashSet::new();
        for _ in 0..50 {
            for entry in synthesize(&files, None).unwrap() {
                assert!(ids.insert(entry.id));
            }
        }
        assert_eq!(ids.len(), 150);
    }

    #[test]
    fn empty_input_is_a_validation_error() {
        assert_eq!(synthesize(&[], None), Err(SynthesisError::EmptyFileSet));
    }
}
