//! Clasificación de ficheros de código por lenguaje a partir de su extensión.
//!
//! La tabla `EXTENSIONS` es la única fuente de verdad: el crawler acepta un
//! fichero si y sólo si `classify` le asigna un lenguaje conocido.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lenguajes reconocidos. `Unknown` agrupa todo lo que no está en la tabla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "C++")]
    Cpp,
    C,
    #[serde(rename = "PHP")]
    Php,
    Ruby,
    Go,
    Rust,
    Vue,
    Svelte,
    Dart,
    Kotlin,
    Swift,
    #[serde(other)]
    Unknown,
}

/// Extensión (en minúsculas, sin punto) → lenguaje.
pub static EXTENSIONS: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("py", Language::Python),
    ("java", Language::Java),
    ("cs", Language::CSharp),
    ("cpp", Language::Cpp),
    ("c", Language::C),
    ("php", Language::Php),
    ("rb", Language::Ruby),
    ("go", Language::Go),
    ("rs", Language::Rust),
    ("vue", Language::Vue),
    ("svelte", Language::Svelte),
    ("dart", Language::Dart),
    ("kt", Language::Kotlin),
    ("swift", Language::Swift),
];

impl Language {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::CSharp => "C#",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::Php => "PHP",
            Self::Ruby => "Ruby",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Vue => "Vue",
            Self::Svelte => "Svelte",
            Self::Dart => "Dart",
            Self::Kotlin => "Kotlin",
            Self::Swift => "Swift",
            Self::Unknown => "Unknown",
        }
    }

    /// Forma apta para identificadores (`c#` → `csharp`, `c++` → `cpp`).
    pub fn slug(self) -> &'static str {
        match self {
            Self::CSharp => "csharp",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::C => "c",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Dart => "dart",
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Clasifica un nombre de fichero. Total y sin efectos secundarios.
pub fn classify(filename: &str) -> Language {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return Language::Unknown;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or(Language::Unknown)
}

/// Lista de extensiones aceptadas por el crawler.
pub fn is_code_file(filename: &str) -> bool {
    classify(filename) != Language::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_extensions() {
        assert_eq!(classify("index.ts"), Language::TypeScript);
        assert_eq!(classify("App.tsx"), Language::TypeScript);
        assert_eq!(classify("main.py"), Language::Python);
        assert_eq!(classify("server.go"), Language::Go);
        assert_eq!(classify("lib.rs"), Language::Rust);
        assert_eq!(classify("Program.cs"), Language::CSharp);
        assert_eq!(classify("engine.cpp"), Language::Cpp);
    }

    #[test]
    fn extension_match_is_case_insensitive_and_uses_last_dot() {
        assert_eq!(classify("README.PY"), Language::Python);
        assert_eq!(classify("component.test.JSX"), Language::JavaScript);
        assert_eq!(classify("archive.py.bak"), Language::Unknown);
    }

    #[test]
    fn names_without_known_extension_are_unknown() {
        assert_eq!(classify("Makefile"), Language::Unknown);
        assert_eq!(classify("notes.md"), Language::Unknown);
        assert_eq!(classify("trailing."), Language::Unknown);
        assert_eq!(classify(""), Language::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        for name in ["a.ts", "b.PY", "c", "d.kt", "e.unknown"] {
            assert_eq!(classify(name), classify(name));
        }
    }

    #[test]
    fn allow_list_is_exactly_the_table_domain() {
        for (ext, lang) in EXTENSIONS {
            let name = format!("file.{ext}");
            assert!(is_code_file(&name), "{name} debería aceptarse");
            assert_eq!(classify(&name), *lang);
            assert!(is_code_file(&format!("FILE.{}", ext.to_uppercase())));
        }
        for ext in ["md", "json", "toml", "h", "yml", "lock"] {
            assert!(!is_code_file(&format!("file.{ext}")));
        }
    }

    #[test]
    fn display_names_round_trip_through_serde() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"C#\"");
        let parsed: Language = serde_json::from_str("\"C++\"").unwrap();
        assert_eq!(parsed, Language::Cpp);
        let other: Language = serde_json::from_str("\"Haskell\"").unwrap();
        assert_eq!(other, Language::Unknown);
    }
}
