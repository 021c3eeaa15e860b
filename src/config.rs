//! Carga y gestión de configuración de la aplicación (servidor + GitHub + crawler).

use std::env;
use anyhow::{anyhow, Result};
use url::Url;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub frontend_dir: String,
    pub open_browser: bool,

    pub github_api_url: Url,
    pub github_user_agent: String,
    pub crawl_max_depth: usize,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de claves.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3322".to_string());
        let frontend_dir = lookup("FRONTEND_DIR").unwrap_or_else(|| "frontend".to_string());

        let open_browser = match lookup("OPEN_BROWSER") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("Valor no válido para OPEN_BROWSER: {raw}"))?,
            None => false,
        };

        let api_raw =
            lookup("GITHUB_API_URL").unwrap_or_else(|| "https://api.github.com".to_string());
        let github_api_url = Url::parse(api_raw.trim_end_matches('/'))
            .map_err(|e| anyhow!("GITHUB_API_URL no es una URL válida ({api_raw}): {e}"))?;

        let github_user_agent =
            lookup("GITHUB_USER_AGENT").unwrap_or_else(|| "AI-Test-Generator/1.0".to_string());

        let crawl_max_depth = match lookup("CRAWL_MAX_DEPTH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow!("CRAWL_MAX_DEPTH debe ser un entero positivo: {raw}"))?,
            None => DEFAULT_MAX_DEPTH,
        };

        Ok(Self {
            server_addr,
            frontend_dir,
            open_browser,
            github_api_url,
            github_user_agent,
            crawl_max_depth,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:3322");
        assert_eq!(cfg.github_api_url.as_str(), "https://api.github.com/");
        assert_eq!(cfg.crawl_max_depth, DEFAULT_MAX_DEPTH);
        assert!(!cfg.open_browser);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("CRAWL_MAX_DEPTH", "3"),
            ("OPEN_BROWSER", "yes"),
            ("GITHUB_API_URL", "http://localhost:9999/"),
        ]))
        .unwrap();
        assert_eq!(cfg.crawl_max_depth, 3);
        assert!(cfg.open_browser);
        assert_eq!(cfg.github_api_url.as_str(), "http://localhost:9999/");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("CRAWL_MAX_DEPTH", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("OPEN_BROWSER", "quizás")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("GITHUB_API_URL", "no es url")])).is_err());
    }
}
