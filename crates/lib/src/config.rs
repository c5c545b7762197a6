//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.parley/config.json`) and environment.
//! Kept minimal: gateway bind/port and the OpenAI backend settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// OpenAI backend settings (key, model, base URL).
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Gateway bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the HTTP endpoint (default 8787).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8787
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// OpenAI backend config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfig {
    /// API key for the completion service. Overridden by OPENAI_API_KEY env when set.
    pub api_key: Option<String>,
    /// Completion model id (default "gpt-4o-mini").
    pub model: Option<String>,
    /// API base URL override (default https://api.openai.com/v1). Useful for proxies and tests.
    pub base_url: Option<String>,
}

/// Resolve the OpenAI API key: env OPENAI_API_KEY overrides config. None when neither is set;
/// the responder then falls back to its static text instead of calling out.
pub fn resolve_openai_api_key(config: &Config) -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .openai
                .api_key
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolve the completion model id from config. Falls back to DEFAULT_MODEL when absent or empty.
pub fn resolve_openai_model(config: &Config) -> String {
    config
        .openai
        .model
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("PARLEY_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".parley").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or PARLEY_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 8787);
        assert_eq!(g.bind, "127.0.0.1");
    }

    #[test]
    fn resolve_model_default_when_unset() {
        let config = Config::default();
        assert_eq!(resolve_openai_model(&config), "gpt-4o-mini");
    }

    #[test]
    fn resolve_model_ignores_whitespace_only() {
        let mut config = Config::default();
        config.openai.model = Some("   ".to_string());
        assert_eq!(resolve_openai_model(&config), "gpt-4o-mini");
    }

    #[test]
    fn resolve_model_from_config() {
        let mut config = Config::default();
        config.openai.model = Some("gpt-4o".to_string());
        assert_eq!(resolve_openai_model(&config), "gpt-4o");
    }

    #[test]
    fn parse_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{"gateway":{"port":9000},"openai":{"apiKey":"sk-test","baseUrl":"http://127.0.0.1:1234/v1"}}"#,
        )
        .expect("parse config");
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.bind, "127.0.0.1");
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.openai.base_url.as_deref(),
            Some("http://127.0.0.1:1234/v1")
        );
    }
}
