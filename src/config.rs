use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const AZURE_RESOURCE_NAME_ENV: &str = "AZURE_RESOURCE_NAME";
pub const AZURE_DEPLOYMENT_NAME_ENV: &str = "AZURE_DEPLOYMENT_NAME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Exact inbound path that routes to Anthropic.
    #[serde(default = "default_anthropic_path")]
    pub anthropic_path: String,
    /// Outbound request timeout. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub deployment_name: String,
    #[serde(default = "default_azure_api_version")]
    pub api_version: String,
    /// Replaces `https://{resource_name}.openai.azure.com` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
    #[serde(default = "default_anthropic_version")]
    pub version: String,
}

fn default_port() -> u16 {
    8787
}

fn default_anthropic_path() -> String {
    "/claude".to_string()
}

fn default_azure_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            anthropic_path: default_anthropic_path(),
            request_timeout_secs: None,
            azure: AzureConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            resource_name: String::new(),
            deployment_name: String::new(),
            api_version: default_azure_api_version(),
            base_url: None,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_base_url(),
            version: default_anthropic_version(),
        }
    }
}

impl GatewayConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Search standard locations for a config file, falling back to defaults.
    /// Priority: CLI arg > CWD > XDG config > home dir
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load(path);
        }

        for candidate in config_search_paths() {
            if candidate.exists() {
                tracing::info!(path = %candidate.display(), "Loading config");
                return Self::load(&candidate);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `AZURE_RESOURCE_NAME` / `AZURE_DEPLOYMENT_NAME` from the process
    /// environment on top of whatever the file said.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = lookup(AZURE_RESOURCE_NAME_ENV) {
            self.azure.resource_name = name;
        }
        if let Some(name) = lookup(AZURE_DEPLOYMENT_NAME_ENV) {
            self.azure.deployment_name = name;
        }
        self
    }

    /// Azure chat completions endpoint. Empty names are not rejected here; the
    /// resulting URL simply fails at send time.
    pub fn azure_url(&self) -> String {
        let base = match self.azure.base_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.openai.azure.com", self.azure.resource_name),
        };
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base, self.azure.deployment_name, self.azure.api_version
        )
    }

    pub fn anthropic_url(&self) -> String {
        format!("{}/v1/messages", self.anthropic.base_url.trim_end_matches('/'))
    }

    /// Names of required Azure settings that are still empty.
    pub fn missing_azure_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.azure.base_url.is_none() && self.azure.resource_name.is_empty() {
            missing.push(AZURE_RESOURCE_NAME_ENV);
        }
        if self.azure.deployment_name.is_empty() {
            missing.push(AZURE_DEPLOYMENT_NAME_ENV);
        }
        missing
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("chat-gateway.toml"));

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("chat-gateway").join("config.toml"));
    }
    if let Some(home) = home_dir() {
        paths.push(home.join(".config").join("chat-gateway").join("config.toml"));
        paths.push(home.join(".chat-gateway.toml"));
    }

    paths
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
port = 5000
anthropic_path = "/anthropic"

[azure]
resource_name = "contoso"
deployment_name = "gpt-4o"
"#
        )
        .unwrap();

        let config = GatewayConfig::load(f.path()).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.anthropic_path, "/anthropic");
        assert_eq!(config.azure.api_version, "2024-02-15-preview");
        assert_eq!(config.anthropic.version, "2023-06-01");
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let f = NamedTempFile::new().unwrap();
        let config = GatewayConfig::load(f.path()).unwrap();
        assert_eq!(config.port, 8787);
        assert_eq!(config.anthropic_path, "/claude");
        assert_eq!(config.anthropic_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_azure_url_from_names() {
        let mut config = GatewayConfig::default();
        config.azure.resource_name = "contoso".to_string();
        config.azure.deployment_name = "gpt-4o".to_string();

        assert_eq!(
            config.azure_url(),
            "https://contoso.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview"
        );
        assert!(config.missing_azure_settings().is_empty());
    }

    #[test]
    fn test_azure_base_url_override() {
        let mut config = GatewayConfig::default();
        config.azure.base_url = Some("http://127.0.0.1:9000/".to_string());
        config.azure.deployment_name = "dep".to_string();

        assert_eq!(
            config.azure_url(),
            "http://127.0.0.1:9000/openai/deployments/dep/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = GatewayConfig::default();
        config.azure.resource_name = "from-file".to_string();

        let config = config.with_overrides_from(|key| match key {
            AZURE_RESOURCE_NAME_ENV => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.azure.resource_name, "from-env");
        assert_eq!(config.missing_azure_settings(), vec![AZURE_DEPLOYMENT_NAME_ENV]);
    }
}
