//! The two backends this gateway can forward to.
//!
//! The provider is resolved once per request from the inbound path and then
//! drives which translators run and which endpoint/headers the invoker uses.

use crate::auth::Credential;
use crate::config::GatewayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic Messages API.
    Anthropic,
    /// Azure OpenAI chat completions. The default route.
    Azure,
}

impl Provider {
    /// Route selector: an exact match on the configured Anthropic path picks
    /// Anthropic, every other path falls through to Azure.
    #[must_use]
    pub fn for_path(path: &str, config: &GatewayConfig) -> Self {
        if path == config.anthropic_path {
            Self::Anthropic
        } else {
            Self::Azure
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Azure => "azure",
        }
    }

    /// Endpoint derived from configuration.
    #[must_use]
    pub fn endpoint(self, config: &GatewayConfig) -> String {
        match self {
            Self::Anthropic => config.anthropic_url(),
            Self::Azure => config.azure_url(),
        }
    }

    /// Credential and protocol headers required by the backend. `Content-Type`
    /// is set by the invoker for both.
    #[must_use]
    pub fn headers(
        self,
        credential: &Credential,
        config: &GatewayConfig,
    ) -> Vec<(&'static str, String)> {
        match self {
            Self::Anthropic => vec![
                ("x-api-key", credential.expose().to_string()),
                ("anthropic-version", config.anthropic.version.clone()),
            ],
            Self::Azure => vec![("api-key", credential.expose().to_string())],
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_claude_path_selects_anthropic() {
        let config = GatewayConfig::default();
        assert_eq!(Provider::for_path("/claude", &config), Provider::Anthropic);
    }

    #[test]
    fn test_every_other_path_selects_azure() {
        let config = GatewayConfig::default();
        for path in [
            "/",
            "",
            "/claude/",
            "/Claude",
            "/claude/v1/messages",
            "/v1/chat/completions",
            "/openai/claude",
            "/claudex",
        ] {
            assert_eq!(
                Provider::for_path(path, &config),
                Provider::Azure,
                "path {path:?} should route to azure"
            );
        }
    }

    #[test]
    fn test_configured_anthropic_path() {
        let config = GatewayConfig {
            anthropic_path: "/v1/anthropic".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(Provider::for_path("/v1/anthropic", &config), Provider::Anthropic);
        assert_eq!(Provider::for_path("/claude", &config), Provider::Azure);
    }

    #[test]
    fn test_provider_headers() {
        let config = GatewayConfig::default();
        let credential = Credential::new("sk-test");

        let anthropic = Provider::Anthropic.headers(&credential, &config);
        assert_eq!(
            anthropic,
            vec![
                ("x-api-key", "sk-test".to_string()),
                ("anthropic-version", "2023-06-01".to_string()),
            ]
        );

        let azure = Provider::Azure.headers(&credential, &config);
        assert_eq!(azure, vec![("api-key", "sk-test".to_string())]);
    }
}
