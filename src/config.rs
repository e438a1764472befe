use std::env;

use crate::error::{Result, SnapmorphError};

/// Environment variable holding the Replicate API credential.
pub const TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

/// Model invoked for every transformation.
pub const DEFAULT_MODEL: &str = "google/nano-banana";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        ServerConfig { host, port }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub api_token: Option<String>,
    pub model: String,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        ReplicateConfig {
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ReplicateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_token = env::var(TOKEN_VAR).ok().filter(|t| !t.trim().is_empty());
        let model = env::var("SNAPMORPH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        ReplicateConfig { api_token, model }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub replicate: ReplicateConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the full configuration from the process environment. Call
    /// `dotenv::dotenv()` beforehand so `.env` values are merged without
    /// overwriting anything already set in the environment.
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            replicate: ReplicateConfig::from_env(),
        }
    }

    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn with_replicate(mut self, replicate: ReplicateConfig) -> Self {
        self.replicate = replicate;
        self
    }

    /// Resolves the API credential. Missing credential is a fatal startup
    /// condition: the error carries the full setup instructions.
    pub fn resolve_token(&self) -> Result<String> {
        self.replicate
            .api_token
            .clone()
            .ok_or_else(|| SnapmorphError::Config(setup_instructions()))
    }
}

/// Instructions shown when no credential is found at startup.
pub fn setup_instructions() -> String {
    format!(
        "{TOKEN_VAR} not found!\n\
         \n\
         Setup instructions:\n\
         \n\
         1. Get your free API token from https://replicate.com/account/api-tokens\n\
         2. Option A - Set the environment variable:\n\
            macOS/Linux: export {TOKEN_VAR}=your_token_here\n\
            Windows:     set {TOKEN_VAR}=your_token_here\n\
         3. Option B - Create a .env file next to the binary:\n\
            {TOKEN_VAR}=your_token_here\n\
         \n\
         Then restart snapmorph."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.replicate.model, DEFAULT_MODEL);
        assert!(config.replicate.api_token.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .with_server(ServerConfig::new().with_host("0.0.0.0").with_port(3000))
            .with_replicate(
                ReplicateConfig::new()
                    .with_token("r8_test")
                    .with_model("google/nano-banana"),
            );
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.resolve_token().unwrap(), "r8_test");
    }

    #[test]
    fn test_missing_token_is_fatal_with_instructions() {
        let config = Config::new();
        let err = config.resolve_token().unwrap_err();
        let message = err.to_string();
        assert!(message.contains(TOKEN_VAR));
        assert!(message.contains("replicate.com"));
        assert!(message.contains("export"));
        assert!(message.contains(".env"));
    }
}
