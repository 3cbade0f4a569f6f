//! Application configuration loaded from environment variables.

use std::env;

use secrecy::SecretString;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;

    pub const OPEN_ROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
    pub const OPEN_ROUTER_MODEL: &str = "gpt-5";
    pub const OPEN_ROUTER_REFERER: &str = "https://your-app-domain.com";
    pub const OPEN_ROUTER_TITLE: &str = "Overpowered Bot";

    pub const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
    pub const HF_MODEL: &str = "gpt2";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Where bot records live.
#[derive(Debug, Clone)]
pub enum StoreSettings {
    /// Hosted Supabase table accessed over its REST interface.
    Supabase { url: String, key: SecretString },
    /// Process-local store; development only.
    Memory,
}

impl StoreSettings {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Supabase { .. } => "supabase",
            Self::Memory => "memory",
        }
    }
}

/// OpenRouter-style chat completion provider settings.
#[derive(Debug, Clone)]
pub struct ChatCompletionSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub referer: String,
    pub title: String,
}

/// Hosted text-generation inference settings.
#[derive(Debug, Clone)]
pub struct TextGenerationSettings {
    pub token: SecretString,
    pub base_url: String,
    pub model: String,
}

impl TextGenerationSettings {
    /// Full inference endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }
}

/// Which reply strategy is wired into the bot handler.
#[derive(Debug, Clone)]
pub enum ReplySettings {
    /// `getbot` ignores `message` and returns the bare record.
    Disabled,
    /// Echo template, no network.
    Local,
    ChatCompletion(ChatCompletionSettings),
    TextGeneration(TextGenerationSettings),
}

impl ReplySettings {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Disabled => "none",
            Self::Local => "local",
            Self::ChatCompletion(_) => "chat",
            Self::TextGeneration(_) => "inference",
        }
    }

    /// True when replies come from a remote provider.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::ChatCompletion(_) | Self::TextGeneration(_))
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Record store backend
    pub store: StoreSettings,
    /// Reply strategy for `getbot` with a message
    pub reply: ReplySettings,
    /// Run the line-oriented CLI on stdin next to the HTTP server
    pub cli_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `BOTNEST_HOST`: Server host (default: 127.0.0.1)
    /// - `BOTNEST_PORT`: Server port (default: 8080)
    /// - `BOTNEST_STORE`: `supabase` (default) or `memory` (development only)
    /// - `SUPABASE_URL`, `SUPABASE_KEY`: required for the Supabase store
    /// - `BOTNEST_REPLY`: `none`, `local` (default), `chat` or `inference`
    /// - `OPEN_ROUTER_API_KEY`: required for `chat`
    /// - `OPEN_ROUTER_BASE_URL`, `OPEN_ROUTER_MODEL`, `OPEN_ROUTER_REFERER`, `OPEN_ROUTER_TITLE`
    /// - `HF_API_TOKEN`: required for `inference`
    /// - `HF_INFERENCE_URL`, `HF_MODEL`
    /// - `CLI_MODE`: `true` to enable the stdin CLI
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("BOTNEST_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("BOTNEST_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("BOTNEST_PORT must be a valid port number"))?;

        let store = store_from_env()?;
        let reply = reply_from_env()?;
        let cli_mode = env::var("CLI_MODE").is_ok_and(|v| v == "true");

        let config = Config {
            environment,
            host,
            port,
            store,
            reply,
            cli_mode,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Reject settings that only make sense on a developer machine.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if matches!(self.store, StoreSettings::Memory) {
            errors.push(
                "BOTNEST_STORE=memory loses every bot on restart. Configure SUPABASE_URL and SUPABASE_KEY."
                    .to_string(),
            );
        }

        if let StoreSettings::Supabase { ref url, .. } = self.store
            && !url.starts_with("https://")
        {
            errors.push(format!("SUPABASE_URL '{}' must use https in production.", url));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn store_from_env() -> Result<StoreSettings, ConfigError> {
    let kind = env::var("BOTNEST_STORE").unwrap_or_else(|_| "supabase".to_string());
    match kind.to_lowercase().as_str() {
        "memory" => Ok(StoreSettings::Memory),
        "supabase" => Ok(StoreSettings::Supabase {
            url: required("SUPABASE_URL")?,
            key: SecretString::from(required("SUPABASE_KEY")?),
        }),
        _ => Err(ConfigError::InvalidValue(
            "BOTNEST_STORE must be 'supabase' or 'memory'",
        )),
    }
}

fn reply_from_env() -> Result<ReplySettings, ConfigError> {
    let kind = env::var("BOTNEST_REPLY").unwrap_or_else(|_| "local".to_string());
    reply_settings(&kind)
}

/// Settings for the strategy named `kind`, reading its provider variables.
fn reply_settings(kind: &str) -> Result<ReplySettings, ConfigError> {
    match kind.to_lowercase().as_str() {
        "none" => Ok(ReplySettings::Disabled),
        "local" => Ok(ReplySettings::Local),
        "chat" => Ok(ReplySettings::ChatCompletion(ChatCompletionSettings {
            api_key: SecretString::from(required("OPEN_ROUTER_API_KEY")?),
            base_url: optional("OPEN_ROUTER_BASE_URL", defaults::OPEN_ROUTER_BASE_URL),
            model: optional("OPEN_ROUTER_MODEL", defaults::OPEN_ROUTER_MODEL),
            referer: optional("OPEN_ROUTER_REFERER", defaults::OPEN_ROUTER_REFERER),
            title: optional("OPEN_ROUTER_TITLE", defaults::OPEN_ROUTER_TITLE),
        })),
        "inference" => Ok(ReplySettings::TextGeneration(TextGenerationSettings {
            token: SecretString::from(required("HF_API_TOKEN")?),
            base_url: optional("HF_INFERENCE_URL", defaults::HF_INFERENCE_URL),
            model: optional("HF_MODEL", defaults::HF_MODEL),
        })),
        _ => Err(ConfigError::InvalidValue(
            "BOTNEST_REPLY must be 'none', 'local', 'chat' or 'inference'",
        )),
    }
}

/// Read a variable that must be present and non-empty.
fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name)),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
