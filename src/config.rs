use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use smartmenu_generation::{GenerationConfig, ProviderKind};
use smartmenu_menu::NutritionCoverage;
use smartmenu_notification::{EmailConfig, EmailProvider};
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_cookie_name() -> String {
    "smartmenu_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    60 * 60 * 6
}

fn default_sweep_interval_secs() -> u64 {
    60 * 5
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PlannerConfig {
    #[serde(default)]
    pub nutrition_coverage: NutritionCoverage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON lines instead of the pretty console format.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Generate the banner image in the background on startup.
    #[serde(default = "default_hero_image")]
    pub hero_image: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            hero_image: default_hero_image(),
        }
    }
}

fn default_language() -> String {
    "es".to_string()
}

fn default_hero_image() -> bool {
    true
}

pub const LANGUAGES: [&str; 2] = ["es", "en"];

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy provider variables (OPENAI_API_KEY, RESEND_API_KEY, SMTP_PASSWORD)
    /// 2. Environment variables (SMARTMENU__GENERATION__MODEL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SMARTMENU")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            builder = builder.set_override("generation.api_key", api_key)?;
        }
        if let Ok(api_key) = env::var("RESEND_API_KEY") {
            builder = builder.set_override("email.api_key", api_key)?;
        }
        if let Ok(password) = env::var("SMTP_PASSWORD") {
            builder = builder.set_override("email.smtp_password", password)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.session.idle_timeout_secs == 0 || self.session.sweep_interval_secs == 0 {
            return Err("Session idle timeout and sweep interval must be greater than 0".to_string());
        }
        if !LANGUAGES.contains(&self.app.default_language.as_str()) {
            return Err(format!(
                "Default language must be one of {}",
                LANGUAGES.join(", ")
            ));
        }
        if self.generation.provider == ProviderKind::OpenAi && self.generation.api_key.is_empty() {
            return Err("generation.api_key is required for the openai provider".to_string());
        }
        if self.email.provider == EmailProvider::Resend && self.email.api_key.is_empty() {
            return Err("email.api_key is required for the resend provider".to_string());
        }
        if self.email.provider == EmailProvider::Smtp && self.email.smtp_host.is_empty() {
            return Err("email.smtp_host is required for the smtp provider".to_string());
        }
        Ok(())
    }
}
