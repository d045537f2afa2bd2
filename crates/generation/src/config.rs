use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Deserialize, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Deterministic answers, no network.
    #[default]
    Fake,
    /// Any OpenAI compatible endpoint.
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_menu_temperature")]
    pub menu_temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Language the dishes and reports are written in.
    #[serde(default = "default_output_language")]
    pub output_language: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            image_model: default_image_model(),
            menu_temperature: default_menu_temperature(),
            timeout_secs: default_timeout_secs(),
            output_language: default_output_language(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_menu_temperature() -> f32 {
    0.9
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_output_language() -> String {
    "Spanish".to_string()
}
