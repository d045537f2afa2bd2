use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Deserialize, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmailProvider {
    /// Every delivery fails with a configuration message.
    #[default]
    Disabled,
    Smtp,
    /// Resend style HTTPS JSON API.
    Resend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            from_address: default_from_address(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_from_address() -> String {
    "SmartMenu <menu@smartmenu.local>".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
