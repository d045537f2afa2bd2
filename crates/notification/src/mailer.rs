use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;

use crate::{EmailConfig, EmailProvider, ResendMailer, SmtpMailer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub plain: String,
}

/// Outcome of one delivery attempt. On failure `message` is whatever the
/// provider said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub success: bool,
    pub message: String,
}

impl DeliveryReport {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A transactional email provider. Deliveries are attempted once.
#[async_trait]
pub trait Mailer: Send + Sync + fmt::Debug {
    async fn deliver(&self, email: Email) -> DeliveryReport;

    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn deliver(&self, _email: Email) -> DeliveryReport {
        DeliveryReport::failed("Email delivery is not configured on this server")
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

pub fn mailer_from_config(config: &EmailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.provider {
        EmailProvider::Disabled => {
            tracing::warn!("Email delivery disabled, every send will report a failure");
            Arc::new(DisabledMailer)
        }
        EmailProvider::Smtp => Arc::new(SmtpMailer::new(config)?),
        EmailProvider::Resend => Arc::new(ResendMailer::new(config)?),
    };

    Ok(mailer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_mailer_reports_failure() {
        let report = DisabledMailer
            .deliver(Email {
                to: "a@b.cl".to_owned(),
                subject: "s".to_owned(),
                html: String::new(),
                plain: String::new(),
            })
            .await;

        assert!(!report.success);
        assert!(report.message.contains("not configured"));
    }
}
