use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DeliveryReport, Email, EmailConfig, Mailer};

/// Delivery through a Resend compatible `POST /emails` endpoint.
#[derive(Debug)]
pub struct ResendMailer {
    endpoint: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

impl ResendMailer {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_empty() {
            tracing::warn!("email.api_key not set, deliveries will fail");
        }

        Ok(Self {
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from_address.clone(),
            client,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[tracing::instrument(skip_all, fields(to = %email.to, subject = %email.subject))]
    async fn deliver(&self, email: Email) -> DeliveryReport {
        if self.api_key.is_empty() {
            return DeliveryReport::failed("Email API key is not configured on this server");
        }

        let request = SendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
            text: &email.plain,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(err = %err, "Email API unreachable");
                return DeliveryReport::failed(err.to_string());
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            tracing::error!(status = status.as_u16(), message = %message, "Email API rejected delivery");
            return DeliveryReport::failed(message);
        }

        let id = serde_json::from_str::<SendResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .unwrap_or_default();
        tracing::info!(id = %id, "Email sent");

        DeliveryReport::sent(id)
    }

    fn provider_name(&self) -> &'static str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let mailer = ResendMailer::new(&EmailConfig {
            api_url: "http://127.0.0.1:9/emails".to_owned(),
            ..Default::default()
        })
        .unwrap();

        let report = mailer
            .deliver(Email {
                to: "a@b.cl".to_owned(),
                subject: "s".to_owned(),
                html: "<p>h</p>".to_owned(),
                plain: "h".to_owned(),
            })
            .await;

        assert_eq!(
            report,
            DeliveryReport::failed("Email API key is not configured on this server")
        );
    }
}
