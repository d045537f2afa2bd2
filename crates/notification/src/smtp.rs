//! SMTP delivery using lettre

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport, message::MultiPart,
    transport::smtp::authentication::Credentials,
};

use crate::{DeliveryReport, Email, EmailConfig, Mailer};

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let transport = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "SMTP mailer initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from: config.from_address.clone(),
        })
    }

    fn message(&self, email: Email) -> anyhow::Result<Message> {
        Ok(Message::builder()
            .from(self.from.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.plain, email.html))?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(skip_all, fields(to = %email.to, subject = %email.subject))]
    async fn deliver(&self, email: Email) -> DeliveryReport {
        let message = match self.message(email) {
            Ok(message) => message,
            Err(err) => return DeliveryReport::failed(err.to_string()),
        };

        let transport = self.transport.clone();
        let sent = tokio::task::spawn_blocking(move || transport.send(&message)).await;

        match sent {
            Ok(Ok(response)) => {
                tracing::info!(code = %response.code(), "Email sent");
                DeliveryReport::sent(response.message().collect::<Vec<_>>().join(" "))
            }
            Ok(Err(err)) => {
                tracing::error!(err = %err, "SMTP delivery failed");
                DeliveryReport::failed(err.to_string())
            }
            Err(err) => DeliveryReport::failed(err.to_string()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}
