//! Outgoing mail dispatch

use async_trait::async_trait;
use chrono::Utc;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use mailmaster_common::config::MailConfig;
use mailmaster_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// A single message to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    /// HTML body
    pub html_body: String,
}

/// Delivery failures
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

impl From<MailError> for Error {
    fn from(e: MailError) -> Self {
        Error::Mail(e.to_string())
    }
}

/// Mail transport used by the campaign sender
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError>;
}

/// Build the configured mailer
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match config.transport.as_str() {
        "smtp" => Ok(Arc::new(SmtpMailer::new(config.clone())?)),
        "log" => Ok(Arc::new(LogMailer::new(config.from_address.clone()))),
        other => Err(Error::Config(format!("Unknown mail transport: {}", other))),
    }
}

/// SMTP delivery through lettre
pub struct SmtpMailer {
    config: MailConfig,
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Result<Self> {
        let from = parse_mailbox(&config.from_address, config.from_name.as_deref())
            .map_err(|e| Error::Config(e.to_string()))?;

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| Error::Config(format!("Failed to create SMTP transport: {}", e)))?
        } else if config.use_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| Error::Config(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let transport = builder
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        info!(
            host = %config.host,
            port = config.port,
            tls = config.use_tls,
            starttls = config.use_starttls,
            "SMTP mailer configured"
        );

        Ok(Self {
            config,
            from,
            transport,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> std::result::Result<Message, MailError> {
        let to = parse_mailbox(&mail.to, mail.to_name.as_deref())?;
        let domain = self
            .config
            .from_address
            .rsplit('@')
            .next()
            .unwrap_or("localhost");
        let message_id = format!("<{}.{}@{}>", Uuid::new_v4(), Utc::now().timestamp(), domain);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&mail.subject)
            .message_id(Some(message_id))
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError> {
        let message = self.build_message(mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        debug!(to = %mail.to, code = %response.code(), "Email sent");
        Ok(())
    }
}

/// Logs each message instead of delivering it
pub struct LogMailer {
    from_address: String,
}

impl LogMailer {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError> {
        parse_mailbox(&mail.to, mail.to_name.as_deref())?;
        info!(
            from = %self.from_address,
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.html_body.len(),
            "Email logged (log transport)"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str, name: Option<&str>) -> std::result::Result<Mailbox, MailError> {
    let email = address.parse().map_err(|e: lettre::address::AddressError| {
        MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(Mailbox::new(name.map(str::to_string), email))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.to_string(),
            to_name: Some("Reader".to_string()),
            subject: "Hello".to_string(),
            html_body: "<h1>Hi</h1>".to_string(),
        }
    }

    #[test]
    fn test_parse_mailbox() {
        let mailbox = parse_mailbox("reader@example.com", Some("Reader")).unwrap();
        assert_eq!(mailbox.email.to_string(), "reader@example.com");
        assert_eq!(mailbox.name.as_deref(), Some("Reader"));

        assert!(matches!(
            parse_mailbox("not an address", None),
            Err(MailError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_log_mailer_validates_recipient() {
        let mailer = LogMailer::new("newsletter@example.com");
        assert!(mailer.send(&mail("reader@example.com")).await.is_ok());
        assert!(mailer.send(&mail("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_smtp_mailer_builds_html_message() {
        let config = MailConfig {
            transport: "smtp".to_string(),
            host: "localhost".to_string(),
            ..MailConfig::default()
        };
        let mailer = SmtpMailer::new(config).unwrap();
        let message = mailer.build_message(&mail("reader@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Hello"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let config = MailConfig {
            transport: "carrier-pigeon".to_string(),
            ..MailConfig::default()
        };
        assert!(mailer_from_config(&config).is_err());
    }
}
