//! Email channel — SMTP sending via async lettre (STARTTLS).

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use naowatch_core::config::EmailChannelConfig;
use naowatch_core::error::{Result, WatchError};
use naowatch_core::traits::Notifier;

pub struct EmailNotifier {
    config: EmailChannelConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailChannelConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| WatchError::Config(format!("Invalid from address: {e}")))?;
        let to: Mailbox = self
            .config
            .to
            .parse()
            .map_err(|e| WatchError::Config(format!("Invalid to address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| WatchError::Notification(format!("Build email: {e}")))
    }

    /// Send one plain-text email via SMTP with STARTTLS.
    pub async fn send_email(&self, subject: &str, body: &str) -> Result<()> {
        let email = self.build_message(subject, body)?;

        let creds = Credentials::new(
            self.config.username().to_string(),
            self.config.smtp_pass.clone(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| WatchError::Notification(format!("SMTP relay: {e}")))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        mailer
            .send(email)
            .await
            .map_err(|e| WatchError::Notification(format!("SMTP send: {e}")))?;

        tracing::info!("Email sent to {}", self.config.to);
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, title: &str, body: &str) -> Result<()> {
        self.send_email(title, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailChannelConfig {
        EmailChannelConfig {
            from: "watcher@example.test".into(),
            to: "me@example.test".into(),
            smtp_host: "smtp.example.test".into(),
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: "hunter2".into(),
        }
    }

    #[test]
    fn test_build_message() {
        let notifier = EmailNotifier::new(config());
        let msg = notifier.build_message("Tickets available!", "Book ASAP");
        assert!(msg.is_ok());
    }

    #[test]
    fn test_invalid_address_is_config_error() {
        let mut cfg = config();
        cfg.to = "not an address".into();
        let notifier = EmailNotifier::new(cfg);
        let err = notifier.build_message("subject", "body").unwrap_err();
        assert!(matches!(err, WatchError::Config(_)));
    }

    #[test]
    fn test_username_falls_back_to_from() {
        let cfg = config();
        assert_eq!(cfg.username(), "watcher@example.test");

        let mut cfg = config();
        cfg.smtp_user = Some("login@example.test".into());
        assert_eq!(cfg.username(), "login@example.test");
    }
}
