/**
 * Email Notifier
 *
 * Sends verification and password-reset links. With SMTP configured the
 * mailer uses lettre's async SMTP transport (STARTTLS on port 587 unless
 * implicit TLS is requested); without it, mails are written as .eml files
 * to a preview directory under the storage root so the flows stay fully
 * exercisable in development.
 *
 * Email delivery is the core guarantee of the registration and reset
 * flows, so send failures propagate to the caller instead of being
 * swallowed.
 */

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;

use crate::error::ApiError;
use crate::server::config::Config;

/// Mail transport: real SMTP or file-based previews
#[derive(Clone)]
pub enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Preview(AsyncFileTransport<Tokio1Executor>),
}

/// Mailer plus the settings needed to render outgoing mail
#[derive(Clone)]
pub struct EmailService {
    mailer: Mailer,
    from: String,
    app_url: String,
}

impl EmailService {
    /// Build the mail transport from configuration
    ///
    /// Preview files land in `{storage_dir}/outbox`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mailer = match &config.smtp {
            Some(smtp) => {
                let builder = if smtp.secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                }
                .map_err(|e| {
                    tracing::error!("Invalid SMTP configuration: {:?}", e);
                    ApiError::internal("Invalid SMTP configuration")
                })?;

                tracing::info!("Mailer: SMTP via {}:{}", smtp.host, smtp.port);
                Mailer::Smtp(
                    builder
                        .port(smtp.port)
                        .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
                        .build(),
                )
            }
            None => {
                let outbox = config.storage_dir.join("outbox");
                std::fs::create_dir_all(&outbox)?;
                tracing::warn!(
                    "SMTP not configured; writing mail previews to {}",
                    outbox.display()
                );
                Mailer::Preview(AsyncFileTransport::new(&outbox))
            }
        };

        Ok(Self {
            mailer,
            from: config.smtp_from(),
            app_url: config.app_url.clone(),
        })
    }

    /// Preview-only mailer writing .eml files to the given directory
    pub fn preview(dir: &Path, app_url: &str) -> Self {
        Self {
            mailer: Mailer::Preview(AsyncFileTransport::new(dir)),
            from: "\"Timeline\" <noreply@timeline.app>".to_string(),
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send the email-verification link for a fresh registration
    pub async fn send_verification_email(
        &self,
        email: &str,
        token: &str,
        name: Option<&str>,
    ) -> Result<(), ApiError> {
        let link = verification_link(&self.app_url, token);
        let display_name = name.unwrap_or(email);

        let text = format!(
            "Hallo {display_name},\n\nbitte bestätige deine E-Mail-Adresse, indem du auf den folgenden Link klickst:\n\n{link}\n\nDer Link ist 24 Stunden gültig.\n\nViele Grüße,\nDein Timeline-Team"
        );
        let html = format!(
            "<p>Hallo {display_name},</p>\
             <p>bitte bestätige deine E-Mail-Adresse, indem du auf den folgenden Link klickst:</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>Der Link ist 24 Stunden gültig.</p>\
             <p>Viele Grüße,<br>Dein Timeline-Team</p>"
        );

        self.send(email, "E-Mail-Adresse bestätigen – Timeline", text, html)
            .await
    }

    /// Send the password-reset link
    pub async fn send_password_reset_email(
        &self,
        email: &str,
        token: &str,
        name: Option<&str>,
    ) -> Result<(), ApiError> {
        let link = reset_link(&self.app_url, token);
        let display_name = name.unwrap_or(email);

        let text = format!(
            "Hallo {display_name},\n\ndu hast angefordert, dein Passwort zurückzusetzen. Klicke auf den folgenden Link:\n\n{link}\n\nDer Link ist 1 Stunde gültig. Falls du die Anfrage nicht gestellt hast, ignoriere diese E-Mail.\n\nViele Grüße,\nDein Timeline-Team"
        );
        let html = format!(
            "<p>Hallo {display_name},</p>\
             <p>du hast angefordert, dein Passwort zurückzusetzen. Klicke auf den folgenden Link:</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>Der Link ist 1 Stunde gültig. Falls du die Anfrage nicht gestellt hast, ignoriere diese E-Mail.</p>\
             <p>Viele Grüße,<br>Dein Timeline-Team</p>"
        );

        self.send(email, "Passwort zurücksetzen – Timeline", text, html)
            .await
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        text: String,
        html: String,
    ) -> Result<(), ApiError> {
        let from: Mailbox = self.from.parse().map_err(|e| {
            tracing::error!("Invalid sender address {:?}: {:?}", self.from, e);
            ApiError::internal("Invalid sender address")
        })?;
        let to: Mailbox = to.parse().map_err(|e| {
            tracing::warn!("Invalid recipient address: {:?}", e);
            ApiError::validation("Ungültige E-Mail-Adresse.")
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| {
                tracing::error!("Failed to build email: {:?}", e);
                ApiError::internal("Failed to build email")
            })?;

        match &self.mailer {
            Mailer::Smtp(transport) => {
                transport.send(message).await.map_err(|e| {
                    tracing::error!("SMTP send failed: {:?}", e);
                    ApiError::internal("Failed to send email")
                })?;
            }
            Mailer::Preview(transport) => {
                let id = transport.send(message).await.map_err(|e| {
                    tracing::error!("Failed to write mail preview: {:?}", e);
                    ApiError::internal("Failed to send email")
                })?;
                tracing::info!("Mail preview written: {:?}", id);
            }
        }

        Ok(())
    }
}

fn verification_link(app_url: &str, token: &str) -> String {
    format!("{}/verify-email?token={}", app_url, token)
}

fn reset_link(app_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", app_url, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_link() {
        assert_eq!(
            verification_link("http://localhost:4200", "abc123"),
            "http://localhost:4200/verify-email?token=abc123"
        );
    }

    #[test]
    fn test_reset_link() {
        assert_eq!(
            reset_link("https://timeline.example", "tok"),
            "https://timeline.example/reset-password?token=tok"
        );
    }

    #[tokio::test]
    async fn test_preview_mailer_writes_eml() {
        let dir = std::env::temp_dir().join(format!("outbox-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let service = EmailService::preview(&dir, "http://localhost:4200");

        service
            .send_verification_email("user@example.com", "tok123", Some("Ada"))
            .await
            .unwrap();

        let written: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(written.len(), 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected() {
        let dir = std::env::temp_dir().join(format!("outbox-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let service = EmailService::preview(&dir, "http://localhost:4200");

        let result = service
            .send_password_reset_email("not-an-address", "tok", None)
            .await;
        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
