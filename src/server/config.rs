/**
 * Server Configuration
 *
 * This module loads all runtime configuration from environment variables
 * once at startup. Nothing else in the crate reads the environment; the
 * resulting `Config` is handed to `create_app` and its pieces end up in
 * `AppState`.
 *
 * # Environment Variables
 *
 * - `DATABASE_URL` - PostgreSQL connection string (required)
 * - `JWT_SECRET` - HMAC secret for session tokens (required)
 * - `SERVER_PORT` - listening port (default 3000)
 * - `STORAGE_DIR` - root directory for uploaded images (default ./uploads)
 * - `APP_URL` - base URL used in email links (falls back to CORS_ORIGIN)
 * - `CORS_ORIGIN` - allowed CORS origin (default http://localhost:4200)
 * - `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`, `SMTP_USER`, `SMTP_PASSWORD`,
 *   `SMTP_FROM_EMAIL`, `SMTP_FROM_NAME` - mail transport; when host, user
 *   or password is missing the mailer falls back to file-based previews
 */

use std::path::PathBuf;

/// SMTP transport settings
///
/// Present only when `SMTP_HOST`, `SMTP_USER` and `SMTP_PASSWORD` are all
/// configured. `secure` selects implicit TLS; otherwise port 587 uses
/// STARTTLS, matching common relay setups.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
}

/// Runtime configuration loaded from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub app_url: String,
    pub cors_origin: String,
    pub smtp: Option<SmtpConfig>,
    pub smtp_from_email: Option<String>,
    pub smtp_from_name: Option<String>,
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Fails fast when `DATABASE_URL` or `JWT_SECRET` is missing: every
    /// endpoint needs the database, and a defaulted signing secret would
    /// silently issue forgeable tokens.
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_trimmed("DATABASE_URL")
            .ok_or_else(|| "DATABASE_URL is not set".to_string())?;
        let jwt_secret =
            env_trimmed("JWT_SECRET").ok_or_else(|| "JWT_SECRET is not set".to_string())?;

        let port = env_trimmed("SERVER_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let storage_dir = env_trimmed("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));

        let cors_origin =
            env_trimmed("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:4200".to_string());
        let app_url = env_trimmed("APP_URL")
            .unwrap_or_else(|| cors_origin.clone())
            .trim_end_matches('/')
            .to_string();

        let smtp = match (
            env_trimmed("SMTP_HOST"),
            env_trimmed("SMTP_USER"),
            env_trimmed("SMTP_PASSWORD"),
        ) {
            (Some(host), Some(user), Some(password)) => Some(SmtpConfig {
                host,
                port: env_trimmed("SMTP_PORT")
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(587),
                secure: env_trimmed("SMTP_SECURE")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
                user,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            storage_dir,
            app_url,
            cors_origin,
            smtp,
            smtp_from_email: env_trimmed("SMTP_FROM_EMAIL"),
            smtp_from_name: env_trimmed("SMTP_FROM_NAME"),
        })
    }

    /// Sender address for outgoing mail
    ///
    /// `"Name" <email>` when both are configured, the bare email when only
    /// the address is set, and a service default otherwise.
    pub fn smtp_from(&self) -> String {
        match (&self.smtp_from_email, &self.smtp_from_name) {
            (Some(email), Some(name)) => format!("\"{}\" <{}>", name, email),
            (Some(email), None) => email.clone(),
            _ => "\"Timeline\" <noreply@timeline.app>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            jwt_secret: "secret".to_string(),
            port: 3000,
            storage_dir: PathBuf::from("uploads"),
            app_url: "http://localhost:4200".to_string(),
            cors_origin: "http://localhost:4200".to_string(),
            smtp: None,
            smtp_from_email: None,
            smtp_from_name: None,
        }
    }

    #[test]
    fn test_smtp_from_default() {
        let config = base_config();
        assert_eq!(config.smtp_from(), "\"Timeline\" <noreply@timeline.app>");
    }

    #[test]
    fn test_smtp_from_with_name() {
        let mut config = base_config();
        config.smtp_from_email = Some("mail@example.com".to_string());
        config.smtp_from_name = Some("Timeline".to_string());
        assert_eq!(config.smtp_from(), "\"Timeline\" <mail@example.com>");
    }

    #[test]
    fn test_smtp_from_email_only() {
        let mut config = base_config();
        config.smtp_from_email = Some("mail@example.com".to_string());
        assert_eq!(config.smtp_from(), "mail@example.com");
    }
}
