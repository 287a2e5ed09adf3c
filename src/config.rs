use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub const EMAIL_USER_VAR: &str = "EMAIL_USER";
pub const EMAIL_PASS_VAR: &str = "EMAIL_PASS";
pub const SMTP_HOST_VAR: &str = "SMTP_HOST";
pub const SMTP_PORT_VAR: &str = "SMTP_PORT";

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit-TLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Settings for sending the run summary.
///
/// Credentials may be absent; that only matters once a summary is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("email_user", &self.email_user)
            .field("email_pass", &self.email_pass.as_ref().map(|_| "<redacted>"))
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// A `.env` file is optional; anything other than its absence is reported.
fn dotenv_warning(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => Some(format!("Failed to load .env file: {}", err)),
    }
}

impl MailConfig {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Self {
        if let Some(warning) = dotenv_warning(&dotenvy::dotenv()) {
            warn!("{}", warning);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let smtp_port = match non_empty(SMTP_PORT_VAR) {
            Some(port) => port.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid {} value {:?}, using {}",
                    SMTP_PORT_VAR, port, DEFAULT_SMTP_PORT
                );
                DEFAULT_SMTP_PORT
            }),
            None => DEFAULT_SMTP_PORT,
        };
        MailConfig {
            email_user: non_empty(EMAIL_USER_VAR),
            email_pass: non_empty(EMAIL_PASS_VAR),
            smtp_host: non_empty(SMTP_HOST_VAR).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port,
        }
    }

    /// Returns the address and secret, or which one is missing.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let user = self
            .email_user
            .as_deref()
            .ok_or(ConfigError::Missing(EMAIL_USER_VAR))?;
        let pass = self
            .email_pass
            .as_deref()
            .ok_or(ConfigError::Missing(EMAIL_PASS_VAR))?;
        Ok((user, pass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> MailConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MailConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.email_user, None);
        assert_eq!(config.email_pass, None);
        assert_eq!(config.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn test_full() {
        let config = config_from(&[
            ("EMAIL_USER", "ops@example.com"),
            ("EMAIL_PASS", "hunter2"),
            ("SMTP_HOST", "mail.example.com"),
            ("SMTP_PORT", "2465"),
        ]);
        assert_eq!(config.credentials(), Ok(("ops@example.com", "hunter2")));
        assert_eq!(config.smtp_host, "mail.example.com");
        assert_eq!(config.smtp_port, 2465);
    }

    #[test]
    fn test_missing_credentials() {
        let config = config_from(&[("EMAIL_PASS", "hunter2")]);
        assert_eq!(config.credentials(), Err(ConfigError::Missing("EMAIL_USER")));

        let config = config_from(&[("EMAIL_USER", "ops@example.com"), ("EMAIL_PASS", "  ")]);
        assert_eq!(config.credentials(), Err(ConfigError::Missing("EMAIL_PASS")));
        assert_eq!(
            config.credentials().unwrap_err().to_string(),
            "EMAIL_PASS is not set"
        );
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("SMTP_PORT", "smtps")]);
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn test_dotenv_warning() {
        assert_eq!(dotenv_warning(&Ok(PathBuf::from("/srv/.env"))), None);

        let missing = dotenvy::Error::Io(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(dotenv_warning(&Err(missing)), None);

        let malformed = dotenvy::Error::LineParse("EMAIL USER=ops".to_string(), 5);
        let warning = dotenv_warning(&Err(malformed)).unwrap();
        assert!(warning.starts_with("Failed to load .env file: "));

        let unreadable = dotenvy::Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(dotenv_warning(&Err(unreadable)).is_some());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = config_from(&[("EMAIL_USER", "ops@example.com"), ("EMAIL_PASS", "hunter2")]);
        let shown = format!("{:?}", config);
        assert!(shown.contains("ops@example.com"));
        assert!(!shown.contains("hunter2"));
    }
}
