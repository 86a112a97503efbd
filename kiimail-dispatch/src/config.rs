use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// Check the `.env` file or the process environment for the `SMTP_*` variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnvVar { name: String, value: String },
}

/// Settings of the outgoing mail server
#[derive(Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    /// `From` address of every outgoing mail
    pub sender: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Load from the process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let port_raw = required("SMTP_PORT")?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: "SMTP_PORT".to_string(),
                value: port_raw.clone(),
            })?;

        let secure = match lookup("SMTP_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidEnvVar {
                name: "SMTP_SECURE".to_string(),
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            host: required("SMTP_HOST")?,
            port,
            secure,
            sender: required("SMTP_SENDER")?,
            user: lookup("SMTP_USER").filter(|v| !v.is_empty()),
            password: lookup("SMTP_PASSWORD").filter(|v| !v.is_empty()),
        })
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("sender", &self.sender)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
