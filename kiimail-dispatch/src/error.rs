use kiimail_builder::EmailError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::locale::Locale;
use crate::source::TemplateId;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Template {template} has no translation for '{locale}'")]
    TemplateNotFound { template: TemplateId, locale: Locale },

    #[error("Template error: {0}")]
    Template(#[from] EmailError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Plaintext conversion failed: {0}")]
    Conversion(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No recipients given")]
    NoRecipients,

    #[error("Subject must not be empty")]
    EmptySubject,
}
