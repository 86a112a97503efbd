//! Everything around the template compiler that an application needs to
//! actually send a templated email: translation lookup, plaintext
//! conversion, SMTP settings and the transport contract.
//!
//! The language of every operation is an explicit [`Locale`] argument.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod locale;
pub mod plaintext;
pub mod source;
pub mod transport;

pub use config::{ConfigError, SmtpConfig};
pub use dispatcher::{Dispatcher, RenderedEmail, Subscriber, TransportReport, Verification, TEST_SUBJECT};
pub use error::{DispatchError, DispatchResult};
pub use locale::Locale;
pub use plaintext::{HtmlToText, PlainTextConverter, TextOptions};
pub use source::{MemoryTemplateStore, TemplateId, TemplateRecord, TemplateSource};
pub use transport::{MailTransport, Outbox, OutgoingMail, StoredMail};
