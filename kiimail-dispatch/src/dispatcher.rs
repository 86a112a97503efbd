use kiimail_builder::{compile, parse_document};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::SmtpConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::locale::Locale;
use crate::plaintext::{HtmlToText, PlainTextConverter, TextOptions};
use crate::source::{TemplateId, TemplateRecord, TemplateSource};
use crate::transport::{MailTransport, OutgoingMail};

/// Subject of mails sent with [`Dispatcher::send_test`]
pub const TEST_SUBJECT: &str = "TEST EMAIL";

/// A template compiled for one locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// A newsletter recipient and the language they read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub locale: Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    Success,
    Error,
}

/// Connection settings plus the outcome of [`MailTransport::verify`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportReport {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub sender: String,
    pub verification: Verification,
}

/// Renders stored templates and hands them to a transport
pub struct Dispatcher<S, T, C = PlainTextConverter> {
    source: S,
    transport: T,
    converter: C,
    config: SmtpConfig,
}

impl<S, T, C> Dispatcher<S, T, C>
where
    S: TemplateSource,
    T: MailTransport,
    C: HtmlToText,
{
    pub fn new(source: S, transport: T, converter: C, config: SmtpConfig) -> Self {
        Self {
            source,
            transport,
            converter,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn record(&self, template: TemplateId, locale: &Locale) -> DispatchResult<TemplateRecord> {
        self.source
            .find(template, locale)?
            .ok_or_else(|| DispatchError::TemplateNotFound {
                template,
                locale: locale.clone(),
            })
    }

    /// Compile a template translation into html, plaintext and subject
    pub fn render(&self, template: TemplateId, locale: &Locale) -> DispatchResult<RenderedEmail> {
        let record = self.record(template, locale)?;
        let doc = parse_document(&record.data)?;
        let html = compile(&doc);
        let text = self.converter.convert(&html, &TextOptions::default())?;
        let subject = self.converter.convert(
            &record.header,
            &TextOptions {
                uppercase_headings: false,
                ..TextOptions::default()
            },
        )?;
        Ok(RenderedEmail {
            subject,
            html,
            text,
        })
    }

    /// HTML of a template, as the editor previews it
    pub fn preview(&self, template: TemplateId, locale: &Locale) -> DispatchResult<String> {
        Ok(self.render(template, locale)?.html)
    }

    /// Send a template to a single address under a fixed test subject
    pub fn send_test(&self, template: TemplateId, locale: &Locale, to: &str) -> DispatchResult<()> {
        let rendered = self.render(template, locale)?;
        self.deliver(vec![to.to_string()], TEST_SUBJECT.to_string(), rendered)
    }

    /// Send a template under a subject chosen by the caller
    pub fn send(
        &self,
        template: TemplateId,
        locale: &Locale,
        to: &[String],
        subject: &str,
    ) -> DispatchResult<()> {
        if to.is_empty() {
            return Err(DispatchError::NoRecipients);
        }
        if subject.trim().is_empty() {
            return Err(DispatchError::EmptySubject);
        }
        let rendered = self.render(template, locale)?;
        self.deliver(to.to_vec(), subject.to_string(), rendered)
    }

    /// Send a template with its own subject line
    pub fn send_to(&self, template: TemplateId, locale: &Locale, to: &[String]) -> DispatchResult<()> {
        if to.is_empty() {
            return Err(DispatchError::NoRecipients);
        }
        let rendered = self.render(template, locale)?;
        let subject = rendered.subject.clone();
        self.deliver(to.to_vec(), subject, rendered)
    }

    /// Send a template to every subscriber in their own language.
    ///
    /// Stops at the first failure. Returns how many mails were sent.
    pub fn send_to_all(&self, template: TemplateId, subscribers: &[Subscriber]) -> DispatchResult<usize> {
        let mut renders: HashMap<Locale, RenderedEmail> = HashMap::new();
        let mut sent = 0;
        for subscriber in subscribers {
            let rendered = match renders.get(&subscriber.locale) {
                Some(r) => r.clone(),
                None => {
                    let r = self.render(template, &subscriber.locale)?;
                    renders.insert(subscriber.locale.clone(), r.clone());
                    r
                }
            };
            let subject = rendered.subject.clone();
            self.deliver(vec![subscriber.email.clone()], subject, rendered)?;
            sent += 1;
        }
        info!("template {} sent to {} subscribers", template, sent);
        Ok(sent)
    }

    /// Report the configured server and whether the transport is reachable
    pub fn check(&self) -> TransportReport {
        let verification = match self.transport.verify() {
            Ok(()) => Verification::Success,
            Err(e) => {
                warn!("transport verification failed: {}", e);
                Verification::Error
            }
        };
        TransportReport {
            host: self.config.host.clone(),
            port: self.config.port,
            secure: self.config.secure,
            sender: self.config.sender.clone(),
            verification,
        }
    }

    fn deliver(&self, to: Vec<String>, subject: String, rendered: RenderedEmail) -> DispatchResult<()> {
        let mail = OutgoingMail {
            from: self.config.sender.clone(),
            to,
            subject,
            text: rendered.text,
            html: rendered.html,
        };
        self.transport.send(&mail)
    }
}
