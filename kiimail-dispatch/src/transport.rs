use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{DispatchError, DispatchResult};

/// A fully rendered mail, ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivery capability. Implementations own the connection details.
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> DispatchResult<()>;

    /// Check that the transport can currently deliver
    fn verify(&self) -> DispatchResult<()>;
}

/// A mail accepted by an [`Outbox`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMail {
    pub message_id: Uuid,
    pub mail: OutgoingMail,
}

/// Transport that keeps every mail in memory instead of delivering it.
///
/// Used for previews, dry runs and tests. Can be told to reject mails to
/// simulate a failing server.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<StoredMail>>,
    offline: bool,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox whose `send` and `verify` always fail
    pub fn offline() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            offline: true,
        }
    }

    pub fn sent(&self) -> Vec<StoredMail> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MailTransport for Outbox {
    fn send(&self, mail: &OutgoingMail) -> DispatchResult<()> {
        if self.offline {
            return Err(DispatchError::Transport("outbox is offline".to_string()));
        }
        let message_id = Uuid::new_v4();
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        sent.push(StoredMail {
            message_id,
            mail: mail.clone(),
        });
        info!("queued mail {} to {}", message_id, mail.to.join(", "));
        Ok(())
    }

    fn verify(&self) -> DispatchResult<()> {
        if self.offline {
            Err(DispatchError::Transport("outbox is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "noreply@example.com".to_string(),
            to: vec!["a@example.com".to_string()],
            subject: "Hi".to_string(),
            text: "Hello".to_string(),
            html: "<p>Hello</p>".to_string(),
        }
    }

    #[test]
    fn test_outbox_records_mail() {
        let outbox = Outbox::new();
        outbox.send(&mail()).unwrap();
        outbox.send(&mail()).unwrap();
        let sent = outbox.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].mail, mail());
        assert_ne!(sent[0].message_id, sent[1].message_id);
    }

    #[test]
    fn test_poisoned_outbox_still_lists_mail() {
        let outbox = Outbox::new();
        outbox.send(&mail()).unwrap();
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = outbox.sent.lock().unwrap();
                    panic!("writer crashed while holding the outbox");
                })
                .join();
        });
        assert!(outbox.sent.is_poisoned());
        assert_eq!(outbox.sent().len(), 1);
    }

    #[test]
    fn test_offline_outbox_rejects() {
        let outbox = Outbox::offline();
        assert!(matches!(outbox.send(&mail()), Err(DispatchError::Transport(_))));
        assert!(outbox.verify().is_err());
        assert!(outbox.sent().is_empty());
    }
}
