//! Contact Form - Field state, validation and submission status.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──relay ok──▶ Success ──reset delay──▶ Idle
//!                      │
//!                      └──relay err──▶ Error ──reset delay──▶ Idle
//! ```
//!
//! Delivery goes through an [`EmailRelay`]. The crate ships an
//! [`OutboxRelay`] that appends messages to a local TOML file; a real email
//! service plugs in behind the same trait.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::contact::{ContactForm, Field};
//!
//! let mut form = ContactForm::new("me@example.com", Duration::from_secs(5));
//! form.update(Field::Name, "Ada");
//! form.update(Field::Email, "ada@example.com");
//! form.update(Field::Message, "Hello!");
//! form.submit(&mut relay, Instant::now())?;
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;
use spark_signals::{signal, Signal};
use thiserror::Error;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }

    /// Next field in tab order, wrapping around.
    pub fn next(self) -> Field {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Payload handed to the email relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_email: String,
}

// =============================================================================
// RELAY
// =============================================================================

/// Delivers contact messages somewhere a human will read them.
pub trait EmailRelay {
    fn send(&mut self, message: &ContactMessage) -> Result<(), RelayError>;
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode message: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("relay rejected message: {0}")]
    Rejected(String),
}

/// Appends each message as a `[[message]]` table to a TOML file.
#[derive(Debug, Clone)]
pub struct OutboxRelay {
    path: PathBuf,
}

impl OutboxRelay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EmailRelay for OutboxRelay {
    fn send(&mut self, message: &ContactMessage) -> Result<(), RelayError> {
        let body = toml::to_string(message)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[[message]]\n{body}")?;
        debug!("queued message from {} in {}", message.from_email, self.path.display());
        Ok(())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{} is required", .0.label())]
    MissingField(Field),

    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),

    #[error("a message is already being sent")]
    Busy,

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// One `@`, a non-empty local part, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// =============================================================================
// FORM
// =============================================================================

pub struct ContactForm {
    name: String,
    email: String,
    message: String,
    to_email: String,
    status: Signal<SubmitStatus>,
    completed_at: Option<Instant>,
    reset_after: Duration,
}

impl ContactForm {
    pub fn new(to_email: impl Into<String>, reset_after: Duration) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            to_email: to_email.into(),
            status: signal(SubmitStatus::Idle),
            completed_at: None,
            reset_after,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }

    pub fn update(&mut self, field: Field, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        self.value_mut(field).push(c);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.value_mut(field).pop();
    }

    pub fn status(&self) -> SubmitStatus {
        self.status.get()
    }

    /// The status signal, for reactive consumers.
    pub fn status_signal(&self) -> Signal<SubmitStatus> {
        self.status.clone()
    }

    /// Check the fields and build the relay payload.
    pub fn validate(&self) -> Result<ContactMessage, ContactError> {
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }

        Ok(ContactMessage {
            from_name: self.name.trim().to_string(),
            from_email: email.to_string(),
            message: self.message.trim().to_string(),
            to_email: self.to_email.clone(),
        })
    }

    /// Validate and deliver the message.
    ///
    /// Invalid input leaves the status untouched. A relay failure moves to
    /// `Error` and keeps the fields so the visitor can retry.
    pub fn submit(&mut self, relay: &mut dyn EmailRelay, now: Instant) -> Result<(), ContactError> {
        if self.status() == SubmitStatus::Submitting {
            return Err(ContactError::Busy);
        }
        let message = self.validate()?;

        self.status.set(SubmitStatus::Submitting);
        let result = relay.send(&message);
        self.completed_at = Some(now);

        match result {
            Ok(()) => {
                debug!("contact message from {} sent", message.from_email);
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.status.set(SubmitStatus::Success);
                Ok(())
            }
            Err(err) => {
                warn!("contact message failed: {err}");
                self.status.set(SubmitStatus::Error);
                Err(err.into())
            }
        }
    }

    /// Return a finished status to `Idle` once the reset delay elapsed.
    ///
    /// Returns `true` if the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(completed_at) = self.completed_at else {
            return false;
        };
        if now.saturating_duration_since(completed_at) < self.reset_after {
            return false;
        }
        self.completed_at = None;
        self.status.set(SubmitStatus::Idle);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingRelay {
        sent: Rc<RefCell<Vec<ContactMessage>>>,
        fail: bool,
    }

    impl EmailRelay for RecordingRelay {
        fn send(&mut self, message: &ContactMessage) -> Result<(), RelayError> {
            if self.fail {
                return Err(RelayError::Rejected("quota exceeded".into()));
            }
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn setup(fail: bool) -> (ContactForm, RecordingRelay, Rc<RefCell<Vec<ContactMessage>>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let relay = RecordingRelay {
            sent: sent.clone(),
            fail,
        };
        let mut form = ContactForm::new("owner@example.com", Duration::from_secs(5));
        form.update(Field::Name, "  Ada Lovelace ");
        form.update(Field::Email, "ada@example.com");
        form.update(Field::Message, "Let's build something.");
        (form, relay, sent)
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@example."));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn test_validate_requires_all_fields() {
        let mut form = ContactForm::new("owner@example.com", Duration::from_secs(5));
        assert!(matches!(form.validate(), Err(ContactError::MissingField(Field::Name))));

        form.update(Field::Name, "Ada");
        form.update(Field::Email, "   ");
        assert!(matches!(form.validate(), Err(ContactError::MissingField(Field::Email))));

        form.update(Field::Email, "ada@example.com");
        assert!(matches!(form.validate(), Err(ContactError::MissingField(Field::Message))));
    }

    #[test]
    fn test_payload_fields() {
        let (form, _, _) = setup(false);
        let message = form.validate().unwrap();
        assert_eq!(message.from_name, "Ada Lovelace");
        assert_eq!(message.from_email, "ada@example.com");
        assert_eq!(message.to_email, "owner@example.com");
    }

    #[test]
    fn test_successful_submit_clears_fields() {
        let (mut form, mut relay, sent) = setup(false);

        form.submit(&mut relay, Instant::now()).unwrap();

        assert_eq!(form.status(), SubmitStatus::Success);
        assert_eq!(sent.borrow().len(), 1);
        for field in Field::ALL {
            assert!(form.value(field).is_empty());
        }
    }

    #[test]
    fn test_failed_submit_keeps_fields() {
        let (mut form, mut relay, sent) = setup(true);

        let err = form.submit(&mut relay, Instant::now()).unwrap_err();

        assert!(matches!(err, ContactError::Relay(RelayError::Rejected(_))));
        assert_eq!(form.status(), SubmitStatus::Error);
        assert_eq!(form.value(Field::Email), "ada@example.com");
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_invalid_submit_leaves_status() {
        let (mut form, mut relay, sent) = setup(false);
        form.update(Field::Email, "not-an-email");

        let err = form.submit(&mut relay, Instant::now()).unwrap_err();

        assert!(matches!(err, ContactError::InvalidEmail(_)));
        assert_eq!(form.status(), SubmitStatus::Idle);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_status_resets_after_delay() {
        let (mut form, mut relay, _) = setup(false);
        let start = Instant::now();
        form.submit(&mut relay, start).unwrap();

        assert!(!form.tick(start + Duration::from_millis(4999)));
        assert_eq!(form.status(), SubmitStatus::Success);

        assert!(form.tick(start + Duration::from_secs(5)));
        assert_eq!(form.status(), SubmitStatus::Idle);
        assert!(!form.tick(start + Duration::from_secs(6)));
    }

    #[test]
    fn test_status_signal_tracks_submit() {
        let (mut form, mut relay, _) = setup(true);
        let status = form.status_signal();

        let _ = form.submit(&mut relay, Instant::now());
        assert_eq!(status.get(), SubmitStatus::Error);
    }

    #[test]
    fn test_field_tab_order() {
        assert_eq!(Field::Name.next(), Field::Email);
        assert_eq!(Field::Message.next(), Field::Name);
    }

    #[test]
    fn test_typing() {
        let mut form = ContactForm::new("owner@example.com", Duration::from_secs(5));
        form.push_char(Field::Name, 'A');
        form.push_char(Field::Name, 'd');
        form.pop_char(Field::Name);
        assert_eq!(form.value(Field::Name), "A");
    }

    #[test]
    fn test_outbox_relay_appends() {
        let path = std::env::temp_dir().join(format!("spark-folio-outbox-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut relay = OutboxRelay::new(&path);
        let message = ContactMessage {
            from_name: "Ada".into(),
            from_email: "ada@example.com".into(),
            message: "Hi".into(),
            to_email: "owner@example.com".into(),
        };

        relay.send(&message).unwrap();
        relay.send(&message).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let parsed: toml::Value = toml::from_str(&written).unwrap();
        let messages = parsed.get("message").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].get("from_name").and_then(|v| v.as_str()), Some("Ada"));
    }
}
