//! Chat transport collaborator
//!
//! Implementors wrap a concrete messaging API and classify its failures
//! into `TransportErrorKind` before they reach the session.

use std::fmt;
use std::path::Path;

pub type ChatId = i64;
pub type MessageId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    RateLimited,
    ConnectionLost,
    Timeout,
    /// The service refused the request (bad file, message too long, ...)
    Rejected,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            message: message.into(),
        }
    }

    /// Whether sending the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::RateLimited | TransportErrorKind::ConnectionLost | TransportErrorKind::Timeout
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            TransportErrorKind::RateLimited => "rate limited",
            TransportErrorKind::ConnectionLost => "connection lost",
            TransportErrorKind::Timeout => "timed out",
            TransportErrorKind::Rejected => "rejected",
            TransportErrorKind::Other => "transport error",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

impl std::error::Error for TransportError {}

pub type TransportResult<T> = Result<T, TransportError>;

/// Messaging operations a session needs
pub trait Transport {
    /// Sends an HTML-formatted message
    fn send_text(&mut self, chat: ChatId, html: &str) -> TransportResult<MessageId>;

    /// Uploads a local file with a caption
    fn send_document(&mut self, chat: ChatId, path: &Path, caption: &str) -> TransportResult<MessageId>;

    /// Downloads a previously received document
    fn fetch_document(&mut self, file_id: &str) -> TransportResult<Vec<u8>>;

    fn delete_message(&mut self, chat: ChatId, message: MessageId) -> TransportResult<()>;
}
