use std::fs;
use std::path::{Path, PathBuf};

use crate::services::transport::{ChatId, MessageId, Transport, TransportError, TransportErrorKind, TransportResult};

/// What the session asked the transport to do
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat: ChatId, html: String },
    Document { chat: ChatId, path: PathBuf, file_name: String, caption: String, contents: Vec<u8> },
    Deleted { chat: ChatId, message: MessageId },
}

/// In-memory transport that records every call
pub struct RecordingTransport {
    pub download: Result<Vec<u8>, TransportError>,
    pub fail_delete: bool,
    /// Uploads are recorded, then refused
    pub reject_documents: bool,
    pub sent: Vec<Sent>,
    next_id: MessageId,
}

impl RecordingTransport {
    pub fn serving(bytes: Vec<u8>) -> Self {
        RecordingTransport {
            download: Ok(bytes),
            fail_delete: false,
            reject_documents: false,
            sent: Vec::new(),
            next_id: 100,
        }
    }

    pub fn failing_download(kind: TransportErrorKind, message: &str) -> Self {
        let mut transport = Self::serving(Vec::new());
        transport.download = Err(TransportError::new(kind, message));
        transport
    }

    pub fn texts(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter_map(|s| match s {
                Sent::Text { html, .. } => Some(html.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<(&str, &str, &[u8])> {
        self.sent
            .iter()
            .filter_map(|s| match s {
                Sent::Document { file_name, caption, contents, .. } => {
                    Some((file_name.as_str(), caption.as_str(), contents.as_slice()))
                }
                _ => None,
            })
            .collect()
    }

    /// Local paths handed to `send_document`, in order
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.sent
            .iter()
            .filter_map(|s| match s {
                Sent::Document { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn next_message_id(&mut self) -> MessageId {
        self.next_id += 1;
        self.next_id
    }
}

impl Transport for RecordingTransport {
    fn send_text(&mut self, chat: ChatId, html: &str) -> TransportResult<MessageId> {
        self.sent.push(Sent::Text { chat, html: html.to_string() });
        Ok(self.next_message_id())
    }

    fn send_document(&mut self, chat: ChatId, path: &Path, caption: &str) -> TransportResult<MessageId> {
        let contents = fs::read(path).map_err(|e| TransportError::new(TransportErrorKind::Rejected, e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.sent.push(Sent::Document {
            chat,
            path: path.to_path_buf(),
            file_name,
            caption: caption.to_string(),
            contents,
        });
        if self.reject_documents {
            return Err(TransportError::new(TransportErrorKind::Rejected, "file too big"));
        }
        Ok(self.next_message_id())
    }

    fn fetch_document(&mut self, _file_id: &str) -> TransportResult<Vec<u8>> {
        self.download.clone()
    }

    fn delete_message(&mut self, chat: ChatId, message: MessageId) -> TransportResult<()> {
        if self.fail_delete {
            return Err(TransportError::new(TransportErrorKind::Rejected, "message too old"));
        }
        self.sent.push(Sent::Deleted { chat, message });
        Ok(())
    }
}
