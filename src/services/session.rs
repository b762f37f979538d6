//! One conversation turn of the metadata bot
//!
//! `DocumentSession` glues the report pipeline to a `Transport`: it takes a
//! received document, runs the analysis on a temporary copy and sends the
//! results back to the chat.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use quick_xml::escape::partial_escape;

use crate::analysis::report::ReportAssembler;
use crate::config::Config;
use crate::exif::errors::MetaError;
use crate::scrub::{CustomMetadataPayload, OutputFormat, Scrubber};
use crate::services::transport::{ChatId, Transport, TransportError};
use crate::services::vision::{CredentialRing, RotatingAnalyzer, VisionBackend};

pub const NOT_AN_IMAGE_TEXT: &str = "This is not an image. Please send a file (jpg/png/tiff).";
pub const STATUS_TEXT: &str = "🕵️‍♂️ Analysing digital footprint...";
pub const FILE_REPORT_CAPTION: &str = "⚠️ Too much data. Full report attached.";
pub const COMPRESSED_PHOTO_TEXT: &str = "⚠️ <b>OSINT ERROR:</b> This is a compressed photo.\n\
     The messenger removed its GPS and EXIF data.\n\
     Send the photo as a <b>File (Document)</b>.";

const FALLBACK_FILE_NAME: &str = "upload";

/// Document as received from the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingDocument {
    pub chat: ChatId,
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl IncomingDocument {
    pub fn is_image(&self) -> bool {
        self.mime_type.as_deref().map_or(false, |mime| mime.contains("image"))
    }
}

/// Clean copy to send back after the report
#[derive(Debug, Clone, Default)]
pub struct ScrubRequest {
    /// Output format; the uploaded file's format when unset
    pub target: Option<OutputFormat>,
    pub payload: Option<CustomMetadataPayload>,
}

/// Optional extras for a turn
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub vision: bool,
    pub scrub: Option<ScrubRequest>,
}

impl TurnRequest {
    pub fn report_only() -> Self {
        TurnRequest::default()
    }

    pub fn with_vision(mut self) -> Self {
        self.vision = true;
        self
    }

    pub fn with_scrub(mut self, scrub: ScrubRequest) -> Self {
        self.scrub = Some(scrub);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Not an image, nothing analysed
    Rejected,
    ReportedInline,
    ReportedAsFile,
    /// The error text was sent to the chat
    Failed(String),
}

#[derive(Debug)]
pub enum SessionError {
    Transport(TransportError),
    Meta(MetaError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Transport(e) => write!(f, "{}", e),
            SessionError::Meta(e) => write!(f, "{}", e),
        }
    }
}

impl SessionError {
    /// Whether the same turn may succeed when tried again
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Transport(e) => e.is_retryable(),
            SessionError::Meta(_) => false,
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(e) => Some(e),
            SessionError::Meta(e) => Some(e),
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(error: TransportError) -> Self {
        SessionError::Transport(error)
    }
}

impl From<MetaError> for SessionError {
    fn from(error: MetaError) -> Self {
        SessionError::Meta(error)
    }
}

impl From<std::io::Error> for SessionError {
    fn from(error: std::io::Error) -> Self {
        SessionError::Meta(MetaError::IoError(error))
    }
}

pub struct DocumentSession {
    assembler: ReportAssembler,
    scrubber: Scrubber,
    analyzer: Option<RotatingAnalyzer>,
}

impl DocumentSession {
    pub fn new(assembler: ReportAssembler, scrubber: Scrubber) -> Self {
        DocumentSession {
            assembler,
            scrubber,
            analyzer: None,
        }
    }

    /// Builds a session from configuration
    ///
    /// The analyzer is attached only when `[vision] enabled` is set and a
    /// backend is supplied.
    pub fn from_config(config: &Config, backend: Option<Box<dyn VisionBackend>>) -> Self {
        let session = DocumentSession::new(ReportAssembler::from_config(config), Scrubber::from_config(&config.scrub));
        match backend {
            Some(backend) if config.vision.enabled => {
                let ring = CredentialRing::new(config.vision.credentials.clone());
                session.with_analyzer(RotatingAnalyzer::new(backend, ring))
            }
            _ => session,
        }
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn with_analyzer(mut self, analyzer: RotatingAnalyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Handles a photo the messenger recompressed
    pub fn handle_compressed_photo<T: Transport>(&self, transport: &mut T, chat: ChatId) -> TurnOutcome {
        match transport.send_text(chat, COMPRESSED_PHOTO_TEXT) {
            Ok(_) => TurnOutcome::Rejected,
            Err(e) => TurnOutcome::Failed(e.to_string()),
        }
    }

    /// Analyses one received document and answers in its chat
    pub fn handle_document<T: Transport>(
        &mut self,
        transport: &mut T,
        document: &IncomingDocument,
        request: &TurnRequest,
    ) -> TurnOutcome {
        if !document.is_image() {
            info!("Rejecting document with MIME type {:?}", document.mime_type);
            return match transport.send_text(document.chat, NOT_AN_IMAGE_TEXT) {
                Ok(_) => TurnOutcome::Rejected,
                Err(e) => TurnOutcome::Failed(e.to_string()),
            };
        }

        let status = match transport.send_text(document.chat, STATUS_TEXT) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Status message not sent: {}", e);
                None
            }
        };

        let outcome = match self.run_turn(transport, document, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Turn failed for chat {}: {} (retryable: {})", document.chat, e, e.is_retryable());
                let text = format!("Error: {}", partial_escape(&e.to_string()));
                if let Err(send_error) = transport.send_text(document.chat, &text) {
                    warn!("Error message not sent: {}", send_error);
                }
                TurnOutcome::Failed(e.to_string())
            }
        };

        if let Some(id) = status {
            if let Err(e) = transport.delete_message(document.chat, id) {
                debug!("Status message {} not deleted: {}", id, e);
            }
        }

        outcome
    }

    fn run_turn<T: Transport>(
        &mut self,
        transport: &mut T,
        document: &IncomingDocument,
        request: &TurnRequest,
    ) -> Result<TurnOutcome, SessionError> {
        let bytes = transport.fetch_document(&document.file_id)?;

        // Removed with everything in it when dropped
        let workdir = tempfile::Builder::new().prefix("exifscope").tempdir()?;
        let name = sanitize_file_name(document.file_name.as_deref());
        let source = workdir.path().join(&name);
        fs::write(&source, &bytes)?;

        let report = self.assembler.assemble_file(&source);
        info!("Report for {} is {} chars ({:?})", name, report.char_len, report.status);

        let outcome = if report.requires_file_delivery() {
            let report_path = workdir.path().join(format!("report_{}.txt", name));
            fs::write(&report_path, report.to_plain_text())?;
            transport.send_document(document.chat, &report_path, FILE_REPORT_CAPTION)?;
            TurnOutcome::ReportedAsFile
        } else {
            transport.send_text(document.chat, &report.text)?;
            TurnOutcome::ReportedInline
        };

        if request.vision {
            self.send_vision(transport, document.chat, &bytes, &report.to_plain_text())?;
        }

        if let Some(scrub) = &request.scrub {
            self.send_scrubbed(transport, document.chat, &bytes, &name, scrub, workdir.path())?;
        }

        Ok(outcome)
    }

    fn send_vision<T: Transport>(
        &mut self,
        transport: &mut T,
        chat: ChatId,
        image: &[u8],
        context: &str,
    ) -> Result<(), SessionError> {
        let analyzer = match self.analyzer.as_mut() {
            Some(analyzer) => analyzer,
            None => {
                warn!("Vision requested but no analyzer is configured");
                return Ok(());
            }
        };
        let text = analyzer.analyze_or_placeholder(image, Some(context));
        transport.send_text(chat, &format!("🤖 <b>AI analysis:</b>\n{}", partial_escape(&text)))?;
        Ok(())
    }

    fn send_scrubbed<T: Transport>(
        &self,
        transport: &mut T,
        chat: ChatId,
        image: &[u8],
        name: &str,
        request: &ScrubRequest,
        workdir: &Path,
    ) -> Result<(), SessionError> {
        let target = match request.target {
            Some(target) => target,
            None => OutputFormat::from_path(name).unwrap_or(OutputFormat::Png),
        };

        let outcome = match self.scrubber.scrub(image, target, request.payload.as_ref()) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Scrub failed for {}: {}", name, e);
                let text = format!("Clean copy not produced: {}", partial_escape(&e.to_string()));
                transport.send_text(chat, &text)?;
                return Ok(());
            }
        };

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(FALLBACK_FILE_NAME);
        let clean_path = workdir.join(format!("clean_{}.{}", stem, outcome.format.extension()));
        fs::write(&clean_path, &outcome.bytes)?;

        let caption = if outcome.payload_embedded {
            "🧹 Metadata removed, comment embedded."
        } else {
            "🧹 Metadata removed."
        };
        transport.send_document(chat, &clean_path, caption)?;
        Ok(())
    }
}

/// Reduces an uploaded file name to a single safe path component
pub fn sanitize_file_name(name: Option<&str>) -> String {
    let base = name
        .and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
