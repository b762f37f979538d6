//! Vision analysis collaborator
//!
//! The backend that talks to a vision-capable model lives outside this
//! crate behind `VisionBackend`. `RotatingAnalyzer` owns the credential
//! ring and moves to the next credential when a backend reports that the
//! current one has run out of quota.

use std::fmt;

use log::{info, warn};

/// Why a vision call failed, as classified by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisErrorKind {
    /// The credential is out of quota; another one may still work
    QuotaExhausted,
    /// Network or service hiccup
    Transient,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub message: String,
}

impl AnalysisError {
    pub fn new(kind: AnalysisErrorKind, message: impl Into<String>) -> Self {
        AnalysisError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AnalysisErrorKind::QuotaExhausted => write!(f, "Quota exhausted: {}", self.message),
            AnalysisErrorKind::Transient => write!(f, "Temporary failure: {}", self.message),
            AnalysisErrorKind::Other => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// One call to a vision-capable model
pub trait VisionBackend {
    fn describe(&self, credential: &str, image: &[u8], context: Option<&str>) -> Result<String, AnalysisError>;
}

/// Result of moving to the next credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Now using the credential at this index
    Rotated(usize),
    /// Every credential has been tried since the last success
    Exhausted,
}

/// Ordered credentials and the index of the one in use
#[derive(Debug, Clone)]
pub struct CredentialRing {
    credentials: Vec<String>,
    current: usize,
    /// Rotations since the last successful call
    failed_in_a_row: usize,
}

impl CredentialRing {
    pub fn new(credentials: Vec<String>) -> Self {
        CredentialRing {
            credentials,
            current: 0,
            failed_in_a_row: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.credentials.get(self.current).map(String::as_str)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Moves to the next credential, wrapping around
    ///
    /// Returns `Exhausted` once every credential has failed since the last
    /// `mark_success`; the index then stays where it is.
    pub fn rotate(&mut self) -> Rotation {
        if self.failed_in_a_row + 1 >= self.credentials.len() {
            return Rotation::Exhausted;
        }
        self.failed_in_a_row += 1;
        self.current = (self.current + 1) % self.credentials.len();
        Rotation::Rotated(self.current)
    }

    /// Records that the current credential worked
    pub fn mark_success(&mut self) {
        self.failed_in_a_row = 0;
    }
}

/// Vision backend with credential rotation on quota exhaustion
pub struct RotatingAnalyzer {
    backend: Box<dyn VisionBackend>,
    ring: CredentialRing,
}

impl RotatingAnalyzer {
    pub fn new(backend: Box<dyn VisionBackend>, ring: CredentialRing) -> Self {
        RotatingAnalyzer { backend, ring }
    }

    pub fn ring(&self) -> &CredentialRing {
        &self.ring
    }

    /// Describes `image`, rotating credentials while the backend reports
    /// exhausted quota. Other errors are returned immediately.
    pub fn analyze(&mut self, image: &[u8], context: Option<&str>) -> Result<String, AnalysisError> {
        loop {
            let credential = self
                .ring
                .current()
                .ok_or_else(|| AnalysisError::new(AnalysisErrorKind::Other, "no credentials configured"))?;

            match self.backend.describe(credential, image, context) {
                Ok(text) => {
                    self.ring.mark_success();
                    return Ok(text);
                }
                Err(e) if e.kind == AnalysisErrorKind::QuotaExhausted => match self.ring.rotate() {
                    Rotation::Rotated(index) => {
                        info!("Credential quota exhausted, switching to credential #{}", index);
                    }
                    Rotation::Exhausted => {
                        warn!("All {} credentials exhausted", self.ring.len());
                        self.ring.mark_success();
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }

    /// Like `analyze`, with failures turned into a placeholder line
    pub fn analyze_or_placeholder(&mut self, image: &[u8], context: Option<&str>) -> String {
        match self.analyze(image, context) {
            Ok(text) => text,
            Err(e) => {
                warn!("Vision analysis failed: {}", e);
                format!("AI analysis unavailable: {}", e)
            }
        }
    }
}
