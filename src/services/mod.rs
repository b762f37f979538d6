//! Collaborators outside the core pipeline
//!
//! Vision analysis and chat transport are traits here; their network-bound
//! implementations live with the embedding application. `session` wires
//! them to the report pipeline for one conversation turn.

pub mod vision;
pub mod transport;
pub mod session;
#[cfg(test)]
mod tests;

pub use session::{DocumentSession, IncomingDocument, ScrubRequest, SessionError, TurnOutcome, TurnRequest};
pub use transport::{ChatId, MessageId, Transport, TransportError, TransportErrorKind, TransportResult};
pub use vision::{AnalysisError, AnalysisErrorKind, CredentialRing, Rotation, RotatingAnalyzer, VisionBackend};
