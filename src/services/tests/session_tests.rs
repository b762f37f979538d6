use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};

use crate::analysis::report::ReportAssembler;
use crate::config::ReportConfig;
use crate::container::decode_metadata;
use crate::exif::tests::test_utils::create_gps_exif_block;
use crate::scrub::{CustomMetadataPayload, OutputFormat, Scrubber};
use crate::services::session::{
    sanitize_file_name, DocumentSession, IncomingDocument, ScrubRequest, SessionError, TurnOutcome, TurnRequest,
    COMPRESSED_PHOTO_TEXT, FILE_REPORT_CAPTION, NOT_AN_IMAGE_TEXT, STATUS_TEXT,
};
use crate::services::tests::mock_transport::{RecordingTransport, Sent};
use crate::services::transport::{TransportError, TransportErrorKind};
use crate::exif::errors::MetaError;
use crate::services::vision::{AnalysisError, CredentialRing, RotatingAnalyzer, VisionBackend};

const CHAT: i64 = 42;

fn geotagged_png() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(4, 3))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    let mut png = Png::from_bytes(Bytes::from(out.into_inner())).unwrap();
    png.set_exif(Some(Bytes::from(create_gps_exif_block())));
    png.encoder().bytes().to_vec()
}

fn document(name: &str, mime: &str) -> IncomingDocument {
    IncomingDocument {
        chat: CHAT,
        file_id: "file-1".to_string(),
        file_name: Some(name.to_string()),
        mime_type: Some(mime.to_string()),
    }
}

fn session_with_limit(inline_limit: usize) -> DocumentSession {
    let config = ReportConfig {
        inline_limit,
        ..ReportConfig::default()
    };
    DocumentSession::new(ReportAssembler::new(4096, &config), Scrubber::default())
}

struct EchoBackend;

impl VisionBackend for EchoBackend {
    fn describe(&self, credential: &str, image: &[u8], _context: Option<&str>) -> Result<String, AnalysisError> {
        Ok(format!("{} saw {} bytes", credential, image.len()))
    }
}

#[test]
fn test_non_image_is_rejected() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    let outcome = session_with_limit(4000).handle_document(
        &mut transport,
        &document("notes.pdf", "application/pdf"),
        &TurnRequest::report_only(),
    );

    assert_eq!(outcome, TurnOutcome::Rejected);
    assert_eq!(transport.texts(), vec![NOT_AN_IMAGE_TEXT]);
}

#[test]
fn test_inline_report_and_status_cleanup() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    let outcome = session_with_limit(4000).handle_document(
        &mut transport,
        &document("holiday.png", "image/png"),
        &TurnRequest::report_only(),
    );

    assert_eq!(outcome, TurnOutcome::ReportedInline);
    let texts = transport.texts();
    assert_eq!(texts[0], STATUS_TEXT);
    assert!(texts[1].contains("GEOLOCATION FOUND"));
    assert!(texts[1].contains("-33.865,-151.505"));
    // Status message id is the first one handed out
    assert_eq!(transport.sent.last(), Some(&Sent::Deleted { chat: CHAT, message: 101 }));
}

#[test]
fn test_long_report_is_sent_as_plain_file() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    let outcome = session_with_limit(10).handle_document(
        &mut transport,
        &document("holiday.png", "image/png"),
        &TurnRequest::report_only(),
    );

    assert_eq!(outcome, TurnOutcome::ReportedAsFile);
    let documents = transport.documents();
    assert_eq!(documents.len(), 1);
    let (name, caption, contents) = documents[0];
    assert_eq!(name, "report_holiday.png.txt");
    assert_eq!(caption, FILE_REPORT_CAPTION);
    let text = String::from_utf8(contents.to_vec()).unwrap();
    assert!(text.starts_with("🔍 File Analysis"));
    assert!(!text.contains("<b>"));
}

#[test]
fn test_download_failure_reports_error() {
    let mut transport = RecordingTransport::failing_download(TransportErrorKind::Timeout, "no answer");
    let outcome = session_with_limit(4000).handle_document(
        &mut transport,
        &document("a.jpg", "image/jpeg"),
        &TurnRequest::report_only(),
    );

    assert_eq!(outcome, TurnOutcome::Failed("timed out: no answer".to_string()));
    assert_eq!(transport.texts()[1], "Error: timed out: no answer");
    assert!(matches!(transport.sent.last(), Some(Sent::Deleted { .. })));
}

#[test]
fn test_failed_status_delete_is_ignored() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    transport.fail_delete = true;
    let outcome = session_with_limit(4000).handle_document(
        &mut transport,
        &document("holiday.png", "image/png"),
        &TurnRequest::report_only(),
    );

    assert_eq!(outcome, TurnOutcome::ReportedInline);
    assert!(!transport.sent.iter().any(|s| matches!(s, Sent::Deleted { .. })));
}

#[test]
fn test_vision_and_scrub_extras() {
    let analyzer = RotatingAnalyzer::new(Box::new(EchoBackend), CredentialRing::new(vec!["key".to_string()]));
    let mut session = session_with_limit(4000).with_analyzer(analyzer);
    let request = TurnRequest::report_only().with_vision().with_scrub(ScrubRequest {
        target: None,
        payload: Some(CustomMetadataPayload::new("checked")),
    });

    let source = geotagged_png();
    let mut transport = RecordingTransport::serving(source.clone());
    let outcome = session.handle_document(&mut transport, &document("holiday.png", "image/png"), &request);
    assert_eq!(outcome, TurnOutcome::ReportedInline);

    let vision = format!("key saw {} bytes", source.len());
    assert!(transport.texts().iter().any(|t| t.ends_with(&vision)));

    let documents = transport.documents();
    assert_eq!(documents.len(), 1);
    let (name, _, contents) = documents[0];
    assert_eq!(name, "clean_holiday.png");
    let decoded = decode_metadata(contents).unwrap();
    assert_eq!(decoded.format, ImageFormat::Png);
    assert_eq!(decoded.info_value("Comment"), Some("checked"));
}

#[test]
fn test_scrub_target_override() {
    let mut session = session_with_limit(4000);
    let request = TurnRequest::report_only().with_scrub(ScrubRequest {
        target: Some(OutputFormat::Jpeg),
        payload: None,
    });

    let mut transport = RecordingTransport::serving(geotagged_png());
    session.handle_document(&mut transport, &document("holiday.png", "image/png"), &request);

    let documents = transport.documents();
    assert_eq!(documents[0].0, "clean_holiday.jpg");
    assert!(decode_metadata(documents[0].2).unwrap().tags.is_empty());
}

#[test]
fn test_compressed_photo_warning() {
    let mut transport = RecordingTransport::serving(Vec::new());
    let outcome = session_with_limit(4000).handle_compressed_photo(&mut transport, CHAT);

    assert_eq!(outcome, TurnOutcome::Rejected);
    assert_eq!(transport.texts(), vec![COMPRESSED_PHOTO_TEXT]);
}

#[test]
fn test_sanitize_file_name() {
    assert_eq!(sanitize_file_name(Some("../../etc/passwd")), "passwd");
    assert_eq!(sanitize_file_name(Some("my photo (1).jpg")), "my_photo__1_.jpg");
    assert_eq!(sanitize_file_name(Some(".hidden")), "hidden");
    assert_eq!(sanitize_file_name(None), "upload");
    assert_eq!(sanitize_file_name(Some("..")), "upload");
}

#[test]
fn test_from_config_attaches_analyzer_only_when_enabled() {
    let disabled = crate::config::Config::default();
    assert!(!DocumentSession::from_config(&disabled, Some(Box::new(EchoBackend))).has_analyzer());

    let enabled = crate::config::Config::from_str("[vision]\nenabled = true\ncredentials = [\"k1\"]\n").unwrap();
    assert!(DocumentSession::from_config(&enabled, Some(Box::new(EchoBackend))).has_analyzer());
    assert!(!DocumentSession::from_config(&enabled, None).has_analyzer());
}

#[test]
fn test_workdir_removed_after_delivered_turn() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    let outcome = session_with_limit(10).handle_document(
        &mut transport,
        &document("holiday.png", "image/png"),
        &TurnRequest::report_only(),
    );
    assert_eq!(outcome, TurnOutcome::ReportedAsFile);

    let paths = transport.document_paths();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].exists());
    assert!(!paths[0].parent().unwrap().exists());
}

#[test]
fn test_workdir_removed_after_failed_turn() {
    let mut transport = RecordingTransport::serving(geotagged_png());
    transport.reject_documents = true;
    let outcome = session_with_limit(10).handle_document(
        &mut transport,
        &document("holiday.png", "image/png"),
        &TurnRequest::report_only(),
    );
    assert_eq!(outcome, TurnOutcome::Failed("rejected: file too big".to_string()));

    let paths = transport.document_paths();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].exists());
    assert!(!paths[0].parent().unwrap().exists());
}

#[test]
fn test_retryable_errors() {
    let timeout = SessionError::from(TransportError::new(TransportErrorKind::Timeout, "slow"));
    let rejected = SessionError::from(TransportError::new(TransportErrorKind::Rejected, "bad"));
    let decode = SessionError::from(MetaError::DecodeError("corrupt".to_string()));

    assert!(timeout.is_retryable());
    assert!(!rejected.is_retryable());
    assert!(!decode.is_retryable());
    assert!(TransportError::new(TransportErrorKind::RateLimited, "429").is_retryable());
}
