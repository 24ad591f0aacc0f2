//! Input acquisition.
//!
//! Turns whatever the active input control produced into a [`Submission`].
//! Uploads and camera captures end up in the same shape so everything
//! downstream has a single path.

pub mod model;

pub use model::{DocumentType, FilePart, InputMode, Source, Submission, ACCEPTED_EXTENSIONS};

use tracing::debug;

use crate::error::{IwaError, IwaResult};

/// Acquire the submission for the active input mode.
///
/// Only the part bound to `mode` is considered; content left in the inactive
/// control is never forwarded. Returns `Ok(None)` when no file is present.
pub fn acquire(
    mode: InputMode,
    upload: Option<FilePart>,
    capture: Option<FilePart>,
) -> IwaResult<Option<Submission>> {
    let (part, source) = match mode {
        InputMode::Upload => (upload, Source::UploadedFile),
        InputMode::Capture => (capture, Source::CapturedImage),
    };

    let part = match part {
        Some(p) if !p.is_empty() => p,
        _ => {
            debug!(mode = mode.as_str(), "No file present, nothing to acquire");
            return Ok(None);
        }
    };

    let document_type = match source {
        Source::UploadedFile => detect_upload_type(&part)?,
        Source::CapturedImage => detect_capture_type(&part),
    };

    debug!(
        source = source.as_str(),
        mime = document_type.mime(),
        size = part.bytes.len(),
        "Acquired submission"
    );

    Ok(Some(Submission {
        content: part.bytes,
        document_type,
        source,
        filename: part.filename,
    }))
}

/// Uploads are typed by their file name extension.
fn detect_upload_type(part: &FilePart) -> IwaResult<DocumentType> {
    let name = part.filename.as_deref().unwrap_or("");
    DocumentType::from_filename(name).ok_or_else(|| {
        IwaError::unsupported(if name.is_empty() { "unnamed file" } else { name })
    })
}

/// Captures are always images: extension first, then the declared image type,
/// then JPEG.
fn detect_capture_type(part: &FilePart) -> DocumentType {
    part.filename
        .as_deref()
        .and_then(DocumentType::from_filename)
        .filter(DocumentType::is_image)
        .or_else(|| {
            part.content_type
                .as_deref()
                .and_then(DocumentType::from_mime)
                .filter(DocumentType::is_image)
        })
        .unwrap_or(DocumentType::Jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, bytes: &[u8]) -> FilePart {
        FilePart::new(Some(name.to_string()), None, bytes.to_vec())
    }

    #[test]
    fn test_extension_detection() {
        assert_eq!(DocumentType::from_filename("warrant.JPG"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_filename("scan.jpeg"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_filename("photo.png"), Some(DocumentType::Png));
        assert_eq!(DocumentType::from_filename("/tmp/a.b/notice.pdf"), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_filename("notes.txt"), None);
        assert_eq!(DocumentType::from_filename("no_extension"), None);
    }

    #[test]
    fn test_mime_detection_ignores_parameters() {
        assert_eq!(DocumentType::from_mime("image/png; charset=binary"), Some(DocumentType::Png));
        assert_eq!(DocumentType::from_mime("image/jpg"), Some(DocumentType::Jpeg));
        assert_eq!(DocumentType::from_mime("text/plain"), None);
    }

    #[test]
    fn test_upload_mode_uses_upload_part() {
        let submission = acquire(
            InputMode::Upload,
            Some(part("warrant.pdf", b"%PDF-1.4")),
            Some(part("capture.jpg", b"\xff\xd8")),
        )
        .unwrap()
        .unwrap();

        assert_eq!(submission.source, Source::UploadedFile);
        assert_eq!(submission.content_type(), "application/pdf");
        assert_eq!(submission.content, b"%PDF-1.4");
    }

    #[test]
    fn test_inactive_mode_content_not_forwarded() {
        let result = acquire(InputMode::Capture, Some(part("warrant.pdf", b"%PDF")), None).unwrap();
        assert!(result.is_none());

        let result = acquire(InputMode::Upload, None, Some(part("capture.jpg", b"\xff\xd8"))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_capture_feeds_same_shape_as_upload() {
        let capture = FilePart::new(None, Some("image/png".to_string()), vec![1, 2, 3]);
        let submission = acquire(InputMode::Capture, None, Some(capture)).unwrap().unwrap();

        assert_eq!(submission.source, Source::CapturedImage);
        assert_eq!(submission.document_type, DocumentType::Png);
        assert_eq!(submission.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_capture_defaults_to_jpeg() {
        let capture = FilePart::new(Some("blob".to_string()), Some("application/octet-stream".to_string()), vec![9]);
        let submission = acquire(InputMode::Capture, None, Some(capture)).unwrap().unwrap();
        assert_eq!(submission.content_type(), "image/jpeg");

        // A capture is never treated as a document.
        let capture = FilePart::new(Some("frame.pdf".to_string()), Some("application/pdf".to_string()), vec![9]);
        let submission = acquire(InputMode::Capture, None, Some(capture)).unwrap().unwrap();
        assert!(submission.document_type.is_image());
    }

    #[test]
    fn test_empty_part_is_no_file() {
        let result = acquire(InputMode::Upload, Some(part("warrant.png", b"")), None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unsupported_upload_rejected() {
        let err = acquire(InputMode::Upload, Some(part("warrant.docx", b"PK")), None).unwrap_err();
        assert!(matches!(err, IwaError::UnsupportedDocument(ref name) if name == "warrant.docx"));

        let unnamed = FilePart::new(None, Some("image/png".to_string()), vec![1]);
        let err = acquire(InputMode::Upload, Some(unnamed), None).unwrap_err();
        assert!(matches!(err, IwaError::UnsupportedDocument(_)));
    }

    #[test]
    fn test_input_mode_parsing() {
        assert_eq!(InputMode::from_str("capture"), InputMode::Capture);
        assert_eq!(InputMode::from_str("Capture Image"), InputMode::Capture);
        assert_eq!(InputMode::from_str("Upload File"), InputMode::Upload);
        assert_eq!(InputMode::from_str("bogus"), InputMode::Upload);
    }
}
