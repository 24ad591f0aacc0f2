//! UI-independent presentation logic.
//!
//! Pure functions of the current mode and submission. Front-ends call these
//! and only do the binding.

pub mod lifecycle;
pub mod markdown;

pub use lifecycle::{Lifecycle, Stage};
pub use markdown::render_markdown;

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};
use serde::Serialize;
use tracing::debug;

use crate::submission::{DocumentType, InputMode, Submission};

/// Shown while the analysis call is in flight.
pub const STATUS_ANALYZING: &str = "Analyzing the warrant, please wait...";

/// Shown once the analysis call has returned.
pub const STATUS_COMPLETE: &str = "Analysis Complete";

/// Shown instead of a preview for documents.
pub const DOCUMENT_PLACEHOLDER: &str = "PDF file uploaded.";

/// Shown when an image cannot be decoded for preview.
pub const PREVIEW_WARNING: &str = "Could not open the image for preview.";

/// Largest image, in pixels, that gets an inline preview.
pub const MAX_PREVIEW_PIXELS: u64 = 50_000_000;

/// Visibility of the two input controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputVisibility {
    pub upload: bool,
    pub capture: bool,
}

/// Exactly one input control is visible at a time.
pub fn input_visibility(mode: InputMode) -> InputVisibility {
    match mode {
        InputMode::Upload => InputVisibility {
            upload: true,
            capture: false,
        },
        InputMode::Capture => InputVisibility {
            upload: false,
            capture: true,
        },
    }
}

/// What to show for the submitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Inline image as a `data:` URL.
    Image { data_url: String },
    /// Documents are never rendered as images.
    Document,
    /// Image that failed to decode; analysis still proceeds.
    Unavailable,
}

impl Preview {
    /// Text shown in place of an image, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Image { .. } => None,
            Self::Document => Some(DOCUMENT_PLACEHOLDER),
            Self::Unavailable => Some(PREVIEW_WARNING),
        }
    }
}

/// Build the preview for a submission.
///
/// Only the image header is read, so the cost does not depend on how large
/// the decoded pixel buffer would be.
pub fn preview_for(submission: &Submission) -> Preview {
    preview_within(submission, MAX_PREVIEW_PIXELS)
}

fn preview_within(submission: &Submission, max_pixels: u64) -> Preview {
    let format = match submission.document_type {
        DocumentType::Pdf => return Preview::Document,
        DocumentType::Jpeg => ImageFormat::Jpeg,
        DocumentType::Png => ImageFormat::Png,
    };

    let (width, height) = match ImageReader::with_format(Cursor::new(&submission.content), format).into_dimensions() {
        Ok(dimensions) => dimensions,
        Err(e) => {
            debug!(error = %e, "Image preview unavailable");
            return Preview::Unavailable;
        }
    };

    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        debug!(width, height, "Image too large for preview");
        return Preview::Unavailable;
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&submission.content);
    Preview::Image {
        data_url: format!("data:{};base64,{}", submission.content_type(), encoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::Source;

    fn submission(document_type: DocumentType, content: Vec<u8>) -> Submission {
        Submission {
            content,
            document_type,
            source: Source::UploadedFile,
            filename: None,
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn test_visibility_is_mutually_exclusive() {
        for mode in [InputMode::Upload, InputMode::Capture] {
            let v = input_visibility(mode);
            assert!(v.upload ^ v.capture);
        }
        assert!(input_visibility(InputMode::Upload).upload);
        assert!(input_visibility(InputMode::Capture).capture);
    }

    #[test]
    fn test_pdf_never_previewed_as_image() {
        let preview = preview_for(&submission(DocumentType::Pdf, tiny_png()));
        assert_eq!(preview, Preview::Document);
        assert_eq!(preview.notice(), Some("PDF file uploaded."));
    }

    #[test]
    fn test_png_preview_data_url() {
        let png = tiny_png();
        match preview_for(&submission(DocumentType::Png, png)) {
            Preview::Image { data_url } => assert!(data_url.starts_with("data:image/png;base64,iVBOR")),
            other => panic!("expected image preview, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_image_warns() {
        let preview = preview_for(&submission(DocumentType::Jpeg, b"not a jpeg".to_vec()));
        assert_eq!(preview, Preview::Unavailable);
        assert_eq!(preview.notice(), Some(PREVIEW_WARNING));
    }

    #[test]
    fn test_oversized_image_not_previewed() {
        let png = submission(DocumentType::Png, tiny_png());
        assert_eq!(preview_within(&png, 3), Preview::Unavailable);
        assert!(matches!(preview_within(&png, 4), Preview::Image { .. }));
    }
}
