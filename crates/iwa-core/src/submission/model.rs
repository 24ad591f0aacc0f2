//! Submission domain models.

use serde::{Deserialize, Serialize};

/// Which input control is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Upload,
    Capture,
}

impl InputMode {
    /// Parse from a form value. Unknown values fall back to `Upload`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "capture" | "capture image" | "camera" => Self::Capture,
            _ => Self::Upload,
        }
    }

    /// Convert to the form value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Capture => "capture",
        }
    }

    /// Human-readable label for the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload => "Upload File",
            Self::Capture => "Capture Image",
        }
    }
}

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    UploadedFile,
    CapturedImage,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadedFile => "uploaded_file",
            Self::CapturedImage => "captured_image",
        }
    }
}

/// Document types accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Jpeg,
    Png,
    Pdf,
}

/// Extensions offered to the file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

impl DocumentType {
    /// Detect the type from a file name's extension (case-insensitive).
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.trim().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect the type from a declared MIME type. Parameters are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or(mime).trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// MIME type sent to the analysis service.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// True for types that can be previewed as an image.
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// A file as produced by an input control, before acquisition.
#[derive(Debug, Clone, Default)]
pub struct FilePart {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(filename: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.filter(|s| !s.is_empty()),
            content_type: content_type.filter(|s| !s.is_empty()),
            bytes,
        }
    }

    /// A part with no bytes means the control was left empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One document, ready for analysis.
#[derive(Debug, Clone)]
pub struct Submission {
    pub content: Vec<u8>,
    pub document_type: DocumentType,
    pub source: Source,
    pub filename: Option<String>,
}

impl Submission {
    /// The MIME type of the content.
    pub fn content_type(&self) -> &'static str {
        self.document_type.mime()
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}
