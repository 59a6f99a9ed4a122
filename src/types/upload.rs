//! Request side of an analysis

use super::analysis::AnalysisType;
use std::path::Path;

/// Content type a browser declares for CSV uploads
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// Declared MIME type, if the picker reported one
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Read a file from disk, declaring `text/csv` when the extension says so
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = has_csv_extension(&name).then_some(CSV_CONTENT_TYPE);

        Ok(Self::new(name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub(crate) fn has_csv_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".csv")
}

/// Everything sent to `POST /analyze`
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub file: UploadFile,
    pub analysis_type: AnalysisType,
    pub detection_threshold: f64,
    pub generate_report: bool,
}

/// Form parameters accompanying the file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    pub analysis_type: AnalysisType,
    pub detection_threshold: f64,
    pub generate_report: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            analysis_type: AnalysisType::Standard,
            detection_threshold: 0.7,
            generate_report: true,
        }
    }
}

impl AnalysisRequest {
    pub fn new(file: UploadFile, params: AnalysisParams) -> Self {
        Self {
            file,
            analysis_type: params.analysis_type,
            detection_threshold: params.detection_threshold,
            generate_report: params.generate_report,
        }
    }
}
