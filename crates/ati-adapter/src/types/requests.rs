/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::models::{AnnotationRecord, GroupId};
use crate::http::{AtiError, Result};

/// Extensions accepted by the manuscript uploader
pub const SUPPORTED_MANUSCRIPT_EXTENSIONS: &[&str] = &["docx", "pdf"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAnnotationsRequest {
    pub is_admin_author: bool,
    pub destination_url: String,
    pub annotations: Vec<AnnotationRecord>,
    pub destination_hypothesis_group: GroupId,
    pub private_annotation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAnnotationsRequest {
    pub annotations: Vec<AnnotationRecord>,
}

/// Manuscript file staged for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ManuscriptUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ManuscriptUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        if !is_supported_manuscript(&file_name) {
            return Err(AtiError::Config(format!(
                "unsupported manuscript type: {file_name} (expected .docx or .pdf)"
            )));
        }
        Ok(Self { file_name, bytes })
    }

    /// Read a manuscript from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AtiError::Config(format!("invalid file name: {}", path.display())))?
            .to_string();
        if !is_supported_manuscript(&file_name) {
            return Err(AtiError::Config(format!(
                "unsupported manuscript type: {file_name} (expected .docx or .pdf)"
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        if self.file_name.to_ascii_lowercase().ends_with(".pdf") {
            "application/pdf"
        } else {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
    }
}

pub fn is_supported_manuscript(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_MANUSCRIPT_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}
