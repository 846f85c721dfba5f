/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::AnnotationRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationsResponse {
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportAnnotationsResponse {
    #[serde(rename = "totalExported")]
    pub total_exported: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAnnotationsResponse {
    #[serde(rename = "totalDeleted")]
    pub total_deleted: u64,
}

/// Dataverse deposit response for a manuscript upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadManuscriptResponse {
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

impl UploadManuscriptResponse {
    /// Id of the first file in the deposit, i.e. the new manuscript.
    pub fn manuscript_id(&self) -> Option<u64> {
        self.files.first().map(|file| file.data_file.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(rename = "dataFile")]
    pub data_file: DataFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFile {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_annotations_defaults_empty() {
        let response: AnnotationsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.annotations.is_empty());
    }

    #[test]
    fn test_upload_response_manuscript_id() {
        let response: UploadManuscriptResponse =
            serde_json::from_str(r#"{"files":[{"dataFile":{"id":381}}]}"#).unwrap();
        assert_eq!(response.manuscript_id(), Some(381));

        let empty: UploadManuscriptResponse = serde_json::from_str(r#"{"files":[]}"#).unwrap();
        assert_eq!(empty.manuscript_id(), None);
    }
}
