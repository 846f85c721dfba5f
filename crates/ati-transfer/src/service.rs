/*
[INPUT]:  AtiClient + dataset id, session credentials
[OUTPUT]: Annotation source/sink and manuscript store used by the pipelines
[POS]:    Integration layer - seams between pipelines and the backend
[UPDATE]: When pipelines need new backend capabilities
*/

use async_trait::async_trait;
use ati_adapter::{
    AnnotationRecord, AtiClient, AtiError, Credentials, DeleteAnnotationsRequest,
    ExportAnnotationsRequest, GroupSelection, ManuscriptUpload,
};

/// Where candidate annotations come from.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    async fn fetch_annotations(
        &self,
        credentials: &Credentials,
        group: &GroupSelection,
    ) -> Result<Vec<AnnotationRecord>, AtiError>;
}

/// Where annotation batches are committed. Returns the count the sink reports.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn export_annotations(
        &self,
        credentials: &Credentials,
        request: ExportAnnotationsRequest,
    ) -> Result<u64, AtiError>;

    async fn delete_annotations(
        &self,
        credentials: &Credentials,
        annotations: Vec<AnnotationRecord>,
    ) -> Result<u64, AtiError>;
}

#[async_trait]
pub trait ManuscriptStore: Send + Sync {
    /// Store the file and return its new id.
    async fn upload_manuscript(
        &self,
        credentials: &Credentials,
        upload: ManuscriptUpload,
    ) -> Result<u64, AtiError>;

    async fn process_manuscript(&self, credentials: &Credentials, manuscript_id: u64)
    -> Result<(), AtiError>;

    async fn delete_manuscript(&self, credentials: &Credentials, manuscript_id: &str)
    -> Result<(), AtiError>;
}

/// Backend routes scoped to one ATI project (Dataverse dataset).
#[derive(Debug, Clone)]
pub struct DatasetService {
    client: AtiClient,
    dataset_id: String,
}

impl DatasetService {
    pub fn new(client: AtiClient, dataset_id: impl Into<String>) -> Self {
        Self {
            client,
            dataset_id: dataset_id.into(),
        }
    }
}

#[async_trait]
impl AnnotationSource for DatasetService {
    async fn fetch_annotations(
        &self,
        credentials: &Credentials,
        group: &GroupSelection,
    ) -> Result<Vec<AnnotationRecord>, AtiError> {
        self.client
            .download_annotations(credentials, &self.dataset_id, group)
            .await
    }
}

#[async_trait]
impl AnnotationSink for DatasetService {
    async fn export_annotations(
        &self,
        credentials: &Credentials,
        request: ExportAnnotationsRequest,
    ) -> Result<u64, AtiError> {
        let response = self
            .client
            .export_annotations(credentials, &self.dataset_id, &request)
            .await?;
        Ok(response.total_exported)
    }

    async fn delete_annotations(
        &self,
        credentials: &Credentials,
        annotations: Vec<AnnotationRecord>,
    ) -> Result<u64, AtiError> {
        let request = DeleteAnnotationsRequest { annotations };
        let response = self
            .client
            .delete_annotations(credentials, &self.dataset_id, &request)
            .await?;
        Ok(response.total_deleted)
    }
}

#[async_trait]
impl ManuscriptStore for DatasetService {
    async fn upload_manuscript(
        &self,
        credentials: &Credentials,
        upload: ManuscriptUpload,
    ) -> Result<u64, AtiError> {
        let response = self
            .client
            .upload_manuscript(credentials, &self.dataset_id, upload)
            .await?;
        response.manuscript_id().ok_or_else(|| {
            AtiError::InvalidResponse("upload response did not include a file id".to_string())
        })
    }

    async fn process_manuscript(
        &self,
        credentials: &Credentials,
        manuscript_id: u64,
    ) -> Result<(), AtiError> {
        self.client.process_manuscript(credentials, manuscript_id).await
    }

    async fn delete_manuscript(
        &self,
        credentials: &Credentials,
        manuscript_id: &str,
    ) -> Result<(), AtiError> {
        self.client.delete_file(credentials, manuscript_id).await
    }
}
