/*
[INPUT]:  Manuscript files, Dataverse file ids, session credentials
[OUTPUT]: Deposit responses and processing/delete acknowledgements
[POS]:    HTTP layer - manuscript routes backed by Dataverse
[UPDATE]: When manuscript routes or the deposit payload change
*/

use crate::auth::Credentials;
use crate::http::{AtiClient, Result};
use crate::types::{ManuscriptUpload, UploadManuscriptResponse};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

impl AtiClient {
    /// Upload a manuscript into the dataset
    ///
    /// POST /api/datasets/{dataset_id}/manuscript (multipart field `manuscript`)
    pub async fn upload_manuscript(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        upload: ManuscriptUpload,
    ) -> Result<UploadManuscriptResponse> {
        let mime_type = upload.mime_type();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(mime_type)?;
        let form = Form::new().part("manuscript", part);

        let endpoint = format!("api/datasets/{dataset_id}/manuscript");
        let builder = self
            .request(Method::POST, &endpoint, credentials)?
            .multipart(form);
        self.send_json(builder).await
    }

    /// Trigger ingest processing of an uploaded manuscript
    ///
    /// PUT /api/arcore/{manuscript_id}
    pub async fn process_manuscript(&self, credentials: &Credentials, manuscript_id: u64) -> Result<()> {
        let endpoint = format!("api/arcore/{manuscript_id}");
        let builder = self.request(Method::PUT, &endpoint, credentials)?;
        self.send_empty(builder).await
    }

    /// Delete a Dataverse file
    ///
    /// DELETE /api/delete-file/{file_id}
    pub async fn delete_file(&self, credentials: &Credentials, file_id: &str) -> Result<()> {
        let endpoint = format!("api/delete-file/{file_id}");
        let builder = self.request(Method::DELETE, &endpoint, credentials)?;
        self.send_empty(builder).await
    }
}
