/*
[INPUT]:  Dataset id, group filter, annotation batches, session credentials
[OUTPUT]: Downloaded annotation sets and export/delete totals
[POS]:    HTTP layer - Hypothes.is annotation routes proxied by the backend
[UPDATE]: When annotation routes or payloads change
*/

use crate::auth::Credentials;
use crate::http::{AtiClient, Result};
use crate::types::{
    AnnotationRecord, AnnotationsResponse, DeleteAnnotationsRequest, DeleteAnnotationsResponse,
    ExportAnnotationsRequest, ExportAnnotationsResponse, GroupSelection,
};
use reqwest::Method;

impl AtiClient {
    /// Download the annotations of a dataset's manuscript
    ///
    /// GET /api/hypothesis/{dataset_id}/download-annotations?hypothesisGroup={group}&isAdminAuthor=false
    ///
    /// `GroupSelection::All` is sent as an empty `hypothesisGroup`.
    pub async fn download_annotations(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        group: &GroupSelection,
    ) -> Result<Vec<AnnotationRecord>> {
        let endpoint = format!("api/hypothesis/{dataset_id}/download-annotations");
        let builder = self
            .request(Method::GET, &endpoint, credentials)?
            .query(&[
                ("hypothesisGroup", group.as_filter()),
                ("isAdminAuthor", "false"),
            ]);
        let response: AnnotationsResponse = self.send_json(builder).await?;
        Ok(response.annotations)
    }

    /// Post annotations to a destination URL/group
    ///
    /// POST /api/hypothesis/{dataset_id}/export-annotations
    pub async fn export_annotations(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        request: &ExportAnnotationsRequest,
    ) -> Result<ExportAnnotationsResponse> {
        let endpoint = format!("api/hypothesis/{dataset_id}/export-annotations");
        let builder = self
            .request(Method::POST, &endpoint, credentials)?
            .json(request);
        self.send_json(builder).await
    }

    /// Delete a batch of annotations
    ///
    /// DELETE /api/hypothesis/{dataset_id}/delete-annotations?isAdminAuthor=false
    pub async fn delete_annotations(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        request: &DeleteAnnotationsRequest,
    ) -> Result<DeleteAnnotationsResponse> {
        let endpoint = format!("api/hypothesis/{dataset_id}/delete-annotations");
        let builder = self
            .request(Method::DELETE, &endpoint, credentials)?
            .query(&[("isAdminAuthor", "false")])
            .json(request);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Credentials;
    use crate::http::AtiClient;
    use crate::types::{GroupId, GroupSelection};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_annotations_sends_filter_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/hypothesis/ds-1/download-annotations"))
            .and(query_param("hypothesisGroup", "g1"))
            .and(query_param("isAdminAuthor", "false"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "annotations": [{"id": "a1"}, {"id": "a2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AtiClient::new(&server.uri()).unwrap();
        let records = client
            .download_annotations(
                &Credentials::new("token-1"),
                "ds-1",
                &GroupSelection::Group(GroupId::new("g1")),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), Some("a1"));
    }
}
