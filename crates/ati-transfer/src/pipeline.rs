/*
[INPUT]:  Transfer/deletion requests, session credentials, a TaskDispatcher
[OUTPUT]: Step-by-step TaskState updates and a transfer/deletion result
[POS]:    Execution layer - annotation export and delete flows
[UPDATE]: When adding steps, changing progress text, or changing failure mapping
*/

use ati_adapter::{
    AnnotationRecord, AtiError, Credentials, ExportAnnotationsRequest, GroupId, GroupSelection,
    hypothesis_locator_url,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::service::{AnnotationSink, AnnotationSource};
use crate::slot::TaskDispatcher;
use crate::task::TaskAction;

pub const DOWNLOADING_ANNOTATIONS: &str = "Downloading annotations...";
pub const EXPORTING_ANNOTATIONS: &str = "Exporting annotations...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_group: GroupSelection,
    pub destination_url: String,
    pub destination_group: GroupId,
    pub make_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    pub source_group: GroupSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub total_exported: u64,
    pub destination_url: String,
    pub destination_group: GroupId,
}

impl TransferResult {
    /// Shareable Hypothes.is link to the exported annotations.
    pub fn locator_url(&self) -> String {
        hypothesis_locator_url(&self.destination_url, &self.destination_group)
    }

    pub fn summary(&self) -> String {
        format!(
            "Exported {} annotation(s) to {}",
            self.total_exported,
            self.locator_url()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionResult {
    pub total_deleted: u64,
    pub manuscript_name: String,
}

impl DeletionResult {
    pub fn summary(&self) -> String {
        format!(
            "Deleted {} annotation(s) from {}.",
            self.total_deleted, self.manuscript_name
        )
    }
}

/// Why a flow ended in the failed state. The message is the one shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferFailure {
    /// Downloading candidates failed; nothing was submitted to the sink.
    #[error("{message}")]
    SourceFetch { message: String },

    /// The sink rejected the batch after a successful download.
    #[error("{message}")]
    SinkSubmit { message: String },

    #[error("{message}")]
    ManuscriptUpload { message: String },

    #[error("{message}")]
    ManuscriptProcessing { message: String },

    #[error("{message}")]
    ManuscriptDelete { message: String },
}

impl TransferFailure {
    pub fn message(&self) -> &str {
        match self {
            TransferFailure::SourceFetch { message }
            | TransferFailure::SinkSubmit { message }
            | TransferFailure::ManuscriptUpload { message }
            | TransferFailure::ManuscriptProcessing { message }
            | TransferFailure::ManuscriptDelete { message } => message,
        }
    }
}

/// Record a failure on the task and hand it back to the caller.
pub(crate) fn fail(
    task: &TaskDispatcher,
    err: AtiError,
    into_failure: fn(String) -> TransferFailure,
) -> TransferFailure {
    let failure = into_failure(err.user_message());
    warn!(
        slot = task.slot(),
        operation_id = %task.operation_id(),
        error = %err,
        "task failed"
    );
    task.dispatch(TaskAction::Fail(failure.message().to_string()));
    failure
}

fn source_fetch(message: String) -> TransferFailure {
    TransferFailure::SourceFetch { message }
}

fn sink_submit(message: String) -> TransferFailure {
    TransferFailure::SinkSubmit { message }
}

/// Copy annotations from a source group to a destination URL and group.
///
/// Download, then export. The export call is only made once the download has
/// succeeded. An empty download is still exported and finishes with zero.
pub async fn export_annotations<S>(
    service: &S,
    credentials: &Credentials,
    request: &TransferRequest,
    task: &TaskDispatcher,
) -> Result<TransferResult, TransferFailure>
where
    S: AnnotationSource + AnnotationSink + ?Sized,
{
    task.dispatch(TaskAction::Start(DOWNLOADING_ANNOTATIONS.to_string()));
    info!(
        operation_id = %task.operation_id(),
        group = request.source_group.as_filter(),
        "downloading annotations for export"
    );

    let annotations = service
        .fetch_annotations(credentials, &request.source_group)
        .await
        .map_err(|err| fail(task, err, source_fetch))?;

    task.dispatch(TaskAction::Advance(EXPORTING_ANNOTATIONS.to_string()));
    info!(
        operation_id = %task.operation_id(),
        count = annotations.len(),
        destination_url = %request.destination_url,
        destination_group = %request.destination_group,
        "exporting annotations"
    );

    let export = ExportAnnotationsRequest {
        is_admin_author: false,
        destination_url: request.destination_url.clone(),
        annotations,
        destination_hypothesis_group: request.destination_group.clone(),
        private_annotation: request.make_private,
    };
    let total_exported = service
        .export_annotations(credentials, export)
        .await
        .map_err(|err| fail(task, err, sink_submit))?;

    let result = TransferResult {
        total_exported,
        destination_url: request.destination_url.clone(),
        destination_group: request.destination_group.clone(),
    };
    task.dispatch(TaskAction::Finish(result.summary()));
    info!(
        operation_id = %task.operation_id(),
        total_exported,
        "export finished"
    );
    Ok(result)
}

/// Delete every annotation of a source group.
///
/// Callers invoke this only after the user confirmed the deletion.
pub async fn delete_annotations<S>(
    service: &S,
    credentials: &Credentials,
    request: &DeletionRequest,
    manuscript_name: &str,
    task: &TaskDispatcher,
) -> Result<DeletionResult, TransferFailure>
where
    S: AnnotationSource + AnnotationSink + ?Sized,
{
    task.dispatch(TaskAction::Start(DOWNLOADING_ANNOTATIONS.to_string()));
    info!(
        operation_id = %task.operation_id(),
        group = request.source_group.as_filter(),
        "downloading annotations for deletion"
    );

    let annotations = service
        .fetch_annotations(credentials, &request.source_group)
        .await
        .map_err(|err| fail(task, err, source_fetch))?;

    let downloaded = annotations.len() as u64;
    task.dispatch(TaskAction::Advance(format!(
        "Deleting {downloaded} annotation(s)..."
    )));

    let total_deleted = service
        .delete_annotations(credentials, annotations)
        .await
        .map_err(|err| fail(task, err, sink_submit))?;

    // Sink count is authoritative.
    if total_deleted != downloaded {
        warn!(
            operation_id = %task.operation_id(),
            downloaded,
            total_deleted,
            "sink deleted a different number of annotations than were downloaded"
        );
    }

    let result = DeletionResult {
        total_deleted,
        manuscript_name: manuscript_name.to_string(),
    };
    task.dispatch(TaskAction::Finish(result.summary()));
    info!(
        operation_id = %task.operation_id(),
        total_deleted,
        "deletion finished"
    );
    Ok(result)
}

/// Fetch a group's annotations as a JSON array document, e.g. for `annotations.json`.
pub async fn annotations_json<S>(
    service: &S,
    credentials: &Credentials,
    group: &GroupSelection,
) -> Result<String, AtiError>
where
    S: AnnotationSource + ?Sized,
{
    let annotations: Vec<AnnotationRecord> = service.fetch_annotations(credentials, group).await?;
    Ok(serde_json::to_string(&annotations)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::TaskSlot;
    use crate::task::{TaskState, TaskStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::watch;

    /// In-memory service that records each call with the task state seen at that moment.
    struct FakeService {
        annotations: Result<Vec<AnnotationRecord>, u16>,
        sink: Result<Option<u64>, u16>,
        observer: watch::Receiver<TaskState>,
        calls: Mutex<Vec<(&'static str, TaskState, usize)>>,
    }

    impl FakeService {
        fn new(
            slot: &TaskSlot,
            annotations: Result<usize, u16>,
            sink: Result<Option<u64>, u16>,
        ) -> Self {
            Self {
                annotations: annotations.map(|count| {
                    (0..count)
                        .map(|i| AnnotationRecord::new(serde_json::json!({ "id": i })))
                        .collect()
                }),
                sink,
                observer: slot.subscribe(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, name: &'static str, batch: usize) {
            let state = self.observer.borrow().clone();
            self.calls.lock().unwrap().push((name, state, batch));
        }

        fn calls(&self) -> Vec<(&'static str, TaskState, usize)> {
            self.calls.lock().unwrap().clone()
        }

        fn error(status: u16) -> AtiError {
            AtiError::Api {
                status,
                message: format!("upstream returned {status}"),
            }
        }
    }

    #[async_trait]
    impl AnnotationSource for FakeService {
        async fn fetch_annotations(
            &self,
            _credentials: &Credentials,
            group: &GroupSelection,
        ) -> Result<Vec<AnnotationRecord>, AtiError> {
            assert_ne!(group.as_filter(), ati_adapter::ALL_HYPOTHESIS_GROUPS_ID);
            self.record("fetch", 0);
            self.annotations.clone().map_err(Self::error)
        }
    }

    #[async_trait]
    impl AnnotationSink for FakeService {
        async fn export_annotations(
            &self,
            _credentials: &Credentials,
            request: ExportAnnotationsRequest,
        ) -> Result<u64, AtiError> {
            self.record("export", request.annotations.len());
            match self.sink {
                Ok(reported) => Ok(reported.unwrap_or(request.annotations.len() as u64)),
                Err(status) => Err(Self::error(status)),
            }
        }

        async fn delete_annotations(
            &self,
            _credentials: &Credentials,
            annotations: Vec<AnnotationRecord>,
        ) -> Result<u64, AtiError> {
            self.record("delete", annotations.len());
            match self.sink {
                Ok(reported) => Ok(reported.unwrap_or(annotations.len() as u64)),
                Err(status) => Err(Self::error(status)),
            }
        }
    }

    fn transfer_request(source: GroupSelection) -> TransferRequest {
        TransferRequest {
            source_group: source,
            destination_url: "https://example.org/paper".to_string(),
            destination_group: GroupId::new("destGroup"),
            make_private: false,
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("token")
    }

    #[tokio::test]
    async fn test_export_advances_only_after_download() {
        let mut slot = TaskSlot::new("export");
        let service = FakeService::new(&slot, Ok(3), Ok(None));
        let task = slot.begin().unwrap();

        let result = export_annotations(
            &service,
            &credentials(),
            &transfer_request(GroupSelection::Group(GroupId::new("g1"))),
            &task,
        )
        .await
        .unwrap();

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "fetch");
        assert_eq!(calls[0].1.description, DOWNLOADING_ANNOTATIONS);
        assert_eq!(calls[1].0, "export");
        assert_eq!(calls[1].1.description, EXPORTING_ANNOTATIONS);
        assert_eq!(calls[1].2, 3);

        assert_eq!(result.total_exported, 3);
        let state = slot.state();
        assert_eq!(state.status, TaskStatus::Finished);
        assert!(state.description.contains('3'));
        assert!(state.description.contains("group=destGroup"));
    }

    #[tokio::test]
    async fn test_export_empty_set_still_finishes() {
        let mut slot = TaskSlot::new("export");
        let service = FakeService::new(&slot, Ok(0), Ok(None));
        let task = slot.begin().unwrap();

        let result = export_annotations(
            &service,
            &credentials(),
            &transfer_request(GroupSelection::All),
            &task,
        )
        .await
        .unwrap();

        assert_eq!(result.total_exported, 0);
        assert_eq!(service.calls()[1].0, "export");
        assert_eq!(slot.state().status, TaskStatus::Finished);
    }

    #[tokio::test]
    async fn test_export_source_failure_never_reaches_sink() {
        let mut slot = TaskSlot::new("export");
        let service = FakeService::new(&slot, Err(500), Ok(None));
        let task = slot.begin().unwrap();

        let err = export_annotations(
            &service,
            &credentials(),
            &transfer_request(GroupSelection::All),
            &task,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TransferFailure::SourceFetch { .. }));
        assert_eq!(service.calls().len(), 1);
        let state = slot.state();
        assert_eq!(state.status, TaskStatus::Failed);
        assert_eq!(state.description, "upstream returned 500");
    }

    #[tokio::test]
    async fn test_delete_reports_sink_count() {
        let mut slot = TaskSlot::new("delete");
        let service = FakeService::new(&slot, Ok(5), Ok(Some(4)));
        let task = slot.begin().unwrap();

        let result = delete_annotations(
            &service,
            &credentials(),
            &DeletionRequest {
                source_group: GroupSelection::All,
            },
            "paper.docx",
            &task,
        )
        .await
        .unwrap();

        let calls = service.calls();
        assert_eq!(calls[1].0, "delete");
        assert_eq!(calls[1].1.description, "Deleting 5 annotation(s)...");
        assert_eq!(result.total_deleted, 4);
        assert_eq!(
            slot.state().description,
            "Deleted 4 annotation(s) from paper.docx."
        );
    }

    #[tokio::test]
    async fn test_delete_sink_failure_is_reported() {
        let mut slot = TaskSlot::new("delete");
        let service = FakeService::new(&slot, Ok(2), Err(403));
        let task = slot.begin().unwrap();

        let err = delete_annotations(
            &service,
            &credentials(),
            &DeletionRequest {
                source_group: GroupSelection::Group(GroupId::new("g1")),
            },
            "paper.docx",
            &task,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            TransferFailure::SinkSubmit {
                message: "upstream returned 403".to_string()
            }
        );
        assert_eq!(slot.state().status, TaskStatus::Failed);
        assert_eq!(service.calls()[1].2, 2);
    }

    #[tokio::test]
    async fn test_torn_down_slot_keeps_last_state() {
        let mut slot = TaskSlot::new("export");
        let service = FakeService::new(&slot, Ok(1), Ok(None));
        let task = slot.begin().unwrap();
        task.dispatch(TaskAction::Start("early".to_string()));
        slot.teardown();

        let result = export_annotations(
            &service,
            &credentials(),
            &transfer_request(GroupSelection::All),
            &task,
        )
        .await;

        // The operation itself completes; only its state updates are dropped.
        assert!(result.is_ok());
        assert_eq!(slot.state().description, "early");
    }

    #[tokio::test]
    async fn test_annotations_json_is_array() {
        let slot = TaskSlot::new("download");
        let service = FakeService::new(&slot, Ok(2), Ok(None));
        let json = annotations_json(&service, &credentials(), &GroupSelection::Group(GroupId::public()))
            .await
            .unwrap();
        assert!(json.starts_with("[{") && !json.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }
}
