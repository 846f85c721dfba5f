/*
[INPUT]:  Manuscript file or id, session credentials, a TaskDispatcher
[OUTPUT]: TaskState updates and the uploaded/deleted manuscript id
[POS]:    Execution layer - manuscript upload and removal flows
[UPDATE]: When manuscript steps or their progress text change
*/

use ati_adapter::{Credentials, ManuscriptUpload};
use tracing::info;

use crate::pipeline::{TransferFailure, fail};
use crate::service::ManuscriptStore;
use crate::slot::TaskDispatcher;
use crate::task::TaskAction;

pub const UPLOADING_MANUSCRIPT: &str = "Uploading manuscript...";
pub const PROCESSING_MANUSCRIPT: &str = "Processing manuscript...";
pub const DELETING_MANUSCRIPT: &str = "Deleting manuscript...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub manuscript_id: u64,
    pub file_name: String,
}

/// Upload a manuscript, then ask the backend to process it.
pub async fn upload_manuscript<S>(
    store: &S,
    credentials: &Credentials,
    upload: ManuscriptUpload,
    task: &TaskDispatcher,
) -> Result<UploadResult, TransferFailure>
where
    S: ManuscriptStore + ?Sized,
{
    task.dispatch(TaskAction::Start(UPLOADING_MANUSCRIPT.to_string()));
    let file_name = upload.file_name.clone();
    info!(
        operation_id = %task.operation_id(),
        file_name = %file_name,
        bytes = upload.bytes.len(),
        "uploading manuscript"
    );

    let manuscript_id = store
        .upload_manuscript(credentials, upload)
        .await
        .map_err(|err| fail(task, err, |message| TransferFailure::ManuscriptUpload { message }))?;

    task.dispatch(TaskAction::Advance(PROCESSING_MANUSCRIPT.to_string()));
    store
        .process_manuscript(credentials, manuscript_id)
        .await
        .map_err(|err| {
            fail(task, err, |message| TransferFailure::ManuscriptProcessing { message })
        })?;

    task.dispatch(TaskAction::Finish(format!(
        "Uploaded manuscript {file_name}."
    )));
    info!(operation_id = %task.operation_id(), manuscript_id, "manuscript uploaded");
    Ok(UploadResult {
        manuscript_id,
        file_name,
    })
}

/// Remove the project's manuscript file.
pub async fn delete_manuscript<S>(
    store: &S,
    credentials: &Credentials,
    manuscript_id: &str,
    task: &TaskDispatcher,
) -> Result<(), TransferFailure>
where
    S: ManuscriptStore + ?Sized,
{
    task.dispatch(TaskAction::Start(DELETING_MANUSCRIPT.to_string()));
    store
        .delete_manuscript(credentials, manuscript_id)
        .await
        .map_err(|err| fail(task, err, |message| TransferFailure::ManuscriptDelete { message }))?;

    task.dispatch(TaskAction::Finish(format!(
        "Deleted manuscript {manuscript_id}."
    )));
    info!(operation_id = %task.operation_id(), manuscript_id, "manuscript deleted");
    Ok(())
}
