/*
[INPUT]:  User submissions for export/delete, confirmation decisions
[OUTPUT]: Runnable jobs bound to the form's TaskSlot
[POS]:    Application layer - export/delete forms and the deletion confirmation gate
[UPDATE]: When forms gain fields or submission rules change
*/

use std::sync::Arc;

use ati_adapter::Credentials;
use tokio::sync::watch;

use crate::pipeline::{
    DeletionRequest, DeletionResult, TransferFailure, TransferRequest, TransferResult,
    delete_annotations, export_annotations,
};
use crate::service::{AnnotationSink, AnnotationSource};
use crate::slot::{SlotError, TaskDispatcher, TaskSlot};
use crate::task::TaskState;

pub const EXPORT_SLOT: &str = "export";
pub const DELETE_SLOT: &str = "delete";

/// Export and delete forms of one ATI project.
///
/// Each form owns its own task state, so an export and a deletion may run at
/// the same time, but neither form accepts a second submission while its own
/// job is outstanding or running. Deletion is two-phase: `submit_delete` only stages the
/// request, and nothing runs until `confirm_delete`.
#[derive(Debug)]
pub struct AnnotationForms<S: ?Sized> {
    service: Arc<S>,
    credentials: Credentials,
    manuscript_name: String,
    export_task: TaskSlot,
    delete_task: TaskSlot,
    pending_deletion: Option<DeletionRequest>,
}

impl<S> AnnotationForms<S>
where
    S: AnnotationSource + AnnotationSink + ?Sized,
{
    pub fn new(service: Arc<S>, credentials: Credentials, manuscript_name: impl Into<String>) -> Self {
        Self {
            service,
            credentials,
            manuscript_name: manuscript_name.into(),
            export_task: TaskSlot::new(EXPORT_SLOT),
            delete_task: TaskSlot::new(DELETE_SLOT),
            pending_deletion: None,
        }
    }

    pub fn export_state(&self) -> TaskState {
        self.export_task.state()
    }

    pub fn delete_state(&self) -> TaskState {
        self.delete_task.state()
    }

    pub fn watch_export(&self) -> watch::Receiver<TaskState> {
        self.export_task.subscribe()
    }

    pub fn watch_delete(&self) -> watch::Receiver<TaskState> {
        self.delete_task.subscribe()
    }

    pub fn submit_export(&mut self, request: TransferRequest) -> Result<ExportJob<S>, SlotError> {
        let task = self.export_task.begin()?;
        Ok(ExportJob {
            service: self.service.clone(),
            credentials: self.credentials.clone(),
            request,
            task,
        })
    }

    /// Stage a deletion until the user confirms it.
    pub fn submit_delete(&mut self, request: DeletionRequest) -> Result<(), SlotError> {
        if self.delete_task.is_busy() {
            return Err(SlotError::AlreadyActive { slot: DELETE_SLOT });
        }
        self.pending_deletion = Some(request);
        Ok(())
    }

    pub fn pending_deletion(&self) -> Option<&DeletionRequest> {
        self.pending_deletion.as_ref()
    }

    /// Prompt shown before a staged deletion runs.
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Delete annotations from {}? This cannot be undone.",
            self.manuscript_name
        )
    }

    /// Drop the staged deletion. The delete task is left untouched.
    pub fn cancel_delete(&mut self) -> Option<DeletionRequest> {
        self.pending_deletion.take()
    }

    pub fn confirm_delete(&mut self) -> Result<DeleteJob<S>, SlotError> {
        let Some(request) = self.pending_deletion.take() else {
            return Err(SlotError::NothingPending { slot: DELETE_SLOT });
        };
        let task = match self.delete_task.begin() {
            Ok(task) => task,
            Err(err) => {
                self.pending_deletion = Some(request);
                return Err(err);
            }
        };
        Ok(DeleteJob {
            service: self.service.clone(),
            credentials: self.credentials.clone(),
            manuscript_name: self.manuscript_name.clone(),
            request,
            task,
        })
    }

    /// Close both forms; updates from operations still in flight are dropped.
    pub fn teardown(&mut self) {
        self.pending_deletion = None;
        self.export_task.teardown();
        self.delete_task.teardown();
    }
}

/// Export bound to the export form's task state.
#[must_use = "a job does nothing until run"]
pub struct ExportJob<S: ?Sized> {
    service: Arc<S>,
    credentials: Credentials,
    request: TransferRequest,
    task: TaskDispatcher,
}

impl<S> ExportJob<S>
where
    S: AnnotationSource + AnnotationSink + ?Sized,
{
    pub async fn run(self) -> Result<TransferResult, TransferFailure> {
        export_annotations(&*self.service, &self.credentials, &self.request, &self.task).await
    }
}

/// Confirmed deletion bound to the delete form's task state.
#[must_use = "a job does nothing until run"]
pub struct DeleteJob<S: ?Sized> {
    service: Arc<S>,
    credentials: Credentials,
    manuscript_name: String,
    request: DeletionRequest,
    task: TaskDispatcher,
}

impl<S> DeleteJob<S>
where
    S: AnnotationSource + AnnotationSink + ?Sized,
{
    pub async fn run(self) -> Result<DeletionResult, TransferFailure> {
        delete_annotations(
            &*self.service,
            &self.credentials,
            &self.request,
            &self.manuscript_name,
            &self.task,
        )
        .await
    }
}
