/*
[INPUT]:  Public API exports for ati-transfer crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod forms;
pub mod manuscript;
pub mod pipeline;
pub mod service;
pub mod slot;
pub mod task;

// Re-export main types for convenience
pub use config::AtiConfig;
pub use forms::{AnnotationForms, DeleteJob, ExportJob};
pub use pipeline::{
    DeletionRequest, DeletionResult, TransferFailure, TransferRequest, TransferResult,
};
pub use service::{AnnotationSink, AnnotationSource, DatasetService, ManuscriptStore};
pub use slot::{SlotError, TaskDispatcher, TaskSlot};
pub use task::{Severity, TaskAction, TaskState, TaskStatus, classify};
