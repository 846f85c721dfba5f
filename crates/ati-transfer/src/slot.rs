/*
[INPUT]:  Form-level submit/teardown calls and pipeline dispatches
[OUTPUT]: Owned TaskState per form, revocable dispatchers, state watch channel
[POS]:    Execution layer - ownership and liveness of task state
[UPDATE]: When changing submission rules or stale-update handling
*/

use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::task::{TaskAction, TaskState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("a {slot} operation is already in progress")]
    AlreadyActive { slot: &'static str },

    #[error("no {slot} operation is awaiting confirmation")]
    NothingPending { slot: &'static str },

    #[error("the {slot} form has been closed")]
    TornDown { slot: &'static str },
}

/// Owner of one form's [`TaskState`].
///
/// Hands out a [`TaskDispatcher`] per operation. A new operation is refused
/// while the state is active or while the previous dispatcher is still held,
/// even if its job has not started yet. Dispatchers of a slot that has been
/// torn down are revoked and their updates are dropped.
#[derive(Debug)]
pub struct TaskSlot {
    name: &'static str,
    state_tx: Arc<watch::Sender<TaskState>>,
    liveness: CancellationToken,
    /// Held by every clone of the current dispatcher.
    lease: Weak<()>,
}

impl TaskSlot {
    pub fn new(name: &'static str) -> Self {
        let (state_tx, _) = watch::channel(TaskState::inactive());
        Self {
            name,
            state_tx: Arc::new(state_tx),
            liveness: CancellationToken::new(),
            lease: Weak::new(),
        }
    }

    pub fn state(&self) -> TaskState {
        self.state_tx.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.state_tx.borrow().is_active()
    }

    /// Active, or a dispatcher for an operation is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.is_active() || self.lease.strong_count() > 0
    }

    /// Observe state changes, e.g. to render progress.
    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state_tx.subscribe()
    }

    /// Start a new operation on this slot.
    ///
    /// The previous state is replaced by a fresh inactive one.
    pub fn begin(&mut self) -> Result<TaskDispatcher, SlotError> {
        if self.liveness.is_cancelled() {
            return Err(SlotError::TornDown { slot: self.name });
        }
        if self.is_busy() {
            return Err(SlotError::AlreadyActive { slot: self.name });
        }

        let lease = Arc::new(());
        self.lease = Arc::downgrade(&lease);
        self.state_tx.send_replace(TaskState::inactive());

        let dispatcher = TaskDispatcher {
            slot: self.name,
            operation_id: Uuid::new_v4(),
            state_tx: self.state_tx.clone(),
            liveness: self.liveness.child_token(),
            _lease: lease,
        };
        tracing::debug!(
            slot = self.name,
            operation_id = %dispatcher.operation_id,
            "task slot issued dispatcher"
        );
        Ok(dispatcher)
    }

    /// Revoke all dispatchers; later updates from in-flight operations are dropped.
    pub fn teardown(&mut self) {
        self.liveness.cancel();
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.liveness.cancel();
    }
}

/// One operation's right to mutate a [`TaskSlot`].
#[derive(Debug, Clone)]
pub struct TaskDispatcher {
    slot: &'static str,
    operation_id: Uuid,
    state_tx: Arc<watch::Sender<TaskState>>,
    liveness: CancellationToken,
    _lease: Arc<()>,
}

impl TaskDispatcher {
    pub fn slot(&self) -> &'static str {
        self.slot
    }

    pub fn operation_id(&self) -> Uuid {
        self.operation_id
    }

    pub fn is_live(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    pub fn state(&self) -> TaskState {
        self.state_tx.borrow().clone()
    }

    /// Apply an action to the slot's state.
    ///
    /// Returns `false` when the update was dropped, either because the
    /// dispatcher was revoked or because the action is not allowed from the
    /// current status.
    pub fn dispatch(&self, action: TaskAction) -> bool {
        if !self.is_live() {
            tracing::debug!(
                slot = self.slot,
                operation_id = %self.operation_id,
                action = action.name(),
                "discarding update from revoked dispatcher"
            );
            return false;
        }

        let action_name = action.name();
        let applied = self.state_tx.send_if_modified(|state| match state.try_reduce(action) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        });

        if applied {
            let state = self.state_tx.borrow();
            tracing::debug!(
                slot = self.slot,
                operation_id = %self.operation_id,
                action = action_name,
                status = ?state.status,
                description = %state.description,
                "task state updated"
            );
        } else {
            tracing::warn!(
                slot = self.slot,
                operation_id = %self.operation_id,
                action = action_name,
                "ignored task action not allowed from current status"
            );
        }
        applied
    }
}
