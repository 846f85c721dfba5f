/*
[INPUT]:  Task actions (start, advance, finish, fail) dispatched by pipelines
[OUTPUT]: Next TaskState and its presentation severity
[POS]:    Domain layer - lifecycle of one multi-step operation
[UPDATE]: When adding task statuses or changing allowed transitions
*/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Inactive,
    Active,
    Finished,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Finished | TaskStatus::Failed)
    }
}

/// Presentation-neutral severity of a task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Begin a new operation (from inactive or a terminal state)
    Start(String),
    /// Move an active operation to its next step
    Advance(String),
    /// Complete an active operation
    Finish(String),
    /// Abort an active operation, or report a setup error while inactive
    Fail(String),
}

impl TaskAction {
    pub fn name(&self) -> &'static str {
        match self {
            TaskAction::Start(_) => "start",
            TaskAction::Advance(_) => "advance",
            TaskAction::Finish(_) => "finish",
            TaskAction::Fail(_) => "fail",
        }
    }
}

/// Lifecycle of one long-running operation.
///
/// Only moves inactive -> active -> finished | failed. An active state may be
/// re-entered to describe the next step. Terminal states change only through
/// a new `Start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub status: TaskStatus,
    pub description: String,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::inactive()
    }
}

impl TaskState {
    pub fn inactive() -> Self {
        Self {
            status: TaskStatus::Inactive,
            description: String::new(),
        }
    }

    /// Apply an action, returning the next state.
    ///
    /// Actions not allowed from the current status leave the state unchanged.
    pub fn reduce(&self, action: TaskAction) -> TaskState {
        self.try_reduce(action).unwrap_or_else(|| self.clone())
    }

    /// Like [`TaskState::reduce`], but `None` when the action is not allowed.
    pub fn try_reduce(&self, action: TaskAction) -> Option<TaskState> {
        use TaskStatus::*;

        let (status, description) = match (self.status, action) {
            (Inactive | Finished | Failed, TaskAction::Start(d)) => (Active, d),
            (Active, TaskAction::Advance(d)) => (Active, d),
            (Active, TaskAction::Finish(d)) => (Finished, d),
            (Active | Inactive, TaskAction::Fail(d)) => (Failed, d),
            _ => return None,
        };

        Some(TaskState {
            status,
            description,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Severity of a state: inactive/active are info, finished is success, failed is error.
pub fn classify(state: &TaskState) -> Severity {
    match state.status {
        TaskStatus::Inactive | TaskStatus::Active => Severity::Info,
        TaskStatus::Finished => Severity::Success,
        TaskStatus::Failed => Severity::Error,
    }
}

/// Short heading for a notification showing this state.
pub fn title(state: &TaskState) -> &'static str {
    match state.status {
        TaskStatus::Inactive => "Idle",
        TaskStatus::Active => "In progress",
        TaskStatus::Finished => "Finished",
        TaskStatus::Failed => "Failed",
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str(title(self))
        } else {
            write!(f, "{}: {}", title(self), self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn state(status: TaskStatus, description: &str) -> TaskState {
        TaskState {
            status,
            description: description.to_string(),
        }
    }

    #[rstest]
    #[case(TaskStatus::Inactive, TaskAction::Start("go".into()), Some(TaskStatus::Active))]
    #[case(TaskStatus::Finished, TaskAction::Start("go".into()), Some(TaskStatus::Active))]
    #[case(TaskStatus::Failed, TaskAction::Start("go".into()), Some(TaskStatus::Active))]
    #[case(TaskStatus::Active, TaskAction::Start("go".into()), None)]
    #[case(TaskStatus::Active, TaskAction::Advance("next".into()), Some(TaskStatus::Active))]
    #[case(TaskStatus::Inactive, TaskAction::Advance("next".into()), None)]
    #[case(TaskStatus::Finished, TaskAction::Advance("next".into()), None)]
    #[case(TaskStatus::Failed, TaskAction::Advance("next".into()), None)]
    #[case(TaskStatus::Active, TaskAction::Finish("done".into()), Some(TaskStatus::Finished))]
    #[case(TaskStatus::Inactive, TaskAction::Finish("done".into()), None)]
    #[case(TaskStatus::Finished, TaskAction::Finish("done".into()), None)]
    #[case(TaskStatus::Failed, TaskAction::Finish("done".into()), None)]
    #[case(TaskStatus::Active, TaskAction::Fail("boom".into()), Some(TaskStatus::Failed))]
    #[case(TaskStatus::Inactive, TaskAction::Fail("boom".into()), Some(TaskStatus::Failed))]
    #[case(TaskStatus::Finished, TaskAction::Fail("boom".into()), None)]
    #[case(TaskStatus::Failed, TaskAction::Fail("boom".into()), None)]
    fn test_transition_table(
        #[case] from: TaskStatus,
        #[case] action: TaskAction,
        #[case] expected: Option<TaskStatus>,
    ) {
        let before = state(from, "before");
        let next = before.try_reduce(action.clone());
        assert_eq!(next.as_ref().map(|s| s.status), expected);

        let reduced = before.reduce(action);
        match expected {
            Some(status) => assert_eq!(reduced.status, status),
            None => assert_eq!(reduced, before),
        }
    }

    #[test]
    fn test_description_follows_action() {
        let s = TaskState::inactive()
            .reduce(TaskAction::Start("Downloading annotations...".into()))
            .reduce(TaskAction::Advance("Exporting annotations...".into()));
        assert_eq!(s.status, TaskStatus::Active);
        assert_eq!(s.description, "Exporting annotations...");

        let s = s.reduce(TaskAction::Finish("Exported 3 annotation(s)".into()));
        assert!(s.is_terminal());
        assert_eq!(s.description, "Exported 3 annotation(s)");
    }

    #[test]
    fn test_terminal_needs_new_start() {
        let finished = state(TaskStatus::Finished, "done");
        let s = finished
            .reduce(TaskAction::Advance("sneaky".into()))
            .reduce(TaskAction::Finish("again".into()));
        assert_eq!(s, finished);

        let restarted = s.reduce(TaskAction::Start("fresh".into()));
        assert!(restarted.is_active());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&TaskState::inactive()), Severity::Info);
        assert_eq!(classify(&state(TaskStatus::Active, "x")), Severity::Info);
        assert_eq!(classify(&state(TaskStatus::Finished, "x")), Severity::Success);
        assert_eq!(classify(&state(TaskStatus::Failed, "x")), Severity::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskState::inactive().to_string(), "Idle");
        assert_eq!(
            state(TaskStatus::Failed, "Bad Gateway").to_string(),
            "Failed: Bad Gateway"
        );
    }
}
