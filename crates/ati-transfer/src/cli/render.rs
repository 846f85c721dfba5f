/*
[INPUT]:  TaskState snapshots and watch receivers
[OUTPUT]: Styled status lines on stdout
[POS]:    CLI presentation layer - inline task notifications
[UPDATE]: When changing how task progress is displayed
*/

use console::style;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use ati_transfer::task::{self, Severity, TaskState};

pub fn render_state(state: &TaskState) -> String {
    let heading = task::title(state);
    let heading = match task::classify(state) {
        Severity::Info => style(heading).cyan(),
        Severity::Success => style(heading).green(),
        Severity::Error => style(heading).red(),
    }
    .bold();

    if state.description.is_empty() {
        heading.to_string()
    } else {
        format!("{heading} {}", state.description)
    }
}

/// Print each step of an operation until its task state is dropped.
///
/// Terminal states are left to the caller, which prints them once the job returns.
pub fn spawn_progress(mut rx: watch::Receiver<TaskState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.is_active() {
                println!("{}", render_state(&state));
            }
        }
    })
}
