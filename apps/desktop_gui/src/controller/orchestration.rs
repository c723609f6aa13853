//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker. A command that cannot be queued is
/// dropped here; for a submission that also clears its pending flag.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
        }
    }
}
