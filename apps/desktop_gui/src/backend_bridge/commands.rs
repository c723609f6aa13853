//! Backend commands queued from UI to backend worker.

use client_core::PendingSubmission;

pub enum BackendCommand {
    /// An accepted submission; the worker drives it to settlement.
    Submit(PendingSubmission),
    CheckHealth,
    ListProjects,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit(_) => "submit",
            BackendCommand::CheckHealth => "check_health",
            BackendCommand::ListProjects => "list_projects",
        }
    }
}
