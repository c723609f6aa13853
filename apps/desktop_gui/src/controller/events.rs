//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{GenerationError, RequestToken, Settlement};
use shared::protocol::{HealthStatus, ProjectSummary};

pub enum UiEvent {
    Settled {
        token: RequestToken,
        settlement: Settlement,
    },
    HealthChecked(HealthStatus),
    ProjectsLoaded(Vec<ProjectSummary>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Service,
    Validation,
    /// Local platform failure: runtime startup, clipboard, file system.
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    HealthCheck,
    ListProjects,
    Clipboard,
    Export,
}

impl UiErrorContext {
    fn category(self) -> UiErrorCategory {
        match self {
            Self::HealthCheck | Self::ListProjects => UiErrorCategory::Transport,
            Self::BackendStartup | Self::Clipboard | Self::Export => UiErrorCategory::System,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: context.category(),
            context,
            message: message.into(),
        }
    }

    pub fn from_generation(context: UiErrorContext, err: &GenerationError) -> Self {
        let category = match err {
            GenerationError::Transport(_) => UiErrorCategory::Transport,
            GenerationError::Service { .. } => UiErrorCategory::Service,
            GenerationError::Parse(_) | GenerationError::Url(_) => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line status text, e.g. "Project catalog unavailable (transport): ...".
    pub fn status_line(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Backend worker failed to start",
            UiErrorContext::HealthCheck => "Service health check failed",
            UiErrorContext::ListProjects => "Project catalog unavailable",
            UiErrorContext::Clipboard => "Copy failed",
            UiErrorContext::Export => "Download failed",
        };
        let kind = match self.category {
            UiErrorCategory::Transport => "transport",
            UiErrorCategory::Service => "service",
            UiErrorCategory::Validation => "validation",
            UiErrorCategory::System => "system",
        };
        format!("{what} ({kind}): {}", self.message)
    }
}
