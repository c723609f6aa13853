//! Client core for the RAGmail generation workflow: the HTTP client for the
//! generation service, the single-writer view state, the submission
//! controller, and the result presenter.

pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod presenter;
pub mod view_state;

pub use config::{load_settings, ClientSettings};
pub use controller::{PendingSubmission, RequestToken, Settlement, SubmissionController};
pub use error::{GenerationError, SettingsError, SubmitError};
pub use generation::{GenerationBackend, HttpGenerationClient};
pub use presenter::{
    export_file_name, render_plain, select_view, ClipboardWriter, CopiedIndicator, ExportFile,
    PreviewView, ResultPresenter, COPY_FEEDBACK_WINDOW,
};
pub use view_state::{ViewState, ViewStateReader, ViewStateStore};
