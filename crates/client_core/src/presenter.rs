//! Result presenter: view selection over [`ViewState`] plus the copy and
//! download export actions.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use shared::protocol::GenerationResult;

use crate::view_state::ViewState;

pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

pub const PENDING_HEADLINE: &str = "AI is generating your email...";
pub const PENDING_HINT: &str = "This may take a few seconds";
pub const IDLE_HEADLINE: &str = "Email Preview";
pub const IDLE_HINT: &str =
    "Fill out the form and click \"Generate Email\" to see your personalized email here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewView<'a> {
    Pending,
    Idle,
    Populated(&'a GenerationResult),
}

/// Pending wins over everything, then the empty placeholder, then the result.
pub fn select_view(state: &ViewState) -> PreviewView<'_> {
    if state.is_pending {
        return PreviewView::Pending;
    }
    match state.result.as_deref() {
        None => PreviewView::Idle,
        Some(result) => PreviewView::Populated(result),
    }
}

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// One-shot "copied" flag that reverts on its own once the window elapses.
/// Triggering again restarts the window.
#[derive(Debug, Clone)]
pub struct CopiedIndicator {
    window: Duration,
    until: Option<Instant>,
}

impl CopiedIndicator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + self.window);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Time left before reverting; `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.until
            .and_then(|until| until.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: &Path) -> Result<()> {
        fs::write(path, self.contents.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

pub fn export_file_name(selected_project: &str, date: NaiveDate) -> String {
    format!("email_{selected_project}_{}.txt", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone)]
pub struct ResultPresenter {
    copied: CopiedIndicator,
}

impl Default for ResultPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::with_copy_window(COPY_FEEDBACK_WINDOW)
    }

    pub fn with_copy_window(window: Duration) -> Self {
        Self {
            copied: CopiedIndicator::new(window),
        }
    }

    pub fn view<'a>(&self, state: &'a ViewState) -> PreviewView<'a> {
        select_view(state)
    }

    /// Copies the email body. Returns `false` when there is nothing to copy.
    /// The indicator only turns on after the clipboard accepted the text.
    pub fn copy(
        &mut self,
        state: &ViewState,
        clipboard: &mut dyn ClipboardWriter,
        now: Instant,
    ) -> Result<bool> {
        let PreviewView::Populated(result) = select_view(state) else {
            return Ok(false);
        };
        clipboard.write_text(&result.email)?;
        self.copied.trigger(now);
        Ok(true)
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied.is_active(now)
    }

    pub fn copied_remaining(&self, now: Instant) -> Option<Duration> {
        self.copied.remaining(now)
    }

    /// Export for the date the user asked on. `None` when there is no result.
    pub fn download(&self, state: &ViewState, today: NaiveDate) -> Option<ExportFile> {
        let PreviewView::Populated(result) = select_view(state) else {
            return None;
        };
        Some(ExportFile {
            file_name: export_file_name(&result.selected_project, today),
            contents: result.email.clone(),
        })
    }

    pub fn download_now(&self, state: &ViewState) -> Option<ExportFile> {
        self.download(state, Utc::now().date_naive())
    }
}

/// Plain-text rendering of a preview, used by terminal front ends.
pub fn render_plain(view: PreviewView<'_>) -> String {
    match view {
        PreviewView::Pending => format!("{PENDING_HEADLINE}\n{PENDING_HINT}\n"),
        PreviewView::Idle => format!("{IDLE_HEADLINE}\n{IDLE_HINT}\n"),
        PreviewView::Populated(result) => {
            let mut out = format!(
                "Selected Project: {}\nRelevance: {}/10\n\n{}\n",
                result.selected_project, result.relevance_score, result.email
            );
            if let Some(message) = result.status_message() {
                out.push_str(&format!("\n✓ {message}\n"));
            }
            out
        }
    }
}
