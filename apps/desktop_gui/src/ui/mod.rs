//! UI layer for desktop GUI: the form and preview panels.

pub mod app;

pub use app::{RagmailApp, StartupConfig};
