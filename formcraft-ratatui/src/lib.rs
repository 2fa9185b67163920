//! # formcraft-ratatui
//!
//! Terminal front-end for formcraft.
//!
//! The editor screen lists every question as a block. Questions are added, renamed,
//! retyped through a dropdown, reordered and deleted with single keys; the dropdown
//! also closes on a click anywhere outside it. `p` switches to a preview that shows the
//! whole form with a live completion gauge, and submitting either marks the offending
//! fields or shows the recorded responses.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use formcraft::{EditorOptions, FormEditor, Session};
//! use formcraft_ratatui::TuiApp;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut session = Session::new(FormEditor::new(), EditorOptions::new());
//!     TuiApp::new().with_title("Signup form").run(&mut session)?;
//!     if let Some(submission) = session.last_submission() {
//!         println!("{}", submission.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! `TuiApp` also implements [`formcraft::RespondentBackend`], so a finished form can be
//! filled in without the editor via [`formcraft::collect_submission`].

mod app;
mod backend;
mod editor_view;
mod form_view;
mod input;
mod terminal;
mod theme;

pub use app::TuiApp;
pub use theme::Theme;

/// Error type for the terminal front-end.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// The respondent left the form (Esc).
    #[error("Form cancelled by user")]
    Cancelled,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
