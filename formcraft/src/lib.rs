//! # formcraft
//!
//! Compose typed forms, preview them and collect validated responses. UI-agnostic.
//!
//! A [`FormEditor`] owns an ordered list of questions of five kinds (short answer, long
//! answer, single select, number, URL) and applies id-addressed edits. A [`Session`]
//! moves between editing and previewing; a [`Preview`] collects answers, reports live
//! completion and validates everything on submit.
//!
//! ## Usage
//!
//! ```rust
//! use formcraft::{EditorOptions, FormEditor, QuestionPatch, QuestionType, Session};
//!
//! let mut editor = FormEditor::new();
//! let colour = editor.append(QuestionType::SingleSelect);
//! editor.update_by_id(
//!     &colour,
//!     QuestionPatch::new()
//!         .prompt("Favourite colour?")
//!         .required(true)
//!         .options(vec!["Red".into(), "Blue".into()]),
//! );
//!
//! let mut session = Session::new(editor, EditorOptions::new());
//! let preview = session.start_preview();
//! assert_eq!(preview.completion(), 0);
//! preview.set_response(colour, "Blue");
//! assert_eq!(preview.completion(), 100);
//! assert!(session.submit().is_ok());
//! ```
//!
//! ## Backends
//!
//! Front-ends implement [`RespondentBackend`]. [`TestBackend`] answers from a script;
//! `formcraft-ratatui` provides a terminal UI.

// Re-export all types from formcraft-types
pub use formcraft_types::*;

mod options;
pub use options::{EditorOptions, TypeChangePolicy};

mod patch;
pub use patch::QuestionPatch;

mod editor;
pub use editor::{FormEditor, UNTITLED};

mod session;
pub use session::{Mode, ModeKind, Preview, Session, Submission};

mod dropdown;
pub use dropdown::{Dropdown, ListenerControl, ListenerGuard, ListenerRegistry, Point, Region};

mod backend;
pub use backend::{RespondentBackend, Validator, collect_submission};

// Test backend for filling in forms without user interaction
mod test_backend;
pub use test_backend::{TestBackend, TestBackendError};
