//! The editing step: a template buffer opened in the user's editor

pub mod launch;
pub mod template;

pub use launch::{open_editor, resolve_editor, EditorCommand, EditorSource, FALLBACK_EDITORS};
pub use template::{create_template, render_template};
