//! Inline field editing.
//!
//! # Responsibility
//! - Own the display/edit/save state of one field, inside a table cell or
//!   standalone.
//!
//! # Invariants
//! - The editor instance is the only owner of "is this field being edited".
//! - The editor never performs I/O; commits are handed to a caller-supplied
//!   save operation.

pub mod field_editor;
