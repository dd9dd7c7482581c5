//! Record use-case services.
//!
//! # Responsibility
//! - Own each entity type's in-memory collection and keep it in step with
//!   server responses.
//! - Turn API failures into displayable, per-operation messages.
//!
//! # Invariants
//! - Local state changes only after the server confirms a mutation.
//! - No operation retries; every failure ends that user action.

pub mod collection;
pub mod creation_form;
pub mod operation;
