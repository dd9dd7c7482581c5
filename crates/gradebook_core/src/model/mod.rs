//! Record shapes exchanged with the remote records API.
//!
//! # Responsibility
//! - Define the three entity kinds (student, subject, assignment).
//! - Describe each kind's resource path and editable fields in one place so
//!   controllers and forms stay generic.
//!
//! # Invariants
//! - Every record is identified by a server-assigned `RecordId`.
//! - Child records carry a back-reference to their owning parent.
//!
//! # See also
//! - `service::collection` for the in-memory collection contract.

pub mod assignment;
mod decimal;
pub mod resource;
pub mod student;
pub mod subject;
