//! Shared types for the bakery ordering backend.

mod types;

pub use types::DocumentId;
