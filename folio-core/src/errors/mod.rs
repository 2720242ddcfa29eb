//! Error types for folio-core
//!
//! Resolvers report expected failures (access denial, validation violations,
//! rejected uploads) through [`crate::outcome::CrudOutcome`]. Everything else
//! is a [`CoreError`], categorised by [`CoreErrorKind`] so the GraphQL layer can
//! attach a stable error code.

mod core_error;

pub use core_error::{CoreError, CoreErrorKind, CoreResult};
