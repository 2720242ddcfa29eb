pub mod auth;
pub mod config;
pub mod content;
pub mod database;
pub mod errors;
pub mod files;
pub mod mutations;
pub mod outcome;
pub mod store;
pub mod validation;

pub use config::FolioConfig;
pub use errors::{CoreError, CoreErrorKind, CoreResult};
pub use outcome::{CrudOutcome, Violation};
