//! Field-level validation rules for the entity kinds.
//!
//! Constraint checks produce [`Violation`]s attributed to a field path. The
//! filename length rule is separate: it reports plain messages because the
//! upload resolver runs it after general entity validation.

use crate::content::{FileEntity, Node};
use crate::outcome::Violation;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const URI_MAX_LENGTH: usize = 255;

pub const CODE_NOT_BLANK: &str = "NOT_BLANK";
pub const CODE_TOO_LONG: &str = "TOO_LONG";
pub const CODE_INVALID_URI: &str = "INVALID_URI";
pub const CODE_NOT_UNIQUE: &str = "NOT_UNIQUE";

/// URI schemes the local file system knows how to resolve.
pub const KNOWN_SCHEMES: &[&str] = &["public"];

pub fn not_blank(path: &str, value: &str) -> Option<Violation> {
    if value.trim().is_empty() {
        Some(Violation::new(path, "This value should not be null.").with_code(CODE_NOT_BLANK))
    } else {
        None
    }
}

pub fn max_length(path: &str, value: &str, max: usize) -> Option<Violation> {
    if value.chars().count() > max {
        Some(
            Violation::new(
                path,
                format!(
                    "This value is too long. It should have {} characters or less.",
                    max
                ),
            )
            .with_code(CODE_TOO_LONG),
        )
    } else {
        None
    }
}

pub fn validate_node(node: &Node) -> Vec<Violation> {
    [
        not_blank("title", &node.title),
        max_length("title", &node.title, TITLE_MAX_LENGTH),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Checks that need no storage access. URI uniqueness is checked by the store.
pub fn validate_file(file: &FileEntity) -> Vec<Violation> {
    let mut violations: Vec<Violation> = [
        not_blank("filename", &file.filename),
        not_blank("uri", &file.uri),
        max_length("uri", &file.uri, URI_MAX_LENGTH),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !file.uri.is_empty() && !has_known_scheme(&file.uri) {
        violations.push(
            Violation::new(
                "uri",
                format!("The URI {} does not use a known scheme.", file.uri),
            )
            .with_code(CODE_INVALID_URI),
        );
    }

    violations
}

pub fn uri_not_unique(uri: &str) -> Violation {
    Violation::new(
        "uri",
        format!("The file {} already exists. Enter a unique file URI.", uri),
    )
    .with_code(CODE_NOT_UNIQUE)
}

fn has_known_scheme(uri: &str) -> bool {
    uri.split_once("://")
        .map(|(scheme, _)| KNOWN_SCHEMES.contains(&scheme))
        .unwrap_or(false)
}

/// Filename length rule applied to uploads.
pub fn validate_name_length(file: &FileEntity, max: usize) -> Vec<String> {
    let mut errors = Vec::new();
    if file.filename.is_empty() {
        errors.push("The file's name is empty. Please give a name to the file.".to_string());
    }
    if file.filename.chars().count() > max {
        errors.push(format!(
            "The file's name exceeds the {} characters limit. Please rename the file and try again.",
            max
        ));
    }
    errors
}
