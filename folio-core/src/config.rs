use std::path::PathBuf;

use crate::auth::Actor;

pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 2 * 1024 * 1024;
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 240;

/// Runtime configuration shared by the store, the file system and the
/// resolvers. Defaults suit a local SQLite database next to a `files/`
/// directory.
#[derive(Debug, Clone)]
pub struct FolioConfig {
    pub database_url: String,
    /// Directory backing the `public://` scheme.
    pub public_dir: PathBuf,
    /// Directory inbound transfers are staged in before validation.
    pub upload_tmp_dir: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_upload_size: u64,
    pub max_filename_length: usize,
    /// Mode applied to files after they are moved into `public://`.
    pub file_mode: u32,
    pub default_body_format: String,
    /// Permissions granted to requests that carry no identity.
    pub anonymous_permissions: Vec<String>,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://folio.db?mode=rwc".to_string(),
            public_dir: PathBuf::from("files"),
            upload_tmp_dir: std::env::temp_dir().join("folio-uploads"),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
            file_mode: 0o664,
            default_body_format: "basic_html".to_string(),
            anonymous_permissions: vec!["access content".to_string()],
        }
    }
}

impl FolioConfig {
    /// Defaults overridden by any `FOLIO_*` environment variables that are set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("FOLIO_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(dir) = std::env::var("FOLIO_PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("FOLIO_UPLOAD_TMP_DIR") {
            config.upload_tmp_dir = PathBuf::from(dir);
        }
        if let Some(size) = env_parse::<u64>("FOLIO_MAX_UPLOAD_SIZE") {
            config.max_upload_size = size;
        }
        if let Some(length) = env_parse::<usize>("FOLIO_MAX_FILENAME_LENGTH") {
            config.max_filename_length = length;
        }
        if let Ok(mode) = std::env::var("FOLIO_FILE_MODE") {
            match u32::from_str_radix(mode.trim_start_matches("0o"), 8) {
                Ok(mode) => config.file_mode = mode,
                Err(_) => tracing::warn!("Ignoring invalid FOLIO_FILE_MODE '{}'", mode),
            }
        }
        if let Ok(permissions) = std::env::var("FOLIO_ANONYMOUS_PERMISSIONS") {
            config.anonymous_permissions = parse_permission_list(&permissions);
        }

        config
    }

    /// Identity used for requests that do not carry one.
    pub fn anonymous_actor(&self) -> Actor {
        Actor::anonymous().with_permissions(self.anonymous_permissions.iter().cloned())
    }
}

/// Splits a comma separated permission list, dropping blanks.
pub fn parse_permission_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|permission| !permission.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring invalid {} '{}'", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_list_ignores_blanks() {
        assert_eq!(
            parse_permission_list("access content, create files,, "),
            vec!["access content".to_string(), "create files".to_string()]
        );
    }

    #[test]
    fn anonymous_actor_gets_configured_permissions() {
        let config = FolioConfig {
            anonymous_permissions: vec!["create article content".to_string()],
            ..FolioConfig::default()
        };
        let actor = config.anonymous_actor();
        assert!(actor.user_id.is_none());
        assert!(actor.has_permission("create article content"));
        assert!(!actor.has_permission("access content"));
    }
}
