//! Configuration types.

use std::path::PathBuf;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Path to the local rule/criteria database.
    pub db_path: PathBuf,
    /// Default provider query for fetch passes.
    pub default_query: String,
    /// Maximum messages fetched per pass.
    pub max_results: u32,
    /// Restrict fetch passes to unread messages.
    pub unread_only: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/mail-assist.db"),
            default_query: String::new(),
            max_results: 200,
            unread_only: false,
        }
    }
}

impl AssistantConfig {
    /// Build configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `MAIL_ASSIST_DB_PATH`, `MAIL_ASSIST_QUERY`,
    /// `MAIL_ASSIST_MAX_RESULTS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var("MAIL_ASSIST_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            default_query: std::env::var("MAIL_ASSIST_QUERY").unwrap_or(defaults.default_query),
            max_results: std::env::var("MAIL_ASSIST_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_results),
            unread_only: defaults.unread_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AssistantConfig::default();
        assert_eq!(config.max_results, 200);
        assert!(!config.unread_only);
        assert!(config.db_path.to_string_lossy().ends_with("mail-assist.db"));
    }
}
