// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAXIMUM_TAG_LENGTH_LIMIT: usize = 255;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SiteConfig {
    /// Prefix for every generated URL when the forum is mounted below `/`.
    #[serde(default)]
    pub relative_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TagsConfig {
    #[serde(default = "default_maximum_tag_length")]
    pub maximum_tag_length: usize,
}

fn default_maximum_tag_length() -> usize {
    crate::tags::sanitize::DEFAULT_MAXIMUM_TAG_LENGTH
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            maximum_tag_length: default_maximum_tag_length(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FeedsConfig {
    #[serde(default)]
    pub disable_rss: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaginationConfig {
    #[serde(default = "default_topics_per_page")]
    pub topics_per_page: u64,
    #[serde(default = "default_max_topics_per_page")]
    pub max_topics_per_page: u64,
}

fn default_topics_per_page() -> u64 {
    20
}

fn default_max_topics_per_page() -> u64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            topics_per_page: default_topics_per_page(),
            max_topics_per_page: default_max_topics_per_page(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CollaboratorsConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    /// Header set by an authenticating proxy carrying the viewer's uid.
    /// When absent every request is anonymous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid_header: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Configuration that passed startup validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub site: SiteConfig,
    pub tags: TagsConfig,
    pub feeds: FeedsConfig,
    pub pagination: PaginationConfig,
    pub collaborators: CollaboratorsConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(crate::runtime_paths::CONFIG_FILE_NAME);
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be greater than 0".to_string(),
            ));
        }

        let relative_path = &self.site.relative_path;
        if !relative_path.is_empty() && !relative_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "site.relative_path '{}' must start with '/'",
                relative_path
            )));
        }
        if relative_path.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "site.relative_path '{}' must not end with '/'",
                relative_path
            )));
        }

        let maximum_tag_length = self.tags.maximum_tag_length;
        if maximum_tag_length == 0 || maximum_tag_length > MAXIMUM_TAG_LENGTH_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "tags.maximum_tag_length must be between 1 and {}, got {}",
                MAXIMUM_TAG_LENGTH_LIMIT, maximum_tag_length
            )));
        }

        let pagination = &self.pagination;
        if pagination.topics_per_page == 0 || pagination.max_topics_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "pagination.topics_per_page and pagination.max_topics_per_page must be greater than 0"
                    .to_string(),
            ));
        }
        if pagination.topics_per_page > pagination.max_topics_per_page {
            return Err(ConfigError::ValidationError(format!(
                "pagination.topics_per_page ({}) exceeds pagination.max_topics_per_page ({})",
                pagination.topics_per_page, pagination.max_topics_per_page
            )));
        }

        if self.collaborators.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "collaborators.timeout_ms must be greater than 0".to_string(),
            ));
        }

        let auth = match self.auth.uid_header {
            Some(header) if header.trim().is_empty() => {
                warn!("auth.uid_header is empty; all requests will be anonymous");
                AuthConfig { uid_header: None }
            }
            Some(header) => {
                if actix_web::http::header::HeaderName::try_from(header.trim()).is_err() {
                    return Err(ConfigError::ValidationError(format!(
                        "auth.uid_header '{}' is not a valid header name",
                        header
                    )));
                }
                AuthConfig {
                    uid_header: Some(header.trim().to_string()),
                }
            }
            None => AuthConfig { uid_header: None },
        };

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            logging: self.logging,
            site: self.site,
            tags: self.tags,
            feeds: self.feeds,
            pagination: self.pagination,
            collaborators: self.collaborators,
            auth,
        })
    }
}

impl ValidatedConfig {
    pub fn is_localhost_only(&self) -> bool {
        matches!(self.server.host.as_str(), "127.0.0.1" | "localhost" | "::1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use std::fs;

    const MINIMAL: &str = "server:\n  host: 127.0.0.1\n  port: 8080\napp:\n  name: Forum\n";

    fn validate(yaml: &str) -> Result<ValidatedConfig, ConfigError> {
        Config::from_yaml_str(yaml)?.validate()
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = validate(MINIMAL).expect("valid config");
        assert_eq!(config.server.workers, 4);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.site.relative_path, "");
        assert_eq!(config.tags.maximum_tag_length, 15);
        assert!(!config.feeds.disable_rss);
        assert_eq!(config.pagination.topics_per_page, 20);
        assert_eq!(config.pagination.max_topics_per_page, 100);
        assert_eq!(config.collaborators.timeout_ms, 5000);
        assert!(config.auth.uid_header.is_none());
        assert!(config.is_localhost_only());
    }

    #[test]
    fn relative_path_must_be_rooted_without_trailing_slash() {
        let bad_start = format!("{}site:\n  relative_path: forum\n", MINIMAL);
        assert!(matches!(
            validate(&bad_start),
            Err(ConfigError::ValidationError(_))
        ));

        let bad_end = format!("{}site:\n  relative_path: /forum/\n", MINIMAL);
        assert!(matches!(validate(&bad_end), Err(ConfigError::ValidationError(_))));

        let good = format!("{}site:\n  relative_path: /forum\n", MINIMAL);
        assert_eq!(
            validate(&good).expect("valid").site.relative_path,
            "/forum"
        );
    }

    #[test]
    fn tag_length_is_bounded() {
        let zero = format!("{}tags:\n  maximum_tag_length: 0\n", MINIMAL);
        assert!(matches!(validate(&zero), Err(ConfigError::ValidationError(_))));
        let huge = format!("{}tags:\n  maximum_tag_length: 1000\n", MINIMAL);
        assert!(matches!(validate(&huge), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn default_page_size_cannot_exceed_maximum() {
        let yaml = format!(
            "{}pagination:\n  topics_per_page: 50\n  max_topics_per_page: 10\n",
            MINIMAL
        );
        match validate(&yaml) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let yaml = format!("{}collaborators:\n  timeout_ms: 0\n", MINIMAL);
        assert!(matches!(validate(&yaml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn uid_header_is_trimmed_and_checked() {
        let good = format!("{}auth:\n  uid_header: \" X-Forum-Uid \"\n", MINIMAL);
        assert_eq!(
            validate(&good).expect("valid").auth.uid_header.as_deref(),
            Some("X-Forum-Uid")
        );

        let empty = format!("{}auth:\n  uid_header: \"  \"\n", MINIMAL);
        assert!(validate(&empty).expect("valid").auth.uid_header.is_none());

        let invalid = format!("{}auth:\n  uid_header: \"bad header\"\n", MINIMAL);
        assert!(matches!(validate(&invalid), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let fixture = TestFixtureRoot::new_unique("config-missing").expect("fixture");
        match Config::load(fixture.path()) {
            Err(ConfigError::LoadError(msg)) => assert!(msg.contains("config.yaml")),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn load_and_validate_reads_the_root() {
        let fixture = TestFixtureRoot::new_unique("config-load").expect("fixture");
        fs::write(fixture.path().join("config.yaml"), MINIMAL).expect("write config");
        let config = Config::load_and_validate(fixture.path()).expect("config");
        assert_eq!(config.app.name, "Forum");
    }

    #[test]
    fn parse_errors_name_the_file() {
        let fixture = TestFixtureRoot::new_unique("config-parse").expect("fixture");
        fs::write(fixture.path().join("config.yaml"), "server: [").expect("write config");
        match Config::load(fixture.path()) {
            Err(ConfigError::LoadError(msg)) => assert!(msg.contains("Failed to parse")),
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
