// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, AuthConfig, CollaboratorsConfig, FeedsConfig, LoggingConfig, PaginationConfig,
    ServerConfig, SiteConfig, TagsConfig, ValidatedConfig,
};

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "Test Forum".to_string(),
                    description: "Test Description".to_string(),
                },
                logging: LoggingConfig::default(),
                site: SiteConfig::default(),
                tags: TagsConfig::default(),
                feeds: FeedsConfig::default(),
                pagination: PaginationConfig::default(),
                collaborators: CollaboratorsConfig::default(),
                auth: AuthConfig {
                    uid_header: Some("X-Forum-Uid".to_string()),
                },
            },
        }
    }

    pub fn with_relative_path(mut self, relative_path: &str) -> Self {
        self.config.site.relative_path = relative_path.to_string();
        self
    }

    pub fn with_disable_rss(mut self, disable_rss: bool) -> Self {
        self.config.feeds.disable_rss = disable_rss;
        self
    }

    pub fn with_uid_header(mut self, header: Option<&str>) -> Self {
        self.config.auth.uid_header = header.map(str::to_string);
        self
    }

    pub fn with_topics_per_page(mut self, topics_per_page: u64) -> Self {
        self.config.pagination.topics_per_page = topics_per_page;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.collaborators.timeout_ms = timeout_ms;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
