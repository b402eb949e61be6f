// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use std::sync::Arc;
use tagboard::app_state::AppState;
use tagboard::config::{Config, ValidatedConfig};
use tagboard::forum::memory::ForumDefaults;
use tagboard::forum::{ForumServices, MemoryForum};
use tagboard::iam::ViewerMiddlewareFactory;
use tagboard::public;
use tagboard::runtime_paths::RuntimePaths;
use tagboard::util::test_fixtures::{SAMPLE_FORUM_YAML, TestFixtureRoot};

pub const UID_HEADER: &str = "X-Forum-Uid";

/// Mounted below `/forum`, three topics per page, identity from `X-Forum-Uid`.
pub const TEST_CONFIG_YAML: &str = r#"
server:
  host: 127.0.0.1
  port: 5466
app:
  name: Test Forum
  description: Integration test forum
site:
  relative_path: /forum
pagination:
  topics_per_page: 3
auth:
  uid_header: X-Forum-Uid
"#;

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(TEST_CONFIG_YAML)
    }

    /// Writes both runtime files and loads them the way the server does at startup.
    pub fn with_config(config_yaml: &str) -> Self {
        let fixture = TestFixtureRoot::new_unique("tag-pages").expect("fixture root");
        fixture.write_config(config_yaml).expect("write config");
        fixture.write_forum(SAMPLE_FORUM_YAML).expect("write forum");

        let runtime_paths = RuntimePaths::from_root(fixture.path()).expect("runtime paths");
        let config = Config::load_and_validate(&runtime_paths.root).expect("valid config");
        let forum = MemoryForum::load(
            &runtime_paths.forum_file,
            ForumDefaults::from_config(&config),
        )
        .expect("forum data");
        let app_state = Arc::new(AppState::new(
            &config,
            ForumServices::from_backend(Arc::new(forum)),
        ));

        Self {
            fixture,
            config: Arc::new(config),
            runtime_paths,
            app_state,
        }
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let relative_path = harness.config.site.relative_path.clone();
    App::new()
        .app_data(web::Data::from(harness.config.clone()))
        .app_data(web::Data::from(harness.app_state.clone()))
        .wrap(ViewerMiddlewareFactory)
        .configure(move |cfg| public::configure(cfg, &relative_path))
        .default_service(web::to(public::handlers::not_found))
}

/// MiniJinja escapes `/` inside interpolated attribute values.
pub fn escaped(url: &str) -> String {
    url.replace('/', "&#x2f;")
}

pub fn header(response: &ServiceResponse, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
