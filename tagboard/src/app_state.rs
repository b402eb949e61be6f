// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::forum::ForumServices;
use crate::public::error::ErrorRenderer;
use crate::tags::{TagIndexAssembler, TagPageAssembler, TagPageConfig};
use crate::templates::{MiniJinjaEngine, TemplateEngine};

pub struct AppState {
    pub templates: Arc<dyn TemplateEngine>,
    pub error_renderer: ErrorRenderer,
    pub tag_pages: TagPageAssembler,
    pub tag_index: TagIndexAssembler,
}

impl AppState {
    pub fn new(config: &ValidatedConfig, services: ForumServices) -> Self {
        let tag_config = TagPageConfig::from_config(config);
        Self {
            templates: Arc::new(MiniJinjaEngine::new()),
            error_renderer: ErrorRenderer::new(
                config.app.name.clone(),
                config.site.relative_path.clone(),
            ),
            tag_pages: TagPageAssembler::new(services.clone(), tag_config.clone()),
            tag_index: TagIndexAssembler::new(services, tag_config),
        }
    }
}
