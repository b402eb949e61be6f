// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::TagPageError;
use super::page::TagPageConfig;
use super::view::{Breadcrumb, TagIndexView, build_breadcrumbs};
use super::visibility::resolve_cids;
use crate::forum::{CategoryPrivilege, ForumServices, GlobalCapability, Viewer, with_timeout};
use log::{debug, warn};

/// Tags loaded for the first screen of the index; more are fetched from `next_start`.
pub const TAG_INDEX_PAGE_SIZE: u64 = 100;

pub struct TagIndexAssembler {
    services: ForumServices,
    config: TagPageConfig,
}

impl TagIndexAssembler {
    pub fn new(services: ForumServices, config: TagPageConfig) -> Self {
        Self { services, config }
    }

    pub async fn render_tag_index(&self, viewer: Viewer) -> Result<TagIndexView, TagPageError> {
        let limit = self.config.collaborator_timeout;
        let services = &self.services;

        let cids = with_timeout(
            "privileges.get_cids_by_privilege",
            limit,
            resolve_cids(
                services.privileges.as_ref(),
                None,
                viewer,
                CategoryPrivilege::TopicsRead,
            ),
        )
        .await?;

        let (can_search, aggregates) = tokio::try_join!(
            with_timeout(
                "privileges.can",
                limit,
                services.privileges.can(GlobalCapability::SearchTags, viewer)
            ),
            with_timeout(
                "topics.get_category_tags_data",
                limit,
                services
                    .topic_index
                    .get_category_tags_data(&cids, 0, TAG_INDEX_PAGE_SIZE - 1)
            ),
        )
        .map_err(|err| {
            warn!("Tag index for {}: {}", viewer, err);
            err
        })?;

        let tags: Vec<_> = aggregates
            .into_iter()
            .flatten()
            .filter(|aggregate| !aggregate.tag.is_empty())
            .collect();
        debug!("Tag index for {}: {} tags across {} categories", viewer, tags.len(), cids.len());

        Ok(TagIndexView {
            tags,
            display_tag_search: can_search,
            next_start: TAG_INDEX_PAGE_SIZE,
            breadcrumbs: build_breadcrumbs(
                &self.config.relative_path,
                vec![Breadcrumb::current("Tags")],
            ),
            title: "Tags".to_string(),
        })
    }
}
