// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::TagPageError;
use super::pagination::{PageWindow, paginate};
use super::query::{CID_PARAM, QueryParams, build_query_string};
use super::sanitize::{DEFAULT_MAXIMUM_TAG_LENGTH, TagName};
use super::view::{
    Breadcrumb, IndexedTopic, LinkTag, MetaTag, TagPageView, build_breadcrumbs,
};
use super::visibility::resolve_cids;
use crate::config::ValidatedConfig;
use crate::forum::{
    CategoryId, CategoryPrivilege, DependencyError, ForumServices, Topic, Viewer, with_timeout,
};
use log::{debug, warn};
use std::num::NonZeroU64;
use std::time::Duration;

/// Site settings the tag pages read on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPageConfig {
    pub maximum_tag_length: usize,
    pub relative_path: String,
    pub disable_rss: bool,
    pub collaborator_timeout: Duration,
}

impl TagPageConfig {
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            maximum_tag_length: config.tags.maximum_tag_length,
            relative_path: config.site.relative_path.clone(),
            disable_rss: config.feeds.disable_rss,
            collaborator_timeout: Duration::from_millis(config.collaborators.timeout_ms),
        }
    }
}

impl Default for TagPageConfig {
    fn default() -> Self {
        Self {
            maximum_tag_length: DEFAULT_MAXIMUM_TAG_LENGTH,
            relative_path: String::new(),
            disable_rss: false,
            collaborator_timeout: Duration::from_secs(5),
        }
    }
}

/// Pairs each topic with its rank in the whole listing.
pub fn calculate_topic_indices(topics: Vec<Topic>, start: u64) -> Vec<IndexedTopic> {
    topics
        .into_iter()
        .zip(start..)
        .map(|(topic, index)| IndexedTopic { index, topic })
        .collect()
}

pub struct TagPageAssembler {
    services: ForumServices,
    config: TagPageConfig,
}

impl TagPageAssembler {
    pub fn new(services: ForumServices, config: TagPageConfig) -> Self {
        Self { services, config }
    }

    pub fn config(&self) -> &TagPageConfig {
        &self.config
    }

    pub async fn render_tag_page(
        &self,
        raw_tag: &str,
        viewer: Viewer,
        page: u64,
        category_filter: Option<Vec<CategoryId>>,
        query: &QueryParams,
    ) -> Result<TagPageView, TagPageError> {
        let tag = TagName::sanitize(raw_tag, self.config.maximum_tag_length);
        let page = page.max(1);
        let limit = self.config.collaborator_timeout;
        let services = &self.services;
        let explicit = category_filter.as_deref();

        let (settings, cids, category_data, is_privileged) = tokio::try_join!(
            with_timeout(
                "users.get_settings",
                limit,
                services.users.get_settings(viewer)
            ),
            with_timeout(
                "privileges.get_cids_by_privilege",
                limit,
                resolve_cids(
                    services.privileges.as_ref(),
                    explicit,
                    viewer,
                    CategoryPrivilege::TopicsRead,
                )
            ),
            with_timeout(
                "categories.get_selected_category",
                limit,
                services.categories.get_selected_category(explicit)
            ),
            with_timeout(
                "users.is_privileged",
                limit,
                services.users.is_privileged(viewer)
            ),
        )
        .map_err(|err| {
            warn!("Tag page '{}' for {}: {}", tag, viewer, err);
            err
        })?;

        let page_size = NonZeroU64::new(settings.topics_per_page).ok_or_else(|| {
            DependencyError::contract("users.get_settings", "topics_per_page must be positive")
        })?;
        let window = PageWindow::new(page, page_size);

        let (topic_count, tids) = tokio::try_join!(
            with_timeout(
                "topics.get_tag_topic_count",
                limit,
                services.topic_index.get_tag_topic_count(tag.as_str(), &cids)
            ),
            with_timeout(
                "topics.get_tag_tids_by_cids",
                limit,
                services.topic_index.get_tag_tids_by_cids(
                    tag.as_str(),
                    &cids,
                    window.start,
                    window.stop,
                )
            ),
        )
        .map_err(|err| {
            warn!("Tag page '{}' for {}: {}", tag, viewer, err);
            err
        })?;

        let topics = with_timeout(
            "topics.get_topics",
            limit,
            services.topics.get_topics(&tids, viewer),
        )
        .await?;
        let topics = calculate_topic_indices(topics, window.start);

        let pagination = paginate(page, topic_count, page_size, query);
        debug!(
            "Tag page '{}' for {}: page {} of {}, {} topics of {}",
            tag,
            viewer,
            page,
            pagination.page_count,
            topics.len(),
            topic_count
        );

        let relative_path = &self.config.relative_path;
        let tag_url = format!("{}/tags/{}", relative_path, tag.path_segment());
        let link_tags = pagination
            .rel
            .iter()
            .map(|rel| LinkTag {
                rel: rel.rel.clone(),
                href: format!("{}{}", tag_url, rel.href),
            })
            .collect();

        Ok(TagPageView {
            title: format!("Topics tagged under &quot;{}&quot;", tag),
            breadcrumbs: build_breadcrumbs(
                relative_path,
                vec![
                    Breadcrumb::link("Tags", "/tags"),
                    Breadcrumb::current(tag.as_str()),
                ],
            ),
            topics,
            topic_count,
            show_select: is_privileged,
            show_topic_tools: is_privileged,
            all_categories_url: format!(
                "{}{}",
                tag_url,
                build_query_string(query, CID_PARAM, None)
            ),
            selected_category: category_data.selected_category,
            selected_cids: category_data.selected_cids,
            meta_tags: vec![
                MetaTag {
                    name: Some("title".to_string()),
                    property: None,
                    content: tag.to_string(),
                },
                MetaTag {
                    name: None,
                    property: Some("og:title".to_string()),
                    content: tag.to_string(),
                },
            ],
            link_tags,
            feeds_disable_rss: self.config.disable_rss,
            rss_feed_url: format!("{}/tags/{}.rss", relative_path, tag.path_segment()),
            pagination,
            tag,
        })
    }
}
