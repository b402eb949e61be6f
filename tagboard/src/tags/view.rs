// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! View-models handed to the templates. Every string in here that came from
//! request input is already escaped.

use super::pagination::Pagination;
use super::sanitize::TagName;
use crate::forum::{CategoryId, SelectedCategory, TagAggregate, Topic};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub text: String,
    pub url: Option<String>,
}

impl Breadcrumb {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }

    pub fn current(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }
}

/// Prepends the Home crumb. Crumb URLs are site-relative and get `relative_path` prefixed.
pub fn build_breadcrumbs(relative_path: &str, crumbs: Vec<Breadcrumb>) -> Vec<Breadcrumb> {
    let mut trail = Vec::with_capacity(crumbs.len() + 1);
    trail.push(Breadcrumb::link("Home", format!("{}/", relative_path)));
    trail.extend(crumbs.into_iter().map(|crumb| Breadcrumb {
        url: crumb.url.map(|url| format!("{}{}", relative_path, url)),
        text: crumb.text,
    }));
    trail
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTag {
    pub rel: String,
    pub href: String,
}

/// A topic with its position in the full tag listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedTopic {
    pub index: u64,
    #[serde(flatten)]
    pub topic: Topic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPageView {
    pub tag: TagName,
    pub title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub topics: Vec<IndexedTopic>,
    pub topic_count: u64,
    pub pagination: Pagination,
    pub show_select: bool,
    pub show_topic_tools: bool,
    pub all_categories_url: String,
    pub selected_category: Option<SelectedCategory>,
    pub selected_cids: Vec<CategoryId>,
    pub meta_tags: Vec<MetaTag>,
    pub link_tags: Vec<LinkTag>,
    pub feeds_disable_rss: bool,
    pub rss_feed_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagIndexView {
    pub tags: Vec<TagAggregate>,
    pub display_tag_search: bool,
    pub next_start: u64,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub title: String,
}
