// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Uid = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u64);

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity a page is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(Uid),
}

impl Viewer {
    /// Uid `0` is how upstream systems spell "not signed in".
    pub fn from_uid(uid: Uid) -> Self {
        if uid == 0 {
            Viewer::Anonymous
        } else {
            Viewer::User(uid)
        }
    }

    pub fn uid(&self) -> Option<Uid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(uid) => Some(*uid),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Viewer::Anonymous)
    }
}

impl fmt::Display for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewer::Anonymous => write!(f, "anonymous"),
            Viewer::User(uid) => write!(f, "uid:{}", uid),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryPrivilege {
    TopicsRead,
}

impl CategoryPrivilege {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPrivilege::TopicsRead => "topics:read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalCapability {
    SearchTags,
}

impl GlobalCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalCapability::SearchTags => "search:tags",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub topics_per_page: u64,
}

/// A topic expanded for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub tid: TopicId,
    pub cid: CategoryId,
    pub uid: Uid,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub category_name: String,
    pub tags: Vec<String>,
    pub post_count: u64,
    pub view_count: u64,
    pub timestamp: i64,
    pub last_post_time: i64,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAggregate {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub cid: CategoryId,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub link: Option<String>,
    pub parent_cid: Option<CategoryId>,
}

/// Category highlighted in the filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedCategory {
    pub cid: Option<CategoryId>,
    pub name: String,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
}

impl SelectedCategory {
    pub fn multiple() -> Self {
        Self {
            cid: None,
            name: "Multiple categories selected".to_string(),
            slug: None,
            icon: Some("fa-plus".to_string()),
            color: None,
            bg_color: Some("#ddd".to_string()),
        }
    }
}

impl From<CategorySummary> for SelectedCategory {
    fn from(category: CategorySummary) -> Self {
        Self {
            cid: Some(category.cid),
            name: category.name,
            slug: Some(category.slug),
            icon: category.icon,
            color: category.color,
            bg_color: category.bg_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectedCategoryData {
    pub selected_category: Option<SelectedCategory>,
    pub selected_cids: Vec<CategoryId>,
}

impl SelectedCategoryData {
    /// `categories` is the lookup result for `explicit`, one slot per id.
    /// Missing categories and external link categories never count as selected.
    pub fn from_lookup(
        explicit: Option<&[CategoryId]>,
        categories: Vec<Option<CategorySummary>>,
    ) -> Self {
        let mut readable: Vec<CategorySummary> = categories
            .into_iter()
            .flatten()
            .filter(|category| category.link.is_none())
            .collect();

        let selected_category = match readable.len() {
            0 => None,
            1 => readable.pop().map(SelectedCategory::from),
            _ => Some(SelectedCategory::multiple()),
        };

        Self {
            selected_category,
            selected_cids: explicit.map(|cids| cids.to_vec()).unwrap_or_default(),
        }
    }
}
