// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Read-only forum snapshot loaded from `forum.yaml`.

use super::services::{
    CategoryService, PrivilegeService, ServiceResult, TopicHydrator, TopicIndex, UserService,
};
use super::types::{
    CategoryId, CategoryPrivilege, CategorySummary, GlobalCapability, SelectedCategoryData,
    TagAggregate, Topic, TopicId, Uid, UserSettings, Viewer,
};
use crate::config::ValidatedConfig;
use crate::tags::TagName;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

pub const GUESTS_GROUP: &str = "guests";
pub const REGISTERED_USERS_GROUP: &str = "registered-users";
pub const ADMINISTRATORS_GROUP: &str = "administrators";
pub const GLOBAL_MODERATORS_GROUP: &str = "global-moderators";

const FORMER_USER: &str = "Former user";

#[derive(Debug)]
pub enum ForumLoadError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ForumLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForumLoadError::LoadError(msg) => write!(f, "Forum data load error: {}", msg),
            ForumLoadError::ValidationError(msg) => {
                write!(f, "Forum data validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ForumLoadError {}

#[derive(Debug, Deserialize, Default)]
struct ForumFile {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    topics: Vec<TopicRecord>,
    #[serde(default)]
    global_privileges: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
struct UserRecord {
    uid: Uid,
    username: String,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    topics_per_page: Option<u64>,
    #[serde(default)]
    read_topics: HashSet<TopicId>,
}

#[derive(Debug, Deserialize, Clone)]
struct CategoryRecord {
    cid: CategoryId,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    bg_color: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    parent_cid: Option<CategoryId>,
    #[serde(default)]
    moderators: Vec<Uid>,
    /// Privilege name to the groups holding it.
    #[serde(default)]
    privileges: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
struct TopicRecord {
    tid: TopicId,
    cid: CategoryId,
    uid: Uid,
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_post_count")]
    post_count: u64,
    #[serde(default)]
    view_count: u64,
    timestamp: i64,
    #[serde(default)]
    last_post_time: Option<i64>,
}

fn default_post_count() -> u64 {
    1
}

/// Display defaults applied to users without their own preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForumDefaults {
    pub topics_per_page: u64,
    pub max_topics_per_page: u64,
    pub maximum_tag_length: usize,
}

impl ForumDefaults {
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            topics_per_page: config.pagination.topics_per_page,
            max_topics_per_page: config.pagination.max_topics_per_page,
            maximum_tag_length: config.tags.maximum_tag_length,
        }
    }
}

impl Default for ForumDefaults {
    fn default() -> Self {
        Self {
            topics_per_page: 20,
            max_topics_per_page: 100,
            maximum_tag_length: crate::tags::sanitize::DEFAULT_MAXIMUM_TAG_LENGTH,
        }
    }
}

#[derive(Debug)]
pub struct MemoryForum {
    users: HashMap<Uid, UserRecord>,
    categories: Vec<CategoryRecord>,
    /// Listing order: most recent activity first.
    topics: Vec<TopicRecord>,
    global_privileges: BTreeMap<String, Vec<String>>,
    defaults: ForumDefaults,
}

impl MemoryForum {
    pub fn load(path: &Path, defaults: ForumDefaults) -> Result<Self, ForumLoadError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ForumLoadError::LoadError(format!(
                "Failed to read forum file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let forum = Self::from_yaml_str(&content, defaults).map_err(|e| match e {
            ForumLoadError::LoadError(msg) => {
                ForumLoadError::LoadError(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })?;
        info!(
            "Loaded forum data from {}: {} users, {} categories, {} topics",
            path.display(),
            forum.users.len(),
            forum.categories.len(),
            forum.topics.len()
        );
        Ok(forum)
    }

    pub fn from_yaml_str(content: &str, defaults: ForumDefaults) -> Result<Self, ForumLoadError> {
        let file: ForumFile = serde_yaml::from_str(content)
            .map_err(|e| ForumLoadError::LoadError(format!("Failed to parse forum data: {}", e)))?;
        Self::from_file(file, defaults)
    }

    /// One-line description for startup logs.
    pub fn describe(&self) -> String {
        format!(
            "{} users, {} categories, {} topics",
            self.users.len(),
            self.categories.len(),
            self.topics.len()
        )
    }

    fn from_file(file: ForumFile, defaults: ForumDefaults) -> Result<Self, ForumLoadError> {
        let mut users = HashMap::new();
        for user in file.users {
            if user.uid == 0 {
                return Err(ForumLoadError::ValidationError(format!(
                    "User '{}' uses reserved uid 0",
                    user.username
                )));
            }
            let uid = user.uid;
            if users.insert(uid, user).is_some() {
                return Err(ForumLoadError::ValidationError(format!(
                    "Duplicate user uid {}",
                    uid
                )));
            }
        }

        let mut seen_cids = HashSet::new();
        for category in &file.categories {
            if !seen_cids.insert(category.cid) {
                return Err(ForumLoadError::ValidationError(format!(
                    "Duplicate category cid {}",
                    category.cid
                )));
            }
        }

        let mut seen_tids = HashSet::new();
        let mut topics = Vec::with_capacity(file.topics.len());
        for mut topic in file.topics {
            if !seen_tids.insert(topic.tid) {
                return Err(ForumLoadError::ValidationError(format!(
                    "Duplicate topic tid {}",
                    topic.tid
                )));
            }
            if !seen_cids.contains(&topic.cid) {
                return Err(ForumLoadError::ValidationError(format!(
                    "Topic {} references unknown category {}",
                    topic.tid, topic.cid
                )));
            }
            topic.tags = sanitize_tags(&topic.tags, defaults.maximum_tag_length);
            topics.push(topic);
        }
        topics.sort_by(|a, b| {
            last_activity(b)
                .cmp(&last_activity(a))
                .then_with(|| b.tid.cmp(&a.tid))
        });

        Ok(Self {
            users,
            categories: file.categories,
            topics,
            global_privileges: file.global_privileges,
            defaults,
        })
    }

    fn groups_for(&self, viewer: Viewer) -> Vec<&str> {
        match viewer {
            Viewer::Anonymous => vec![GUESTS_GROUP],
            Viewer::User(uid) => {
                let mut groups = vec![REGISTERED_USERS_GROUP];
                if let Some(user) = self.users.get(&uid) {
                    groups.extend(user.groups.iter().map(String::as_str));
                }
                groups
            }
        }
    }

    fn is_administrator(&self, viewer: Viewer) -> bool {
        self.groups_for(viewer).contains(&ADMINISTRATORS_GROUP)
    }

    fn holds(&self, viewer: Viewer, holders: Option<&Vec<String>>) -> bool {
        if self.is_administrator(viewer) {
            return true;
        }
        let Some(holders) = holders else {
            return false;
        };
        self.groups_for(viewer)
            .iter()
            .any(|group| holders.iter().any(|holder| holder == group))
    }

    fn can_read_category(&self, viewer: Viewer, category: &CategoryRecord) -> bool {
        self.holds(
            viewer,
            category.privileges.get(CategoryPrivilege::TopicsRead.as_str()),
        )
    }

    fn category(&self, cid: CategoryId) -> Option<&CategoryRecord> {
        self.categories.iter().find(|category| category.cid == cid)
    }

    fn tagged_in<'a>(
        &'a self,
        tag: &'a str,
        cids: &'a [CategoryId],
    ) -> impl Iterator<Item = &'a TopicRecord> + 'a {
        self.topics.iter().filter(move |topic| {
            cids.contains(&topic.cid) && topic.tags.iter().any(|candidate| candidate == tag)
        })
    }

    fn hydrate(&self, topic: &TopicRecord, viewer: Viewer) -> Topic {
        let author = self
            .users
            .get(&topic.uid)
            .map(|user| user.username.clone())
            .unwrap_or_else(|| FORMER_USER.to_string());
        let category_name = self
            .category(topic.cid)
            .map(|category| category.name.clone())
            .unwrap_or_default();
        let unread = match viewer {
            Viewer::Anonymous => false,
            Viewer::User(uid) => self
                .users
                .get(&uid)
                .is_none_or(|user| !user.read_topics.contains(&topic.tid)),
        };

        Topic {
            tid: topic.tid,
            cid: topic.cid,
            uid: topic.uid,
            title: topic.title.clone(),
            slug: topic
                .slug
                .clone()
                .unwrap_or_else(|| format!("{}/{}", topic.tid, slugify(&topic.title))),
            author,
            category_name,
            tags: topic.tags.clone(),
            post_count: topic.post_count,
            view_count: topic.view_count,
            timestamp: topic.timestamp,
            last_post_time: last_activity(topic),
            unread,
        }
    }
}

fn last_activity(topic: &TopicRecord) -> i64 {
    topic.last_post_time.unwrap_or(topic.timestamp)
}

fn sanitize_tags(tags: &[String], maximum_length: usize) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = TagName::sanitize(tag, maximum_length);
        if tag.is_empty() || cleaned.iter().any(|existing| existing == tag.as_str()) {
            continue;
        }
        cleaned.push(tag.as_str().to_string());
    }
    cleaned
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.trim().to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn summary(category: &CategoryRecord) -> CategorySummary {
    CategorySummary {
        cid: category.cid,
        name: category.name.clone(),
        slug: category
            .slug
            .clone()
            .unwrap_or_else(|| format!("{}/{}", category.cid, slugify(&category.name))),
        icon: category.icon.clone(),
        color: category.color.clone(),
        bg_color: category.bg_color.clone(),
        link: category.link.clone(),
        parent_cid: category.parent_cid,
    }
}

fn slice<T>(items: impl Iterator<Item = T>, start: u64, stop: u64) -> Vec<T> {
    if stop < start {
        return Vec::new();
    }
    items
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(stop - start + 1).unwrap_or(usize::MAX))
        .collect()
}

#[async_trait]
impl UserService for MemoryForum {
    async fn get_settings(&self, viewer: Viewer) -> ServiceResult<UserSettings> {
        let preferred = viewer
            .uid()
            .and_then(|uid| self.users.get(&uid))
            .and_then(|user| user.topics_per_page)
            .filter(|per_page| *per_page > 0)
            .unwrap_or(self.defaults.topics_per_page);
        Ok(UserSettings {
            topics_per_page: preferred.min(self.defaults.max_topics_per_page),
        })
    }

    async fn is_privileged(&self, viewer: Viewer) -> ServiceResult<bool> {
        let Some(uid) = viewer.uid() else {
            return Ok(false);
        };
        let groups = self.groups_for(viewer);
        Ok(groups.contains(&ADMINISTRATORS_GROUP)
            || groups.contains(&GLOBAL_MODERATORS_GROUP)
            || self
                .categories
                .iter()
                .any(|category| category.moderators.contains(&uid)))
    }
}

#[async_trait]
impl PrivilegeService for MemoryForum {
    async fn get_cids_by_privilege(
        &self,
        viewer: Viewer,
        privilege: CategoryPrivilege,
    ) -> ServiceResult<Vec<CategoryId>> {
        let cids: Vec<CategoryId> = self
            .categories
            .iter()
            .filter(|category| self.holds(viewer, category.privileges.get(privilege.as_str())))
            .map(|category| category.cid)
            .collect();
        debug!(
            "{} holds {} in {} categories",
            viewer,
            privilege.as_str(),
            cids.len()
        );
        Ok(cids)
    }

    async fn can(&self, capability: GlobalCapability, viewer: Viewer) -> ServiceResult<bool> {
        Ok(self.holds(viewer, self.global_privileges.get(capability.as_str())))
    }
}

#[async_trait]
impl CategoryService for MemoryForum {
    async fn get_selected_category(
        &self,
        explicit: Option<&[CategoryId]>,
    ) -> ServiceResult<SelectedCategoryData> {
        let lookups = explicit
            .unwrap_or_default()
            .iter()
            .map(|cid| self.category(*cid).map(summary))
            .collect();
        Ok(SelectedCategoryData::from_lookup(explicit, lookups))
    }
}

#[async_trait]
impl TopicIndex for MemoryForum {
    async fn get_tag_topic_count(&self, tag: &str, cids: &[CategoryId]) -> ServiceResult<u64> {
        Ok(self.tagged_in(tag, cids).count() as u64)
    }

    async fn get_tag_tids_by_cids(
        &self,
        tag: &str,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<TopicId>> {
        Ok(slice(
            self.tagged_in(tag, cids).map(|topic| topic.tid),
            start,
            stop,
        ))
    }

    async fn get_category_tags_data(
        &self,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<Option<TagAggregate>>> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for topic in self.topics.iter().filter(|topic| cids.contains(&topic.cid)) {
            for tag in &topic.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        let mut aggregates: Vec<(&str, u64)> = counts.into_iter().collect();
        aggregates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(slice(
            aggregates.into_iter().map(|(tag, count)| {
                Some(TagAggregate {
                    tag: tag.to_string(),
                    count,
                })
            }),
            start,
            stop,
        ))
    }
}

#[async_trait]
impl TopicHydrator for MemoryForum {
    /// Unknown ids and topics in categories the viewer cannot read are left out.
    async fn get_topics(&self, tids: &[TopicId], viewer: Viewer) -> ServiceResult<Vec<Topic>> {
        Ok(tids
            .iter()
            .filter_map(|tid| self.topics.iter().find(|topic| topic.tid == *tid))
            .filter(|topic| {
                self.category(topic.cid)
                    .is_some_and(|category| self.can_read_category(viewer, category))
            })
            .map(|topic| self.hydrate(topic, viewer))
            .collect())
    }
}
