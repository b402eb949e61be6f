// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Scriptable collaborator stub for assembler unit tests.

use crate::forum::{
    CategoryId, CategoryPrivilege, CategoryService, DependencyError, GlobalCapability,
    PrivilegeService, SelectedCategoryData, ServiceResult, TagAggregate, Topic, TopicHydrator,
    TopicId, TopicIndex, Uid, UserService, UserSettings, Viewer,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

pub struct StubForum {
    pub topics_per_page: u64,
    pub readable: Vec<CategoryId>,
    pub anonymous_readable: Vec<CategoryId>,
    pub privileged_uids: Vec<Uid>,
    pub can_search_tags: bool,
    pub selected: SelectedCategoryData,
    pub tag_topic_count: u64,
    pub tag_tids: Vec<TopicId>,
    pub tag_aggregates: Vec<Option<TagAggregate>>,
    failing: Option<&'static str>,
    slow: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl Default for StubForum {
    fn default() -> Self {
        Self {
            topics_per_page: 20,
            readable: vec![CategoryId(1), CategoryId(2)],
            anonymous_readable: vec![CategoryId(1)],
            privileged_uids: Vec::new(),
            can_search_tags: false,
            selected: SelectedCategoryData::default(),
            tag_topic_count: 0,
            tag_tids: Vec::new(),
            tag_aggregates: Vec::new(),
            failing: None,
            slow: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubForum {
    /// `count` topics tagged, ids `count..=1` in listing order.
    pub fn with_tagged_topics(mut self, count: u64) -> Self {
        self.tag_topic_count = count;
        self.tag_tids = (1..=count).rev().map(TopicId).collect();
        self
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    /// `operation` never answers within any test timeout.
    pub fn slow(mut self, operation: &'static str) -> Self {
        self.slow = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    async fn enter(&self, operation: &'static str, detail: String) -> ServiceResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{} {}", operation, detail).trim_end().to_string());
        }
        if self.slow == Some(operation) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if self.failing == Some(operation) {
            return Err(DependencyError::unavailable(operation, "stub failure"));
        }
        Ok(())
    }
}

pub fn stub_topic(tid: TopicId) -> Topic {
    Topic {
        tid,
        cid: CategoryId(1),
        uid: 1,
        title: format!("Topic {}", tid),
        slug: format!("{}/topic-{}", tid, tid),
        author: "alice".to_string(),
        category_name: "General".to_string(),
        tags: Vec::new(),
        post_count: 1,
        view_count: 0,
        timestamp: 1_700_000_000_000,
        last_post_time: 1_700_000_000_000,
        unread: false,
    }
}

fn format_cids(cids: &[CategoryId]) -> String {
    let ids: Vec<String> = cids.iter().map(ToString::to_string).collect();
    format!("[{}]", ids.join(","))
}

#[async_trait]
impl UserService for StubForum {
    async fn get_settings(&self, viewer: Viewer) -> ServiceResult<UserSettings> {
        self.enter("users.get_settings", viewer.to_string()).await?;
        Ok(UserSettings {
            topics_per_page: self.topics_per_page,
        })
    }

    async fn is_privileged(&self, viewer: Viewer) -> ServiceResult<bool> {
        self.enter("users.is_privileged", viewer.to_string()).await?;
        Ok(viewer
            .uid()
            .is_some_and(|uid| self.privileged_uids.contains(&uid)))
    }
}

#[async_trait]
impl PrivilegeService for StubForum {
    async fn get_cids_by_privilege(
        &self,
        viewer: Viewer,
        privilege: CategoryPrivilege,
    ) -> ServiceResult<Vec<CategoryId>> {
        self.enter(
            "privileges.get_cids_by_privilege",
            format!("{} {}", viewer, privilege.as_str()),
        )
        .await?;
        if viewer.is_anonymous() {
            Ok(self.anonymous_readable.clone())
        } else {
            Ok(self.readable.clone())
        }
    }

    async fn can(&self, capability: GlobalCapability, viewer: Viewer) -> ServiceResult<bool> {
        self.enter("privileges.can", format!("{} {}", capability.as_str(), viewer))
            .await?;
        Ok(self.can_search_tags)
    }
}

#[async_trait]
impl CategoryService for StubForum {
    async fn get_selected_category(
        &self,
        explicit: Option<&[CategoryId]>,
    ) -> ServiceResult<SelectedCategoryData> {
        self.enter(
            "categories.get_selected_category",
            explicit.map(format_cids).unwrap_or_default(),
        )
        .await?;
        Ok(self.selected.clone())
    }
}

#[async_trait]
impl TopicIndex for StubForum {
    async fn get_tag_topic_count(&self, tag: &str, cids: &[CategoryId]) -> ServiceResult<u64> {
        self.enter(
            "topics.get_tag_topic_count",
            format!("{} {}", tag, format_cids(cids)),
        )
        .await?;
        Ok(self.tag_topic_count)
    }

    async fn get_tag_tids_by_cids(
        &self,
        tag: &str,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<TopicId>> {
        self.enter(
            "topics.get_tag_tids_by_cids",
            format!("{} {} {}..={}", tag, format_cids(cids), start, stop),
        )
        .await?;
        Ok(self
            .tag_tids
            .iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .copied()
            .collect())
    }

    async fn get_category_tags_data(
        &self,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<Option<TagAggregate>>> {
        self.enter(
            "topics.get_category_tags_data",
            format!("{} {}..={}", format_cids(cids), start, stop),
        )
        .await?;
        Ok(self.tag_aggregates.clone())
    }
}

#[async_trait]
impl TopicHydrator for StubForum {
    async fn get_topics(&self, tids: &[TopicId], viewer: Viewer) -> ServiceResult<Vec<Topic>> {
        self.enter("topics.get_topics", format!("{} {}", tids.len(), viewer))
            .await?;
        Ok(tids.iter().copied().map(stub_topic).collect())
    }
}
