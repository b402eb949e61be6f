// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{
    CategoryId, CategoryPrivilege, GlobalCapability, SelectedCategoryData, TagAggregate, Topic,
    TopicId, UserSettings, Viewer,
};
use async_trait::async_trait;
use log::warn;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A collaborator could not produce the data a page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    Unavailable {
        operation: &'static str,
        message: String,
    },
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    Contract {
        operation: &'static str,
        message: String,
    },
}

impl DependencyError {
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        DependencyError::Unavailable {
            operation,
            message: message.into(),
        }
    }

    pub fn contract(operation: &'static str, message: impl Into<String>) -> Self {
        DependencyError::Contract {
            operation,
            message: message.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            DependencyError::Unavailable { operation, .. }
            | DependencyError::Timeout { operation, .. }
            | DependencyError::Contract { operation, .. } => operation,
        }
    }
}

impl fmt::Display for DependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyError::Unavailable { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            DependencyError::Timeout { operation, after } => {
                write!(f, "{} timed out after {} ms", operation, after.as_millis())
            }
            DependencyError::Contract { operation, message } => {
                write!(f, "{} returned invalid data: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for DependencyError {}

pub type ServiceResult<T> = Result<T, DependencyError>;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_settings(&self, viewer: Viewer) -> ServiceResult<UserSettings>;

    /// Administrators, global moderators and category moderators.
    async fn is_privileged(&self, viewer: Viewer) -> ServiceResult<bool>;
}

#[async_trait]
pub trait PrivilegeService: Send + Sync {
    async fn get_cids_by_privilege(
        &self,
        viewer: Viewer,
        privilege: CategoryPrivilege,
    ) -> ServiceResult<Vec<CategoryId>>;

    async fn can(&self, capability: GlobalCapability, viewer: Viewer) -> ServiceResult<bool>;
}

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn get_selected_category(
        &self,
        explicit: Option<&[CategoryId]>,
    ) -> ServiceResult<SelectedCategoryData>;
}

/// Tag to topic lookups. Slices use inclusive `start..=stop` offsets.
#[async_trait]
pub trait TopicIndex: Send + Sync {
    async fn get_tag_topic_count(&self, tag: &str, cids: &[CategoryId]) -> ServiceResult<u64>;

    async fn get_tag_tids_by_cids(
        &self,
        tag: &str,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<TopicId>>;

    /// Entries may be `None` when the backing aggregate is sparse.
    async fn get_category_tags_data(
        &self,
        cids: &[CategoryId],
        start: u64,
        stop: u64,
    ) -> ServiceResult<Vec<Option<TagAggregate>>>;
}

#[async_trait]
pub trait TopicHydrator: Send + Sync {
    async fn get_topics(&self, tids: &[TopicId], viewer: Viewer) -> ServiceResult<Vec<Topic>>;
}

/// Every collaborator the tag pages read from.
#[derive(Clone)]
pub struct ForumServices {
    pub users: Arc<dyn UserService>,
    pub privileges: Arc<dyn PrivilegeService>,
    pub categories: Arc<dyn CategoryService>,
    pub topic_index: Arc<dyn TopicIndex>,
    pub topics: Arc<dyn TopicHydrator>,
}

impl ForumServices {
    /// Wires a single backend that implements every collaborator.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserService
            + PrivilegeService
            + CategoryService
            + TopicIndex
            + TopicHydrator
            + 'static,
    {
        Self {
            users: backend.clone(),
            privileges: backend.clone(),
            categories: backend.clone(),
            topic_index: backend.clone(),
            topics: backend,
        }
    }
}

/// Bounds one collaborator call. Dropping the returned future drops the call.
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, call: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} did not answer within {} ms", operation, limit.as_millis());
            Err(DependencyError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}
