// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Collaborators the tag pages read from, and an in-memory backend for them.

pub mod memory;
pub mod services;
pub mod types;

pub use memory::{ForumLoadError, MemoryForum};
pub use services::{
    CategoryService, DependencyError, ForumServices, PrivilegeService, ServiceResult,
    TopicHydrator, TopicIndex, UserService, with_timeout,
};
pub use types::{
    CategoryId, CategoryPrivilege, CategorySummary, GlobalCapability, SelectedCategory,
    SelectedCategoryData, TagAggregate, Topic, TopicId, Uid, UserSettings, Viewer,
};
