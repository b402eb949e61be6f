// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Tag page and tag index assembly.

pub mod error;
pub mod index;
pub mod page;
pub mod pagination;
pub mod query;
pub mod sanitize;
pub mod view;
pub mod visibility;

pub use error::TagPageError;
pub use index::{TAG_INDEX_PAGE_SIZE, TagIndexAssembler};
pub use page::{TagPageAssembler, TagPageConfig, calculate_topic_indices};
pub use pagination::{PageWindow, Pagination, page_count, paginate};
pub use query::{QueryParams, normalize_cid_param, parse_category_filter, parse_page};
pub use sanitize::{TagName, clean_up_tag};
pub use view::{TagIndexView, TagPageView};
pub use visibility::resolve_cids;
