// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::query::{CACHE_BUSTER_PARAM, PAGE_PARAM, QueryParams};
use serde::Serialize;
use std::num::NonZeroU64;

/// Zero-based inclusive offsets of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub stop: u64,
}

impl PageWindow {
    pub fn new(page: u64, page_size: NonZeroU64) -> Self {
        let page = page.max(1);
        let start = (page - 1).saturating_mul(page_size.get());
        let stop = start.saturating_add(page_size.get() - 1);
        Self { start, stop }
    }
}

pub fn page_count(total: u64, page_size: NonZeroU64) -> u64 {
    total.div_ceil(page_size.get()).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: u64,
    pub active: bool,
    pub qs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageEntry {
    Page(PageLink),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelLink {
    pub rel: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u64,
    pub page_count: u64,
    pub prev: PageLink,
    pub next: PageLink,
    pub first: PageLink,
    pub last: PageLink,
    pub pages: Vec<PageEntry>,
    pub rel: Vec<RelLink>,
}

pub fn paginate(page: u64, total: u64, page_size: NonZeroU64, query: &QueryParams) -> Pagination {
    create(page, page_count(total, page_size), query)
}

/// Builds navigation for `current_page` of `page_count`. The page is not
/// validated against the count; out of range pages simply have no active entry.
pub fn create(current_page: u64, page_count: u64, query: &QueryParams) -> Pagination {
    let page_count = page_count.max(1);
    let base = query.without(&[CACHE_BUSTER_PARAM]);
    let qs_for = |page: u64| base.with(PAGE_PARAM, &page.to_string()).to_query_string();
    let link = |page: u64, active: bool| PageLink {
        page,
        active,
        qs: qs_for(page),
    };

    let previous = current_page.saturating_sub(1).clamp(1, page_count);
    let next = current_page.saturating_add(1).clamp(1, page_count);

    // A single page links nowhere, whatever page was asked for.
    let mut rel = Vec::new();
    if page_count > 1 && current_page < page_count {
        rel.push(RelLink {
            rel: "next".to_string(),
            href: format!("?{}", qs_for(next)),
        });
    }
    if page_count > 1 && current_page > 1 {
        rel.push(RelLink {
            rel: "prev".to_string(),
            href: format!("?{}", qs_for(previous)),
        });
    }

    let pages = if page_count > 1 {
        numbered_pages(current_page, page_count)
            .into_iter()
            .map(|entry| match entry {
                Some(page) => PageEntry::Page(link(page, page == current_page)),
                None => PageEntry::Separator,
            })
            .collect()
    } else {
        Vec::new()
    };

    Pagination {
        current_page,
        page_count,
        prev: link(previous, current_page > 1),
        next: link(next, current_page < page_count),
        first: link(1, current_page == 1),
        last: link(page_count, current_page == page_count),
        pages,
        rel,
    }
}

/// First two, last two and a five page window around the current page.
/// `None` marks a gap of more than one page.
fn numbered_pages(current_page: u64, page_count: u64) -> Vec<Option<u64>> {
    let count = page_count as i64;
    let current = current_page.min(i64::MAX as u64) as i64;

    let mut start = (current - 2).max(1);
    if start > count - 5 {
        start -= 2 - (count - current);
    }

    let mut shown: Vec<i64> = vec![1, 2, count - 1, count];
    shown.extend(start..start + 5);
    shown.retain(|page| *page > 0 && *page <= count);
    shown.sort_unstable();
    shown.dedup();

    let mut entries = Vec::with_capacity(shown.len() + 2);
    let mut last_shown: Option<i64> = None;
    for page in shown {
        if let Some(previous) = last_shown {
            match page - previous {
                1 => {}
                2 => entries.push(Some((page - 1) as u64)),
                _ => entries.push(None),
            }
        }
        entries.push(Some(page as u64));
        last_shown = Some(page);
    }
    entries
}
