// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::TagPageError;
use crate::forum::CategoryId;
use log::debug;

pub const PAGE_PARAM: &str = "page";
pub const CID_PARAM: &str = "cid";
pub const CACHE_BUSTER_PARAM: &str = "_";

/// Decoded query parameters in request order. Repeated keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: &str) -> Result<Self, TagPageError> {
        let mut pairs = Vec::new();
        for part in raw.split('&') {
            if part.is_empty() {
                continue;
            }
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = decode_component(key).map_err(|err| {
                TagPageError::Validation(format!(
                    "Query parameter name is not valid UTF-8: {}",
                    err
                ))
            })?;
            if key.is_empty() {
                continue;
            }
            let value = decode_component(value).map_err(|err| {
                TagPageError::Validation(format!(
                    "Query parameter '{}' is not valid UTF-8: {}",
                    key, err
                ))
            })?;
            pairs.push((key, value));
        }
        Ok(Self { pairs })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(candidate, _)| key_matches(candidate, key))
            .map(|(_, value)| value.as_str())
    }

    /// All values for `key`, also accepting the bracketed `key[]` spelling.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(candidate, _)| key_matches(candidate, key))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(candidate, _)| !keys.iter().any(|key| key_matches(candidate, key)))
                .cloned()
                .collect(),
        }
    }

    /// Replaces every value of `key` with a single one, kept where the key first appeared.
    pub fn with(&self, key: &str, value: &str) -> Self {
        let position = self
            .pairs
            .iter()
            .position(|(candidate, _)| key_matches(candidate, key));
        let mut pairs: Vec<(String, String)> = self
            .pairs
            .iter()
            .filter(|(candidate, _)| !key_matches(candidate, key))
            .cloned()
            .collect();
        let entry = (key.to_string(), value.to_string());
        match position {
            Some(index) => pairs.insert(index, entry),
            None => pairs.push(entry),
        }
        Self { pairs }
    }

    /// Encoded form without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn key_matches(candidate: &str, key: &str) -> bool {
    candidate == key
        || candidate
            .strip_prefix(key)
            .is_some_and(|suffix| suffix == "[]")
}

fn decode_component(raw: &str) -> Result<String, std::string::FromUtf8Error> {
    urlencoding::decode(&raw.replace('+', " ")).map(|decoded| decoded.into_owned())
}

/// 1-based page number; absent, non-numeric and sub-1 values fall back to 1.
pub fn parse_page(query: &QueryParams) -> u64 {
    query
        .first(PAGE_PARAM)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(|page| page.max(1) as u64)
        .unwrap_or(1)
}

/// A scalar `cid` becomes a one-element sequence; absence stays `None`.
pub fn normalize_cid_param(query: &QueryParams) -> Option<Vec<String>> {
    let values: Vec<String> = query
        .get_all(CID_PARAM)
        .into_iter()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

/// A filter left empty after dropping non-numeric values counts as absent.
pub fn parse_category_filter(values: Option<Vec<String>>) -> Option<Vec<CategoryId>> {
    let values = values?;
    let cids: Vec<CategoryId> = values
        .iter()
        .filter_map(|value| match value.parse::<u64>() {
            Ok(cid) => Some(CategoryId(cid)),
            Err(_) => {
                debug!("Ignoring non-numeric cid filter value '{}'", value);
                None
            }
        })
        .collect();
    (!cids.is_empty()).then_some(cids)
}

/// `?`-prefixed query string with `key` set to `value`, or removed when `value` is `None`.
pub fn build_query_string(query: &QueryParams, key: &str, value: Option<&str>) -> String {
    let updated = match value {
        Some(value) => query.with(key, value),
        None => query.without(&[key]),
    };
    let updated = updated.without(&[CACHE_BUSTER_PARAM]);
    if updated.is_empty() {
        String::new()
    } else {
        format!("?{}", updated.to_query_string())
    }
}
