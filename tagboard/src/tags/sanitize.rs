// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use std::fmt;

pub const DEFAULT_MAXIMUM_TAG_LENGTH: usize = 15;

const STRIPPED_CHARACTERS: &[char] = &[
    ',', '/', '#', '!', '$', '^', '*', ';', ':', '{', '}', '=', '_', '`', '<', '>', '\'', '"',
    '~', '(', ')', '?', '|', '\u{202E}',
];

const ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
    ('\\', "&#x5C;"),
    ('`', "&#96;"),
];

/// A tag that has been cleaned and HTML-escaped, safe to echo and to use as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Never fails: empty or oversized input is cleaned or truncated.
    /// Escaped input is decoded first, so sanitizing twice is a no-op.
    pub fn sanitize(raw: &str, maximum_length: usize) -> Self {
        let decoded = unescape_html(raw);
        let cleaned = clean_up_tag(&decoded, maximum_length);
        TagName(escape_html(&cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Percent-encoded form for building `/tags/{tag}` URLs.
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn clean_up_tag(tag: &str, maximum_length: usize) -> String {
    let lowered = tag.trim().to_lowercase();
    let capped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_CHARACTERS.contains(c))
        .take(maximum_length)
        .collect();
    capped
        .trim_matches(|c: char| c == '.' || c == '-' || c.is_whitespace())
        .to_string()
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ENTITIES.iter().find(|(raw, _)| *raw == ch) {
            Some((_, entity)) => escaped.push_str(entity),
            None => escaped.push(ch),
        }
    }
    escaped
}

pub fn unescape_html(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(position) = rest.find('&') {
        decoded.push_str(&rest[..position]);
        rest = &rest[position..];
        match ENTITIES
            .iter()
            .find(|(_, entity)| rest.starts_with(entity))
        {
            Some((raw, entity)) => {
                decoded.push(*raw);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_up_trims_and_lowercases() {
        assert_eq!(clean_up_tag("  Rust  ", 15), "rust");
    }

    #[test]
    fn clean_up_strips_punctuation_and_direction_override() {
        assert_eq!(clean_up_tag("he<ll>o,\u{202E}wor/ld?", 30), "helloworld");
    }

    #[test]
    fn clean_up_truncates_to_maximum_length() {
        assert_eq!(clean_up_tag("abcdefghijklmnopqrstuvwxyz", 15), "abcdefghijklmno");
    }

    #[test]
    fn clean_up_strips_dots_and_dashes_at_the_edges() {
        assert_eq!(clean_up_tag("--.node.js.-", 20), "node.js");
        assert_eq!(clean_up_tag("- .a", 20), "a");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(TagName::sanitize("", 15).is_empty());
        assert!(TagName::sanitize("  ?!  ", 15).is_empty());
    }

    #[test]
    fn sanitize_escapes_ampersands() {
        assert_eq!(TagName::sanitize("R&D", 15).as_str(), "r&amp;d");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "R&D",
            "  <b>Bold</b>  ",
            "back\\slash",
            "&amp;&amp;",
            "a&lt;b",
            "Ünïcödé-tag",
            "aaaaaaaaaaaaaaaaaaaaaaa&",
            "-.-",
            "&#x5C;&",
        ];
        for input in inputs {
            let once = TagName::sanitize(input, 15);
            let twice = TagName::sanitize(once.as_str(), 15);
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn length_cap_applies_before_escaping() {
        let tag = TagName::sanitize("&&&&&&&&&&&&&&&&&&&&", 3);
        assert_eq!(tag.as_str(), "&amp;&amp;&amp;");
    }

    #[test]
    fn unescape_leaves_unknown_entities_alone() {
        assert_eq!(unescape_html("&copy; &amp; &"), "&copy; & &");
    }

    #[test]
    fn path_segment_is_percent_encoded() {
        let tag = TagName::sanitize("c++ tips", 15);
        assert_eq!(tag.path_segment(), "c%2B%2B%20tips");
    }
}
