// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::runtime_paths::{CONFIG_FILE_NAME, FORUM_FILE_NAME, RuntimePaths};

/// A forum with public, member-only and staff categories used across HTTP tests.
pub const SAMPLE_FORUM_YAML: &str = r#"
users:
  - uid: 1
    username: admin
    groups: [administrators]
  - uid: 2
    username: alice
    topics_per_page: 2
    read_topics: [102]
  - uid: 3
    username: bob
categories:
  - cid: 1
    name: General
    privileges:
      topics:read: [guests, registered-users]
  - cid: 2
    name: Members
    privileges:
      topics:read: [registered-users]
  - cid: 3
    name: Staff
    privileges:
      topics:read: [administrators]
topics:
  - tid: 101
    cid: 1
    uid: 2
    title: Getting started with Rust
    tags: [rust, beginners]
    timestamp: 1000
  - tid: 102
    cid: 1
    uid: 3
    title: Async traits in practice
    tags: [rust, async]
    timestamp: 2000
  - tid: 103
    cid: 2
    uid: 2
    title: Member meetup notes
    tags: [rust, meetup]
    timestamp: 3000
  - tid: 104
    cid: 3
    uid: 1
    title: Moderation backlog
    tags: [rust, staff]
    timestamp: 4000
global_privileges:
  search:tags: [registered-users]
"#;

#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_config(&self, yaml: &str) -> std::io::Result<()> {
        fs::write(self.path.join(CONFIG_FILE_NAME), yaml)
    }

    pub fn write_forum(&self, yaml: &str) -> std::io::Result<()> {
        fs::write(self.path.join(FORUM_FILE_NAME), yaml)
    }

    /// Writes a minimal config and the sample forum, then resolves the paths.
    pub fn runtime_paths(&self) -> std::io::Result<RuntimePaths> {
        self.write_config("server:\n  host: 127.0.0.1\n  port: 5466\napp:\n  name: Test Forum\n")?;
        self.write_forum(SAMPLE_FORUM_YAML)?;
        RuntimePaths::from_root(&self.path).map_err(|e| std::io::Error::other(e.to_string()))
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
