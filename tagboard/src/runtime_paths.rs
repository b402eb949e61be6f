// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const FORUM_FILE_NAME: &str = "forum.yaml";

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub forum_file: PathBuf,
}

impl RuntimePaths {
    /// Resolves the runtime root. Both files must already exist.
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let config_file = root_canonical.join(CONFIG_FILE_NAME);
        ensure_file_exists(&config_file)?;
        let forum_file = root_canonical.join(FORUM_FILE_NAME);
        ensure_file_exists(&forum_file)?;

        Ok(Self {
            root: root_canonical,
            config_file,
            forum_file,
        })
    }
}

fn ensure_file_exists(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::LoadError(format!(
            "Required file '{}' does not exist",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use std::fs;

    #[test]
    fn resolves_files_under_the_root() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths").expect("fixture");
        fs::write(fixture.path().join(CONFIG_FILE_NAME), "").expect("config");
        fs::write(fixture.path().join(FORUM_FILE_NAME), "").expect("forum");

        let paths = RuntimePaths::from_root(fixture.path()).expect("paths");
        assert!(paths.root.is_absolute());
        assert!(paths.config_file.ends_with(CONFIG_FILE_NAME));
        assert!(paths.forum_file.ends_with(FORUM_FILE_NAME));
    }

    #[test]
    fn missing_forum_file_is_reported() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths-missing").expect("fixture");
        fs::write(fixture.path().join(CONFIG_FILE_NAME), "").expect("config");

        match RuntimePaths::from_root(fixture.path()) {
            Err(ConfigError::LoadError(msg)) => assert!(msg.contains(FORUM_FILE_NAME)),
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
