// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Demotes (or promotes) records from one target prefix at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub target_prefix: &'static str,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub const fn new(target_prefix: &'static str, from: Level, to: Level) -> Self {
        Self {
            target_prefix,
            from,
            to,
        }
    }
}

/// actix-server announces every worker start at info.
pub const DEFAULT_LEVEL_RULES: &[LevelRule] =
    &[LevelRule::new("actix_server", Level::Info, Level::Debug)];

struct LevelModifierLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl LevelModifierLogger {
    fn adjusted_level(&self, target: &str, level: Level) -> Level {
        self.rules
            .iter()
            .find(|rule| rule.from == level && target.starts_with(rule.target_prefix))
            .map(|rule| rule.to)
            .unwrap_or(level)
    }
}

impl Log for LevelModifierLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let adjusted = Metadata::builder()
            .level(self.adjusted_level(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&adjusted)
    }

    fn log(&self, record: &Record) {
        let level = self.adjusted_level(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs `logger` as the global logger with `rules` applied in front of it.
pub fn init_logger(rules: &[LevelRule], logger: Logger) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LevelModifierLogger {
        inner: logger,
        rules: rules.to_vec(),
    }))?;
    // The inner logger filters after rules are applied.
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
