// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Value, context};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    app_name: String,
    relative_path: String,
    message: Option<String>,
}

impl ErrorPageContext {
    pub fn new(app_name: &str, relative_path: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            relative_path: relative_path.to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            relative_path => &self.relative_path,
            message => &self.message
        }
    }
}

/// Site-wide values merged with one page's view-model.
#[derive(Debug, Serialize)]
pub struct PageContext<'a, T: Serialize> {
    pub app_name: &'a str,
    pub relative_path: &'a str,
    #[serde(flatten)]
    pub page: &'a T,
}

impl<'a, T: Serialize> PageContext<'a, T> {
    pub fn new(app_name: &'a str, relative_path: &'a str, page: &'a T) -> Self {
        Self {
            app_name,
            relative_path,
            page,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::from_serialize(self)
    }
}
