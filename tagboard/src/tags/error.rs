// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::forum::DependencyError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPageError {
    /// The request itself could not be interpreted.
    Validation(String),
    Dependency(DependencyError),
}

impl fmt::Display for TagPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPageError::Validation(message) => write!(f, "Invalid request: {}", message),
            TagPageError::Dependency(err) => write!(f, "Dependency error: {}", err),
        }
    }
}

impl std::error::Error for TagPageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagPageError::Validation(_) => None,
            TagPageError::Dependency(err) => Some(err),
        }
    }
}

impl From<DependencyError> for TagPageError {
    fn from(err: DependencyError) -> Self {
        TagPageError::Dependency(err)
    }
}
