// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod error;
pub mod handlers;

/// Mounts the tag routes below `relative_path` (empty for the site root).
pub fn configure(cfg: &mut web::ServiceConfig, relative_path: &str) {
    cfg.service(
        web::scope(relative_path)
            .route("/tags", web::get().to(handlers::tag_index))
            .route("/tags/{tag}", web::get().to(handlers::tag_page)),
    );
}
