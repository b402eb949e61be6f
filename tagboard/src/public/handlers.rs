// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error;
use crate::app_state::AppState;
use crate::forum::Viewer;
use crate::iam::AuthRequest;
use crate::tags::view::LinkTag;
use crate::tags::{
    QueryParams, TagPageError, TagPageView, normalize_cid_param, parse_category_filter,
    parse_page,
};
use crate::templates::{PageContext, render_minijinja_template};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{debug, error as log_error};
use serde::Serialize;

const CACHE_CONTROL_PAGE: &str = "private, no-cache";

pub async fn tag_index(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let viewer = req.viewer();
    match app_state.tag_index.render_tag_index(viewer).await {
        Ok(view) => render_page(&app_state, "tags.html", &view, &[]),
        Err(err) => {
            log_error!("Failed to build tag index for {}: {}", viewer, err);
            app_state
                .error_renderer
                .serve_tag_page_error(&err, Some(app_state.templates.as_ref()))
        }
    }
}

pub async fn tag_page(
    req: HttpRequest,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let viewer = req.viewer();
    let rendered = build_tag_page(&req, &path.into_inner(), &app_state, viewer).await;

    match rendered {
        Ok(view) => render_page(&app_state, "tag.html", &view, &view.link_tags),
        Err(err) => {
            match &err {
                TagPageError::Validation(message) => {
                    debug!("Rejected tag page request: {}", message)
                }
                TagPageError::Dependency(_) => {
                    log_error!("Failed to build tag page for {}: {}", viewer, err)
                }
            }
            app_state
                .error_renderer
                .serve_tag_page_error(&err, Some(app_state.templates.as_ref()))
        }
    }
}

async fn build_tag_page(
    req: &HttpRequest,
    raw_tag: &str,
    app_state: &AppState,
    viewer: Viewer,
) -> Result<TagPageView, TagPageError> {
    let query = QueryParams::parse(req.query_string())?;
    let page = parse_page(&query);
    let category_filter = parse_category_filter(normalize_cid_param(&query));
    debug!(
        "Tag page request '{}' page {} filter {:?} for {}",
        raw_tag, page, category_filter, viewer
    );
    app_state
        .tag_pages
        .render_tag_page(raw_tag, viewer, page, category_filter, &query)
        .await
}

pub async fn not_found(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    error::serve_404(
        &app_state.error_renderer,
        Some(app_state.templates.as_ref()),
    )
}

fn render_page<T: Serialize>(
    app_state: &AppState,
    template_name: &str,
    view: &T,
    link_tags: &[LinkTag],
) -> Result<HttpResponse> {
    let context = PageContext::new(
        app_state.error_renderer.app_name(),
        &app_state.tag_pages.config().relative_path,
        view,
    );
    let html = match render_minijinja_template(
        app_state.templates.as_ref(),
        template_name,
        context.to_value(),
    ) {
        Ok(html) => html,
        Err(e) => {
            log_error!("Failed to render {} template: {}", template_name, e);
            return error::serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            );
        }
    };

    let mut response = HttpResponse::Ok();
    response
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", CACHE_CONTROL_PAGE));
    if let Some(link_header) = link_header_value(link_tags) {
        response.insert_header(("Link", link_header));
    }
    Ok(response.body(html))
}

fn link_header_value(link_tags: &[LinkTag]) -> Option<String> {
    if link_tags.is_empty() {
        return None;
    }
    Some(
        link_tags
            .iter()
            .map(|link| format!("<{}>; rel=\"{}\"", link.href, link.rel))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
