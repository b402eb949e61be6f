// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::tags::TagPageError;
use crate::templates::{ErrorPageContext, TemplateEngine, render_minijinja_template};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder, Result};

#[derive(Clone)]
pub struct ErrorRenderer {
    app_name: String,
    relative_path: String,
}

impl ErrorRenderer {
    pub fn new(app_name: String, relative_path: String) -> Self {
        Self {
            app_name,
            relative_path,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Maps a failed tag page render to the matching error page.
    pub fn serve_tag_page_error(
        &self,
        error: &TagPageError,
        template_engine: Option<&dyn TemplateEngine>,
    ) -> Result<HttpResponse> {
        match error {
            TagPageError::Validation(message) => serve_400(self, message, template_engine),
            TagPageError::Dependency(_) => serve_500(self, template_engine),
        }
    }
}

pub fn serve_400(
    renderer: &ErrorRenderer,
    message: &str,
    template_engine: Option<&dyn TemplateEngine>,
) -> Result<HttpResponse> {
    let context = ErrorPageContext::new(&renderer.app_name, &renderer.relative_path)
        .with_message(message);
    serve_error_page(
        StatusCode::BAD_REQUEST,
        "error_400.html",
        context,
        template_engine,
        || fallback_html("400 - Bad Request", &renderer.app_name),
    )
}

pub fn serve_404(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> Result<HttpResponse> {
    let context = ErrorPageContext::new(&renderer.app_name, &renderer.relative_path);
    serve_error_page(
        StatusCode::NOT_FOUND,
        "error_404.html",
        context,
        template_engine,
        || fallback_html("404 - Page Not Found", &renderer.app_name),
    )
}

pub fn serve_500(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> Result<HttpResponse> {
    let context = ErrorPageContext::new(&renderer.app_name, &renderer.relative_path);
    serve_error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error_500.html",
        context,
        template_engine,
        || fallback_html("500 - Internal Server Error", &renderer.app_name),
    )
}

fn serve_error_page(
    status: StatusCode,
    template_name: &str,
    context: ErrorPageContext,
    template_engine: Option<&dyn TemplateEngine>,
    fallback: impl FnOnce() -> String,
) -> Result<HttpResponse> {
    let html = match template_engine {
        Some(engine) => match render_minijinja_template(engine, template_name, context.to_value())
        {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to render {} template: {}", template_name, e);
                fallback()
            }
        },
        None => fallback(),
    };

    Ok(HttpResponseBuilder::new(status)
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .insert_header(("Pragma", "no-cache"))
        .insert_header(("Expires", "0"))
        .body(html))
}

fn fallback_html(heading: &str, app_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{} | {}</title></head>
<body><h1>{}</h1></body></html>"#,
        heading,
        crate::tags::sanitize::escape_html(app_name),
        heading
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::DependencyError;
    use crate::templates::MiniJinjaEngine;
    use actix_web::body::to_bytes;

    fn renderer() -> ErrorRenderer {
        ErrorRenderer::new("Test Forum".to_string(), String::new())
    }

    #[actix_web::test]
    async fn validation_errors_render_400_with_message() {
        let engine = MiniJinjaEngine::new();
        let error = TagPageError::Validation("bad cid".to_string());
        let response = renderer()
            .serve_tag_page_error(&error, Some(&engine))
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("Cache-Control").and_then(|v| v.to_str().ok()),
            Some("no-cache, no-store, must-revalidate")
        );
        let body = to_bytes(response.into_body()).await.expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(html.contains("bad cid"));
    }

    #[actix_web::test]
    async fn dependency_errors_render_generic_500() {
        let engine = MiniJinjaEngine::new();
        let error = TagPageError::Dependency(DependencyError::unavailable(
            "topics.get_topics",
            "secret backend detail",
        ));
        let response = renderer()
            .serve_tag_page_error(&error, Some(&engine))
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(!html.contains("secret backend detail"));
        assert!(html.contains("500"));
    }

    #[actix_web::test]
    async fn missing_engine_uses_fallback() {
        let response = serve_404(&renderer(), None).expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(html.contains("404 - Page Not Found | Test Forum"));
    }
}
