// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest};
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use crate::config::ValidatedConfig;
use crate::forum::Viewer;

/// Trait to read the resolved viewer from an HttpRequest
pub trait AuthRequest {
    fn viewer(&self) -> Viewer;

    fn is_authenticated(&self) -> bool {
        !self.viewer().is_anonymous()
    }
}

impl AuthRequest for HttpRequest {
    fn viewer(&self) -> Viewer {
        self.extensions().get::<Viewer>().copied().unwrap_or_default()
    }
}

/// Parses a trusted uid header value. Anything but a plain positive integer is anonymous.
pub fn viewer_from_header(value: Option<&str>) -> Viewer {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<u64>() {
            Ok(uid) => Viewer::from_uid(uid),
            Err(_) => {
                log::debug!("Ignoring malformed uid header value '{}'", raw);
                Viewer::Anonymous
            }
        },
        _ => Viewer::Anonymous,
    }
}

// Viewer resolution middleware
pub struct ViewerMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for ViewerMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ViewerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ViewerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ViewerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ViewerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let uid_header = req
            .app_data::<Data<ValidatedConfig>>()
            .and_then(|config| config.auth.uid_header.clone());

        let viewer = match uid_header {
            Some(header) => viewer_from_header(
                req.headers()
                    .get(header.as_str())
                    .and_then(|value| value.to_str().ok()),
            ),
            None => Viewer::Anonymous,
        };
        req.extensions_mut().insert(viewer);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
