/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router, extract::{Request, State}, middleware::Next, response::{IntoResponse, Response},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode}
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use serde::{Deserialize,Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn};

pub mod ws_service;
pub use ws_service::{ViewerId, ViewerSink, ViewerRegistry, WsViewer, serve_viewer};

pub mod errors;
use errors::AeroServerResult;

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,

    /// origins (e.g. "http://localhost:3000") that are allowed to use our API. Empty means any
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new (sock_addr: SocketAddr, allowed_origins: Vec<String>)->Self {
        ServerConfig { sock_addr, allowed_origins }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.sock_addr)
    }
}

/// parse a comma separated origin list as it is given in the environment (ALLOWED_ORIGINS)
pub fn parse_origins (origins: &str)->Vec<String> {
    origins.split(',')
        .map( |s| s.trim().trim_end_matches('/'))
        .filter( |s| !s.is_empty())
        .map( |s| s.to_string())
        .collect()
}

/// spawn the axum server for `router`. The server shuts down gracefully once `cancel` is triggered
pub fn spawn_server_task (config: &ServerConfig, router: Router, cancel: CancellationToken) -> JoinHandle<AeroServerResult<()>> {
    let sock_addr = config.sock_addr;
    let router_svc = router.into_make_service_with_connect_info::<SocketAddr>();

    tokio::spawn( async move {
        let listener = tokio::net::TcpListener::bind(sock_addr).await?;
        info!("serving http://{}", listener.local_addr()?);

        axum::serve( listener, router_svc)
            .with_graceful_shutdown( async move { cancel.cancelled().await })
            .await?;

        info!("server on {} shut down", sock_addr);
        Ok(())
    })
}

//--- CORS and origin checks

/// CORS layer that allows GET requests from the configured origins, or from anywhere if there are none
pub fn cors_layer (allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods( [Method::GET, Method::OPTIONS])
        .allow_headers( [header::CONTENT_TYPE, header::AUTHORIZATION, header::IF_NONE_MATCH])
        .expose_headers( [header::ETAG]);

    if allowed_origins.is_empty() {
        layer.allow_origin( Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins.iter().filter_map( |o| {
            match HeaderValue::from_str(o) {
                Ok(hv) => Some(hv),
                Err(_) => { warn!("ignoring invalid origin {:?}", o); None }
            }
        }).collect();
        layer.allow_origin( AllowOrigin::list(origins))
    }
}

/// middleware that rejects requests from origins that are not in the allow-list with 403. This is
/// used for websocket routes, which are not covered by CORS
pub async fn check_origin (State(allowed_origins): State<Arc<Vec<String>>>, req: Request, next: Next) -> Response {
    if origin_allowed( &allowed_origins, req.headers()) {
        next.run(req).await
    } else {
        warn!("rejected request from origin {:?}", req.headers().get( header::ORIGIN));
        (StatusCode::FORBIDDEN, "origin not allowed").into_response()
    }
}

/// check the request `Origin` header against the allow-list. Requests without `Origin` are not
/// browser cross-site requests and pass, as does everything if there is no allow-list
pub fn origin_allowed (allowed_origins: &[String], headers: &HeaderMap) -> bool {
    if allowed_origins.is_empty() { return true }

    match headers.get( header::ORIGIN) {
        Some(origin) => {
            match origin.to_str() {
                Ok(origin) => {
                    let origin = origin.trim_end_matches('/');
                    allowed_origins.iter().any( |o| o == "*" || o.eq_ignore_ascii_case(origin))
                }
                Err(_) => false
            }
        }
        None => true
    }
}

//--- handler utility functions

/// does an `If-None-Match` header value match our (quoted) `etag`? This handles lists, weak
/// validators and the '*' wildcard
pub fn etag_matches (if_none_match: &str, etag: &str) -> bool {
    let etag = strip_weak( etag.trim());

    if_none_match.split(',').map( |s| s.trim()).any( |tag| {
        tag == "*" || strip_weak(tag) == etag
    })
}

fn strip_weak (tag: &str)->&str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// does the request carry an `If-None-Match` that matches `etag`
pub fn not_modified (headers: &HeaderMap, etag: &str) -> bool {
    headers.get( header::IF_NONE_MATCH)
        .and_then( |v| v.to_str().ok())
        .map( |inm| etag_matches( inm, etag))
        .unwrap_or(false)
}

pub fn server_error (msg: &str) -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
}

/// liveness probe handler
pub async fn healthz () -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// readiness probe response for a given readiness state
pub fn readiness (is_ready: bool) -> impl IntoResponse {
    if is_ready {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}
