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
    Json, Router,
    extract::{ConnectInfo, Query, State, WebSocketUpgrade},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::warn;
use aerosim_server::{check_origin, cors_layer, healthz, not_modified, readiness, serve_viewer, server_error};

use crate::{simulator::FlightSimulator, snapshot::route_collection};

pub const DEFAULT_ROUTE_SEGMENTS: usize = 128;
pub const MAX_ROUTE_SEGMENTS: usize = 4096;

const AIRPORTS_CACHE_CONTROL: &str = "public, max-age=86400, immutable";
const ROUTE_CACHE_CONTROL: &str = "public, max-age=60";

#[derive(Clone)]
pub struct FlightServiceState {
    pub sim: Arc<FlightSimulator>,
    pub cancel: CancellationToken,
}

/// all HTTP and websocket routes of the flight server
pub fn router (sim: Arc<FlightSimulator>, allowed_origins: &[String], cancel: CancellationToken)->Router {
    let origins = Arc::new( allowed_origins.to_vec());
    let state = FlightServiceState { sim, cancel };

    Router::new()
        .route( "/ws/flights", get( ws_flights).layer( middleware::from_fn_with_state( origins, check_origin)))
        .route( "/geojson/airports", get( geojson_airports))
        .route( "/geojson/flights/route", get( geojson_flight_route))
        .route( "/healthz", get( healthz))
        .route( "/readyz", get( readyz))
        .layer( cors_layer( allowed_origins))
        .layer( TraceLayer::new_for_http())
        .with_state( state)
}

async fn ws_flights (ws: WebSocketUpgrade, ConnectInfo(remote_addr): ConnectInfo<SocketAddr>, State(state): State<FlightServiceState>)->Response {
    ws.on_failed_upgrade( move |e| warn!("websocket upgrade from {} failed: {}", remote_addr, e))
      .on_upgrade( move |socket| {
          let registry = state.sim.viewers().clone();
          let sim = state.sim.clone();
          serve_viewer( socket, remote_addr, registry, state.cancel.clone(), move |sink| sim.connect_viewer( sink))
      })
}

async fn geojson_airports (State(state): State<FlightServiceState>, headers: HeaderMap)->Response {
    let airports = state.sim.airports();
    if !airports.is_loaded() {
        return server_error("airport data not loaded").into_response()
    }

    let data = airports.snapshot();
    let etag = format!("\"{}\"", data.fingerprint());
    let cache_headers = [
        (header::CACHE_CONTROL, AIRPORTS_CACHE_CONTROL.to_string()),
        (header::ETAG, etag.clone()),
    ];

    if not_modified( &headers, &etag) {
        (StatusCode::NOT_MODIFIED, cache_headers).into_response()
    } else {
        (cache_headers, [(header::CONTENT_TYPE, "application/json")], data.raw_bytes().clone()).into_response()
    }
}

#[derive(Deserialize,Debug,Default)]
pub struct RouteQuery {
    pub id: Option<String>,
    pub n: Option<String>,
}

/// number of route segments from the `n` query parameter. Missing, non-numeric and non-positive
/// values yield the default, large values are capped
pub fn route_segments (n: Option<&str>)->usize {
    match n.map( |s| s.trim().parse::<i64>()) {
        Some(Ok(n)) if n > 0 => (n as u64).min( MAX_ROUTE_SEGMENTS as u64) as usize,
        _ => DEFAULT_ROUTE_SEGMENTS
    }
}

async fn geojson_flight_route (State(state): State<FlightServiceState>, Query(query): Query<RouteQuery>)->Response {
    let Some(id) = query.id.filter( |id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing required parameter: id").into_response()
    };
    let n = route_segments( query.n.as_deref());

    let Some(flight) = state.sim.table().get( &id) else {
        return (StatusCode::NOT_FOUND, "flight not found").into_response()
    };

    let airports = state.sim.airports().snapshot();
    let (Some(from),Some(to)) = (airports.position( &flight.departure_airport), airports.position( &flight.arrival_airport)) else {
        return server_error("airport data not found").into_response()
    };

    let fc = route_collection( &flight, &from, &to, n);
    ([(header::CACHE_CONTROL, ROUTE_CACHE_CONTROL)], Json(fc)).into_response()
}

async fn readyz (State(state): State<FlightServiceState>)->Response {
    readiness( state.sim.is_ready()).into_response()
}
