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

//! typed GeoJSON for flight positions and routes, and the `flights_geojson` websocket envelope

use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use chrono::{DateTime,Utc};
use serde::Serialize;
use aerosim_common::{datetime::{ser_rfc3339_secs, epoch_millis}, geo::{great_circle_coords, GeoPos}};

use crate::{errors::Result, flight::{FlightState, Phase}, flight_table::FlightTable};

#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(tag="type")]
pub enum Geometry {
    Point { coordinates: [f64;3] },
    LineString { coordinates: Vec<[f64;2]> },
}

#[derive(Serialize,Debug,Clone)]
#[serde(tag="type", rename="Feature")]
pub struct Feature<P> {
    pub geometry: Geometry,
    pub properties: P,
}

#[derive(Serialize,Debug,Clone)]
#[serde(tag="type", rename="FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new (features: Vec<Feature<P>>)->Self { FeatureCollection { features } }

    pub fn len (&self)->usize { self.features.len() }
}

#[derive(Serialize,Debug,Clone)]
#[serde(rename_all="camelCase")]
pub struct FlightProperties<'a> {
    pub id: &'a str,
    pub call_sign: &'a str,
    pub airline: &'a str,
    pub departure_airport: &'a str,
    pub arrival_airport: &'a str,
    pub phase: Phase,
    pub bearing: f64,
    pub speed: f64,
    pub altitude: f64,
    pub progress: f64,
    pub distance_remaining: f64,
    #[serde(serialize_with="ser_rfc3339_secs")]
    pub scheduled_departure: DateTime<Utc>,
    #[serde(serialize_with="ser_rfc3339_secs")]
    pub scheduled_arrival: DateTime<Utc>,
    #[serde(serialize_with="ser_rfc3339_secs")]
    pub estimated_arrival: DateTime<Utc>,
    #[serde(serialize_with="ser_rfc3339_secs")]
    pub last_computed_at: DateTime<Utc>,
    #[serde(rename="traceID")]
    pub trace_id: &'a str,
}

impl<'a> From<&'a FlightState> for Feature<FlightProperties<'a>> {
    fn from (f: &'a FlightState)->Self {
        Feature {
            geometry: Geometry::Point { coordinates: f.position.lon_lat_alt() },
            properties: FlightProperties {
                id: &f.id,
                call_sign: &f.call_sign,
                airline: &f.airline,
                departure_airport: &f.departure_airport,
                arrival_airport: &f.arrival_airport,
                phase: f.phase,
                bearing: f.bearing,
                speed: f.speed,
                altitude: f.altitude,
                progress: f.progress,
                distance_remaining: f.distance_remaining,
                scheduled_departure: f.scheduled_departure,
                scheduled_arrival: f.scheduled_arrival,
                estimated_arrival: f.estimated_arrival,
                last_computed_at: f.last_computed_at,
                trace_id: &f.trace_id,
            }
        }
    }
}

#[derive(Serialize,Debug,Clone)]
#[serde(rename_all="camelCase")]
pub struct RouteProperties {
    pub id: String,
    pub call_sign: String,
    pub from: String,
    pub to: String,
}

/// the message we send to viewers
#[derive(Serialize,Debug)]
#[serde(tag="type", rename="flights_geojson", rename_all="camelCase")]
pub struct FlightsMessage<'a> {
    pub feature_collection: FeatureCollection<FlightProperties<'a>>,
    pub seq: u64,
    pub server_timestamp: i64,
}

pub fn flight_collection (flights: &[FlightState])->FeatureCollection<FlightProperties<'_>> {
    FeatureCollection::new( flights.iter().map( Feature::from).collect())
}

pub fn encode_flights (flights: &[FlightState], seq: u64, server_timestamp: i64)->Result<String> {
    let msg = FlightsMessage { feature_collection: flight_collection( flights), seq, server_timestamp };
    Ok( serde_json::to_string( &msg)? )
}

/// great circle LineString between the departure and arrival airports of `flight` with `n` segments
pub fn route_collection (flight: &FlightState, from: &GeoPos, to: &GeoPos, n: usize)->FeatureCollection<RouteProperties> {
    let feature = Feature {
        geometry: Geometry::LineString { coordinates: great_circle_coords( from, to, n) },
        properties: RouteProperties {
            id: flight.id.clone(),
            call_sign: flight.call_sign.clone(),
            from: flight.departure_airport.clone(),
            to: flight.arrival_airport.clone(),
        }
    };
    FeatureCollection::new( vec![feature])
}

/// encodes flight table snapshots. Broadcast updates get increasing sequence numbers starting at 1,
/// initial snapshots for new viewers always have `seq` 0
pub struct SnapshotEncoder {
    table: Arc<FlightTable>,
    seq: AtomicU64,
}

impl SnapshotEncoder {
    pub fn new (table: Arc<FlightTable>)->Self {
        SnapshotEncoder { table, seq: AtomicU64::new(0) }
    }

    /// last used broadcast sequence number
    pub fn seq (&self)->u64 { self.seq.load( Ordering::Relaxed) }

    pub fn encode_initial (&self)->Result<String> {
        let flights = self.table.snapshot();
        encode_flights( &flights, 0, epoch_millis())
    }

    pub fn encode_update (&self)->Result<String> {
        let seq = self.seq.fetch_add( 1, Ordering::Relaxed) + 1;
        let flights = self.table.snapshot();
        encode_flights( &flights, seq, epoch_millis())
    }
}
