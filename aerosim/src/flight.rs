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

use std::fmt;
use chrono::{DateTime,Utc};
use rand::Rng;
use serde::{Serialize,Deserialize};
use aerosim_common::{
    clamp,
    datetime::{add_secs_f64, ser_rfc3339_secs},
    geo::{self, GeoPos, Velocity3, ARRIVAL_THRESHOLD_NM}
};

use crate::airports::AirportData;

pub const SPEED_TAKEOFF: f64 = 10_000.0;
pub const SPEED_CLIMB: f64 = 18_000.0;
pub const SPEED_CRUISE: f64 = 30_000.0;
pub const SPEED_DESCENT: f64 = 21_000.0;
pub const SPEED_LANDING: f64 = 15_000.0;

/// distance (nm) at which every flight is slowed down to landing speed
pub const APPROACH_DISTANCE: f64 = 50.0;

const SCHEDULED_DURATION_SECS: f64 = 6.0 * 3600.0;
const MAX_ETA_JITTER_SECS: f64 = 15.0 * 60.0;
const MIN_INITIAL_ALTITUDE: f64 = 2000.0;
const MAX_INITIAL_ALTITUDE: f64 = 10000.0;

#[derive(Debug,Clone)]
pub struct Airline {
    pub name: &'static str,
    pub icao: &'static str,
}

pub static AIRLINES: [Airline;6] = [
    Airline { name: "United", icao: "UAL" },
    Airline { name: "American", icao: "AAL" },
    Airline { name: "Delta", icao: "DAL" },
    Airline { name: "Southwest", icao: "SWA" },
    Airline { name: "JetBlue", icao: "JBU" },
    Airline { name: "Alaska", icao: "ASA" },
];

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash)]
#[serde(rename_all="lowercase")]
pub enum Phase {
    Takeoff,
    Climb,
    Cruise,
    Descent,
    Landing,
    Landed
}

impl Phase {
    pub fn nominal_speed (&self)->f64 {
        match self {
            Phase::Takeoff => SPEED_TAKEOFF,
            Phase::Climb => SPEED_CLIMB,
            Phase::Cruise => SPEED_CRUISE,
            Phase::Descent => SPEED_DESCENT,
            Phase::Landing => SPEED_LANDING,
            Phase::Landed => 0.0
        }
    }

    pub fn is_landed (&self)->bool { *self == Phase::Landed }

    pub fn as_str (&self)->&'static str {
        match self {
            Phase::Takeoff => "takeoff",
            Phase::Climb => "climb",
            Phase::Cruise => "cruise",
            Phase::Descent => "descent",
            Phase::Landing => "landing",
            Phase::Landed => "landed"
        }
    }

    /// the phase a flight should be in given its current kinematics. First matching rule wins
    pub fn evaluate (f: &FlightState)->Phase {
        let (progress, alt, speed, remaining) = (f.progress, f.altitude, f.speed, f.distance_remaining);

        if f.phase == Phase::Landed {
            Phase::Landed
        } else if progress < 0.15 && alt < 15000.0 && speed < 15000.0 {
            Phase::Takeoff
        } else if progress < 0.25 && alt < 40000.0 {
            Phase::Climb
        } else if (remaining < 50.0 || progress > 0.90) && alt < 8000.0 && speed < 21000.0 {
            Phase::Landing
        } else if progress > 0.75 && (alt < 45000.0 || remaining < 200.0) {
            Phase::Descent
        } else {
            Phase::Cruise
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct FlightState {
    pub id: String,
    pub call_sign: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,

    pub phase: Phase,
    pub position: GeoPos,
    pub velocity: Velocity3,
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
    pub trace_id: String,
}

pub fn flight_id (call_sign: &str, departure: &str, arrival: &str)->String {
    format!("{}-{}-{}", call_sign, departure, arrival)
}

/// create a new flight at the departure airport, or `None` if departure and arrival are the same
/// or either of them is not a known airport
pub fn create_flight<R: Rng> (airports: &AirportData, departure: &str, arrival: &str, airline: &str, call_sign: &str,
                              now: DateTime<Utc>, rng: &mut R, trace_id: String)->Option<FlightState>
{
    if departure == arrival { return None }
    let from = airports.position( departure)?;
    let to = airports.position( arrival)?;

    let altitude = rng.random_range( MIN_INITIAL_ALTITUDE..=MAX_INITIAL_ALTITUDE);
    let position = from.with_altitude( altitude);
    let phase = Phase::Takeoff;
    let speed = phase.nominal_speed();
    let bearing = geo::bearing( &from, &to);

    let scheduled_arrival = add_secs_f64( &now, SCHEDULED_DURATION_SECS);
    let estimated_arrival = add_secs_f64( &scheduled_arrival, rng.random_range( -MAX_ETA_JITTER_SECS..=MAX_ETA_JITTER_SECS));

    Some( FlightState {
        id: flight_id( call_sign, departure, arrival),
        call_sign: call_sign.to_string(),
        airline: airline.to_string(),
        departure_airport: departure.to_string(),
        arrival_airport: arrival.to_string(),
        phase,
        position,
        velocity: geo::velocity_from_speed_bearing( speed, bearing),
        bearing,
        speed,
        altitude,
        progress: 0.0,
        distance_remaining: geo::distance( &position, &to),
        scheduled_departure: now,
        scheduled_arrival,
        estimated_arrival,
        last_computed_at: now,
        trace_id
    })
}

impl FlightState {
    pub fn is_landed (&self)->bool { self.phase.is_landed() }

    /// advance a non-landed flight by `dt` seconds along the great circle from `from` to `to`.
    /// Landed flights only get their bookkeeping refreshed
    pub fn advance (&mut self, from: &GeoPos, to: &GeoPos, dt: f64, now: DateTime<Utc>, trace_id: String) {
        if self.is_landed() {
            self.touch( now, trace_id);
            return
        }

        self.position = geo::step( &self.position, to, self.speed, dt);
        self.bearing = geo::bearing( &self.position, to);
        self.velocity = geo::velocity_from_speed_bearing( self.speed, self.bearing);
        self.altitude = self.position.altitude;

        self.distance_remaining = geo::distance( &self.position, to);
        let total = geo::distance( from, to);
        if total > ARRIVAL_THRESHOLD_NM {
            self.progress = clamp( 1.0 - self.distance_remaining / total, 0.0, 1.0);
        }

        if self.distance_remaining < APPROACH_DISTANCE {
            self.speed = SPEED_LANDING;
        }

        if self.speed > 50.0 {
            let hours = self.distance_remaining / self.speed;
            self.estimated_arrival = add_secs_f64( &now, hours * 3600.0);
        }

        let phase = Phase::evaluate( self);
        if phase != self.phase {
            self.phase = phase;
            self.speed = phase.nominal_speed();
        }

        if (self.distance_remaining < 15.0 && self.altitude < 500.0 && self.speed < 15000.0) || self.progress >= 1.0 {
            self.phase = Phase::Landed;
            self.distance_remaining = 0.0;
            self.progress = 1.0;
        }

        self.touch( now, trace_id);
    }

    pub fn touch (&mut self, now: DateTime<Utc>, trace_id: String) {
        self.last_computed_at = now;
        self.trace_id = trace_id;
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.3} {:.1}nm {}", self.id, self.phase, self.progress, self.distance_remaining, self.position)
    }
}
