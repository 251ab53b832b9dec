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

use chrono::{DateTime,Utc};
use rand::{Rng, rngs::StdRng};
use tracing::debug;

use crate::{
    airports::AirportData,
    flight::{create_flight, AIRLINES},
    flight_table::FlightTable,
    trace::{new_trace_id, seeded_rng}
};

/// number of arrival redraws before we fall back to scanning the code list
const MAX_ARRIVAL_DRAWS: usize = 8;

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SpawnPlan {
    /// seconds that have to pass since the last burst
    pub interval: f64,
    pub burst: usize,
}

/// keeps the number of flights around `target` by spawning randomized bursts at a rate that
/// decreases as the table fills up, and never more than `target + band` flights
pub struct PopulationController {
    target: usize,
    band: usize,
    last_spawn_at: DateTime<Utc>,
    rng: StdRng,
}

impl PopulationController {
    pub fn new (target: usize, band: usize, now: DateTime<Utc>)->Self {
        PopulationController::with_rng( target, band, now, seeded_rng())
    }

    pub fn with_rng (target: usize, band: usize, now: DateTime<Utc>, rng: StdRng)->Self {
        PopulationController { target, band, last_spawn_at: now, rng }
    }

    pub fn target (&self)->usize { self.target }

    pub fn ceiling (&self)->usize { self.target + self.band }

    pub fn last_spawn_at (&self)->DateTime<Utc> { self.last_spawn_at }

    /// spawn interval and burst size for a given flight count, `None` if we are at or above the ceiling
    pub fn schedule (&mut self, count: usize)->Option<SpawnPlan> {
        if count >= self.ceiling() {
            None

        } else if count < self.target {
            let p = count as f64 / self.target as f64;
            let burst = (30.0 - 25.0*p + self.rng.random_range(0.0..10.0)).round().max(0.0) as usize;
            Some( SpawnPlan { interval: 5.0 + 15.0*p, burst })

        } else {
            let burst = (5.0 + self.rng.random_range(0.0f64..10.0)).round() as usize;
            Some( SpawnPlan { interval: 30.0, burst })
        }
    }

    /// called once per tick before flights are advanced. Returns the number of new flights
    pub fn regulate (&mut self, now: DateTime<Utc>, table: &FlightTable, airports: &AirportData)->usize {
        let count = table.count();
        let Some(plan) = self.schedule( count) else { return 0 };

        let elapsed = (now - self.last_spawn_at).num_milliseconds() as f64 / 1000.0;
        if elapsed < plan.interval { return 0 }

        let burst = plan.burst.min( self.ceiling().saturating_sub( count));
        let n = self.spawn_burst( burst, now, table, airports);
        self.last_spawn_at = now;

        debug!("spawned {} of {} planned flights ({} total)", n, plan.burst, count + n);
        n
    }

    /// create up to `n` random flights between known airports. Returns the number of flights added
    pub fn spawn_burst (&mut self, n: usize, now: DateTime<Utc>, table: &FlightTable, airports: &AirportData)->usize {
        let codes = airports.codes();
        if codes.len() < 2 { return 0 }

        let mut added = 0;
        for _ in 0..n {
            let Some((dep,arr)) = pick_route( &mut self.rng, codes) else { continue };
            let airline = &AIRLINES[ self.rng.random_range( 0..AIRLINES.len())];
            let call_sign = format!("{}{}", airline.icao, self.rng.random_range( 1..=9999));
            let trace_id = new_trace_id( &mut self.rng);

            if let Some(flight) = create_flight( airports, dep, arr, airline.name, &call_sign, now, &mut self.rng, trace_id) {
                if table.add( flight) {
                    added += 1;
                }
            }
        }
        added
    }
}

/// random departure and a different random arrival. Arrival draws are bounded, after that we take
/// the first code that differs
pub fn pick_route<'a,R: Rng> (rng: &mut R, codes: &'a [String])->Option<(&'a str, &'a str)> {
    if codes.len() < 2 { return None }

    let dep = codes[ rng.random_range( 0..codes.len())].as_str();
    for _ in 0..MAX_ARRIVAL_DRAWS {
        let arr = codes[ rng.random_range( 0..codes.len())].as_str();
        if arr != dep { return Some((dep,arr)) }
    }

    codes.iter().map( |c| c.as_str()).find( |c| *c != dep).map( |arr| (dep,arr))
}
