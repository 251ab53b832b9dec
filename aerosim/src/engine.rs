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

use std::{collections::HashMap, sync::Arc};
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use tracing::{debug,trace};
use aerosim_common::{clamp, datetime::utc_now};

use crate::{
    airports::{AirportData, AirportDirectory},
    config::SimConfig,
    flight_table::FlightTable,
    population::PopulationController,
    trace::{new_trace_id, seeded_rng}
};

/// lower bound for tick durations (seconds)
pub const MIN_DT: f64 = 0.001;

/// clamp elapsed seconds into [MIN_DT, max_dt]. Negative, NaN or huge values from clock
/// anomalies end up at one of the bounds
pub fn clamp_dt (elapsed: f64, max_dt: f64)->f64 {
    if elapsed.is_nan() { max_dt } else { clamp( elapsed, MIN_DT, max_dt) }
}

#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct TickStats {
    pub spawned: usize,
    pub advanced: usize,
    pub retired: usize,
    pub count: usize,
}

/// the physics and phase engine together with the population controller. This is driven by the
/// physics tick and is the only writer of the flight table
pub struct FlightEngine {
    table: Arc<FlightTable>,
    airports: Arc<AirportDirectory>,
    population: PopulationController,
    landed_at: HashMap<String,DateTime<Utc>>,
    landed_grace: TimeDelta,
    rng: StdRng,
}

impl FlightEngine {
    pub fn new (config: &SimConfig, table: Arc<FlightTable>, airports: Arc<AirportDirectory>)->Self {
        let population = PopulationController::new( config.target_fleet_size, config.fluctuation_band, utc_now());
        FlightEngine::with_population( config, table, airports, population, seeded_rng())
    }

    pub fn with_population (config: &SimConfig, table: Arc<FlightTable>, airports: Arc<AirportDirectory>,
                            population: PopulationController, rng: StdRng)->Self
    {
        FlightEngine {
            table,
            airports,
            population,
            landed_at: HashMap::new(),
            landed_grace: TimeDelta::from_std( config.landed_grace).unwrap_or( TimeDelta::seconds(10)),
            rng
        }
    }

    pub fn table (&self)->&Arc<FlightTable> { &self.table }

    pub fn population (&self)->&PopulationController { &self.population }

    /// spawn `n` flights (capped at the population ceiling) outside of the regular schedule
    pub fn seed (&mut self, n: usize)->usize {
        let airports = self.airports.snapshot();
        let n = n.min( self.population.ceiling().saturating_sub( self.table.count()));
        self.population.spawn_burst( n, utc_now(), &self.table, &airports)
    }

    /// population control followed by one physics pass with `dt` seconds at time `now`
    pub fn tick (&mut self, dt: f64, now: DateTime<Utc>)->TickStats {
        let airports = self.airports.snapshot();

        let spawned = self.population.regulate( now, &self.table, &airports);
        let (advanced, retired) = self.update_flights( dt, now, &airports);
        let stats = TickStats { spawned, advanced, retired, count: self.table.count() };

        trace!("tick dt={:.3}: {:?}", dt, stats);
        stats
    }

    fn update_flights (&mut self, dt: f64, now: DateTime<Utc>, airports: &AirportData)->(usize,usize) {
        let FlightEngine { table, landed_at, rng, landed_grace, .. } = self;
        let grace = *landed_grace;

        table.update_all( |flights| {
            let mut advanced = 0;
            let mut retired: Vec<String> = Vec::new();

            for (id,f) in flights.iter_mut() {
                if f.is_landed() {
                    match landed_at.get(id).copied() {
                        Some(t) if now - t > grace => {
                            retired.push( id.clone());
                            continue
                        }
                        Some(_) => {}
                        None => { landed_at.insert( id.clone(), now); }
                    }
                    f.touch( now, new_trace_id(rng));
                    continue
                }

                let from = airports.position( &f.departure_airport);
                let to = airports.position( &f.arrival_airport);
                if let (Some(from),Some(to)) = (from,to) {
                    f.advance( &from, &to, dt, now, new_trace_id(rng));
                    advanced += 1;
                } else {
                    debug!("skipping {}, unknown airport", id);
                }
            }

            for id in &retired {
                flights.remove(id);
                landed_at.remove(id);
            }
            landed_at.retain( |id,_| flights.contains_key(id));

            (advanced, retired.len())
        })
    }
}
