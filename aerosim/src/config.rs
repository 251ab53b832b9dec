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

use std::{path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::warn;
use aerosim_common::datetime::{secs, ser_duration_as_fractional_secs, de_duration_from_fractional_secs};

use crate::errors::Result;

pub const DEFAULT_UPDATE_HZ: u32 = 6;
pub const DEFAULT_GEOJSON_FLIGHTS_HZ: u32 = 2;
pub const DEFAULT_TARGET_FLEET_SIZE: usize = 2000;
pub const DEFAULT_FLUCTUATION_BAND: usize = 200;
pub const DEFAULT_INITIAL_FLIGHTS: usize = 50;
pub const DEFAULT_AIRPORTS_PATH: &str = "data/airports.iata.geojson";

/// simulation parameters. Each field has a default so that config files only need to
/// contain what differs, e.g.
/// ```ron
/// SimConfig(
///     update_hz: 10,
///     target_fleet_size: 500,
///     landed_grace: 5.0,
/// )
/// ```
#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct SimConfig {
    /// physics and population tick rate
    pub update_hz: u32,

    /// rate at which flight snapshots are broadcast to viewers
    pub geojson_flights_hz: u32,

    pub target_fleet_size: usize,
    pub fluctuation_band: usize,

    /// number of flights spawned before the first tick
    pub initial_flights: usize,

    /// how long landed flights stay visible before they are retired
    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub landed_grace: Duration,

    /// max time for a single write to a viewer
    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub write_timeout: Duration,

    pub airports_path: PathBuf,
}

impl Default for SimConfig {
    fn default()->Self {
        SimConfig {
            update_hz: DEFAULT_UPDATE_HZ,
            geojson_flights_hz: DEFAULT_GEOJSON_FLIGHTS_HZ,
            target_fleet_size: DEFAULT_TARGET_FLEET_SIZE,
            fluctuation_band: DEFAULT_FLUCTUATION_BAND,
            initial_flights: DEFAULT_INITIAL_FLIGHTS,
            landed_grace: secs(10),
            write_timeout: secs(5),
            airports_path: PathBuf::from( DEFAULT_AIRPORTS_PATH),
        }
    }
}

impl SimConfig {
    pub fn ceiling (&self)->usize { self.target_fleet_size + self.fluctuation_band }

    /// replace rates that would stall the scheduler with their defaults
    pub fn validated (mut self)->Self {
        if self.update_hz == 0 {
            warn!("update_hz must be positive, using {}", DEFAULT_UPDATE_HZ);
            self.update_hz = DEFAULT_UPDATE_HZ;
        }
        if self.geojson_flights_hz == 0 {
            warn!("geojson_flights_hz must be positive, using {}", DEFAULT_GEOJSON_FLIGHTS_HZ);
            self.geojson_flights_hz = DEFAULT_GEOJSON_FLIGHTS_HZ;
        }
        if self.write_timeout.is_zero() {
            self.write_timeout = secs(5);
        }
        self
    }
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<SimConfig> {
    let input = std::fs::read_to_string( path)?;
    let config: SimConfig = ron::from_str( &input)?;
    Ok( config.validated())
}

/// parse a rate given as string (e.g. from an env var), rejecting non-positive and non-numeric values
pub fn parse_hz (s: &str)->Option<u32> {
    match s.trim().parse::<i64>() {
        Ok(hz) if hz > 0 && hz <= u32::MAX as i64 => Some(hz as u32),
        _ => None
    }
}
