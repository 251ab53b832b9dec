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

//! simulated flight population that is advanced along great circle routes and streamed as GeoJSON
//! snapshots to websocket viewers

pub mod errors;
pub use errors::{AeroSimError, Result};

pub mod config;
pub use config::{SimConfig, load_config};

pub mod airports;
pub use airports::{AirportData, AirportDirectory};

pub mod trace;

pub mod flight;
pub use flight::{FlightState, Phase, create_flight};

pub mod flight_table;
pub use flight_table::FlightTable;

pub mod population;
pub use population::PopulationController;

pub mod engine;
pub use engine::FlightEngine;

pub mod snapshot;
pub use snapshot::SnapshotEncoder;

pub mod scheduler;

pub mod simulator;
pub use simulator::FlightSimulator;

pub mod flight_service;
