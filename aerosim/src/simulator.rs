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

use std::sync::{Arc, Mutex, PoisonError, atomic::{AtomicBool, Ordering}};
use axum::extract::ws::Utf8Bytes;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn};
use aerosim_server::{ViewerId, ViewerRegistry, ViewerSink};

use crate::{
    airports::AirportDirectory,
    config::SimConfig,
    engine::FlightEngine,
    errors::{op_failed, Result},
    flight_table::FlightTable,
    scheduler::{spawn_broadcast_loop, spawn_physics_loop},
    snapshot::SnapshotEncoder
};

/// ties together flight table, engine, snapshot encoder and viewer registry. The engine is moved into
/// the physics loop once the simulator is started
pub struct FlightSimulator {
    config: SimConfig,
    airports: Arc<AirportDirectory>,
    table: Arc<FlightTable>,
    encoder: Arc<SnapshotEncoder>,
    viewers: Arc<ViewerRegistry>,
    engine: Mutex<Option<FlightEngine>>,
    running: Arc<AtomicBool>,
}

impl FlightSimulator {
    /// create a simulator with `config.initial_flights` flights already in the table
    pub fn new (config: SimConfig, airports: Arc<AirportDirectory>)->Self {
        let table = Arc::new( FlightTable::new());
        let mut engine = FlightEngine::new( &config, table.clone(), airports.clone());
        FlightSimulator::with_engine( config, airports, table, engine)
    }

    pub fn with_engine (config: SimConfig, airports: Arc<AirportDirectory>, table: Arc<FlightTable>, mut engine: FlightEngine)->Self {
        if config.initial_flights > 0 {
            let n = engine.seed( config.initial_flights);
            info!("seeded {} initial flights", n);
        }

        FlightSimulator {
            encoder: Arc::new( SnapshotEncoder::new( table.clone())),
            viewers: Arc::new( ViewerRegistry::new( config.write_timeout)),
            engine: Mutex::new( Some(engine)),
            running: Arc::new( AtomicBool::new(false)),
            config,
            airports,
            table,
        }
    }

    /// spawn the physics and broadcast loops. Both terminate when `cancel` is triggered
    pub fn start (&self, cancel: CancellationToken)->Result<Vec<JoinHandle<()>>> {
        let engine = self.engine.lock().unwrap_or_else( PoisonError::into_inner).take()
            .ok_or_else( || op_failed("simulator already started"))?;

        let physics = spawn_physics_loop( engine, self.config.update_hz, cancel.clone());
        let broadcast = spawn_broadcast_loop( self.encoder.clone(), self.viewers.clone(), self.config.geojson_flights_hz, cancel.clone());

        self.running.store( true, Ordering::Release);
        let running = self.running.clone();
        let monitor = tokio::spawn( async move {
            cancel.cancelled().await;
            running.store( false, Ordering::Release);
        });

        Ok( vec![physics, broadcast, monitor])
    }

    pub fn is_running (&self)->bool { self.running.load( Ordering::Acquire) }

    /// ready to serve once the airports are loaded and the loops are running
    pub fn is_ready (&self)->bool { self.airports.is_loaded() && self.is_running() }

    pub fn config (&self)->&SimConfig { &self.config }
    pub fn airports (&self)->&Arc<AirportDirectory> { &self.airports }
    pub fn table (&self)->&Arc<FlightTable> { &self.table }
    pub fn encoder (&self)->&Arc<SnapshotEncoder> { &self.encoder }
    pub fn viewers (&self)->&Arc<ViewerRegistry> { &self.viewers }

    pub fn flight_count (&self)->usize { self.table.count() }

    /// full snapshot with `seq` 0, or `None` if it could not be encoded
    pub fn initial_snapshot (&self)->Option<Utf8Bytes> {
        initial_snapshot( &self.encoder)
    }

    /// a closure that encodes the initial snapshot when called, to be run on the viewer's own task
    pub fn initial_snapshot_fn (&self)->impl FnOnce()->Option<Utf8Bytes> + Send + 'static {
        let encoder = self.encoder.clone();
        move || initial_snapshot( &encoder)
    }

    /// register a viewer and send it the current snapshot without waiting for the next broadcast
    pub fn connect_viewer (&self, sink: Arc<dyn ViewerSink>)->ViewerId {
        self.viewers.connect( sink, self.initial_snapshot_fn())
    }

    pub fn remove_viewer (&self, id: ViewerId)->bool {
        self.viewers.remove_viewer( id)
    }
}

fn initial_snapshot (encoder: &SnapshotEncoder)->Option<Utf8Bytes> {
    match encoder.encode_initial() {
        Ok(msg) => Some( Utf8Bytes::from(msg)),
        Err(e) => {
            warn!("failed to encode initial snapshot: {}", e);
            None
        }
    }
}
