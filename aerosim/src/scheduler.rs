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

use std::{sync::Arc, time::{Duration, Instant}};
use async_trait::async_trait;
use axum::extract::ws::Utf8Bytes;
use tokio::{task::JoinHandle, time::{interval, MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};
use aerosim_common::datetime::{hz_period, utc_now};
use aerosim_server::ViewerRegistry;

use crate::{engine::{FlightEngine, clamp_dt}, errors::Result, snapshot::SnapshotEncoder};

/// something that is advanced by the physics tick. `dt` is the already clamped tick duration in seconds
pub trait Advance: Send + 'static {
    fn advance (&mut self, dt: f64);
}

impl Advance for FlightEngine {
    fn advance (&mut self, dt: f64) {
        self.tick( dt, utc_now());
    }
}

/// something that can produce the next broadcast payload
pub trait SnapshotSource: Send + Sync + 'static {
    fn encode_update (&self)->Result<String>;
}

impl SnapshotSource for SnapshotEncoder {
    fn encode_update (&self)->Result<String> {
        SnapshotEncoder::encode_update( self)
    }
}

/// the fan-out side of broadcasts
#[async_trait]
pub trait Broadcast: Send + Sync + 'static {
    fn viewer_count (&self)->usize;

    /// returns number of successful deliveries
    async fn broadcast (&self, msg: Utf8Bytes)->usize;
}

#[async_trait]
impl Broadcast for ViewerRegistry {
    fn viewer_count (&self)->usize { self.count() }

    async fn broadcast (&self, msg: Utf8Bytes)->usize {
        ViewerRegistry::broadcast( self, msg).await
    }
}

/// run `advancer` at `hz` until `cancel` is triggered. Each tick passes the wall clock time since the
/// previous tick, clamped into [MIN_DT, 1/hz]. The first tick uses a full period
pub fn spawn_physics_loop<A: Advance> (mut advancer: A, hz: u32, cancel: CancellationToken)->JoinHandle<()> {
    let period = hz_period( hz);
    let max_dt = period.as_secs_f64();

    tokio::spawn( async move {
        let mut ticker = interval( period);
        ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);
        let mut last_tick: Option<Instant> = None;
        info!("physics loop running at {} Hz", hz);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let elapsed = last_tick.map( |last| now.duration_since(last).as_secs_f64()).unwrap_or( max_dt);
                    last_tick = Some(now);
                    advancer.advance( clamp_dt( elapsed, max_dt));
                }
            }
        }
        info!("physics loop terminated");
    })
}

/// encode and broadcast a snapshot if there is anybody to send to. Returns the number of viewers
/// that received it
pub async fn broadcast_once<S: SnapshotSource, B: Broadcast + ?Sized> (source: &S, broadcaster: &B)->usize {
    if broadcaster.viewer_count() == 0 { return 0 }

    match source.encode_update() {
        Ok(msg) => broadcaster.broadcast( Utf8Bytes::from(msg)).await,
        Err(e) => {
            warn!("skipping broadcast, snapshot encoding failed: {}", e);
            0
        }
    }
}

/// broadcast snapshots at `hz` until `cancel` is triggered
pub fn spawn_broadcast_loop<S,B> (source: Arc<S>, broadcaster: Arc<B>, hz: u32, cancel: CancellationToken)->JoinHandle<()>
    where S: SnapshotSource, B: Broadcast
{
    let period = hz_period( hz);

    tokio::spawn( async move {
        let mut ticker = interval( period);
        ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);
        info!("broadcast loop running at {} Hz", hz);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        n = broadcast_once( source.as_ref(), broadcaster.as_ref()) => {
                            if n > 0 { debug!("broadcast snapshot to {} viewers", n) }
                        }
                    }
                }
            }
        }
        info!("broadcast loop terminated");
    })
}
