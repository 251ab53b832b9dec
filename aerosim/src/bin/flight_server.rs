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
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info,warn,error};
use tracing_subscriber::EnvFilter;
use aerosim_common::{define_cli, check_cli};
use aerosim_server::{ServerConfig, parse_origins, spawn_server_task};
use aerosim::{
    AirportDirectory, FlightSimulator, SimConfig,
    config::{load_config, parse_hz},
    flight_service
};

define_cli! { ARGS [about="flight simulation server that streams simulated flights as GeoJSON over websockets"] =
    config: Option<String>          [help="pathname of RON simulation config", long, short],
    port: u16                       [help="server port", long, env="PORT", default_value="8080"],
    update_hz: Option<String>       [help="physics tick rate (Hz)", long, env="UPDATE_HZ"],
    geojson_flights_hz: Option<String> [help="snapshot broadcast rate (Hz)", long, env="GEOJSON_FLIGHTS_HZ"],
    airports: Option<String>        [help="path of airport GeoJSON file", long, env="AIRPORTS_GEOJSON_PATH"],
    allowed_origins: Option<String> [help="comma separated list of allowed origins (any if not set)", long, env="ALLOWED_ORIGINS"]
}

fn sim_config ()->Result<SimConfig> {
    let mut config = match &ARGS.config {
        Some(path) => load_config( path).with_context( || format!("failed to load config {}", path))?,
        None => SimConfig::default()
    };

    if let Some(s) = &ARGS.update_hz {
        match parse_hz(s) {
            Some(hz) => config.update_hz = hz,
            None => warn!("ignoring invalid UPDATE_HZ {:?}", s)
        }
    }
    if let Some(s) = &ARGS.geojson_flights_hz {
        match parse_hz(s) {
            Some(hz) => config.geojson_flights_hz = hz,
            None => warn!("ignoring invalid GEOJSON_FLIGHTS_HZ {:?}", s)
        }
    }
    if let Some(path) = &ARGS.airports {
        config.airports_path = path.into();
    }

    Ok( config.validated())
}

#[tokio::main]
async fn main()->Result<()> {
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))) // use RUST_LOG to set max level
        .init();

    let config = sim_config()?;
    info!("{:?}", config);

    let airports = Arc::new( AirportDirectory::from_file( &config.airports_path)
        .with_context( || format!("failed to load airports from {:?}", config.airports_path))?);

    let server_config = ServerConfig::new(
        SocketAddr::from(([0,0,0,0], ARGS.port)),
        ARGS.allowed_origins.as_deref().map( parse_origins).unwrap_or_default()
    );

    let cancel = CancellationToken::new();
    let sim = Arc::new( FlightSimulator::new( config, airports));
    let loops = sim.start( cancel.clone())?;

    let router = flight_service::router( sim.clone(), &server_config.allowed_origins, cancel.clone());
    let mut server = spawn_server_task( &server_config, router, cancel.clone());
    info!("flight server running on {}", server_config.url());

    let server_result = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res { error!("failed to listen for ctrl-c: {}", e) }
            info!("shutting down");
            None
        }
        res = &mut server => Some(res) // server terminated on its own (e.g. could not bind)
    };
    cancel.cancel();

    for jh in loops {
        let _ = jh.await;
    }

    let res = match server_result {
        Some(res) => res,
        None => server.await
    };
    res??;

    Ok(())
}
