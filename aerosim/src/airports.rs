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

use std::{collections::HashMap, path::{Path,PathBuf}, sync::{Arc, RwLock, RwLockReadGuard, PoisonError}};
use bytes::Bytes;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug,info};
use aerosim_common::geo::GeoPos;

use crate::errors::{AeroSimError, Result, read_error, parse_error};

/// immutable contents of one airport GeoJSON load
#[derive(Debug)]
pub struct AirportData {
    positions: HashMap<String,GeoPos>,
    codes: Vec<String>,
    raw: Bytes,
    fingerprint: String,
}

impl AirportData {
    pub fn empty()->Self {
        AirportData { positions: HashMap::new(), codes: Vec::new(), raw: Bytes::new(), fingerprint: String::new() }
    }

    /// parse a GeoJSON feature collection with Point features that have an `iata` property.
    /// Features without a non-empty `iata` or with less than two numeric coordinates are skipped
    pub fn from_bytes (raw: Bytes)->Result<Self> {
        let json: Value = serde_json::from_slice( &raw).map_err( |e| parse_error!("invalid airport GeoJSON: {}", e))?;
        let features = json.get("features").and_then( |f| f.as_array())
            .ok_or_else( || parse_error!("airport GeoJSON has no features array"))?;

        let mut positions: HashMap<String,GeoPos> = HashMap::with_capacity( features.len());
        let mut codes: Vec<String> = Vec::with_capacity( features.len());
        let mut skipped = 0;

        for feature in features {
            match parse_feature( feature) {
                Some((code,pos)) => {
                    if positions.insert( code.clone(), pos).is_none() {
                        codes.push( code);
                    }
                }
                None => skipped += 1
            }
        }

        if skipped > 0 {
            debug!("skipped {} invalid airport features", skipped);
        }

        let fingerprint = hex::encode( Sha256::digest( &raw));
        Ok( AirportData { positions, codes, raw, fingerprint } )
    }

    pub fn position (&self, code: &str)->Option<GeoPos> { self.positions.get(code).copied() }

    pub fn positions (&self)->&HashMap<String,GeoPos> { &self.positions }

    pub fn codes (&self)->&[String] { self.codes.as_slice() }

    pub fn raw_bytes (&self)->&Bytes { &self.raw }

    /// hex encoded SHA-256 of the raw data
    pub fn fingerprint (&self)->&str { self.fingerprint.as_str() }

    pub fn len (&self)->usize { self.codes.len() }

    pub fn is_empty (&self)->bool { self.codes.is_empty() }
}

fn parse_feature (feature: &Value)->Option<(String,GeoPos)> {
    let code = feature.get("properties")?.get("iata")?.as_str()?.trim();
    if code.is_empty() { return None }

    let coords = feature.get("geometry")?.get("coordinates")?.as_array()?;
    if coords.len() < 2 { return None }
    let lon = coords[0].as_f64()?;
    let lat = coords[1].as_f64()?;
    if !lon.is_finite() || !lat.is_finite() { return None }

    Some( (code.to_string(), GeoPos::from_lon_lat_degrees( lon, lat)) )
}

struct DirectoryState {
    data: Arc<AirportData>,
    path: Option<PathBuf>,
    loaded: bool,
}

/// concurrency safe IATA code -> position lookup. Loads and reloads replace the whole state
/// under a single write lock, readers either see the old or the new data
pub struct AirportDirectory {
    state: RwLock<DirectoryState>,
}

impl AirportDirectory {
    pub fn new ()->Self {
        AirportDirectory {
            state: RwLock::new( DirectoryState { data: Arc::new( AirportData::empty()), path: None, loaded: false })
        }
    }

    /// create and load
    pub fn from_file<P: AsRef<Path>> (path: P)->Result<Self> {
        let dir = AirportDirectory::new();
        dir.load( path)?;
        Ok(dir)
    }

    fn state (&self)->RwLockReadGuard<'_,DirectoryState> {
        self.state.read().unwrap_or_else( PoisonError::into_inner)
    }

    pub fn load<P: AsRef<Path>> (&self, path: P)->Result<()> {
        let path = path.as_ref();
        let raw = std::fs::read( path).map_err( |e| read_error!("failed to read {:?}: {}", path, e))?;
        let data = AirportData::from_bytes( Bytes::from(raw))?;
        info!("loaded {} airports from {:?}", data.len(), path);

        let mut state = self.state.write().unwrap_or_else( PoisonError::into_inner);
        state.data = Arc::new(data);
        state.path = Some( path.to_path_buf());
        state.loaded = true;
        Ok(())
    }

    /// re-run [`load`](Self::load) on the last successfully loaded path
    pub fn reload (&self)->Result<()> {
        let path = self.state().path.clone().ok_or( AeroSimError::NoPathError)?;
        self.load( path)
    }

    /// a shared handle on the current data that is not affected by subsequent reloads
    pub fn snapshot (&self)->Arc<AirportData> {
        self.state().data.clone()
    }

    pub fn positions (&self)->HashMap<String,GeoPos> { self.snapshot().positions.clone() }

    pub fn codes (&self)->Vec<String> { self.snapshot().codes.clone() }

    pub fn position (&self, code: &str)->Option<GeoPos> { self.snapshot().position( code) }

    pub fn len (&self)->usize { self.snapshot().len() }

    pub fn raw_bytes (&self)->Bytes { self.snapshot().raw.clone() }

    /// hex SHA-256 of the raw data
    pub fn fingerprint (&self)->String { self.snapshot().fingerprint.clone() }

    /// quoted fingerprint as used in HTTP ETag headers
    pub fn etag (&self)->String { format!("\"{}\"", self.snapshot().fingerprint) }

    pub fn path (&self)->Option<PathBuf> { self.state().path.clone() }

    pub fn is_loaded (&self)->bool { self.state().loaded }
}

impl Default for AirportDirectory {
    fn default()->Self { AirportDirectory::new() }
}
