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

use std::{collections::{HashMap, hash_map::Entry}, sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError}};
use crate::flight::FlightState;

/// the authoritative id -> flight state map. The tick is the only writer and takes the write lock
/// once per pass, readers copy out what they need and release the lock before doing any I/O
pub struct FlightTable {
    flights: RwLock<HashMap<String,FlightState>>,
}

impl FlightTable {
    pub fn new ()->Self {
        FlightTable { flights: RwLock::new( HashMap::new()) }
    }

    fn read (&self)->RwLockReadGuard<'_,HashMap<String,FlightState>> {
        self.flights.read().unwrap_or_else( PoisonError::into_inner)
    }

    fn write (&self)->RwLockWriteGuard<'_,HashMap<String,FlightState>> {
        self.flights.write().unwrap_or_else( PoisonError::into_inner)
    }

    pub fn get (&self, id: &str)->Option<FlightState> {
        self.read().get(id).cloned()
    }

    /// point-in-time copy of all flights
    pub fn snapshot (&self)->Vec<FlightState> {
        self.read().values().cloned().collect()
    }

    /// add a new flight. Returns false (and leaves the table unchanged) if its id is already taken
    pub fn add (&self, flight: FlightState)->bool {
        match self.write().entry( flight.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => { e.insert(flight); true }
        }
    }

    pub fn remove (&self, id: &str)->Option<FlightState> {
        self.write().remove(id)
    }

    pub fn count (&self)->usize {
        self.read().len()
    }

    pub fn contains (&self, id: &str)->bool {
        self.read().contains_key(id)
    }

    /// run `f` with exclusive access to all flights
    pub fn update_all<F,T> (&self, f: F)->T where F: FnOnce(&mut HashMap<String,FlightState>)->T {
        let mut flights = self.write();
        f( &mut flights)
    }
}

impl Default for FlightTable {
    fn default()->Self { FlightTable::new() }
}
