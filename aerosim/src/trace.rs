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

use std::time::{SystemTime, UNIX_EPOCH};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::warn;

/// a cryptographically strong generator seeded from the OS entropy source. Only if that is not
/// available do we fall back to a clock based seed
pub fn seeded_rng ()->StdRng {
    match StdRng::try_from_os_rng() {
        Ok(rng) => rng,
        Err(e) => {
            warn!("OS entropy source failed ({}), seeding from clock", e);
            StdRng::seed_from_u64( clock_seed())
        }
    }
}

fn clock_seed ()->u64 {
    let nanos = SystemTime::now().duration_since( UNIX_EPOCH).map( |d| d.as_nanos() as u64).unwrap_or(0);
    nanos ^ ((std::process::id() as u64) << 32)
}

/// opaque 128 bit correlation token as 32 lower case hex chars
pub fn new_trace_id<R: Rng> (rng: &mut R)->String {
    let bytes: [u8;16] = rng.random();
    hex::encode( bytes)
}
