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

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Serialize,Deserialize,Serializer,Deserializer};
use std::time::Duration;

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

#[inline]
pub fn epoch_millis ()->i64 {
    Utc::now().timestamp_millis()
}

/// period of a given frequency. Frequencies of 0 are treated as 1Hz
pub fn hz_period (hz: u32)->Duration {
    Duration::from_secs_f64( 1.0 / hz.max(1) as f64)
}

/// add (possibly negative or fractional) seconds to a date, saturating at the chrono limits
pub fn add_secs_f64 (dt: &DateTime<Utc>, secs: f64)->DateTime<Utc> {
    if !secs.is_finite() { return *dt }

    let millis = (secs * 1000.0).round();
    let millis = if millis > i64::MAX as f64 { i64::MAX } else if millis < i64::MIN as f64 { i64::MIN } else { millis as i64 };

    TimeDelta::try_milliseconds(millis)
        .and_then( |td| dt.checked_add_signed(td))
        .unwrap_or(*dt)
}

/// non-negative duration between two dates (zero if `dt_later` is not after `dt_earlier`)
pub fn duration_since (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->Duration {
    (*dt_later - *dt_earlier).to_std().unwrap_or(Duration::ZERO)
}

/// RFC 3339 with second resolution and 'Z' suffix, e.g. "2025-03-01T17:04:52Z"
pub fn rfc3339_secs (dt: &DateTime<Utc>)->String {
    dt.to_rfc3339_opts( SecondsFormat::Secs, true)
}

//--- support for serde

pub fn ser_rfc3339_secs<S: Serializer> (dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_str( &rfc3339_secs(dt))
}

pub fn ser_duration_as_fractional_secs<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_f64( dur.as_secs_f64())
}

pub fn de_duration_from_fractional_secs <'a,D>(deserializer: D) -> Result<Duration,D::Error> where D: Deserializer<'a> {
    let secs: f64 = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err( |e| serde::de::Error::custom( format!("invalid duration {secs}: {e}")))
}
