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
#![allow(unused)]

use std::time::Duration;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize,Deserialize};
use aerosim_common::datetime::*;

#[derive(Serialize,Deserialize,Debug)]
struct Timeout {
    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    timeout: Duration
}

#[test]
fn test_rfc3339_secs() {
    let dt = Utc.with_ymd_and_hms( 2025, 3, 1, 17, 4, 52).unwrap() + chrono::TimeDelta::milliseconds(789);
    let s = rfc3339_secs( &dt);
    println!("{dt:?} -> {s}");
    assert_eq!( s, "2025-03-01T17:04:52Z");
}

#[test]
fn test_add_secs() {
    let dt = Utc.with_ymd_and_hms( 2025, 1, 1, 0, 0, 0).unwrap();

    assert_eq!( add_secs_f64( &dt, 1.5), dt + chrono::TimeDelta::milliseconds(1500));
    assert_eq!( add_secs_f64( &dt, -60.0), dt - chrono::TimeDelta::seconds(60));
    assert_eq!( add_secs_f64( &dt, f64::NAN), dt);
    assert_eq!( add_secs_f64( &dt, f64::INFINITY), dt);
    assert_eq!( add_secs_f64( &dt, 1e300), dt); // out of range

    assert_eq!( duration_since( &(dt + chrono::TimeDelta::seconds(3)), &dt), Duration::from_secs(3));
    assert_eq!( duration_since( &dt, &(dt + chrono::TimeDelta::seconds(3))), Duration::ZERO);
}

#[test]
fn test_hz_period() {
    assert_eq!( hz_period(2), Duration::from_millis(500));
    assert_eq!( hz_period(1), Duration::from_secs(1));
    assert_eq!( hz_period(0), Duration::from_secs(1));
}

#[test]
fn test_fractional_secs_serde() {
    let t: Timeout = serde_json::from_str( r#"{"timeout": 2.5}"#).unwrap();
    assert_eq!( t.timeout, Duration::from_millis(2500));
    assert_eq!( serde_json::to_string( &t).unwrap(), r#"{"timeout":2.5}"#);

    assert!( serde_json::from_str::<Timeout>( r#"{"timeout": -1.0}"#).is_err());
}
