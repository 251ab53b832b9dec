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

//! spherical earth geodesy for flight simulation, built on the haversine metric space of the `geo` crate:
//! bearings, distances, interpolation along great circles and bounded per-tick steps toward a destination.
//! Positions are in degrees (lat/lon) and feet (altitude), distances in nautical miles

use std::fmt;
use geo::{Bearing, Distance, Haversine, InterpolatePoint, Point};
use serde::{Serialize,Deserialize};
use uom::si::f64::{Length,Time,Velocity};
use uom::si::{length::nautical_mile, time::second, velocity::knot};

use crate::{sin,cos,rad};
use crate::angle::{normalize_180,normalize_360};

/// mean earth radius in nautical miles
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// sphere radius (meters) of geo's [`Haversine`] metric space, used to turn its distances back into angles
const HAVERSINE_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// distance below which a moving position snaps onto its destination
pub const ARRIVAL_THRESHOLD_NM: f64 = 0.1;

/// speed values above this are in the stylized "fast" regime and step twice as far
pub const FAST_REGIME_SPEED: f64 = 10_000.0;

/// angular separation (radians) below which we interpolate linearly
const MIN_SLERP_ANGLE: f64 = 1e-6;

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Default)]
pub struct GeoPos {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64
}

impl GeoPos {
    pub fn new (latitude: f64, longitude: f64, altitude: f64)->Self {
        GeoPos { latitude, longitude, altitude }
    }

    /// GeoJSON coordinate order, altitude 0
    pub fn from_lon_lat_degrees (lon: f64, lat: f64)->Self {
        GeoPos { latitude: lat, longitude: lon, altitude: 0.0 }
    }

    pub fn with_altitude (&self, altitude: f64)->Self {
        GeoPos { altitude, ..*self }
    }

    /// 2D geo point (x = longitude, y = latitude)
    pub fn point (&self)->Point { Point::new( self.longitude, self.latitude) }

    pub fn lon_lat (&self)->[f64;2] { [self.longitude, self.latitude] }

    pub fn lon_lat_alt (&self)->[f64;3] { [self.longitude, self.latitude, self.altitude] }

    pub fn is_finite (&self)->bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

impl fmt::Display for GeoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}°,{:.5}°,{:.0}ft)", self.latitude, self.longitude, self.altitude)
    }
}

/// east (x), north (y) and vertical (z) velocity components in the units of the speed it was computed from
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Default)]
pub struct Velocity3 {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

/// initial great circle bearing from `from` to `to` in [0,360)
pub fn bearing (from: &GeoPos, to: &GeoPos)->f64 {
    normalize_360( Haversine.bearing( from.point(), to.point()))
}

/// central angle (radians) between two positions
fn central_angle (from: &GeoPos, to: &GeoPos)->f64 {
    Haversine.distance( from.point(), to.point()) / HAVERSINE_MEAN_RADIUS_M
}

/// haversine distance in nautical miles
pub fn distance (from: &GeoPos, to: &GeoPos)->f64 {
    EARTH_RADIUS_NM * central_angle( from, to)
}

/// position at fraction `t` of the great circle from `from` to `to`. The altitude of the result
/// is always `from.altitude`
pub fn interpolate (from: &GeoPos, to: &GeoPos, t: f64)->GeoPos {
    let d = central_angle(from, to);

    if d < MIN_SLERP_ANGLE || sin(d).abs() < MIN_SLERP_ANGLE { // coincident or antipodal - no unique great circle
        return interpolate_linear( from, to, t)
    }

    let p = Haversine.point_at_ratio_between( from.point(), to.point(), t);
    GeoPos::from_lon_lat_degrees( p.x(), p.y()).with_altitude( from.altitude)
}

fn interpolate_linear (from: &GeoPos, to: &GeoPos, t: f64)->GeoPos {
    let dlon = normalize_180( to.longitude - from.longitude); // take the short way across the antimeridian
    GeoPos {
        latitude: from.latitude + (to.latitude - from.latitude) * t,
        longitude: normalize_180( from.longitude + dlon * t),
        altitude: from.altitude
    }
}

/// `speed` along `bearing` (degrees) as east/north components
pub fn velocity_from_speed_bearing (speed: f64, bearing: f64)->Velocity3 {
    let b = rad(bearing);
    Velocity3 { x: speed * sin(b), y: speed * cos(b), z: 0.0 }
}

/// nautical miles covered at `speed` (knots) within `dt` seconds. Negative or non-finite values yield 0
pub fn step_length (speed: f64, dt: f64)->f64 {
    let v = Velocity::new::<knot>(speed);
    let t = Time::new::<second>(dt);
    let d: Length = v * t;
    let nm = d.get::<nautical_mile>();

    if nm.is_finite() && nm > 0.0 { nm } else { 0.0 }
}

/// advance `current` toward `destination` for `dt` seconds at `speed`. Fast regime speeds cover twice
/// the distance. Returns `destination` itself once we are within [`ARRIVAL_THRESHOLD_NM`] or would overshoot
pub fn step (current: &GeoPos, destination: &GeoPos, speed: f64, dt: f64)->GeoPos {
    let remaining = distance( current, destination);
    if remaining < ARRIVAL_THRESHOLD_NM {
        return *destination
    }

    let mut len = step_length( speed, dt);
    if speed > FAST_REGIME_SPEED {
        len *= 2.0;
    }

    if len >= remaining {
        *destination
    } else {
        interpolate( current, destination, len / remaining)
    }
}

/// `n+1` evenly spaced [lon,lat] points along the great circle from `from` to `to` (both ends included).
/// A segment count of 0 is treated as 1
pub fn great_circle_coords (from: &GeoPos, to: &GeoPos, n: usize)->Vec<[f64;2]> {
    let n = n.max(1);
    (0..=n).map( |i| interpolate( from, to, i as f64 / n as f64).lon_lat()).collect()
}
