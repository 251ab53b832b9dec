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

use aerosim_common::angle::*;
use aerosim_common::geo::*;

// run with "cargo test test_distance -- --nocapture"

const EPS: f64 = 1e-6;

fn jfk()->GeoPos { GeoPos::from_lon_lat_degrees( -73.7781, 40.6413) }
fn lax()->GeoPos { GeoPos::from_lon_lat_degrees( -118.4085, 33.9416) }
fn nrt()->GeoPos { GeoPos::from_lon_lat_degrees( 140.3929, 35.7720) }
fn syd()->GeoPos { GeoPos::from_lon_lat_degrees( 151.1772, -33.9461) }

fn sample_positions()->Vec<GeoPos> {
    vec![ jfk(), lax(), nrt(), syd(),
        GeoPos::new( 0.0, 0.0, 0.0),
        GeoPos::new( 89.9, 10.0, 0.0),
        GeoPos::new( -45.0, 179.9, 0.0),
        GeoPos::new( -45.0, -179.9, 0.0),
    ]
}

#[test]
fn test_angles() {
    assert_eq!( normalize_360(-90.0), 270.0);
    assert_eq!( normalize_360(360.0), 0.0);
    assert_eq!( normalize_360(720.5), 0.5);
    assert!( normalize_360(-1e-20) < 360.0);

    assert_eq!( normalize_180(190.0), -170.0);
    assert_eq!( normalize_180(-190.0), 170.0);
}

#[test]
fn test_distance() {
    let d = distance( &jfk(), &lax());
    println!("JFK-LAX: {d} nm");
    assert!( (d - 2146.0).abs() < 1.0); // spherical earth, ~2151 on the ellipsoid

    let ps = sample_positions();
    for a in &ps {
        assert_eq!( distance(a,a), 0.0);
        for b in &ps {
            let ab = distance(a,b);
            let ba = distance(b,a);
            assert!( (ab - ba).abs() < EPS, "asymmetric distance {a} {b}: {ab} != {ba}");
            assert!( ab.is_finite() && ab >= 0.0);
        }
    }

    // across the antimeridian is short
    let d = distance( &GeoPos::new( -45.0, 179.9, 0.0), &GeoPos::new( -45.0, -179.9, 0.0));
    assert!( d < 10.0);
}

#[test]
fn test_distance_radius() {
    // a quarter of the equator and pole to pole scale with the nautical mile earth radius
    let quarter = distance( &GeoPos::new( 0.0, 0.0, 0.0), &GeoPos::new( 0.0, 90.0, 0.0));
    assert!( (quarter - EARTH_RADIUS_NM * std::f64::consts::FRAC_PI_2).abs() < 1e-6);

    let meridian = distance( &GeoPos::new( 90.0, 0.0, 0.0), &GeoPos::new( -90.0, 0.0, 0.0));
    assert!( (meridian - EARTH_RADIUS_NM * std::f64::consts::PI).abs() < 1e-6);

    // one arc minute of latitude is close to one nautical mile
    let arc_min = distance( &GeoPos::new( 10.0, 20.0, 0.0), &GeoPos::new( 10.0 + 1.0/60.0, 20.0, 0.0));
    assert!( (arc_min - 1.0).abs() < 0.001);
}

#[test]
fn test_bearing() {
    let b = bearing( &jfk(), &lax());
    println!("JFK->LAX initial bearing: {b}");
    assert!( b > 260.0 && b < 280.0);

    assert!( (bearing( &GeoPos::new(0.0,0.0,0.0), &GeoPos::new(10.0,0.0,0.0)) - 0.0).abs() < EPS);
    assert!( (bearing( &GeoPos::new(0.0,0.0,0.0), &GeoPos::new(0.0,10.0,0.0)) - 90.0).abs() < EPS);
    assert!( (bearing( &GeoPos::new(0.0,0.0,0.0), &GeoPos::new(-10.0,0.0,0.0)) - 180.0).abs() < EPS);

    for a in &sample_positions() {
        for b in &sample_positions() {
            let brg = bearing(a,b);
            assert!( brg >= 0.0 && brg < 360.0, "bearing out of range: {brg}");
        }
    }
}

#[test]
fn test_interpolation_endpoints() {
    let ps = sample_positions();
    for a in &ps {
        for b in &ps {
            if distance(a,b) < 1.0 { continue }

            let p0 = interpolate( a, b, 0.0);
            let p1 = interpolate( a, b, 1.0);
            assert!( distance( &p0, a) < 1e-6, "start {a} -> {p0}");
            assert!( distance( &p1, b) < 1e-6, "end {b} -> {p1}");
        }
    }
}

#[test]
fn test_interpolation_midpoint() {
    let a = jfk().with_altitude( 5000.0);
    let b = lax();
    let m = interpolate( &a, &b, 0.5);
    println!("JFK-LAX midpoint: {m}");

    let d1 = distance( &a, &m);
    let d2 = distance( &m, &b);
    assert!( (d1 - d2).abs() < 1e-3);
    assert!( (d1 + d2 - distance(&a,&b)).abs() < 1e-3);
    assert_eq!( m.altitude, 5000.0); // altitude is carried over from start
}

#[test]
fn test_interpolation_degenerate() {
    let a = GeoPos::new( 10.0, 20.0, 100.0);
    let m = interpolate( &a, &a, 0.5);
    assert_eq!( m, a);

    // antipodal points have no unique great circle but must not produce NaN
    let n = GeoPos::new( 30.0, 40.0, 0.0);
    let s = GeoPos::new( -30.0, -140.0, 0.0);
    for t in [0.0, 0.25, 0.5, 1.0] {
        let p = interpolate( &n, &s, t);
        assert!( p.is_finite(), "antipodal interpolation at {t}: {p}");
    }
}

#[test]
fn test_velocity() {
    let v = velocity_from_speed_bearing( 100.0, 90.0);
    assert!( (v.x - 100.0).abs() < EPS);
    assert!( v.y.abs() < EPS);
    assert_eq!( v.z, 0.0);

    let v = velocity_from_speed_bearing( 100.0, 0.0);
    assert!( v.x.abs() < EPS);
    assert!( (v.y - 100.0).abs() < EPS);
}

#[test]
fn test_step() {
    let a = jfk();
    let b = lax();
    let total = distance( &a, &b);

    // slow regime: 3600kn for 1 sec is one nautical mile
    let p = step( &a, &b, 3600.0, 1.0);
    assert!( (total - distance(&p, &b) - 1.0).abs() < 1e-3);

    // fast regime doubles the step
    let p = step( &a, &b, 18000.0, 1.0);
    assert!( (total - distance(&p, &b) - 10.0).abs() < 1e-3);

    // overshoot and threshold snap onto destination
    assert_eq!( step( &a, &b, 30000.0, 3600.0), b);
    let close = interpolate( &b, &a, 0.00001);
    assert!( distance( &close, &b) < ARRIVAL_THRESHOLD_NM);
    assert_eq!( step( &close, &b, 1.0, 0.001), b);

    // negative time does not move
    let p = step( &a, &b, 10000.0, -5.0);
    assert!( distance( &p, &a) < 1e-9);
}

#[test]
fn test_great_circle_coords() {
    let coords = great_circle_coords( &jfk(), &lax(), 4);
    println!("JFK-LAX route: {coords:?}");
    assert_eq!( coords.len(), 5);
    assert!( (coords[0][0] - jfk().longitude).abs() < 1e-6 && (coords[0][1] - jfk().latitude).abs() < 1e-6);
    assert!( (coords[4][0] - lax().longitude).abs() < 1e-6 && (coords[4][1] - lax().latitude).abs() < 1e-6);

    assert_eq!( great_circle_coords( &jfk(), &lax(), 0).len(), 2);
}
