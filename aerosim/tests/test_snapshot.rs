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

use std::sync::Arc;
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;
use aerosim::{
    AirportDirectory, FlightTable, SnapshotEncoder, create_flight,
    snapshot::{encode_flights, route_collection},
    trace::new_trace_id
};

// run with "cargo test -p aerosim --test test_snapshot -- --nocapture"

fn table_with_flights (n: usize)->Arc<FlightTable> {
    let airports = AirportDirectory::from_file( "data/airports.iata.geojson").unwrap().snapshot();
    let table = Arc::new( FlightTable::new());
    let mut rng = StdRng::seed_from_u64(17);
    let codes = airports.codes().to_vec();

    for i in 0..n {
        let (dep, arr) = (&codes[i % codes.len()], &codes[(i+1) % codes.len()]);
        let trace_id = new_trace_id( &mut rng);
        let f = create_flight( &airports, dep, arr, "Delta", &format!("DAL{}", i+1), Utc::now(), &mut rng, trace_id).unwrap();
        table.add( f);
    }
    table
}

#[test]
fn test_message_shape () {
    let table = table_with_flights(3);
    let encoder = SnapshotEncoder::new( table.clone());

    let msg: Value = serde_json::from_str( &encoder.encode_initial().unwrap()).unwrap();
    println!("{}", serde_json::to_string_pretty( &msg["featureCollection"]["features"][0]).unwrap());

    assert_eq!( msg["type"], "flights_geojson");
    assert_eq!( msg["seq"], 0);
    assert!( msg["serverTimestamp"].as_i64().unwrap() > 0);

    let fc = &msg["featureCollection"];
    assert_eq!( fc["type"], "FeatureCollection");
    let features = fc["features"].as_array().unwrap();
    assert_eq!( features.len(), 3);

    for feature in features {
        assert_eq!( feature["type"], "Feature");
        assert_eq!( feature["geometry"]["type"], "Point");
        assert_eq!( feature["geometry"]["coordinates"].as_array().unwrap().len(), 3);

        let props = &feature["properties"];
        assert!( props["id"].as_str().unwrap().starts_with("DAL"));
        assert_eq!( props["airline"], "Delta");
        assert_eq!( props["phase"], "takeoff");
        assert!( props["callSign"].is_string());
        assert!( props["departureAirport"].is_string());
        assert!( props["arrivalAirport"].is_string());
        assert!( props["speed"].is_number());
        assert!( props["bearing"].is_number());
        assert!( props["progress"].is_number());
        assert!( props["distanceRemaining"].is_number());
        assert!( props["estimatedArrival"].as_str().unwrap().ends_with('Z'));
        assert!( props["lastComputedAt"].as_str().unwrap().ends_with('Z'));

        let trace_id = props["traceID"].as_str().unwrap();
        assert_eq!( trace_id.len(), 32);
        assert!( trace_id.chars().all( |c| c.is_ascii_hexdigit()));

        let id = props["id"].as_str().unwrap();
        let f = table.get( id).unwrap();
        let coords = &feature["geometry"]["coordinates"];
        assert!( (coords[0].as_f64().unwrap() - f.position.longitude).abs() < 1e-9);
        assert!( (coords[1].as_f64().unwrap() - f.position.latitude).abs() < 1e-9);
        assert!( (coords[2].as_f64().unwrap() - f.position.altitude).abs() < 1e-6);
    }
}

#[test]
fn test_sequence_numbers () {
    let encoder = SnapshotEncoder::new( table_with_flights(1));
    let seq_of = |s: String| serde_json::from_str::<Value>( &s).unwrap()["seq"].as_u64().unwrap();

    assert_eq!( seq_of( encoder.encode_initial().unwrap()), 0);
    assert_eq!( seq_of( encoder.encode_update().unwrap()), 1);
    assert_eq!( seq_of( encoder.encode_update().unwrap()), 2);
    assert_eq!( seq_of( encoder.encode_initial().unwrap()), 0);
    assert_eq!( seq_of( encoder.encode_update().unwrap()), 3);
    assert_eq!( encoder.seq(), 3);
}

#[test]
fn test_empty_table () {
    let msg: Value = serde_json::from_str( &encode_flights( &[], 5, 1234).unwrap()).unwrap();
    assert_eq!( msg["seq"], 5);
    assert_eq!( msg["serverTimestamp"], 1234);
    assert_eq!( msg["featureCollection"]["features"].as_array().unwrap().len(), 0);
}

#[test]
fn test_route () {
    let airports = AirportDirectory::from_file( "tests/data/airports_two.geojson").unwrap().snapshot();
    let mut rng = StdRng::seed_from_u64(23);
    let f = create_flight( &airports, "JFK", "LAX", "JetBlue", "JBU9", Utc::now(), &mut rng, new_trace_id( &mut StdRng::seed_from_u64(1))).unwrap();
    let from = airports.position("JFK").unwrap();
    let to = airports.position("LAX").unwrap();

    let fc: Value = serde_json::to_value( route_collection( &f, &from, &to, 4)).unwrap();
    println!("{}", fc);

    assert_eq!( fc["type"], "FeatureCollection");
    let feature = &fc["features"][0];
    assert_eq!( feature["geometry"]["type"], "LineString");
    assert_eq!( feature["properties"]["id"], "JBU9-JFK-LAX");
    assert_eq!( feature["properties"]["callSign"], "JBU9");
    assert_eq!( feature["properties"]["from"], "JFK");
    assert_eq!( feature["properties"]["to"], "LAX");

    let coords = feature["geometry"]["coordinates"].as_array().unwrap();
    assert_eq!( coords.len(), 5);
    assert!( (coords[0][0].as_f64().unwrap() - from.longitude).abs() < 1e-9);
    assert!( (coords[4][0].as_f64().unwrap() - to.longitude).abs() < 1e-9);
    assert!( (coords[4][1].as_f64().unwrap() - to.latitude).abs() < 1e-9);
}
