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

use std::{sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}}, time::Duration};
use async_trait::async_trait;
use axum::extract::ws::Utf8Bytes;
use aerosim_server::{ViewerRegistry, ViewerSink, errors::{AeroServerResult, op_failed}};

// run with "cargo test -p aerosim_server --test test_registry -- --nocapture"

#[derive(Clone,Copy,PartialEq)]
enum Mode { Ok, Fail, Hang, Dead }

struct TestSink {
    mode: Mode,
    received: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl TestSink {
    fn new (mode: Mode)->Arc<Self> {
        Arc::new( TestSink { mode, received: Mutex::new(Vec::new()), closed: AtomicBool::new(false) })
    }

    fn received (&self)->Vec<String> { self.received.lock().unwrap().clone() }
}

#[async_trait]
impl ViewerSink for TestSink {
    async fn send_text (&self, msg: Utf8Bytes)->AeroServerResult<()> {
        match self.mode {
            Mode::Ok => { self.received.lock().unwrap().push( msg.as_str().to_string()); Ok(()) }
            Mode::Fail => Err( op_failed("broken pipe")),
            Mode::Hang | Mode::Dead => { tokio::time::sleep( Duration::from_secs(3600)).await; Ok(()) }
        }
    }

    async fn close (&self) {
        if self.mode == Mode::Dead { // peer does not answer the close handshake either
            tokio::time::sleep( Duration::from_secs(3600)).await;
        }
        self.closed.store( true, Ordering::Relaxed);
    }
}

/// closing happens on a detached task, give it a chance to run
async fn is_closed (sink: &TestSink)->bool {
    for _ in 0..50 {
        if sink.closed.load( Ordering::Relaxed) { return true }
        tokio::time::sleep( Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_broadcast_isolation() {
    let registry = ViewerRegistry::new( Duration::from_millis(200));

    let good: Vec<Arc<TestSink>> = (0..4).map( |_| TestSink::new(Mode::Ok)).collect();
    let bad = TestSink::new( Mode::Fail);

    let good_ids: Vec<_> = good.iter().map( |s| registry.add_viewer( s.clone())).collect();
    let bad_id = registry.add_viewer( bad.clone());
    assert_eq!( registry.count(), 5);

    let delivered = registry.broadcast( Utf8Bytes::from("hello")).await;
    println!("delivered to {delivered} viewers, {} remaining", registry.count());

    assert_eq!( delivered, 4);
    assert_eq!( registry.count(), 4);
    assert!( !registry.contains( bad_id));
    assert!( is_closed( &bad).await);
    for (s,id) in good.iter().zip( good_ids.iter()) {
        assert!( registry.contains(*id));
        assert_eq!( s.received(), vec!["hello".to_string()]);
    }
}

#[tokio::test]
async fn test_slow_viewer_eviction() {
    let registry = ViewerRegistry::new( Duration::from_millis(100));

    let good = TestSink::new( Mode::Ok);
    let slow = TestSink::new( Mode::Hang);
    registry.add_viewer( good.clone());
    let slow_id = registry.add_viewer( slow.clone());

    let t0 = tokio::time::Instant::now();
    let delivered = registry.broadcast( Utf8Bytes::from("tick")).await;
    let elapsed = t0.elapsed();
    println!("broadcast with slow viewer took {:?}", elapsed);

    assert_eq!( delivered, 1);
    assert!( elapsed < Duration::from_secs(2));
    assert!( !registry.contains( slow_id));
    assert_eq!( good.received(), vec!["tick".to_string()]);
}

#[tokio::test]
async fn test_dead_viewer_eviction() {
    let write_timeout = Duration::from_millis(200);
    let registry = ViewerRegistry::new( write_timeout);

    let good = TestSink::new( Mode::Ok);
    let dead = TestSink::new( Mode::Dead);
    registry.add_viewer( good.clone());
    let dead_id = registry.add_viewer( dead.clone());

    // the eviction must not wait for the close of a peer that stopped reading
    let t0 = tokio::time::Instant::now();
    let delivered = registry.broadcast( Utf8Bytes::from("tick")).await;
    let elapsed = t0.elapsed();
    println!("broadcast with dead viewer took {:?}", elapsed);

    assert_eq!( delivered, 1);
    assert!( elapsed < write_timeout + write_timeout / 2, "broadcast blocked for {:?}", elapsed);
    assert!( !registry.contains( dead_id));
    assert_eq!( registry.count(), 1);

    // the next broadcast only sees the remaining viewer
    let t0 = tokio::time::Instant::now();
    assert_eq!( registry.broadcast( Utf8Bytes::from("tock")).await, 1);
    assert!( t0.elapsed() < write_timeout);
    assert_eq!( good.received(), vec!["tick".to_string(), "tock".to_string()]);
    assert!( !dead.closed.load( Ordering::Relaxed));
}

#[tokio::test]
async fn test_remove_idempotent() {
    let registry = ViewerRegistry::new( Duration::from_millis(100));
    let sink = TestSink::new( Mode::Ok);
    let id = registry.add_viewer( sink.clone());

    assert!( registry.remove_viewer(id));
    assert!( !registry.contains(id));
    assert!( !registry.remove_viewer(id));
    assert!( is_closed( &sink).await);
    assert_eq!( registry.count(), 0);

    // nothing to send to
    assert_eq!( registry.broadcast( Utf8Bytes::from("x")).await, 0);
    assert!( !registry.send_to( id, Utf8Bytes::from("x")).await);
}

#[tokio::test]
async fn test_initial_send() {
    let registry = Arc::new( ViewerRegistry::new( Duration::from_millis(100)));
    let sink = TestSink::new( Mode::Ok);
    let id = registry.connect( sink.clone(), || Some( Utf8Bytes::from("initial")));
    assert!( registry.contains( id));
    registry.spawn_send( id, || None);

    for _ in 0..50 {
        if !sink.received().is_empty() { break }
        tokio::time::sleep( Duration::from_millis(10)).await;
    }
    assert_eq!( sink.received(), vec!["initial".to_string()]);

    // a failing initial send evicts
    let bad = TestSink::new( Mode::Fail);
    let bad_id = registry.connect( bad.clone(), || Some( Utf8Bytes::from("initial")));
    for _ in 0..50 {
        if !registry.contains( bad_id) { break }
        tokio::time::sleep( Duration::from_millis(10)).await;
    }
    assert!( !registry.contains( bad_id));
    assert!( registry.contains( id));
}
