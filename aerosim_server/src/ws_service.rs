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

//! websocket viewer management: a registry of connected viewers that can be sent an initial message
//! on their own task and that receive broadcasts concurrently, each write bounded by a timeout.
//! Viewers that fail or time out are evicted without affecting the others, and without waiting for their close

use std::{
    collections::HashMap, fmt, net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError, atomic::{AtomicU64, Ordering}},
    time::Duration
};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use async_trait::async_trait;
use futures::{future::join_all, sink::SinkExt, stream::{SplitSink, StreamExt}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::errors::{AeroServerError, AeroServerResult};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct ViewerId(u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer-{}", self.0)
    }
}

/// the send side of a viewer connection. Implementations have to serialize their own writes
#[async_trait]
pub trait ViewerSink: Send + Sync + 'static {
    fn remote_addr (&self)->Option<SocketAddr> { None }

    async fn send_text (&self, msg: Utf8Bytes)->AeroServerResult<()>;

    async fn close (&self);
}

/// the send half of a split axum WebSocket
pub struct WsViewer {
    remote_addr: SocketAddr,
    sender: tokio::sync::Mutex<SplitSink<WebSocket,Message>>,
}

impl WsViewer {
    pub fn new (remote_addr: SocketAddr, sender: SplitSink<WebSocket,Message>)->Self {
        WsViewer { remote_addr, sender: tokio::sync::Mutex::new(sender) }
    }
}

#[async_trait]
impl ViewerSink for WsViewer {
    fn remote_addr (&self)->Option<SocketAddr> { Some(self.remote_addr) }

    async fn send_text (&self, msg: Utf8Bytes)->AeroServerResult<()> {
        let mut sender = self.sender.lock().await;
        sender.send( Message::Text(msg)).await?;
        Ok(())
    }

    async fn close (&self) {
        let mut sender = self.sender.lock().await;
        let _ = sender.send( Message::Close(None)).await;
        let _ = sender.close().await;
    }
}

async fn send_with_timeout (sink: &dyn ViewerSink, msg: Utf8Bytes, timeout: Duration)->AeroServerResult<()> {
    match tokio::time::timeout( timeout, sink.send_text(msg)).await {
        Ok(res) => res,
        Err(_) => Err( AeroServerError::SendTimeout(timeout))
    }
}

/// the set of connected viewers. Registry mutations only hold the lock for map operations, never
/// across network I/O
pub struct ViewerRegistry {
    viewers: Mutex<HashMap<ViewerId,Arc<dyn ViewerSink>>>,
    next_id: AtomicU64,
    write_timeout: Duration,
}

impl ViewerRegistry {
    pub fn new (write_timeout: Duration)->Self {
        ViewerRegistry {
            viewers: Mutex::new( HashMap::new()),
            next_id: AtomicU64::new(1),
            write_timeout
        }
    }

    fn viewers (&self)->MutexGuard<'_,HashMap<ViewerId,Arc<dyn ViewerSink>>> {
        self.viewers.lock().unwrap_or_else( PoisonError::into_inner)
    }

    pub fn write_timeout (&self)->Duration { self.write_timeout }

    pub fn add_viewer (&self, sink: Arc<dyn ViewerSink>)->ViewerId {
        let id = ViewerId( self.next_id.fetch_add( 1, Ordering::Relaxed));
        let n = {
            let mut viewers = self.viewers();
            viewers.insert( id, sink);
            viewers.len()
        };
        debug!("added {} ({} viewers)", id, n);
        id
    }

    /// register a viewer and send it the message computed by `init_msg` on its own task. This is how
    /// connections join the broadcast set
    pub fn connect<F> (self: &Arc<Self>, sink: Arc<dyn ViewerSink>, init_msg: F)->ViewerId
        where F: FnOnce()->Option<Utf8Bytes> + Send + 'static
    {
        let id = self.add_viewer( sink);
        self.spawn_send( id, init_msg);
        id
    }

    /// unregister a viewer and close it on a detached task, so that callers never wait for a stalled
    /// peer. Returns false if it was not (or no longer) registered
    pub fn remove_viewer (&self, id: ViewerId)->bool {
        let removed = self.viewers().remove( &id);

        if let Some(sink) = removed {
            debug!("removed {} ({} viewers)", id, self.count());
            let timeout = self.write_timeout;
            tokio::spawn( async move {
                if tokio::time::timeout( timeout, sink.close()).await.is_err() {
                    debug!("closing {} timed out", id);
                }
            });
            true
        } else {
            false
        }
    }

    pub fn count (&self)->usize {
        self.viewers().len()
    }

    pub fn contains (&self, id: ViewerId)->bool {
        self.viewers().contains_key( &id)
    }

    fn get (&self, id: ViewerId)->Option<Arc<dyn ViewerSink>> {
        self.viewers().get( &id).cloned()
    }

    /// send to a single viewer, evicting it if the write fails or times out
    pub async fn send_to (&self, id: ViewerId, msg: Utf8Bytes)->bool {
        if let Some(sink) = self.get( id) {
            match send_with_timeout( sink.as_ref(), msg, self.write_timeout).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("send to {} failed: {}, evicting", id, e);
                    self.remove_viewer( id);
                    false
                }
            }
        } else {
            false
        }
    }

    /// compute and send a message to viewer `id` from its own task so that a slow viewer does not
    /// hold up the caller. `None` messages are skipped
    pub fn spawn_send<F> (self: &Arc<Self>, id: ViewerId, msg_fn: F) where F: FnOnce()->Option<Utf8Bytes> + Send + 'static {
        let registry = self.clone();
        tokio::spawn( async move {
            if let Some(msg) = msg_fn() {
                registry.send_to( id, msg).await;
            }
        });
    }

    /// send `msg` concurrently to a copy of the current viewer set and evict every viewer whose send
    /// failed or timed out. Returns the number of successful deliveries
    pub async fn broadcast (&self, msg: Utf8Bytes)->usize {
        let viewers: Vec<(ViewerId,Arc<dyn ViewerSink>)> = self.viewers().iter().map( |(id,s)| (*id, s.clone())).collect();
        if viewers.is_empty() { return 0 }

        let timeout = self.write_timeout;
        let results = join_all( viewers.iter().map( |(id,sink)| {
            let msg = msg.clone();
            async move { (*id, send_with_timeout( sink.as_ref(), msg, timeout).await) }
        })).await;

        let mut delivered = 0;
        let mut failed: Vec<ViewerId> = Vec::new();
        for (id,res) in results {
            match res {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("broadcast to {} failed: {}, evicting", id, e);
                    failed.push(id);
                }
            }
        }

        for id in failed {
            self.remove_viewer( id);
        }

        delivered
    }
}

/// run a viewer connection until the client closes it, the connection breaks or `cancel` is triggered.
/// `connect` registers the sink (normally through [`ViewerRegistry::connect`]) and returns its id.
/// Inbound frames are ignored except for close
pub async fn serve_viewer<F> (ws: WebSocket, remote_addr: SocketAddr, registry: Arc<ViewerRegistry>, cancel: CancellationToken, connect: F)
    where F: FnOnce(Arc<dyn ViewerSink>)->ViewerId
{
    let (sender, mut receiver) = ws.split();
    let id = connect( Arc::new( WsViewer::new( remote_addr, sender)));
    info!("{} connected from {}", id, remote_addr);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // we don't process client messages
                    Some(Err(e)) => {
                        debug!("{} read error: {}", id, e);
                        break
                    }
                }
            }
        }
    }

    registry.remove_viewer( id);
    info!("{} from {} disconnected", id, remote_addr);
}
