//! Topology source collaborator: HTTP polling on a background thread.
//!
//! The backend is polled at a fixed interval; the UI can also request an
//! immediate refresh or trigger asynchronous re-discovery. All traffic
//! crosses into the frame loop through `std::sync::mpsc` channels drained
//! by `apply_poll_updates_system` — the render side never blocks on I/O.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::config::NetmapConfig;
use crate::core::model::{TopologyGraph, TopologySnapshot};
use crate::core::positions::PositionStore;
use crate::core::resources::{FetchPhase, Regions, StatusMessage, Topology};

/// Read side of the topology inventory.
pub trait TopologySource: Send {
    /// Fetch the full current snapshot.
    fn fetch(&self) -> Result<TopologySnapshot, SourceError>;
    /// Ask the backend to start a new discovery run. Returns as soon as
    /// the run is accepted; results arrive via a later `fetch`.
    fn trigger_discovery(&self) -> Result<(), SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// `TopologySource` over the monitoring backend's REST API.
pub struct HttpTopologySource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTopologySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }
}

impl TopologySource for HttpTopologySource {
    fn fetch(&self) -> Result<TopologySnapshot, SourceError> {
        let response = self
            .client
            .get(format!("{}/api/topology", self.base_url))
            .send()?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }
        Ok(response.json()?)
    }

    fn trigger_discovery(&self) -> Result<(), SourceError> {
        let response = self
            .client
            .post(format!("{}/api/topology/discover", self.base_url))
            .send()?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }
        Ok(())
    }
}

/// UI → poll thread.
pub enum PollCommand {
    /// Fetch now instead of waiting out the interval.
    Refresh,
    /// Trigger backend discovery, then re-poll after the configured delay.
    Discover,
}

/// Poll thread → frame loop.
pub enum PollUpdate {
    Snapshot(TopologySnapshot),
    FetchFailed(String),
    DiscoveryStarted,
    DiscoveryFailed(String),
}

/// Command sender handed to the UI.
#[derive(Resource)]
pub struct PollCommands(pub Sender<PollCommand>);

/// Update receiver drained once per frame. `Receiver` is not `Sync`, so
/// it sits behind a mutex the same way the file-dialog channel does in
/// comparable apps.
#[derive(Resource)]
pub struct PollReceiver(pub Mutex<Receiver<PollUpdate>>);

/// Spawn the poll thread. It fetches once immediately, then on every
/// interval tick or `Refresh` command, and exits when the command sender
/// is dropped.
pub fn spawn_poll_thread<S: TopologySource + 'static>(
    source: S,
    interval: Duration,
    rediscover_delay: Duration,
) -> (Sender<PollCommand>, Receiver<PollUpdate>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<PollCommand>();
    let (update_tx, update_rx) = mpsc::channel::<PollUpdate>();

    std::thread::spawn(move || {
        let fetch_into = |tx: &Sender<PollUpdate>| {
            let update = match source.fetch() {
                Ok(snapshot) => PollUpdate::Snapshot(snapshot),
                Err(err) => PollUpdate::FetchFailed(err.to_string()),
            };
            tx.send(update).is_ok()
        };

        if !fetch_into(&update_tx) {
            return;
        }
        loop {
            match cmd_rx.recv_timeout(interval) {
                Ok(PollCommand::Refresh) | Err(RecvTimeoutError::Timeout) => {
                    if !fetch_into(&update_tx) {
                        return;
                    }
                }
                Ok(PollCommand::Discover) => {
                    match source.trigger_discovery() {
                        Ok(()) => {
                            let _ = update_tx.send(PollUpdate::DiscoveryStarted);
                            std::thread::sleep(rediscover_delay);
                            if !fetch_into(&update_tx) {
                                return;
                            }
                        }
                        Err(err) => {
                            // Non-fatal: the rendered graph is untouched.
                            if update_tx.send(PollUpdate::DiscoveryFailed(err.to_string())).is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    });

    (cmd_tx, update_rx)
}

/// Drain poll updates into the scene resources. A fresh snapshot is laid
/// out and merged under existing positions *before* anything renders; a
/// fetch failure clears the graph (no stale partial scene) but leaves
/// stored positions alone so they survive a transient outage.
pub fn apply_poll_updates_system(
    receiver: Res<PollReceiver>,
    config: Res<NetmapConfig>,
    mut topology: ResMut<Topology>,
    mut store: ResMut<PositionStore>,
    mut regions: ResMut<Regions>,
    mut phase: ResMut<FetchPhase>,
    mut status: ResMut<StatusMessage>,
    window_q: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(guard) = receiver.0.try_lock() else {
        return;
    };

    while let Ok(update) = guard.try_recv() {
        match update {
            PollUpdate::Snapshot(snapshot) => {
                let (canvas_w, canvas_h) = window_q
                    .single()
                    .map(|w| (w.width(), w.height()))
                    .unwrap_or((1280.0, 720.0));

                let graph = TopologyGraph::build(snapshot.nodes, snapshot.edges);
                let devices: Vec<_> = graph.device_by_id.values().cloned().collect();
                regions.0 = store.refresh(&devices, canvas_w, canvas_h);

                info!(
                    "[POLL] applied snapshot: {} devices, {} links, {} regions",
                    graph.device_count(),
                    graph.links.len(),
                    regions.0.len()
                );
                topology.graph = graph;
                topology.generation += 1;
                *phase = FetchPhase::Live;
            }
            PollUpdate::FetchFailed(err) => {
                warn!("[POLL] fetch failed: {err}");
                topology.graph = TopologyGraph::default();
                topology.generation += 1;
                regions.0.clear();
                *phase = FetchPhase::Failed(err);
            }
            PollUpdate::DiscoveryStarted => {
                status.set("Discovery started", config.status_message_duration);
            }
            PollUpdate::DiscoveryFailed(err) => {
                warn!("[DISCOVER] {err}");
                status.set(format!("Discovery failed: {err}"), config.status_message_duration);
            }
        }
    }
}
