// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cycle-runtime
//!
//! Recording drivers, a mounted in-memory surface and a polling helper shared
//! by the integration tests.
#![allow(dead_code)]

use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cycle_runtime::driver::{DriverOutput, DriverResult};
use cycle_runtime::render::{MemorySurface, MountId};
use cycle_runtime::{Payload, PayloadStream};

/// Mount point used by every surface fixture
pub const MOUNT: &str = "#app";

/// Values a recording driver received on its sink
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    values: Arc<Mutex<Vec<Payload>>>,
}

impl Recorder {
    /// Everything recorded so far
    pub fn values(&self) -> Vec<Payload> {
        self.values.lock().expect("recorder lock poisoned").clone()
    }

    /// Recorded integers
    pub fn integers(&self) -> Vec<i64> {
        self.values()
            .iter()
            .filter_map(Payload::as_integer)
            .collect()
    }

    fn push(&self, payload: Payload) {
        self.values.lock().expect("recorder lock poisoned").push(payload);
    }
}

/// Driver that records its sink and emits `emits` as its source
pub fn recording_driver(
    emits: Vec<Payload>,
) -> (
    Recorder,
    impl FnOnce(PayloadStream) -> DriverResult + Send + 'static,
) {
    let recorder = Recorder::default();
    let values = recorder.clone();
    let driver = move |sink: PayloadStream| -> DriverResult {
        let task = tokio::spawn(async move {
            sink.for_each(|payload| {
                values.push(payload);
                future::ready(())
            })
            .await;
        });
        let source = (!emits.is_empty()).then(|| stream::iter(emits).boxed());
        Ok(DriverOutput {
            source,
            tasks: vec![task],
        })
    };
    (recorder, driver)
}

/// Surface with the `#app` mount point
pub fn surface() -> (Arc<MemorySurface>, MountId) {
    let surface = Arc::new(MemorySurface::with_mount(MOUNT).expect("valid mount"));
    let mount = MountId::parse(MOUNT).expect("valid mount");
    (surface, mount)
}

/// Yield to the runtime until `condition` holds
///
/// Panics after five seconds of wall-clock polling.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Wait until the mount's markup contains `needle`
pub async fn wait_for_html(surface: &MemorySurface, mount: &MountId, needle: &str) {
    wait_until(|| {
        surface
            .html(mount)
            .map_or(false, |html| html.contains(needle))
    })
    .await;
}
