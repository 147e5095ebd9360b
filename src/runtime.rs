// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime Loop
//!
//! Wires a pure `main` function to a set of impure drivers and closes the
//! feedback loop between them.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────── proxies ────────────────┐
//!            │                                         │
//!            ▼                                         │
//!      ┌──────────┐   Sinks    ┌──────────────┐   sources
//!      │   main   │ ────────>  │   drivers    │ ──────┘
//!      │  (pure)  │            │  (impure)    │
//!      └──────────┘            └──────────────┘
//!       Sources in               effects out
//! ```
//!
//! # Wiring order
//!
//! 1. One proxy channel per declared driver, created before `main` runs
//! 2. `main` invoked exactly once with the proxies' observing ends
//! 3. Each driver with a matching sink invoked once with it
//! 4. Each driver source forwarded into its channel's proxy
//!
//! `main` is never invoked again: after wiring the graph runs on its own.
//!
//! # Failure policy
//!
//! A failing `main` wires nothing. A driver that fails or panics while
//! subscribing only takes its own channel down.
//!
//! # Example
//!
//! ```rust,no_run
//! use cycle_runtime::apps::timer::{self, TimerConfig};
//! use cycle_runtime::driver::{ConsoleLog, DomDriver, LogDriver};
//! use cycle_runtime::render::MemorySurface;
//! use cycle_runtime::runtime::{run_loop, RuntimeConfig};
//! use std::sync::Arc;
//!
//! # async fn demo() -> cycle_runtime::CycleResult<()> {
//! let surface = Arc::new(MemorySurface::with_mount("#app")?);
//! let config = RuntimeConfig::new(timer::app(TimerConfig::default()))
//!     .driver("DOM", DomDriver::for_mount(surface, "#app")?)
//!     .driver("Log", LogDriver::new(Arc::new(ConsoleLog)));
//!
//! let circuit = run_loop(config)?;
//! circuit.join().await;
//! # Ok(())
//! # }
//! ```

use futures::StreamExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::driver::dom::{DomSource, DOM};
use crate::driver::http::{HttpSource, HTTP};
use crate::driver::{Driver, DriverResult};
use crate::errors::{CycleError, CycleResult, DriverError};
use crate::payload::Payload;
use crate::stream::{proxy, PayloadSource, PayloadStream, ProxyFeed};

/// The application's pure entry point
pub type MainFn = Box<dyn FnOnce(Sources) -> CycleResult<Sinks> + Send>;

/// Everything one `run_loop` call needs: `main` and the drivers by channel
pub struct RuntimeConfig {
    main: MainFn,
    drivers: BTreeMap<String, Box<dyn Driver>>,
}

impl RuntimeConfig {
    /// Configuration for `main` with no drivers yet
    pub fn new<M>(main: M) -> Self
    where
        M: FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static,
    {
        Self {
            main: Box::new(main),
            drivers: BTreeMap::new(),
        }
    }

    /// Register `driver` for channel `name`, replacing any previous one
    pub fn driver(mut self, name: impl Into<String>, driver: impl Driver + 'static) -> Self {
        self.drivers.insert(name.into(), Box::new(driver));
        self
    }

    /// Declared channel names, sorted
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("channels", &self.channels().collect::<Vec<_>>())
            .finish()
    }
}

/// Sources handed to `main`, one proxy per declared channel
#[derive(Debug, Clone, Default)]
pub struct Sources {
    proxies: BTreeMap<String, PayloadSource>,
}

impl Sources {
    /// Source of channel `name`
    pub fn get(&self, name: &str) -> CycleResult<PayloadSource> {
        self.proxies
            .get(name)
            .cloned()
            .ok_or_else(|| CycleError::UnknownChannel(name.to_string()))
    }

    /// Subscribe to channel `name`
    pub fn stream(&self, name: &str) -> CycleResult<PayloadStream> {
        Ok(self.get(name)?.stream())
    }

    /// Typed DOM source
    pub fn dom(&self) -> CycleResult<DomSource> {
        Ok(DomSource::new(self.get(DOM)?))
    }

    /// Typed HTTP source
    pub fn http(&self) -> CycleResult<HttpSource> {
        Ok(HttpSource::new(self.get(HTTP)?))
    }

    /// Channel names, sorted
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.proxies.keys().map(String::as_str)
    }
}

/// Sinks returned by `main`
#[derive(Default)]
pub struct Sinks {
    streams: BTreeMap<String, PayloadStream>,
}

impl Sinks {
    /// No sinks
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the sink for channel `name`
    pub fn with(mut self, name: impl Into<String>, stream: PayloadStream) -> Self {
        self.insert(name, stream);
        self
    }

    /// Set the sink for channel `name`, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, stream: PayloadStream) {
        self.streams.insert(name.into(), stream);
    }

    /// Remove and return the sink for channel `name`
    pub fn take(&mut self, name: &str) -> Option<PayloadStream> {
        self.streams.remove(name)
    }

    /// Channel names, sorted
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Number of sinks
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether `main` returned no sinks
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl fmt::Debug for Sinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks")
            .field("channels", &self.channels().collect::<Vec<_>>())
            .finish()
    }
}

/// Outcome of wiring one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Driver subscribed to its sink
    Wired {
        /// Whether the driver's source is forwarded back into `main`
        emits_source: bool,
    },
    /// Driver failed while subscribing; the channel carries nothing
    Failed {
        /// Error or panic message
        reason: String,
    },
    /// Driver declared but `main` returned no sink for it
    Idle,
}

/// A wired reactive graph
pub struct Circuit {
    statuses: BTreeMap<String, ChannelStatus>,
    unrouted: Vec<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl Circuit {
    /// Status of channel `name`
    pub fn status(&self, name: &str) -> Option<&ChannelStatus> {
        self.statuses.get(name)
    }

    /// Status of every declared channel
    pub fn statuses(&self) -> &BTreeMap<String, ChannelStatus> {
        &self.statuses
    }

    /// Sinks returned by `main` that no driver consumes
    pub fn unrouted(&self) -> &[String] {
        &self.unrouted
    }

    /// Whether no channel failed
    pub fn is_healthy(&self) -> bool {
        !self
            .statuses
            .values()
            .any(|status| matches!(status, ChannelStatus::Failed { .. }))
    }

    /// Wait for every driver and forwarder task to finish
    ///
    /// Circuits fed by endless sources (timers, surfaces) never finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                if e.is_panic() {
                    error!(error = %e, "Circuit task panicked");
                }
            }
        }
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circuit")
            .field("statuses", &self.statuses)
            .field("unrouted", &self.unrouted)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

async fn forward(channel: String, mut source: PayloadStream, feed: ProxyFeed<Payload>) {
    while let Some(payload) = source.next().await {
        let delivered = feed.push(payload);
        trace!(channel = %channel, delivered, "Forwarded source value");
    }
    debug!(channel = %channel, "Driver source completed");
}

fn subscribe(driver: Box<dyn Driver>, sink: PayloadStream) -> DriverResult {
    match panic::catch_unwind(AssertUnwindSafe(move || driver.drive(sink))) {
        Ok(result) => result,
        Err(panic) => Err(DriverError::Panicked(panic_message(panic))),
    }
}

/// Wire `main` to the configured drivers and start the graph
///
/// Must be called from within a tokio runtime.
pub fn run_loop(config: RuntimeConfig) -> CycleResult<Circuit> {
    let RuntimeConfig { main, drivers } = config;

    let mut feeds: BTreeMap<String, ProxyFeed<Payload>> = BTreeMap::new();
    let mut proxies: BTreeMap<String, PayloadSource> = BTreeMap::new();
    for name in drivers.keys() {
        let (feed, source) = proxy::channel();
        feeds.insert(name.clone(), feed);
        proxies.insert(name.clone(), source);
    }
    info!(channels = ?proxies.keys().collect::<Vec<_>>(), "Starting reactive loop");

    let mut sinks = match panic::catch_unwind(AssertUnwindSafe(move || main(Sources { proxies }))) {
        Ok(Ok(sinks)) => sinks,
        Ok(Err(e)) => {
            error!(error = %e, "main failed, nothing wired");
            return Err(e);
        }
        Err(panic) => {
            let e = CycleError::main(panic_message(panic));
            error!(error = %e, "main panicked, nothing wired");
            return Err(e);
        }
    };

    let mut statuses = BTreeMap::new();
    let mut tasks = Vec::new();

    for (name, driver) in drivers {
        let Some(sink) = sinks.take(&name) else {
            debug!(channel = %name, "No sink for driver, channel idle");
            statuses.insert(name, ChannelStatus::Idle);
            continue;
        };

        let status = match subscribe(driver, sink) {
            Ok(output) => {
                tasks.extend(output.tasks);
                let emits_source = output.source.is_some();
                if let (Some(source), Some(feed)) = (output.source, feeds.remove(&name)) {
                    tasks.push(tokio::spawn(forward(name.clone(), source, feed)));
                }
                info!(channel = %name, emits_source, "Channel wired");
                ChannelStatus::Wired { emits_source }
            }
            Err(e) => {
                error!(channel = %name, error = %e, "Driver failed to subscribe");
                ChannelStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        statuses.insert(name, status);
    }

    let unrouted: Vec<String> = sinks.channels().map(str::to_string).collect();
    for name in &unrouted {
        warn!(channel = %name, "Sink has no driver, dropped");
    }

    Ok(Circuit {
        statuses,
        unrouted,
        tasks,
    })
}
