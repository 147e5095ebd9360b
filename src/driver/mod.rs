// Copyright (c) 2025 - Cowboy AI, Inc.
//! Drivers - the Impure Boundary
//!
//! A driver turns a sink stream into a real-world effect and, optionally,
//! turns real-world events into a source stream.
//!
//! ```text
//! main (pure)                     Driver (impure)
//! ───────────                     ───────────────
//!
//!   sinks["DOM"]  ────────────>  drive(sink)  ──> render / log / fetch
//!                                     │
//!   sources["DOM"] <── proxy <────────┘ source (clicks, responses)
//! ```
//!
//! Drivers are created once at startup and invoked at most once. Invoking a
//! driver subscribes it: it spawns the task that consumes the sink and hands
//! back the source stream, if it has one.
//!
//! # Available Drivers
//!
//! - [`DomDriver`] - renders trees into a mount point, emits DOM events
//! - [`LogDriver`] - writes each value to a log writer
//! - [`HttpDriver`] - sends requests, emits responses
//!
//! Any `FnOnce(PayloadStream) -> DriverResult` closure is also a driver.

pub mod dom;
pub mod http;
pub mod log;

pub use dom::{DomDriver, DomEvent, DomSelection, DomSource, DomTarget};
pub use http::{HttpConfig, HttpDriver, HttpRequest, HttpResponse, HttpSource, StaticTransport, Transport};
pub use log::{ConsoleLog, LogDriver, LogEntry, LogWriter, MemoryLog};

#[cfg(feature = "http")]
pub use http::ReqwestTransport;

use std::fmt;
use tokio::task::JoinHandle;

use crate::errors::DriverError;
use crate::stream::PayloadStream;

/// What a driver hands back once subscribed
#[derive(Default)]
pub struct DriverOutput {
    /// Events the driver produces, fed back into `main` through a proxy
    pub source: Option<PayloadStream>,
    /// Tasks performing the driver's effects
    pub tasks: Vec<JoinHandle<()>>,
}

impl DriverOutput {
    /// Output of a write-only driver
    pub fn sink_only(task: JoinHandle<()>) -> Self {
        Self {
            source: None,
            tasks: vec![task],
        }
    }

    /// Output of a driver that also produces a source
    pub fn with_source(task: JoinHandle<()>, source: PayloadStream) -> Self {
        Self {
            source: Some(source),
            tasks: vec![task],
        }
    }
}

impl fmt::Debug for DriverOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverOutput")
            .field("has_source", &self.source.is_some())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Result of subscribing a driver to its sink
pub type DriverResult = Result<DriverOutput, DriverError>;

/// Impure effect boundary for one channel
pub trait Driver: Send {
    /// Subscribe to `sink` and start performing the effect
    ///
    /// Must be called from within a tokio runtime.
    fn drive(self: Box<Self>, sink: PayloadStream) -> DriverResult;
}

impl<F> Driver for F
where
    F: FnOnce(PayloadStream) -> DriverResult + Send,
{
    fn drive(self: Box<Self>, sink: PayloadStream) -> DriverResult {
        (*self)(sink)
    }
}
