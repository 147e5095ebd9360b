// Copyright (c) 2025 - Cowboy AI, Inc.
//! Log Driver
//!
//! Write-only: every value of the Log sink is delivered to a [`LogWriter`]
//! as one display line, in emission order.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{Driver, DriverOutput, DriverResult};
use crate::stream::PayloadStream;

/// Channel name the Log driver is registered under
pub const LOG: &str = "Log";

/// Destination of log lines
pub trait LogWriter: Send + Sync {
    /// Deliver one line
    fn write_line(&self, line: &str);
}

/// Writes lines to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl LogWriter for ConsoleLog {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// A line captured by [`MemoryLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the line was written
    pub at: DateTime<Utc>,
    /// The line
    pub line: String,
}

/// Keeps every line in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry written so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|entry| entry.line.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogWriter for MemoryLog {
    fn write_line(&self, line: &str) {
        self.lock().push(LogEntry {
            at: Utc::now(),
            line: line.to_string(),
        });
    }
}

/// Delivers the Log sink to a writer
pub struct LogDriver {
    writer: Arc<dyn LogWriter>,
}

impl LogDriver {
    /// Driver writing to `writer`
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        Self { writer }
    }

    /// Driver writing to stdout
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleLog))
    }
}

impl fmt::Debug for LogDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogDriver")
    }
}

impl Driver for LogDriver {
    fn drive(self: Box<Self>, mut sink: PayloadStream) -> DriverResult {
        let writer = self.writer;
        let task = tokio::spawn(async move {
            while let Some(payload) = sink.next().await {
                let line = payload.to_string();
                debug!(line = %line, "Log sink value");
                writer.write_line(&line);
            }
            debug!("Log sink completed");
        });
        Ok(DriverOutput::sink_only(task))
    }
}
