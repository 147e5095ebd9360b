// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reactive sources/sinks runtime
//!
//! A pure `main` function turns source streams into sink streams; drivers
//! turn sinks into effects (rendering, logging, HTTP) and effects back into
//! sources. The runtime loop wires the two together through proxy channels.

pub mod apps;
pub mod driver;
pub mod errors;
pub mod payload;
pub mod render;
pub mod runtime;
pub mod stream;
pub mod vdom;

// Re-export commonly used types
pub use driver::{Driver, DriverOutput, DriverResult};
pub use errors::{CycleError, CycleResult, DriverError, RenderError, SurfaceError};
pub use payload::Payload;
pub use runtime::{run_loop, ChannelStatus, Circuit, RuntimeConfig, Sinks, Sources};
pub use stream::{PayloadSource, PayloadStream};
