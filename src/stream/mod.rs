// Copyright (c) 2025 - Cowboy AI, Inc.
//! Streams, Proxies and Operators
//!
//! Every channel of a circuit carries a stream of [`Payload`]s. Streams are
//! plain `futures` streams; this module adds the proxy channel used to close
//! the feedback loop and the operators the applications compose with.
//!
//! ```text
//! Time: ────────────────────────────→
//! Sink:       ●       ●   ●       ●     (values main produces)
//! Source:   ●     ●         ●           (values a driver produces)
//! ```

pub mod ops;
pub mod proxy;

pub use ops::{combine_latest, flat_map_latest, merge, periodic, start_with, switch_latest};
pub use proxy::{ProxyFeed, Source};

use crate::payload::Payload;
use futures::stream::BoxStream;

/// Stream of payloads flowing through one channel
pub type PayloadStream = BoxStream<'static, Payload>;

/// Observing end of a channel's proxy
pub type PayloadSource = Source<Payload>;
