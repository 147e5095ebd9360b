// Copyright (c) 2025 - Cowboy AI, Inc.
//! Proxy Channel - Forward References Between Sinks and Sources
//!
//! The runtime loop has to hand `main` its sources before the drivers that
//! produce them exist. A proxy channel breaks that cycle with two ends:
//!
//! ```text
//! ProxyFeed ──push──> [subscribers] ──> Source::stream() (one per subscriber)
//! ```
//!
//! The channel is created first, the observing end is given to the dependent
//! computation, and the feeding end is connected to the real producer later.
//!
//! # Semantics
//!
//! - **Hot**: a subscriber only sees values pushed after it subscribed
//! - **No replay**: nothing is retained once every current subscriber has
//!   been handed the value
//! - **Ordered**: each subscriber observes values in push order

use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::{BoxStream, StreamExt};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Subscribers<T> = Arc<Mutex<Vec<UnboundedSender<T>>>>;

fn lock<T>(subscribers: &Mutex<Vec<UnboundedSender<T>>>) -> MutexGuard<'_, Vec<UnboundedSender<T>>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected pair of proxy ends
///
/// # Examples
///
/// ```rust
/// use cycle_runtime::stream::proxy;
/// use futures::StreamExt;
///
/// # tokio_test::block_on(async {
/// let (feed, source) = proxy::channel::<i32>();
/// let mut values = source.stream();
/// feed.push(7);
/// assert_eq!(values.next().await, Some(7));
/// # });
/// ```
pub fn channel<T: Clone + Send + 'static>() -> (ProxyFeed<T>, Source<T>) {
    let subscribers: Subscribers<T> = Arc::new(Mutex::new(Vec::new()));
    (
        ProxyFeed {
            subscribers: subscribers.clone(),
        },
        Source { subscribers },
    )
}

/// Pushing end of a proxy channel
pub struct ProxyFeed<T> {
    subscribers: Subscribers<T>,
}

impl<T: Clone + Send + 'static> ProxyFeed<T> {
    /// Forward a value to every live subscriber
    ///
    /// Returns the number of subscribers the value was delivered to. Closed
    /// subscriptions are pruned on the way.
    pub fn push(&self, value: T) -> usize {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| tx.unbounded_send(value.clone()).is_ok());
        subscribers.len()
    }

    /// Number of subscriptions that have not been dropped yet
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    /// Observing end connected to this feed
    pub fn source(&self) -> Source<T> {
        Source {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> Clone for ProxyFeed<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> fmt::Debug for ProxyFeed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyFeed<{}>", std::any::type_name::<T>())
    }
}

/// Observing end of a proxy channel
///
/// Cloning a `Source` shares the channel; each call to [`Source::stream`]
/// opens an independent subscription.
pub struct Source<T> {
    subscribers: Subscribers<T>,
}

impl<T: Clone + Send + 'static> Source<T> {
    /// Subscribe to every value pushed from now on
    pub fn stream(&self) -> BoxStream<'static, T> {
        let (tx, rx) = unbounded();
        lock(&self.subscribers).push(tx);
        rx.boxed()
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source<{}>", std::any::type_name::<T>())
    }
}
