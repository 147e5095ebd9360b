// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream Operators
//!
//! The handful of operators the applications need on top of
//! `futures::StreamExt` (`map`, `filter`, `scan`, ...).
//!
//! # Available Operators
//!
//! - `start_with` - Emit a seed value before the stream
//! - `merge` - Interleave two streams in arrival order
//! - `switch_latest` - Follow only the most recent inner stream
//! - `flat_map_latest` - `map` into streams, then `switch_latest`
//! - `combine_latest` - Combine the latest values of two streams
//! - `periodic` - Tick counter, first tick immediately

use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Emit `value` first, then every value of `stream`
///
/// # Examples
///
/// ```rust
/// use cycle_runtime::stream::ops::start_with;
/// use futures::stream::{self, StreamExt};
///
/// # tokio_test::block_on(async {
/// let values = start_with(0, stream::iter(vec![1, 2]).boxed());
/// assert_eq!(values.collect::<Vec<_>>().await, vec![0, 1, 2]);
/// # });
/// ```
pub fn start_with<T>(value: T, stream: BoxStream<'static, T>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    stream::once(future::ready(value)).chain(stream).boxed()
}

/// Interleave two streams, each value delivered as it arrives
pub fn merge<T>(a: BoxStream<'static, T>, b: BoxStream<'static, T>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    stream::select(a, b).boxed()
}

/// Flatten a stream of streams, following only the latest inner stream
///
/// When the outer stream yields a new inner stream, the previous inner stream
/// is dropped and its pending values are never observed. The result ends once
/// the outer stream and the current inner stream have both ended.
pub fn switch_latest<T>(outer: BoxStream<'static, BoxStream<'static, T>>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    SwitchLatest {
        outer: Some(outer),
        inner: None,
    }
    .boxed()
}

/// Map each value to a stream and follow only the latest one
pub fn flat_map_latest<T, U, F>(stream: BoxStream<'static, T>, f: F) -> BoxStream<'static, U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> BoxStream<'static, U> + Send + 'static,
{
    switch_latest(stream.map(f).boxed())
}

/// Outer values taken per poll before yielding to the executor
const OUTER_BUDGET: usize = 32;

struct SwitchLatest<T> {
    outer: Option<BoxStream<'static, BoxStream<'static, T>>>,
    inner: Option<BoxStream<'static, T>>,
}

impl<T> Stream for SwitchLatest<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();

        // Drain the outer stream first so a stale inner value is never emitted
        let mut budget = OUTER_BUDGET;
        while let Some(outer) = this.outer.as_mut() {
            if budget == 0 {
                // Outer is still ready; resume draining on the next poll
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            budget -= 1;
            match outer.poll_next_unpin(cx) {
                Poll::Ready(Some(inner)) => this.inner = Some(inner),
                Poll::Ready(None) => this.outer = None,
                Poll::Pending => break,
            }
        }

        if let Some(inner) = this.inner.as_mut() {
            match inner.poll_next_unpin(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => this.inner = None,
                Poll::Pending => return Poll::Pending,
            }
        }

        if this.outer.is_none() && this.inner.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

enum Side<A, B> {
    Left(A),
    Right(B),
}

/// Combine the latest values of two streams
///
/// Emits `f(a, b)` every time either stream yields, once both have yielded
/// at least one value.
pub fn combine_latest<A, B, T, F>(
    a: BoxStream<'static, A>,
    b: BoxStream<'static, B>,
    f: F,
) -> BoxStream<'static, T>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(A, B) -> T + Send + 'static,
{
    stream::select(a.map(Side::Left), b.map(Side::Right))
        .scan((None, None), move |latest: &mut (Option<A>, Option<B>), side| {
            match side {
                Side::Left(value) => latest.0 = Some(value),
                Side::Right(value) => latest.1 = Some(value),
            }
            let combined = match latest {
                (Some(a), Some(b)) => Some(f(a.clone(), b.clone())),
                _ => None,
            };
            future::ready(Some(combined))
        })
        .filter_map(future::ready)
        .boxed()
}

/// Counter that ticks every `period`, emitting 0, 1, 2, ...
///
/// The first value is emitted immediately. A zero period is clamped to one
/// millisecond. The timer is created lazily on first poll, inside whatever
/// tokio runtime polls the stream.
pub fn periodic(period: Duration) -> BoxStream<'static, u64> {
    let period = period.max(Duration::from_millis(1));
    stream::unfold((None, 0u64), move |(interval, tick)| async move {
        let mut interval = interval.unwrap_or_else(|| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
        Some((tick, (Some(interval), tick + 1)))
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::proxy;

    #[tokio::test]
    async fn test_merge_keeps_both_streams() {
        let merged = merge(
            stream::iter(vec![1, 3]).boxed(),
            stream::iter(vec![2, 4]).boxed(),
        );
        let mut values = merged.collect::<Vec<_>>().await;
        values.sort();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_switch_latest_drops_superseded_inner() {
        let (outer_feed, outer) = proxy::channel::<u8>();
        let (first_feed, first) = proxy::channel::<&'static str>();
        let (second_feed, second) = proxy::channel::<&'static str>();

        let first_stream = first.stream();
        let second_stream = second.stream();
        let mut inners = vec![second_stream, first_stream];
        let mut switched = flat_map_latest(outer.stream(), move |_| {
            inners.pop().unwrap_or_else(|| stream::empty().boxed())
        });

        outer_feed.push(0);
        first_feed.push("a");
        assert_eq!(switched.next().await, Some("a"));

        outer_feed.push(1);
        first_feed.push("stale");
        second_feed.push("b");
        assert_eq!(switched.next().await, Some("b"));
    }

    #[test]
    fn test_switch_latest_yields_on_endless_outer() {
        let endless = stream::iter(0u64..).map(|i| stream::iter(vec![i]).boxed());
        let mut switched = tokio_test::task::spawn(switch_latest(endless.boxed()));

        assert!(switched.poll_next().is_pending());
        assert!(switched.is_woken());
    }

    #[tokio::test]
    async fn test_switch_latest_ends_after_outer_and_inner() {
        let outer = stream::iter(vec![
            stream::iter(vec![1, 2]).boxed(),
            stream::iter(vec![3]).boxed(),
        ])
        .boxed();
        // The outer stream is drained before any inner value, so only the last survives
        assert_eq!(switch_latest(outer).collect::<Vec<_>>().await, vec![3]);
    }

    #[tokio::test]
    async fn test_combine_latest_waits_for_both() {
        let (left_feed, left) = proxy::channel::<i32>();
        let (right_feed, right) = proxy::channel::<i32>();
        let mut sums = combine_latest(left.stream(), right.stream(), |a, b| a + b);

        left_feed.push(1);
        right_feed.push(10);
        assert_eq!(sums.next().await, Some(11));

        left_feed.push(2);
        assert_eq!(sums.next().await, Some(12));

        right_feed.push(20);
        assert_eq!(sums.next().await, Some(22));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_first_tick_is_immediate() {
        let start = tokio::time::Instant::now();
        let ticks = periodic(Duration::from_secs(1)).take(3).collect::<Vec<_>>().await;

        assert_eq!(ticks, vec![0, 1, 2]);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }
}
