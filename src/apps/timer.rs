// Copyright (c) 2025 - Cowboy AI, Inc.
//! Elapsed-seconds timer
//!
//! DOM: a counter ticking once per period, restarted from zero whenever the
//! reset event fires. Log: an independent counter at half the rate, doubled.

use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::driver::dom::DOM;
use crate::driver::log::LOG;
use crate::errors::{CycleError, CycleResult};
use crate::payload::Payload;
use crate::runtime::{Sinks, Sources};
use crate::stream::{flat_map_latest, periodic, start_with};
use crate::vdom::{h1, span, VElement};

/// What restarts the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerReset {
    /// A click anywhere on the surface
    #[default]
    Click,
    /// The pointer entering a `span`
    Hover,
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Milliseconds between displayed ticks
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Reset trigger
    #[serde(default)]
    pub reset: TimerReset,
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            reset: TimerReset::default(),
        }
    }
}

impl TimerConfig {
    /// Timer reset by hovering a `span`
    pub fn hover() -> Self {
        Self {
            reset: TimerReset::Hover,
            ..Self::default()
        }
    }

    /// Reject periods the timer cannot tick at
    pub fn validate(&self) -> CycleResult<()> {
        if self.tick_ms == 0 {
            return Err(CycleError::Configuration(
                "tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Period of the displayed counter
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Period of the logged counter
    pub fn log_period(&self) -> Duration {
        self.tick() * 2
    }
}

/// Tree showing `seconds`
pub fn view(seconds: u64) -> VElement {
    h1(span(format!("Seconds Elapsed {}", seconds)))
}

/// The timer's `main`
pub fn app(config: TimerConfig) -> impl FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static {
    move |sources: Sources| {
        config.validate()?;
        let dom = sources.dom()?;
        let resets: BoxStream<'static, ()> = match config.reset {
            TimerReset::Click => dom.events("click").map(|_| ()).boxed(),
            TimerReset::Hover => dom.select("span")?.events("mouseover").map(|_| ()).boxed(),
        };

        let tick = config.tick();
        let vtree = flat_map_latest(start_with((), resets), move |_| {
            periodic(tick).map(|seconds| Payload::Tree(view(seconds))).boxed()
        });
        let log = periodic(config.log_period())
            .map(|i| Payload::Integer(2 * i as i64))
            .boxed();

        Ok(Sinks::new().with(DOM, vtree).with(LOG, log))
    }
}
