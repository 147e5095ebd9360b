// Copyright (c) 2025 - Cowboy AI, Inc.
//! Counter
//!
//! ```text
//! .increment click ──> +1 ─┐
//!                          ├─ merge ──> scan(0, +) ──> totals ──> view
//! .decrement click ──> -1 ─┘
//! ```

use futures::future;
use futures::stream::{BoxStream, StreamExt};

use crate::driver::dom::{DomSource, DOM};
use crate::errors::CycleResult;
use crate::payload::Payload;
use crate::runtime::{Sinks, Sources};
use crate::stream::{merge, start_with};
use crate::vdom::{button, label, p, VElement};

/// What a click means to the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add one
    Increment,
    /// Subtract one
    Decrement,
}

impl Action {
    /// Change applied to the total
    pub fn delta(self) -> i64 {
        match self {
            Action::Increment => 1,
            Action::Decrement => -1,
        }
    }
}

/// Clicks on `.increment` and `.decrement`, in arrival order
pub fn intent(dom: &DomSource) -> CycleResult<BoxStream<'static, Action>> {
    let increments = dom
        .select(".increment")?
        .events("click")
        .map(|_| Action::Increment)
        .boxed();
    let decrements = dom
        .select(".decrement")?
        .events("click")
        .map(|_| Action::Decrement)
        .boxed();
    Ok(merge(increments, decrements))
}

/// Running total from zero; one total per action
pub fn model(actions: BoxStream<'static, Action>) -> BoxStream<'static, i64> {
    actions
        .scan(0i64, |total, action| {
            *total += action.delta();
            future::ready(Some(*total))
        })
        .boxed()
}

/// Tree showing `count`
pub fn render(count: i64) -> VElement {
    VElement::new("div")
        .child(button("Increment").class("increment"))
        .child(button("Decrement").class("decrement"))
        .child(p(label(format!("Counter: {}", count))))
}

/// One tree per total, starting with zero before any click
pub fn view(totals: BoxStream<'static, i64>) -> BoxStream<'static, VElement> {
    start_with(0, totals).map(render).boxed()
}

/// The counter's `main`
pub fn app() -> impl FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static {
    |sources: Sources| {
        let actions = intent(&sources.dom()?)?;
        let vtree = view(model(actions)).map(Payload::Tree).boxed();
        Ok(Sinks::new().with(DOM, vtree))
    }
}
