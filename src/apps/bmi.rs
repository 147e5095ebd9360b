// Copyright (c) 2025 - Cowboy AI, Inc.
//! Body-mass index calculator
//!
//! Weight and height come from two range sliders. The model combines their
//! latest values, starting from 70 kg and 130 cm before the first input.

use futures::future;
use futures::stream::{BoxStream, StreamExt};
use tracing::warn;

use crate::driver::dom::{DomSource, DOM};
use crate::errors::CycleResult;
use crate::payload::Payload;
use crate::runtime::{Sinks, Sources};
use crate::stream::{combine_latest, start_with};
use crate::vdom::{div, h3, input, label, VElement, VNode};

/// Weight before the first slider input, in kilograms
pub const INITIAL_WEIGHT: f64 = 70.0;

/// Height before the first slider input, in centimetres
pub const INITIAL_HEIGHT: f64 = 130.0;

/// Latest weight and height with the index derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiState {
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    /// Rounded body-mass index
    pub bmi: i64,
}

impl BmiState {
    /// State for `weight` kg and `height` cm
    pub fn compute(weight: f64, height: f64) -> Self {
        let meters = height * 0.01;
        let bmi = (weight / (meters * meters)).round() as i64;
        Self {
            weight,
            height,
            bmi,
        }
    }
}

/// Slider values
pub struct Intent {
    /// Values of `.weight`
    pub weights: BoxStream<'static, f64>,
    /// Values of `.height`
    pub heights: BoxStream<'static, f64>,
}

fn slider(dom: &DomSource, selector: &str) -> CycleResult<BoxStream<'static, f64>> {
    let name = selector.to_string();
    Ok(dom
        .select(selector)?
        .events("input")
        .filter_map(move |event| {
            let value = event.target.value.as_deref().map(str::trim).map(str::parse::<f64>);
            let parsed = match value {
                Some(Ok(value)) => Some(value),
                Some(Err(e)) => {
                    warn!(slider = %name, error = %e, "Ignoring non-numeric slider value");
                    None
                }
                None => None,
            };
            future::ready(parsed)
        })
        .boxed())
}

/// Read both sliders
pub fn intent(dom: &DomSource) -> CycleResult<Intent> {
    Ok(Intent {
        weights: slider(dom, ".weight")?,
        heights: slider(dom, ".height")?,
    })
}

/// Combine the latest weight and height
pub fn model(intent: Intent) -> BoxStream<'static, BmiState> {
    combine_latest(
        start_with(INITIAL_WEIGHT, intent.weights),
        start_with(INITIAL_HEIGHT, intent.heights),
        BmiState::compute,
    )
}

fn range(class: &str, min: u32, max: u32, value: f64) -> VElement {
    input()
        .class(class)
        .attr("type", "range")
        .attr("min", min)
        .attr("max", max)
        .attr("value", value)
}

/// Tree showing `state`
pub fn render(state: &BmiState) -> VElement {
    let children: Vec<VNode> = vec![
        div(vec![
            VNode::from(label(format!("weight: {} kg", state.weight))),
            VNode::from(range("weight", 40, 150, state.weight)),
        ])
        .into(),
        div(vec![
            VNode::from(label(format!("height: {} cm", state.height))),
            VNode::from(range("height", 120, 230, state.height)),
        ])
        .into(),
        h3(format!("Your BMI is {}", state.bmi)).into(),
    ];
    div(children)
}

/// One tree per state
pub fn view(states: BoxStream<'static, BmiState>) -> BoxStream<'static, VElement> {
    states.map(|state| render(&state)).boxed()
}

/// The calculator's `main`
pub fn app() -> impl FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static {
    |sources: Sources| {
        let vtree = view(model(intent(&sources.dom()?)?))
            .map(Payload::Tree)
            .boxed();
        Ok(Sinks::new().with(DOM, vtree))
    }
}
