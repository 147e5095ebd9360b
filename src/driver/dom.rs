// Copyright (c) 2025 - Cowboy AI, Inc.
//! DOM Driver
//!
//! Sink: element trees (or text) rendered into a mount point.
//! Source: every DOM event the surface raises, as `Payload::Dom`.

use futures::future;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

use super::{Driver, DriverOutput, DriverResult};
use crate::errors::{CycleResult, DriverError, SurfaceError};
use crate::payload::Payload;
use crate::render::{Element, MountId, Surface, TreeRenderer};
use crate::stream::{PayloadSource, PayloadStream};
use crate::vdom::{Selector, VElement};

/// Channel name the DOM driver is registered under
pub const DOM: &str = "DOM";

/// Element an event was raised on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomTarget {
    /// Upper-case tag name
    pub tag_name: String,
    /// Class names
    pub classes: Vec<String>,
    /// Current value of an input, if any
    pub value: Option<String>,
}

impl DomTarget {
    /// Describe a materialized element as an event target
    pub fn from_element(element: &Element) -> Self {
        Self {
            tag_name: element.tag_name.clone(),
            classes: element.classes.clone(),
            value: element.attrs.get("value").cloned(),
        }
    }

    /// Same target with a new current value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Event raised by the host surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    /// Event type (`click`, `input`, `mouseover`, ...)
    pub event_type: String,
    /// Element the event was raised on
    pub target: DomTarget,
}

impl DomEvent {
    /// Create an event of `event_type` on `target`
    pub fn new(event_type: impl Into<String>, target: DomTarget) -> Self {
        Self {
            event_type: event_type.into(),
            target,
        }
    }

    /// Whether the target matches `selector`
    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(&self.target.tag_name, &self.target.classes)
    }
}

impl fmt::Display for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.event_type, self.target.tag_name)?;
        for class in &self.target.classes {
            write!(f, ".{}", class)?;
        }
        if let Some(value) = &self.target.value {
            write!(f, " = {:?}", value)?;
        }
        Ok(())
    }
}

/// Renders the DOM sink into one mount point of a surface
pub struct DomDriver {
    surface: Arc<dyn Surface>,
    renderer: TreeRenderer,
}

impl DomDriver {
    /// Driver writing into `mount` on `surface`
    pub fn new(surface: Arc<dyn Surface>, mount: MountId) -> Self {
        let renderer = TreeRenderer::new(surface.clone(), mount);
        Self { surface, renderer }
    }

    /// Driver writing into the mount point named by `"#id"`
    pub fn for_mount(surface: Arc<dyn Surface>, mount: &str) -> Result<Self, SurfaceError> {
        Ok(Self::new(surface, MountId::parse(mount)?))
    }
}

impl fmt::Debug for DomDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomDriver")
            .field("mount", self.renderer.mount())
            .finish()
    }
}

fn apply(renderer: &TreeRenderer, payload: Payload) -> Result<(), DriverError> {
    match payload {
        Payload::Tree(tree) => renderer.render(&tree)?,
        Payload::Json(value) => renderer.render(&VElement::from_descriptor(&value)?)?,
        Payload::Text(text) => renderer.render_text(&text)?,
        Payload::Integer(value) => renderer.render_text(&value.to_string())?,
        Payload::Number(value) => renderer.render_text(&value.to_string())?,
        other => {
            return Err(DriverError::UnexpectedPayload {
                expected: "tree, json descriptor or text",
                found: other.kind(),
            })
        }
    }
    Ok(())
}

async fn render_loop(renderer: TreeRenderer, mut sink: PayloadStream) {
    while let Some(payload) = sink.next().await {
        if let Err(e) = apply(&renderer, payload) {
            error!(mount = %renderer.mount(), error = %e, "DOM sink value skipped");
        }
    }
    debug!(mount = %renderer.mount(), "DOM sink completed");
}

impl Driver for DomDriver {
    fn drive(self: Box<Self>, sink: PayloadStream) -> DriverResult {
        // Subscribe before the first render so events on it are not lost.
        let events = self.surface.events().map(Payload::Dom).boxed();
        let task = tokio::spawn(render_loop(self.renderer, sink));
        Ok(DriverOutput::with_source(task, events))
    }
}

/// Typed view over the DOM channel's source
#[derive(Debug, Clone)]
pub struct DomSource {
    source: PayloadSource,
}

impl DomSource {
    /// Wrap the DOM channel's proxy source
    pub fn new(source: PayloadSource) -> Self {
        Self { source }
    }

    /// Events raised on elements matching `selector`
    pub fn select(&self, selector: &str) -> CycleResult<DomSelection> {
        Ok(DomSelection {
            source: self.source.clone(),
            selector: Selector::parse(selector)?,
        })
    }

    /// Events of `event_type` raised anywhere on the surface
    pub fn events(&self, event_type: &str) -> BoxStream<'static, DomEvent> {
        let event_type = event_type.to_string();
        self.source
            .stream()
            .filter_map(move |payload| {
                future::ready(
                    payload
                        .into_dom_event()
                        .filter(|event| event.event_type == event_type),
                )
            })
            .boxed()
    }
}

/// Events of the DOM source narrowed to one selector
#[derive(Debug, Clone)]
pub struct DomSelection {
    source: PayloadSource,
    selector: Selector,
}

impl DomSelection {
    /// Events of `event_type` raised on the selected elements
    pub fn events(&self, event_type: &str) -> BoxStream<'static, DomEvent> {
        let event_type = event_type.to_string();
        let selector = self.selector.clone();
        self.source
            .stream()
            .filter_map(move |payload| {
                future::ready(payload.into_dom_event().filter(|event| {
                    event.event_type == event_type && event.matches(&selector)
                }))
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;
    use crate::stream::proxy;
    use crate::vdom::{button, div, h1, VNode};
    use futures::stream;
    use serde_json::json;

    fn surface() -> (Arc<MemorySurface>, MountId) {
        let surface = Arc::new(MemorySurface::with_mount("#app").unwrap());
        (surface, MountId::parse("#app").unwrap())
    }

    fn click_on(tag: &str, class: &str) -> DomEvent {
        DomEvent::new(
            "click",
            DomTarget {
                tag_name: tag.to_string(),
                classes: vec![class.to_string()],
                value: None,
            },
        )
    }

    #[test]
    fn test_event_display() {
        let event = click_on("BUTTON", "increment");
        assert_eq!(event.to_string(), "click on BUTTON.increment");

        let typed = DomEvent::new(
            "input",
            DomTarget {
                tag_name: "INPUT".to_string(),
                classes: vec![],
                value: Some("Ada".to_string()),
            },
        );
        assert_eq!(typed.to_string(), "input on INPUT = \"Ada\"");
    }

    #[tokio::test]
    async fn test_driver_renders_every_sink_kind() {
        let (surface, mount) = surface();
        let driver = Box::new(DomDriver::new(surface.clone(), mount.clone()));
        let sink = stream::iter(vec![
            Payload::Text("Seconds elapsed 0".into()),
            Payload::Integer(3),
            Payload::Tree(h1("tree")),
            Payload::Json(json!({"tagName": "H1", "children": ["json"]})),
        ])
        .boxed();

        let output = driver.drive(sink).unwrap();
        for task in output.tasks {
            task.await.unwrap();
        }

        let content = surface.content(&mount).unwrap();
        assert_eq!(content.to_html(), "<h1>json</h1>");
        assert_eq!(content.generation, 4);
    }

    #[tokio::test]
    async fn test_driver_skips_malformed_values() {
        let (surface, mount) = surface();
        let driver = Box::new(DomDriver::new(surface.clone(), mount.clone()));
        let sink = stream::iter(vec![
            Payload::Tree(h1("kept")),
            Payload::Json(json!({"children": []})),
            Payload::Unit,
        ])
        .boxed();

        for task in driver.drive(sink).unwrap().tasks {
            task.await.unwrap();
        }

        assert_eq!(surface.html(&mount).unwrap(), "<h1>kept</h1>");
    }

    #[tokio::test]
    async fn test_driver_source_carries_surface_events() {
        let (surface, mount) = surface();
        let driver = Box::new(DomDriver::new(surface.clone(), mount.clone()));
        let children: Vec<VNode> = vec![button("+").class("increment").into()];
        let tree = div(children);

        let output = driver.drive(stream::iter(vec![Payload::Tree(tree)]).boxed()).unwrap();
        let mut events = output.source.unwrap();
        for task in output.tasks {
            task.await.unwrap();
        }

        let fired = surface.fire(&mount, "button.increment", "click", None).unwrap();
        assert_eq!(events.next().await, Some(Payload::Dom(fired)));
    }

    #[tokio::test]
    async fn test_selection_filters_by_selector_and_type() {
        let (feed, source) = proxy::channel::<Payload>();
        let dom = DomSource::new(source);
        let mut increments = dom.select(".increment").unwrap().events("click");

        feed.push(Payload::Dom(click_on("BUTTON", "decrement")));
        feed.push(Payload::Dom(DomEvent::new(
            "mouseover",
            click_on("BUTTON", "increment").target,
        )));
        feed.push(Payload::Integer(1));
        feed.push(Payload::Dom(click_on("BUTTON", "increment")));

        let event = increments.next().await.unwrap();
        assert_eq!(event, click_on("BUTTON", "increment"));
    }

    #[test]
    fn test_select_rejects_bad_selector() {
        let (_feed, source) = proxy::channel::<Payload>();
        let dom = DomSource::new(source);
        assert!(dom.select("#id > span").is_err());
    }
}
