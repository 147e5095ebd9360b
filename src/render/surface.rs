// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host UI Surface
//!
//! The surface is the external collaborator that owns the mount points. The
//! renderer only ever replaces a mount point's content wholesale (clear, then
//! append); the surface also raises the DOM events the DOM driver turns into
//! a source.

use futures::stream::BoxStream;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::Element;
use crate::driver::dom::{DomEvent, DomTarget};
use crate::errors::{CycleResult, SurfaceError};
use crate::stream::proxy::{self, ProxyFeed};
use crate::vdom::Selector;

/// Identifier of a mount point, written `#app`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(String);

impl MountId {
    /// Parse `#id`
    pub fn parse(mount: &str) -> Result<Self, SurfaceError> {
        match mount.trim().strip_prefix('#') {
            Some(id)
                if !id.is_empty()
                    && id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') =>
            {
                Ok(Self(id.to_string()))
            }
            _ => Err(SurfaceError::InvalidMount(mount.to_string())),
        }
    }

    /// The bare identifier, without `#`
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl FromStr for MountId {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MountId::parse(s)
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host UI surface owning one or more mount points
pub trait Surface: Send + Sync {
    /// Remove everything under the mount point
    fn clear(&self, mount: &MountId) -> Result<(), SurfaceError>;

    /// Append a materialized element under the mount point
    fn append(&self, mount: &MountId, element: Element) -> Result<(), SurfaceError>;

    /// Replace the mount point's content with plain text
    fn set_text(&self, mount: &MountId, text: &str) -> Result<(), SurfaceError>;

    /// Subscribe to DOM events raised from now on
    fn events(&self) -> BoxStream<'static, DomEvent>;
}

/// Content currently installed under a mount point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountContent {
    /// Root elements, in append order
    pub children: Vec<Element>,
    /// Text set through `set_text`
    pub text: String,
    /// Number of times the mount point has been cleared
    pub generation: u64,
}

impl MountContent {
    /// Serialized markup of the mount point's content
    pub fn to_html(&self) -> String {
        let mut html: String = self.children.iter().map(Element::to_html).collect();
        html.push_str(&self.text);
        html
    }

    /// Concatenated text of the mount point's content
    pub fn text_content(&self) -> String {
        let mut text: String = self.children.iter().map(Element::text_content).collect();
        text.push_str(&self.text);
        text
    }

    /// First element matching the selector, in document order
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        self.children.iter().find_map(|child| child.find(selector))
    }
}

/// In-memory surface used by tests and the demo binary
pub struct MemorySurface {
    mounts: Mutex<BTreeMap<MountId, MountContent>>,
    events: ProxyFeed<DomEvent>,
}

impl MemorySurface {
    /// Create a surface with no mount points
    pub fn new() -> Self {
        let (events, _) = proxy::channel();
        Self {
            mounts: Mutex::new(BTreeMap::new()),
            events,
        }
    }

    /// Create a surface with a single mount point
    pub fn with_mount(mount: &str) -> Result<Self, SurfaceError> {
        let surface = Self::new();
        surface.add_mount(MountId::parse(mount)?);
        Ok(surface)
    }

    /// Register an empty mount point
    pub fn add_mount(&self, mount: MountId) {
        self.lock().entry(mount).or_default();
    }

    /// Snapshot of a mount point's content
    pub fn content(&self, mount: &MountId) -> Option<MountContent> {
        self.lock().get(mount).cloned()
    }

    /// Serialized markup of a mount point
    pub fn html(&self, mount: &MountId) -> Option<String> {
        self.lock().get(mount).map(MountContent::to_html)
    }

    /// Raise an event to every current subscriber
    pub fn dispatch(&self, event: DomEvent) -> usize {
        debug!(event = %event, "Dispatching DOM event");
        self.events.push(event)
    }

    /// Raise an event targeting the first element matching `selector`
    ///
    /// `value` overrides the target's `value` attribute, the way typing into
    /// an input or dragging a range slider would.
    pub fn fire(
        &self,
        mount: &MountId,
        selector: &str,
        event_type: &str,
        value: Option<&str>,
    ) -> CycleResult<DomEvent> {
        let parsed = Selector::parse(selector)?;
        let target = {
            let mounts = self.lock();
            let content = mounts
                .get(mount)
                .ok_or_else(|| SurfaceError::UnknownMount(mount.id().to_string()))?;
            let element = content.find(&parsed).ok_or_else(|| SurfaceError::NoMatch {
                mount: mount.id().to_string(),
                selector: selector.to_string(),
            })?;
            DomTarget::from_element(element)
        };

        let target = match value {
            Some(value) => target.with_value(value),
            None => target,
        };
        let event = DomEvent::new(event_type, target);
        self.dispatch(event.clone());
        Ok(event)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<MountId, MountContent>> {
        self.mounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_content<R>(
        &self,
        mount: &MountId,
        f: impl FnOnce(&mut MountContent) -> R,
    ) -> Result<R, SurfaceError> {
        let mut mounts = self.lock();
        let content = mounts
            .get_mut(mount)
            .ok_or_else(|| SurfaceError::UnknownMount(mount.id().to_string()))?;
        Ok(f(content))
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySurface")
            .field("mounts", &*self.lock())
            .finish()
    }
}

impl Surface for MemorySurface {
    fn clear(&self, mount: &MountId) -> Result<(), SurfaceError> {
        self.with_content(mount, |content| {
            content.children.clear();
            content.text.clear();
            content.generation += 1;
        })
    }

    fn append(&self, mount: &MountId, element: Element) -> Result<(), SurfaceError> {
        self.with_content(mount, |content| content.children.push(element))
    }

    fn set_text(&self, mount: &MountId, text: &str) -> Result<(), SurfaceError> {
        self.with_content(mount, |content| {
            content.children.clear();
            content.text = text.to_string();
            content.generation += 1;
        })
    }

    fn events(&self) -> BoxStream<'static, DomEvent> {
        self.events.source().stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::materialize;
    use crate::vdom::{button, div, VNode};
    use futures::StreamExt;
    use test_case::test_case;

    #[test_case("#app" => Ok("app".to_string()); "plain id")]
    #[test_case(" #main-view " => Ok("main-view".to_string()); "trimmed")]
    #[test_case("app" => Err(SurfaceError::InvalidMount("app".to_string())); "missing hash")]
    #[test_case("#" => Err(SurfaceError::InvalidMount("#".to_string())); "empty id")]
    fn test_mount_id_parse(mount: &str) -> Result<String, SurfaceError> {
        MountId::parse(mount).map(|id| id.id().to_string())
    }

    #[test]
    fn test_unknown_mount_is_an_error() {
        let surface = MemorySurface::new();
        let mount = MountId::parse("#missing").unwrap();
        assert_eq!(
            surface.clear(&mount),
            Err(SurfaceError::UnknownMount("missing".to_string()))
        );
    }

    #[test]
    fn test_set_text_replaces_elements() {
        let surface = MemorySurface::with_mount("#app").unwrap();
        let mount = MountId::parse("#app").unwrap();
        let element = materialize(&div("old")).unwrap();

        surface.append(&mount, element).unwrap();
        surface.set_text(&mount, "Seconds elapsed 1").unwrap();

        let content = surface.content(&mount).unwrap();
        assert!(content.children.is_empty());
        assert_eq!(content.to_html(), "Seconds elapsed 1");
        assert_eq!(content.generation, 1);
    }

    #[tokio::test]
    async fn test_fire_targets_matching_element() {
        let surface = MemorySurface::with_mount("#app").unwrap();
        let mount = MountId::parse("#app").unwrap();
        let children: Vec<VNode> = vec![
            button("Decrement").class("decrement").into(),
            button("Increment").class("increment").into(),
        ];
        surface
            .append(&mount, materialize(&div(children)).unwrap())
            .unwrap();

        let mut events = surface.events();
        let fired = surface.fire(&mount, ".increment", "click", None).unwrap();

        assert_eq!(fired.target.tag_name, "BUTTON");
        assert_eq!(fired.target.classes, vec!["increment".to_string()]);
        assert_eq!(events.next().await, Some(fired));
    }

    #[test]
    fn test_fire_without_match_fails() {
        let surface = MemorySurface::with_mount("#app").unwrap();
        let mount = MountId::parse("#app").unwrap();
        let err = surface.fire(&mount, ".nothing", "click", None).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::CycleError::Surface(SurfaceError::NoMatch { .. })
        ));
    }
}
