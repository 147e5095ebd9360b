// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tree Renderer
//!
//! Materializes an element descriptor into a live element tree and installs
//! it as the sole content of a mount point.
//!
//! # Algorithm
//!
//! ```text
//! materialize(d):
//!     node = create(d.tag)
//!     for c in d.children where c is element: node.append(materialize(c))
//!     for c in d.children where c is text:    node.inner_text += c
//! ```
//!
//! Element children and text children each keep their declaration order.
//! The text is raw markup appended after the child elements, the way
//! `innerHTML +=` behaves; it is never escaped.
//!
//! # Destroy and rebuild
//!
//! Every render clears the mount point and appends a freshly built tree.
//! There is no diffing and no node reuse, so focus, caret and scroll state
//! do not survive an update.

pub mod surface;

pub use surface::{MemorySurface, MountContent, MountId, Surface};

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::errors::RenderError;
use crate::vdom::{Selector, VElement, VNode};

/// A materialized element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Upper-case tag name, as DOM `tagName` reports it
    pub tag_name: String,
    /// Class names
    pub classes: Vec<String>,
    /// Attributes
    pub attrs: BTreeMap<String, String>,
    /// Child elements, in declaration order
    pub children: Vec<Element>,
    /// Concatenated raw text children, in declaration order
    pub inner_text: String,
}

impl Element {
    /// Serialize to markup: child elements first, then the raw text
    pub fn to_html(&self) -> String {
        let tag = self.tag_name.to_ascii_lowercase();
        let mut html = format!("<{}", tag);
        if !self.classes.is_empty() {
            html.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            html.push_str(&format!(" {}=\"{}\"", name, value));
        }
        html.push('>');
        for child in &self.children {
            html.push_str(&child.to_html());
        }
        html.push_str(&self.inner_text);
        html.push_str(&format!("</{}>", tag));
        html
    }

    /// Text of the subtree in document order
    pub fn text_content(&self) -> String {
        let mut text: String = self.children.iter().map(Element::text_content).collect();
        text.push_str(&self.inner_text);
        text
    }

    /// Depth of the subtree (a childless element has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }

    /// First element of the subtree matching the selector, pre-order
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        if selector.matches(&self.tag_name, &self.classes) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(selector))
    }
}

fn check_tag(tag: &str, path: &str) -> Result<(), RenderError> {
    let mut chars = tag.chars();
    match chars.next() {
        None => Err(RenderError::EmptyTagName {
            path: path.to_string(),
        }),
        Some(first)
            if first.is_ascii_alphabetic()
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-') =>
        {
            Ok(())
        }
        Some(_) => Err(RenderError::InvalidTagName {
            path: path.to_string(),
            tag: tag.to_string(),
        }),
    }
}

/// Build a materialized element tree from a descriptor
///
/// Fails on the first element whose tag name is empty or malformed.
pub fn materialize(tree: &VElement) -> Result<Element, RenderError> {
    materialize_at(tree, "root")
}

fn materialize_at(tree: &VElement, path: &str) -> Result<Element, RenderError> {
    check_tag(&tree.tag, path)?;

    let mut element = Element {
        tag_name: tree.tag.to_ascii_uppercase(),
        classes: tree.classes.clone(),
        attrs: tree.attrs.clone(),
        children: Vec::new(),
        inner_text: String::new(),
    };

    for (index, child) in tree.children.iter().enumerate() {
        match child {
            VNode::Element(child) => {
                let child_path = format!("{}.children[{}]", path, index);
                element.children.push(materialize_at(child, &child_path)?);
            }
            VNode::Text(text) => element.inner_text.push_str(text),
        }
    }

    Ok(element)
}

/// Renders descriptor trees into one mount point of a surface
#[derive(Clone)]
pub struct TreeRenderer {
    surface: Arc<dyn Surface>,
    mount: MountId,
}

impl TreeRenderer {
    /// Create a renderer owning `mount` on `surface`
    pub fn new(surface: Arc<dyn Surface>, mount: MountId) -> Self {
        Self { surface, mount }
    }

    /// Mount point this renderer writes to
    pub fn mount(&self) -> &MountId {
        &self.mount
    }

    /// Replace the mount point's content with a freshly built tree
    ///
    /// The tree is materialized before anything is cleared, so a malformed
    /// tree leaves the previous render in place.
    pub fn render(&self, tree: &VElement) -> Result<(), RenderError> {
        let element = materialize(tree)?;
        self.surface.clear(&self.mount)?;
        self.surface.append(&self.mount, element)?;
        debug!(mount = %self.mount, tag = %tree.tag, "Rendered tree");
        Ok(())
    }

    /// Replace the mount point's content with plain text
    pub fn render_text(&self, text: &str) -> Result<(), RenderError> {
        self.surface.set_text(&self.mount, text)?;
        debug!(mount = %self.mount, "Rendered text");
        Ok(())
    }
}

impl std::fmt::Debug for TreeRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeRenderer({})", self.mount)
    }
}
