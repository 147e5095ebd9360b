// Copyright (c) 2025 - Cowboy AI, Inc.
//! Element Descriptors
//!
//! A descriptor is the plain description of a UI tree before it is
//! materialized by the renderer:
//!
//! ```text
//! VNode = Element(VElement { tag, classes, attrs, children: [VNode] })
//!       | Text(String)
//! ```
//!
//! Descriptors are built with the hyperscript helpers ([`h`], [`div`],
//! [`span`], ...) or parsed from the JSON `{tagName, children}` form with
//! [`VElement::from_descriptor`].
//!
//! # Example
//!
//! ```rust
//! use cycle_runtime::vdom::{h1, span};
//!
//! let tree = h1(span("Seconds Elapsed 3"));
//! assert_eq!(tree.to_string(), "<h1><span>Seconds Elapsed 3</span></h1>");
//! ```

pub mod descriptor;
pub mod selector;

pub use selector::Selector;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A descriptor node: either an element or a literal text string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VNode {
    /// Nested element descriptor
    Element(VElement),
    /// Literal text, concatenated into the parent without escaping
    Text(String),
}

/// Element descriptor: tag name, hyperscript extras and ordered children
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VElement {
    /// Tag name, as written by the author
    pub tag: String,
    /// Class names (`.field`, `.increment`, ...)
    pub classes: Vec<String>,
    /// Attributes (`type`, `min`, `value`, ...)
    pub attrs: BTreeMap<String, String>,
    /// Ordered children
    pub children: Vec<VNode>,
}

impl VElement {
    /// Create a childless element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class name
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.insert(name.into(), value.to_string());
        self
    }

    /// Append a child
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children, preserving their order
    pub fn with_children(mut self, children: impl Into<Children>) -> Self {
        self.children.extend(children.into().0);
        self
    }

    /// Depth of the tree rooted here (a childless element has depth 1)
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                VNode::Element(element) => Some(element.depth()),
                VNode::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for VElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag.to_ascii_lowercase();
        write!(f, "<{}", tag)?;
        if !self.classes.is_empty() {
            write!(f, " class=\"{}\"", self.classes.join(" "))?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")?;
        for child in &self.children {
            match child {
                VNode::Element(element) => write!(f, "{}", element)?,
                VNode::Text(text) => write!(f, "{}", text)?,
            }
        }
        write!(f, "</{}>", tag)
    }
}

impl From<VElement> for VNode {
    fn from(element: VElement) -> Self {
        VNode::Element(element)
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::Text(text.to_string())
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

/// Ordered children accepted by the hyperscript helpers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(pub Vec<VNode>);

impl From<Vec<VNode>> for Children {
    fn from(children: Vec<VNode>) -> Self {
        Children(children)
    }
}

impl From<VElement> for Children {
    fn from(element: VElement) -> Self {
        Children(vec![VNode::Element(element)])
    }
}

impl From<&str> for Children {
    fn from(text: &str) -> Self {
        Children(vec![VNode::from(text)])
    }
}

impl From<String> for Children {
    fn from(text: String) -> Self {
        Children(vec![VNode::Text(text)])
    }
}

impl From<()> for Children {
    fn from(_: ()) -> Self {
        Children::default()
    }
}

/// Build an element descriptor from a tag name and children
pub fn h(tag: impl Into<String>, children: impl Into<Children>) -> VElement {
    VElement::new(tag).with_children(children)
}

/// Literal text child
pub fn text(value: impl Into<String>) -> VNode {
    VNode::Text(value.into())
}

macro_rules! tag_helpers {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($name), "` element with the given children")]
            pub fn $name(children: impl Into<Children>) -> VElement {
                h(stringify!($name), children)
            }
        )*
    };
}

tag_helpers!(a, button, div, h1, h3, h4, label, p, span);

/// Childless `input` element
pub fn input() -> VElement {
    VElement::new("input")
}

/// Childless `hr` element
pub fn hr() -> VElement {
    VElement::new("hr")
}
