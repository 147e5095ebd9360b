// Copyright (c) 2025 - Cowboy AI, Inc.
//! JSON Element Descriptors
//!
//! The plain-object form of a descriptor:
//!
//! ```json
//! { "tagName": "h1", "children": [ { "tagName": "SPAN", "children": ["Seconds Elapsed 3"] } ] }
//! ```
//!
//! Optional keys: `"className"` (space separated classes) and `"attrs"`
//! (object of scalar values). Parsing fails fast on the first malformed node,
//! naming its path (`root.children[0]`), instead of silently rendering nothing.

use serde_json::{json, Map, Value};

use super::{VElement, VNode};
use crate::errors::RenderError;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl VElement {
    /// Parse a JSON descriptor into a typed element tree
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cycle_runtime::vdom::VElement;
    /// use serde_json::json;
    ///
    /// let tree = VElement::from_descriptor(&json!({
    ///     "tagName": "h1",
    ///     "children": [{ "tagName": "span", "children": ["tick"] }]
    /// }))
    /// .unwrap();
    /// assert_eq!(tree.to_string(), "<h1><span>tick</span></h1>");
    /// ```
    pub fn from_descriptor(value: &Value) -> Result<VElement, RenderError> {
        parse_element(value, "root")
    }

    /// Serialize this tree back into the JSON descriptor form
    pub fn to_descriptor(&self) -> Value {
        let children: Vec<Value> = self
            .children
            .iter()
            .map(|child| match child {
                VNode::Element(element) => element.to_descriptor(),
                VNode::Text(text) => Value::String(text.clone()),
            })
            .collect();

        let mut descriptor = json!({
            "tagName": self.tag,
            "children": children,
        });
        if !self.classes.is_empty() {
            descriptor["className"] = Value::String(self.classes.join(" "));
        }
        if !self.attrs.is_empty() {
            descriptor["attrs"] = json!(self.attrs);
        }
        descriptor
    }
}

fn parse_element(value: &Value, path: &str) -> Result<VElement, RenderError> {
    let object = value.as_object().ok_or_else(|| RenderError::NotAnElement {
        path: path.to_string(),
        found: kind(value),
    })?;

    let tag = object
        .get("tagName")
        .and_then(Value::as_str)
        .ok_or_else(|| RenderError::MissingTagName {
            path: path.to_string(),
        })?;

    let raw_children = object
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| RenderError::ChildrenNotSequence {
            path: path.to_string(),
        })?;

    let mut element = VElement::new(tag);
    element.classes = parse_classes(object);
    element.attrs = parse_attrs(object, path)?;

    for (index, child) in raw_children.iter().enumerate() {
        let child_path = format!("{}.children[{}]", path, index);
        let node = match child {
            Value::String(text) => VNode::Text(text.clone()),
            Value::Object(_) => VNode::Element(parse_element(child, &child_path)?),
            other => {
                return Err(RenderError::InvalidChild {
                    path: child_path,
                    found: kind(other),
                })
            }
        };
        element.children.push(node);
    }

    Ok(element)
}

fn parse_classes(object: &Map<String, Value>) -> Vec<String> {
    object
        .get("className")
        .and_then(Value::as_str)
        .map(|names| names.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn parse_attrs(
    object: &Map<String, Value>,
    path: &str,
) -> Result<std::collections::BTreeMap<String, String>, RenderError> {
    let mut attrs = std::collections::BTreeMap::new();
    let Some(raw) = object.get("attrs") else {
        return Ok(attrs);
    };
    let raw = raw.as_object().ok_or_else(|| RenderError::NotAnElement {
        path: format!("{}.attrs", path),
        found: kind(raw),
    })?;

    for (name, value) in raw {
        let value = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => {
                return Err(RenderError::InvalidChild {
                    path: format!("{}.attrs.{}", path, name),
                    found: kind(other),
                })
            }
        };
        attrs.insert(name.clone(), value);
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdom::{h1, input, span};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_tutorial_descriptor() {
        let tree = VElement::from_descriptor(&json!({
            "tagName": "h1",
            "children": [
                { "tagName": "SPAN", "children": ["Seconds Elapsed 0"] }
            ]
        }))
        .unwrap();

        assert_eq!(tree.tag, "h1");
        assert_eq!(
            tree.children,
            vec![VNode::Element(
                VElement::new("SPAN").child("Seconds Elapsed 0")
            )]
        );
    }

    #[test]
    fn test_missing_tag_name_names_the_path() {
        let err = VElement::from_descriptor(&json!({
            "tagName": "div",
            "children": ["ok", { "children": [] }]
        }))
        .unwrap_err();

        assert_eq!(
            err,
            RenderError::MissingTagName {
                path: "root.children[1]".to_string()
            }
        );
    }

    #[test]
    fn test_non_string_child_is_rejected() {
        let err = VElement::from_descriptor(&json!({
            "tagName": "p",
            "children": [42]
        }))
        .unwrap_err();

        assert_eq!(
            err,
            RenderError::InvalidChild {
                path: "root.children[0]".to_string(),
                found: "number",
            }
        );
    }

    #[test]
    fn test_missing_children_is_rejected() {
        let err = VElement::from_descriptor(&json!({ "tagName": "p" })).unwrap_err();
        assert!(matches!(err, RenderError::ChildrenNotSequence { .. }));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = VElement::from_descriptor(&json!("h1")).unwrap_err();
        assert!(matches!(err, RenderError::NotAnElement { found: "string", .. }));
    }

    #[test]
    fn test_class_and_attrs_survive_descriptor_form() {
        let tree = h1(span("x")).with_children(input().class("weight").attr("min", 40));
        let parsed = VElement::from_descriptor(&tree.to_descriptor()).unwrap();
        assert_eq!(parsed, tree);
    }
}
