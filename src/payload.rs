// Copyright (c) 2025 - Cowboy AI, Inc.
//! Payload - the value carried on every channel
//!
//! Channels are keyed by name and each carries its own kind of value: element
//! trees to the DOM driver, DOM events back from it, requests and responses
//! through the HTTP driver, numbers and text to the log. A single tagged enum
//! keeps the sink/source maps homogeneous while letting drivers match on
//! exactly what they accept.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::driver::dom::DomEvent;
use crate::driver::http::{HttpRequest, HttpResponse};
use crate::vdom::VElement;

/// Value flowing through a sink or a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Payload {
    /// Signal with no data (a bare tick or click)
    Unit,
    /// Integer value
    Integer(i64),
    /// Floating point value
    Number(f64),
    /// Text value
    Text(String),
    /// Element descriptor tree to render
    Tree(VElement),
    /// Event raised by the host surface
    Dom(DomEvent),
    /// Outgoing HTTP request
    Request(HttpRequest),
    /// Incoming HTTP response
    Response(HttpResponse),
    /// Arbitrary JSON (e.g. a plain-object element descriptor)
    Json(Value),
}

impl Payload {
    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Unit => "unit",
            Payload::Integer(_) => "integer",
            Payload::Number(_) => "number",
            Payload::Text(_) => "text",
            Payload::Tree(_) => "tree",
            Payload::Dom(_) => "dom event",
            Payload::Request(_) => "http request",
            Payload::Response(_) => "http response",
            Payload::Json(_) => "json",
        }
    }

    /// Integer value, if this is an `Integer`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Payload::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// DOM event, if this is a `Dom` payload
    pub fn into_dom_event(self) -> Option<DomEvent> {
        match self {
            Payload::Dom(event) => Some(event),
            _ => None,
        }
    }

    /// HTTP response, if this is a `Response` payload
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            Payload::Response(response) => Some(response),
            _ => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Unit => write!(f, "()"),
            Payload::Integer(value) => write!(f, "{}", value),
            Payload::Number(value) => write!(f, "{}", value),
            Payload::Text(text) => write!(f, "{}", text),
            Payload::Tree(tree) => write!(f, "{}", tree),
            Payload::Dom(event) => write!(f, "{}", event),
            Payload::Request(request) => write!(f, "{} {}", request.method, request.url),
            Payload::Response(response) => write!(
                f,
                "{} {} -> {}",
                response.request.method, response.request.url, response.status
            ),
            Payload::Json(value) => write!(f, "{}", value),
        }
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Unit
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Integer(value)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Number(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<VElement> for Payload {
    fn from(tree: VElement) -> Self {
        Payload::Tree(tree)
    }
}

impl From<DomEvent> for Payload {
    fn from(event: DomEvent) -> Self {
        Payload::Dom(event)
    }
}

impl From<HttpRequest> for Payload {
    fn from(request: HttpRequest) -> Self {
        Payload::Request(request)
    }
}

impl From<HttpResponse> for Payload {
    fn from(response: HttpResponse) -> Self {
        Payload::Response(response)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}
