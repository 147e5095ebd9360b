// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for the runtime loop, drivers and the tree renderer

use thiserror::Error;

/// Errors surfaced while wiring or running a reactive circuit
#[derive(Debug, Error)]
pub enum CycleError {
    /// The application's `main` failed before any channel was wired
    #[error("main function failed: {0}")]
    Main(String),

    /// A source was requested for a channel that has no driver
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// Rendering an element tree failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Host surface error
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Invalid DOM selector
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CycleError {
    /// Build a `Main` error from anything displayable
    pub fn main(reason: impl std::fmt::Display) -> Self {
        CycleError::Main(reason.to_string())
    }
}

/// Result type for runtime operations
pub type CycleResult<T> = Result<T, CycleError>;

impl From<serde_json::Error> for CycleError {
    fn from(err: serde_json::Error) -> Self {
        CycleError::Serialization(err.to_string())
    }
}

/// Errors a driver can raise while subscribing to its sink
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver refused or failed to subscribe
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// The driver panicked while subscribing
    #[error("driver panicked: {0}")]
    Panicked(String),

    /// A sink carried a payload the driver cannot act on
    #[error("unexpected payload: expected {expected}, found {found}")]
    UnexpectedPayload {
        /// What the driver accepts
        expected: &'static str,
        /// Kind of the payload it received
        found: &'static str,
    },

    /// Network transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Host surface failure
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A tree from the sink could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised while materializing or installing an element tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Element has an empty tag name
    #[error("element at {path} has an empty tag name")]
    EmptyTagName {
        /// Location of the element in the tree
        path: String,
    },

    /// Element tag name contains characters that cannot name a node
    #[error("element at {path} has an invalid tag name {tag:?}")]
    InvalidTagName {
        /// Location of the element in the tree
        path: String,
        /// The rejected tag name
        tag: String,
    },

    /// JSON descriptor without a string `tagName`
    #[error("descriptor at {path} is missing a string \"tagName\"")]
    MissingTagName {
        /// Location of the descriptor
        path: String,
    },

    /// JSON descriptor child that is neither a descriptor nor a string
    #[error("child at {path} must be a descriptor or a string, found {found}")]
    InvalidChild {
        /// Location of the child
        path: String,
        /// JSON kind that was found
        found: &'static str,
    },

    /// JSON value that is not an object descriptor
    #[error("value at {path} is not an element descriptor, found {found}")]
    NotAnElement {
        /// Location of the value
        path: String,
        /// JSON kind that was found
        found: &'static str,
    },

    /// JSON descriptor whose `children` is not an array
    #[error("descriptor at {path} has non-array \"children\"")]
    ChildrenNotSequence {
        /// Location of the descriptor
        path: String,
    },

    /// Installing the tree into the surface failed
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Errors raised by a host surface
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Mount identifier could not be parsed
    #[error("invalid mount point {0:?}: expected \"#id\"")]
    InvalidMount(String),

    /// Mount point is not registered with the surface
    #[error("unknown mount point: #{0}")]
    UnknownMount(String),

    /// No element in the mounted tree matches the selector
    #[error("no element matches {selector:?} under #{mount}")]
    NoMatch {
        /// Mount that was searched
        mount: String,
        /// Selector that matched nothing
        selector: String,
    },
}

/// Errors raised while parsing a DOM selector
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Empty selector string
    #[error("empty selector")]
    Empty,

    /// Selector with an unsupported or malformed part
    #[error("invalid selector {selector:?}: {reason}")]
    Invalid {
        /// Selector text
        selector: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_names_path() {
        let err = RenderError::MissingTagName {
            path: "root.children[1]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "descriptor at root.children[1] is missing a string \"tagName\""
        );
    }

    #[test]
    fn test_render_error_converts_into_cycle_error() {
        let err: CycleError = RenderError::EmptyTagName {
            path: "root".to_string(),
        }
        .into();
        assert!(matches!(err, CycleError::Render(_)));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: CycleError = parse.unwrap_err().into();
        assert!(matches!(err, CycleError::Serialization(_)));
    }
}
