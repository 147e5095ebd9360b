// Copyright (c) 2025 - Cowboy AI, Inc.
//! DOM selectors: `tag`, `.class` and `tag.class.other`

use std::fmt;
use std::str::FromStr;

use crate::errors::SelectorError;

/// Simple compound selector matching a tag name and/or class names
///
/// Tag names compare case-insensitively, as DOM `tagName` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Selector {
    /// Parse a selector string
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let invalid = |reason| SelectorError::Invalid {
            selector: trimmed.to_string(),
            reason,
        };

        let mut parts = trimmed.split('.');
        let tag = match parts.next() {
            Some("") | None => None,
            Some(tag) if valid_name(tag) => Some(tag.to_ascii_uppercase()),
            Some(_) => return Err(invalid("only tag and class selectors are supported")),
        };

        let mut classes = Vec::new();
        for class in parts {
            if !valid_name(class) {
                return Err(invalid("class names must be non-empty identifiers"));
            }
            classes.push(class.to_string());
        }

        Ok(Self { tag, classes })
    }

    /// Whether an element with this tag name and classes is selected
    pub fn matches<S: AsRef<str>>(&self, tag_name: &str, classes: &[S]) -> bool {
        let tag_matches = self
            .tag
            .as_deref()
            .map_or(true, |tag| tag.eq_ignore_ascii_case(tag_name));
        tag_matches
            && self
                .classes
                .iter()
                .all(|wanted| classes.iter().any(|class| class.as_ref() == wanted))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{}", tag.to_ascii_lowercase())?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}
