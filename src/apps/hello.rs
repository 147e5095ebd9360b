// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hello-name: greets whatever is typed into the `.field` input

use futures::stream::StreamExt;

use crate::driver::dom::DOM;
use crate::errors::CycleResult;
use crate::payload::Payload;
use crate::runtime::{Sinks, Sources};
use crate::stream::start_with;
use crate::vdom::{h1, hr, input, label, VElement};

/// Tree greeting `name`
pub fn view(name: &str) -> VElement {
    VElement::new("div")
        .child(label("Name: "))
        .child(input().class("field").attr("type", "text"))
        .child(hr())
        .child(h1(format!("Hello {}", name)))
}

/// The hello app's `main`
pub fn app() -> impl FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static {
    |sources: Sources| {
        let names = sources
            .dom()?
            .select(".field")?
            .events("input")
            .map(|event| event.target.value.unwrap_or_default())
            .boxed();

        let vtree = start_with(String::new(), names)
            .map(|name| Payload::Tree(view(&name)))
            .boxed();

        Ok(Sinks::new().with(DOM, vtree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_layout() {
        assert_eq!(
            view("Ada").to_string(),
            "<div><label>Name: </label><input class=\"field\" type=\"text\"></input><hr></hr><h1>Hello Ada</h1></div>"
        );
    }
}
