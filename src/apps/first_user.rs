// Copyright (c) 2025 - Cowboy AI, Inc.
//! First user: fetches a user over HTTP when `.get-first` is clicked
//!
//! 1. button clicked (DOM source)
//! 2. request sent (HTTP sink)
//! 3. response received (HTTP source, filtered to the users URL)
//! 4. user displayed (DOM sink)

use futures::future;
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::driver::dom::DOM;
use crate::driver::http::{HttpRequest, HttpResponse, HTTP};
use crate::errors::CycleResult;
use crate::payload::Payload;
use crate::runtime::{Sinks, Sources};
use crate::stream::start_with;
use crate::vdom::{a, button, h1, h4, VElement};

/// Default users endpoint
pub const USERS_URL: &str = "http://jsonplaceholder.typicode.com/users/1";

/// First-user app configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstUserConfig {
    /// URL requested on every click
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    USERS_URL.to_string()
}

impl Default for FirstUserConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

/// The parts of a user the view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Full name
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Website
    #[serde(default)]
    pub website: String,
}

fn user_of(response: HttpResponse) -> Option<User> {
    match serde_json::from_value(response.body) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(request_id = %response.request_id, error = %e, "Response is not a user");
            None
        }
    }
}

/// Tree showing the button and, once fetched, the user
pub fn render(user: Option<&User>) -> VElement {
    let page = VElement::new("div").child(button("Get first user").class("get-first"));
    match user {
        Some(user) => page.child(
            VElement::new("div")
                .class("user-details")
                .child(h1(user.name.as_str()).class("user-name"))
                .child(h4(user.email.as_str()).class("user-email"))
                .child(
                    a(user.website.as_str())
                        .class("user-website")
                        .attr("href", &user.website),
                ),
        ),
        None => page,
    }
}

/// The first-user app's `main`
pub fn app(config: FirstUserConfig) -> impl FnOnce(Sources) -> CycleResult<Sinks> + Send + 'static {
    move |sources: Sources| {
        let url = config.url;

        let request_url = url.clone();
        let requests = sources
            .dom()?
            .select(".get-first")?
            .events("click")
            .map(move |_| Payload::Request(HttpRequest::get(request_url.as_str())))
            .boxed();

        let users = sources
            .http()?
            .responses(&url)
            .filter_map(|response| future::ready(user_of(response).map(Some)))
            .boxed();
        let vtree = start_with(None, users)
            .map(|user| Payload::Tree(render(user.as_ref())))
            .boxed();

        Ok(Sinks::new().with(DOM, vtree).with(HTTP, requests))
    }
}
