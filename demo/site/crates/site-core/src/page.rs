use std::sync::Arc;

use edgepage_core::markup::{component, element, fragment, text, Component, Node, Str};
use edgepage_core::render::{RenderContext, RenderError};
use once_cell::sync::Lazy;

pub const SITE_TITLE: &str = "My Cool Site";
pub const STYLESHEET_HREF: &str = "/static/site.css";

static PAGE: Lazy<Arc<Node>> = Lazy::new(|| Arc::new(build_page()));

/// The page served for every request. Built on first use and shared afterwards.
pub fn page_tree() -> Arc<Node> {
    Arc::clone(&PAGE)
}

fn build_page() -> Node {
    fragment([
        Node::from(element("title").child(SITE_TITLE)),
        element("link")
            .attr("rel", "stylesheet")
            .attr("href", STYLESHEET_HREF)
            .into(),
        element("div")
            .attr("class", "container")
            .child(component(Card::new("Hello!")))
            .into(),
    ])
}

/// A bordered box with a single line of body text.
pub struct Card {
    body: Str,
}

impl Card {
    pub fn new(body: impl Into<Str>) -> Self {
        Self { body: body.into() }
    }
}

impl Component for Card {
    fn render(&self, _cx: &RenderContext) -> Result<Node, RenderError> {
        Ok(element("div")
            .attr("class", "card")
            .child(
                element("div")
                    .attr("class", "card-body")
                    .child(text(self.body.clone())),
            )
            .into())
    }

    fn name(&self) -> &str {
        "Card"
    }
}
