//! Server-side rendering of a [`Node`] tree into an HTML fragment.

use std::sync::Arc;

use thiserror::Error;

use crate::markup::{Element, Node};

/// Default nesting limit applied by [`HtmlRenderer`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Elements that never carry content and are rendered without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid tag name `{tag}`")]
    InvalidTagName { tag: String },
    #[error("invalid attribute name `{name}` on <{tag}>")]
    InvalidAttributeName { tag: String, name: String },
    #[error("void element <{tag}> cannot have children")]
    VoidElementChildren { tag: String },
    #[error("render depth exceeded the limit of {limit}")]
    DepthExceeded { limit: usize },
    #[error("component `{component}` failed: {message}")]
    Component { component: String, message: String },
}

impl RenderError {
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Converts a component tree into an HTML string.
pub trait Renderer: Send + Sync {
    fn render_to_string(&self, node: &Node) -> Result<String, RenderError>;
}

impl<R> Renderer for Arc<R>
where
    R: Renderer + ?Sized,
{
    fn render_to_string(&self, node: &Node) -> Result<String, RenderError> {
        (**self).render_to_string(node)
    }
}

/// Per-render state handed to components. Passed explicitly down the tree.
#[derive(Clone, Debug)]
pub struct RenderContext {
    depth: usize,
    max_depth: usize,
}

impl RenderContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn descend(&self) -> Result<Self, RenderError> {
        if self.depth >= self.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Deterministic HTML serializer. Identical trees always produce identical output.
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    max_depth: usize,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn write_node(
        &self,
        node: &Node,
        cx: &RenderContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        match node {
            Node::Text(value) => {
                escape_text(value, out);
                Ok(())
            }
            // Fragments emit no markup but still count toward the depth limit.
            Node::Fragment(children) => {
                let inner = cx.descend()?;
                for child in children {
                    self.write_node(child, &inner, out)?;
                }
                Ok(())
            }
            Node::Element(element) => self.write_element(element, cx, out),
            Node::Component(component) => {
                let inner = cx.descend()?;
                let expanded = component.render(&inner)?;
                tracing::trace!(component = component.name(), depth = inner.depth(), "expanded");
                self.write_node(&expanded, &inner, out)
            }
        }
    }

    fn write_element(
        &self,
        element: &Element,
        cx: &RenderContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let tag = element.tag();
        if !is_valid_tag_name(tag) {
            return Err(RenderError::InvalidTagName {
                tag: tag.to_string(),
            });
        }
        let inner = cx.descend()?;

        out.push('<');
        out.push_str(tag);
        for (name, value) in element.attributes() {
            if !is_valid_attribute_name(name) {
                return Err(RenderError::InvalidAttributeName {
                    tag: tag.to_string(),
                    name: name.to_string(),
                });
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attribute(value, out);
            out.push('"');
        }
        out.push('>');

        if is_void_element(tag) {
            if !element.child_nodes().is_empty() {
                return Err(RenderError::VoidElementChildren {
                    tag: tag.to_string(),
                });
            }
            return Ok(());
        }

        for child in element.child_nodes() {
            self.write_node(child, &inner, out)?;
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Ok(())
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn render_to_string(&self, node: &Node) -> Result<String, RenderError> {
        let mut out = String::new();
        let cx = RenderContext::new(self.max_depth);
        self.write_node(node, &cx, &mut out)?;
        Ok(out)
    }
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        _ => false,
    }
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '>' | '/' | '=')
        })
}

fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{component, element, fragment, text, Component};

    fn render(node: impl Into<Node>) -> Result<String, RenderError> {
        HtmlRenderer::default().render_to_string(&node.into())
    }

    #[test]
    fn renders_nested_elements_and_text() {
        let html = render(
            element("div")
                .attr("class", "card")
                .child(element("p").child("Hello!")),
        )
        .expect("render");
        assert_eq!(html, r#"<div class="card"><p>Hello!</p></div>"#);
    }

    #[test]
    fn escapes_text_content() {
        let html = render(element("p").child("a < b && c > d \"q\"")).expect("render");
        assert_eq!(html, "<p>a &lt; b &amp;&amp; c &gt; d \"q\"</p>");
    }

    #[test]
    fn escapes_attribute_values() {
        let html = render(element("a").attr("title", r#"say "hi" <now> & later"#)).expect("render");
        assert_eq!(
            html,
            r#"<a title="say &quot;hi&quot; &lt;now&gt; &amp; later"></a>"#
        );
    }

    #[test]
    fn empty_attribute_value_is_kept() {
        let html = render(element("input").attr("disabled", "")).expect("render");
        assert_eq!(html, r#"<input disabled="">"#);
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = render(
            element("link")
                .attr("rel", "stylesheet")
                .attr("href", "/site.css"),
        )
        .expect("render");
        assert_eq!(html, r#"<link rel="stylesheet" href="/site.css">"#);
        assert!(is_void_element("BR"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn void_element_with_children_is_rejected() {
        let err = render(element("img").child("nope")).expect_err("error");
        assert_eq!(
            err,
            RenderError::VoidElementChildren {
                tag: "img".to_string()
            }
        );
    }

    #[test]
    fn fragments_render_without_wrapper() {
        let html = render(fragment([
            element("title").child("Page").into(),
            text("tail"),
        ]))
        .expect("render");
        assert_eq!(html, "<title>Page</title>tail");
    }

    #[test]
    fn invalid_tag_names_are_rejected() {
        for tag in ["", "1div", "di v", "<script>", "x_y"] {
            let err = render(element(tag)).expect_err("error");
            assert_eq!(
                err,
                RenderError::InvalidTagName {
                    tag: tag.to_string()
                }
            );
        }
        assert!(render(element("my-widget")).is_ok());
    }

    #[test]
    fn invalid_attribute_names_are_rejected() {
        for name in ["", "on click", "a\"b", "x=y", "a/b"] {
            let err = render(element("div").attr(name, "v")).expect_err("error");
            assert!(matches!(err, RenderError::InvalidAttributeName { .. }));
        }
        assert!(render(element("div").attr("data-id", "7")).is_ok());
    }

    struct Card {
        body: &'static str,
    }

    impl Component for Card {
        fn render(&self, _cx: &RenderContext) -> Result<Node, RenderError> {
            Ok(element("div")
                .attr("class", "card")
                .child(self.body)
                .into())
        }
    }

    #[test]
    fn components_expand_in_place() {
        let html = render(element("main").child(component(Card { body: "Hi" }))).expect("render");
        assert_eq!(html, r#"<main><div class="card">Hi</div></main>"#);
    }

    #[test]
    fn components_receive_increasing_depth() {
        let html = render(element("div").child(component(|cx: &RenderContext| {
            Ok::<_, RenderError>(text(cx.depth().to_string()))
        })))
        .expect("render");
        assert_eq!(html, "<div>2</div>");
    }

    #[test]
    fn component_failures_propagate() {
        let failing = component(|_cx: &RenderContext| {
            Err::<Node, _>(RenderError::component("Broken", "no data"))
        });
        let err = render(element("div").child(failing)).expect_err("error");
        assert_eq!(err.to_string(), "component `Broken` failed: no data");
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut node: Node = text("leaf");
        for _ in 0..5 {
            node = element("div").child(node).into();
        }
        let renderer = HtmlRenderer::with_max_depth(4);
        let err = renderer.render_to_string(&node).expect_err("error");
        assert_eq!(err, RenderError::DepthExceeded { limit: 4 });

        let renderer = HtmlRenderer::with_max_depth(5);
        assert!(renderer.render_to_string(&node).is_ok());
    }

    #[test]
    fn nested_fragments_hit_depth_limit() {
        let mut node: Node = text("leaf");
        for _ in 0..1_000 {
            node = fragment([node]);
        }
        let err = HtmlRenderer::default()
            .render_to_string(&node)
            .expect_err("error");
        assert_eq!(
            err,
            RenderError::DepthExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        );

        let mut shallow: Node = text("leaf");
        for _ in 0..3 {
            shallow = fragment([shallow]);
        }
        assert_eq!(
            HtmlRenderer::with_max_depth(3).render_to_string(&shallow),
            Ok("leaf".to_string())
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let tree: Node = element("ul")
            .children(["a", "b", "c"].map(|item| element("li").child(item)))
            .into();
        let renderer = Arc::new(HtmlRenderer::default());
        let first = renderer.render_to_string(&tree).expect("first");
        let second = renderer.render_to_string(&tree).expect("second");
        assert_eq!(first, second);
        assert_eq!(first, "<ul><li>a</li><li>b</li><li>c</li></ul>");
    }
}
