//! Declarative component tree consumed by [`Renderer`](crate::render::Renderer) implementations.
//!
//! A tree is built once, is immutable afterwards and is cheap to share behind an `Arc`. Component
//! kinds are expressed as [`Node`] variants; reusable application components implement
//! [`Component`] and expand to plain nodes at render time.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::render::{RenderContext, RenderError};

pub type Str = Cow<'static, str>;

/// A node in the component tree.
#[derive(Clone)]
pub enum Node {
    Element(Element),
    Text(Str),
    Fragment(Vec<Node>),
    Component(Arc<dyn Component>),
}

impl Node {
    pub fn is_empty_fragment(&self) -> bool {
        matches!(self, Node::Fragment(children) if children.is_empty())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => fmt::Debug::fmt(element, f),
            Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Node::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            Node::Component(component) => f
                .debug_tuple("Component")
                .field(&component.name())
                .finish(),
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<&'static str> for Node {
    fn from(value: &'static str) -> Self {
        Node::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(Cow::Owned(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Fragment(value)
    }
}

/// An HTML element with ordered attributes and child nodes.
#[derive(Clone, Debug)]
pub struct Element {
    tag: Str,
    attributes: Vec<(Str, Str)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<Str>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute. Attributes render in insertion order.
    #[must_use]
    pub fn attr(mut self, name: impl Into<Str>, value: impl Into<Str>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }
}

/// A reusable component that expands into a subtree when rendered.
///
/// Components receive the active [`RenderContext`] explicitly instead of reading ambient state,
/// and report failures as [`RenderError`] values.
pub trait Component: Send + Sync {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError>;

    /// Name used in diagnostics and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Component for F
where
    F: Fn(&RenderContext) -> Result<Node, RenderError> + Send + Sync,
{
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        (self)(cx)
    }
}

pub fn element(tag: impl Into<Str>) -> Element {
    Element::new(tag)
}

pub fn text(value: impl Into<Str>) -> Node {
    Node::Text(value.into())
}

pub fn fragment<I, N>(nodes: I) -> Node
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Node::Fragment(nodes.into_iter().map(Into::into).collect())
}

pub fn component<C>(component: C) -> Node
where
    C: Component + 'static,
{
    Node::Component(Arc::new(component))
}
