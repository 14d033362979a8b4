//! Request handler that serves a server-rendered page for every request.

use std::sync::Arc;

use crate::context::RequestContext;
use crate::document;
use crate::error::EdgeError;
use crate::handler::DynHandler;
use crate::http::{HandlerFuture, Response};
use crate::markup::Node;
use crate::render::{HtmlRenderer, RenderError, Renderer};
use crate::response::{Html, IntoResponse};

/// Renders a fixed component tree into the document shell on every request.
///
/// Method, path, headers and body of the incoming request are ignored. Render failures are not
/// turned into a response here; they surface as [`EdgeError::Render`] and are mapped by the
/// hosting router (see [`RouterService::oneshot`](crate::router::RouterService::oneshot)).
pub struct PageHandler<R = HtmlRenderer> {
    tree: Arc<Node>,
    renderer: Arc<R>,
}

impl PageHandler<HtmlRenderer> {
    pub fn new(tree: impl Into<Node>) -> Self {
        Self::with_renderer(tree, HtmlRenderer::default())
    }
}

impl<R> PageHandler<R>
where
    R: Renderer + 'static,
{
    pub fn with_renderer(tree: impl Into<Node>, renderer: R) -> Self {
        Self::from_shared(Arc::new(tree.into()), renderer)
    }

    /// Serve a tree that is already shared, e.g. one built once in a `static`.
    pub fn from_shared(tree: Arc<Node>, renderer: R) -> Self {
        Self {
            tree,
            renderer: Arc::new(renderer),
        }
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render the tree and wrap it in the document shell.
    pub fn render_document(&self) -> Result<String, RenderError> {
        let markup = self.renderer.render_to_string(&self.tree)?;
        Ok(document::wrap(&markup))
    }

    pub async fn handle(&self, ctx: RequestContext) -> Result<Response, EdgeError> {
        tracing::debug!(
            "rendering page method={} path={}",
            ctx.method(),
            ctx.uri().path()
        );
        let html = self.render_document()?;
        Ok(Html::new(html).into_response())
    }
}

impl<R> Clone for PageHandler<R> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<R> DynHandler for PageHandler<R>
where
    R: Renderer + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        let handler = self.clone();
        Box::pin(async move { handler.handle(ctx).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::http::{header::CONTENT_TYPE, request_builder, Method, StatusCode};
    use crate::markup::element;
    use crate::response::TEXT_HTML_UTF8;
    use futures::executor::block_on;

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render_to_string(&self, _node: &Node) -> Result<String, RenderError> {
            Err(RenderError::component("Page", "renderer offline"))
        }
    }

    fn ctx(method: Method, path: &str) -> RequestContext {
        let request = request_builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("request");
        RequestContext::new(request)
    }

    fn tree() -> Node {
        element("p").child("Hello!").into()
    }

    #[test]
    fn handle_returns_html_document() {
        let handler = PageHandler::new(tree());
        let response = block_on(handler.handle(ctx(Method::GET, "/"))).expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), TEXT_HTML_UTF8);
        assert_eq!(
            response.body().as_str().expect("utf8"),
            document::wrap("<p>Hello!</p>")
        );
    }

    #[test]
    fn render_document_matches_handler_body() {
        let handler = PageHandler::new(tree());
        let document = handler.render_document().expect("document");
        let response = block_on(handler.handle(ctx(Method::DELETE, "/x/y"))).expect("response");
        assert_eq!(response.body().as_bytes(), document.as_bytes());
    }

    #[test]
    fn render_failure_is_returned_to_caller() {
        let handler = PageHandler::with_renderer(tree(), FailingRenderer);
        let err = block_on(handler.handle(ctx(Method::GET, "/"))).expect_err("error");
        assert_eq!(
            err.render_error(),
            Some(&RenderError::component("Page", "renderer offline"))
        );
    }

    #[test]
    fn dyn_handler_delegates_to_handle() {
        let handler = PageHandler::new(tree());
        let response = block_on(DynHandler::call(&handler, ctx(Method::PUT, "/any")))
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn from_shared_reuses_the_given_tree() {
        let shared = Arc::new(tree());
        let handler = PageHandler::from_shared(Arc::clone(&shared), HtmlRenderer::default());
        assert!(std::ptr::eq(handler.tree(), shared.as_ref()));
    }

    #[test]
    fn clones_share_tree() {
        let handler = PageHandler::new(tree());
        let clone = handler.clone();
        assert!(std::ptr::eq(handler.tree(), clone.tree()));
    }
}
