use edgepage_core::app::Hooks;
use edgepage_core::middleware::RequestLogger;
use edgepage_core::page::PageHandler;
use edgepage_core::render::HtmlRenderer;
use edgepage_core::router::RouterService;

use crate::page::page_tree;

pub struct SiteApp;

impl Hooks for SiteApp {
    fn routes() -> RouterService {
        build_router()
    }

    fn name() -> &'static str {
        "My Cool Site"
    }
}

/// Every method and path falls through to the page handler.
pub fn build_router() -> RouterService {
    RouterService::builder()
        .middleware(RequestLogger)
        .fallback(PageHandler::from_shared(page_tree(), HtmlRenderer::default()))
        .build()
}
