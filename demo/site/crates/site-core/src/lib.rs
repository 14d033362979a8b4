mod app;
mod page;

pub use app::{build_router, SiteApp};
pub use page::{page_tree, Card, SITE_TITLE, STYLESHEET_HREF};
