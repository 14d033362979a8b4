//! Core primitives for serving server-rendered pages from edge runtimes.
//!
//! The crate is platform agnostic: adapters (`edgepage-adapter-axum`,
//! `edgepage-adapter-cloudflare`) convert their native request type into [`http::Request`],
//! dispatch it through a [`router::RouterService`] and convert the response back.

pub mod app;
pub mod body;
pub mod context;
pub mod document;
pub mod error;
pub mod handler;
pub mod http;
pub mod manifest;
pub mod markup;
pub mod middleware;
pub mod page;
pub mod render;
pub mod response;
pub mod router;

pub use app::{App, Hooks};
pub use body::Body;
pub use context::RequestContext;
pub use error::EdgeError;
pub use crate::http::{request_builder, response_builder, Method, Request, Response, StatusCode};
pub use page::PageHandler;
pub use render::{HtmlRenderer, RenderError, Renderer};
pub use router::RouterService;
