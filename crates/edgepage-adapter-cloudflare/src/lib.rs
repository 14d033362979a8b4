//! Adapter helpers for Cloudflare Workers.

mod logger;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod request;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod response;

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use request::{dispatch, into_core_request};
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use response::from_core_response;

use edgepage_core::manifest::ResolvedLoggingConfig;

const ADAPTER_NAME: &str = "cloudflare";

/// Route `log`/`tracing` records to the Workers console at the manifest's level.
///
/// Installing the logger only happens once per isolate; later calls just update the level.
pub fn init_logger(logging: &ResolvedLoggingConfig) {
    let _ = log::set_logger(&logger::LOGGER);
    log::set_max_level(logging.level_filter());
    #[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
    console_error_panic_hook::set_once();
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub async fn run_app<A: edgepage_core::app::Hooks>(
    manifest_src: &str,
    req: worker::Request,
    env: worker::Env,
    ctx: worker::Context,
) -> Result<worker::Response, worker::Error> {
    let loader = edgepage_core::manifest::ManifestLoader::load_from_str(manifest_src)
        .map_err(|err| worker::Error::RustError(err.to_string()))?;
    let manifest = loader.manifest();
    init_logger(&manifest.logging_or_default(ADAPTER_NAME));
    let app = A::build_app_with_manifest(manifest);
    dispatch(&app, req, env, ctx).await
}
