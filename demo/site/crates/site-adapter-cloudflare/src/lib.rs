#[cfg(target_arch = "wasm32")]
use site_core::SiteApp;
#[cfg(target_arch = "wasm32")]
use worker::*;

#[cfg(target_arch = "wasm32")]
#[event(fetch)]
pub async fn main(req: Request, env: Env, ctx: Context) -> Result<Response> {
    let manifest = include_str!("../../../edgepage.toml");
    edgepage_adapter_cloudflare::run_app::<SiteApp>(manifest, req, env, ctx).await
}
