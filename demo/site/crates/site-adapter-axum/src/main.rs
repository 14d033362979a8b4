use anyhow::Context;
use site_core::SiteApp;

fn main() {
    if let Err(err) = run() {
        eprintln!("site-adapter-axum failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    edgepage_adapter_axum::run_app::<SiteApp>(include_str!("../../../edgepage.toml"))
        .context("server")
}
