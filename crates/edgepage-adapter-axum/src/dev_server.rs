use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::Context;
use axum::Router;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::signal;
use tower::{service_fn, Service};

use edgepage_core::app::Hooks;
use edgepage_core::manifest::{ManifestLoader, DEFAULT_HOST, DEFAULT_PORT};
use edgepage_core::router::RouterService;

use crate::service::EdgePageAxumService;

const ADAPTER_NAME: &str = "axum";

/// Where and how the local server listens.
#[derive(Clone, Debug)]
pub struct AxumDevServerConfig {
    pub addr: SocketAddr,
    pub enable_ctrl_c: bool,
}

impl Default for AxumDevServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT),
            enable_ctrl_c: true,
        }
    }
}

/// Blocking server runner hosting an edgepage router on axum.
pub struct AxumDevServer {
    router: RouterService,
    config: AxumDevServerConfig,
}

impl AxumDevServer {
    pub fn new(router: RouterService) -> Self {
        Self {
            router,
            config: AxumDevServerConfig::default(),
        }
    }

    pub fn with_config(router: RouterService, config: AxumDevServerConfig) -> Self {
        Self { router, config }
    }

    pub fn config(&self) -> &AxumDevServerConfig {
        &self.config
    }

    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        runtime.block_on(async move { self.run_async().await })
    }

    async fn run_async(self) -> anyhow::Result<()> {
        let AxumDevServer { router, config } = self;

        // Bind synchronously so address errors surface before the server starts.
        let listener = StdTcpListener::bind(config.addr)
            .with_context(|| format!("failed to bind server to {}", config.addr))?;
        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;
        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to adopt std listener into tokio")?;

        log::info!("edgepage listening on http://{}", config.addr);
        serve_with_listener(router, listener, config.enable_ctrl_c).await
    }

    #[cfg(test)]
    async fn run_with_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let AxumDevServer { router, config } = self;
        serve_with_listener(router, listener, config.enable_ctrl_c).await
    }
}

async fn serve_with_listener(
    router: RouterService,
    listener: tokio::net::TcpListener,
    enable_ctrl_c: bool,
) -> anyhow::Result<()> {
    let service = EdgePageAxumService::new(router);
    let router = Router::new().fallback_service(service_fn(move |req| {
        let mut svc = service.clone();
        async move { svc.call(req).await }
    }));
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();

    let server = axum::serve(listener, make_service);
    if enable_ctrl_c {
        server
            .with_graceful_shutdown(async {
                let _ = signal::ctrl_c().await;
                log::info!("shutting down");
            })
            .await
            .context("axum server error")?;
    } else {
        server.await.context("axum server error")?;
    }

    Ok(())
}

/// Install the stdout logger at the given level. Later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    SimpleLogger::new().with_level(level).init().ok();
}

/// Parse the manifest, configure logging, and serve `A` until ctrl-c.
pub fn run_app<A: Hooks>(manifest_src: &str) -> anyhow::Result<()> {
    let loader =
        ManifestLoader::load_from_str(manifest_src).context("failed to load edgepage.toml")?;
    let manifest = loader.manifest();
    init_logger(manifest.logging_or_default(ADAPTER_NAME).level_filter());

    let app = A::build_app_with_manifest(manifest);
    log::info!("starting app {}", app.name());

    let config = AxumDevServerConfig {
        addr: manifest.server_addr(),
        ..AxumDevServerConfig::default()
    };
    AxumDevServer::with_config(app.into_router(), config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn default_config_uses_expected_address() {
        let config = AxumDevServerConfig::default();
        assert_eq!(config.addr.ip(), IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.addr.port(), 8787);
        assert!(config.enable_ctrl_c);
    }

    #[test]
    fn with_config_keeps_custom_address() {
        let config = AxumDevServerConfig {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            enable_ctrl_c: false,
        };
        let server = AxumDevServer::with_config(RouterService::builder().build(), config);
        assert_eq!(server.config().addr.port(), 3000);
        assert!(!server.config().enable_ctrl_c);
    }

    #[test]
    fn run_app_rejects_invalid_manifest() {
        struct NoRoutes;

        impl Hooks for NoRoutes {
            fn routes() -> RouterService {
                RouterService::builder().build()
            }
        }

        let err = run_app::<NoRoutes>("[server]\nport = 0\n").expect_err("invalid port");
        assert!(err.to_string().contains("edgepage.toml"));
    }
}
