use crate::manifest::Manifest;
use crate::router::RouterService;

const DEFAULT_APP_NAME: &str = "edgepage app";

/// Named wrapper around the router that adapters dispatch into.
pub struct App {
    router: RouterService,
    name: String,
}

impl App {
    pub fn new(router: RouterService) -> Self {
        Self::with_name(router, DEFAULT_APP_NAME)
    }

    pub fn with_name<S>(router: RouterService, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            router,
            name: name.into(),
        }
    }

    pub fn router(&self) -> &RouterService {
        &self.router
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S>(&mut self, name: S)
    where
        S: Into<String>,
    {
        self.name = name.into();
    }

    pub fn into_router(self) -> RouterService {
        self.router
    }
}

/// Implemented once per application; adapters call [`Hooks::build_app`] to obtain the app.
pub trait Hooks {
    fn routes() -> RouterService;

    /// Adjust the freshly built app. No-op by default.
    fn configure(_app: &mut App) {}

    fn name() -> &'static str {
        DEFAULT_APP_NAME
    }

    fn build_app() -> App
    where
        Self: Sized,
    {
        let mut app = App::with_name(Self::routes(), Self::name());
        Self::configure(&mut app);
        app
    }

    /// Like [`Hooks::build_app`], with `[app] name` from the manifest taking precedence.
    fn build_app_with_manifest(manifest: &Manifest) -> App
    where
        Self: Sized,
    {
        let mut app = Self::build_app();
        if let Some(name) = manifest.app_name() {
            app.set_name(name);
        }
        app
    }
}
