//! # Application Orchestrator
//!
//! [`App`] owns the session gate, the current route and whichever controller
//! is mounted for it. Controllers never talk to each other; they hand
//! navigation requests back to the orchestrator.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  App (single thread)                                     │
//! │  - navigate()      - gate decides, controller (re)mounts │
//! │  - on_tick()       - drains task results                 │
//! │  - submit_*/refresh/logout - forwarded to the controller │
//! └──────────────┬───────────────────────────────────────────┘
//!                │ async_channel (unbounded)
//!                │ AppEvent { mount, event }
//! ┌──────────────▼───────────────────────────────────────────┐
//! │  Tokio tasks owned by the mounted controller's TaskScope │
//! │  - login / register / list / regenerate requests         │
//! │  - redirect, reset and re-fetch timers                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Replacing the mounted controller drops its scope, which aborts its
//! tasks. Results that were already queued are discarded by mount id in
//! [`event_handler`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use catalog_client::app::{App, Route, Services};
//! use catalog_client::config::Timings;
//! use catalog_client::services::MemoryStore;
//!
//! # async fn run() {
//! let mut app = App::new(Services::demo(), Arc::new(MemoryStore::new()), Timings::default());
//! app.navigate(Route::Products); // signed out, lands on "/"
//!
//! loop {
//!     app.next_event().await;
//!     // render app.auth() / app.catalog()
//! }
//! # }
//! ```

mod auth_form;
mod catalog;
mod event_handler;
mod events;
mod notifications;
mod scope;
mod session;
mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use async_channel::{Receiver, Sender};

pub use auth_form::{AuthFormController, Submission, CONNECTION_ERROR, LOGIN_SUCCESS, REGISTER_SUCCESS};
pub use catalog::{CatalogController, LOAD_ERROR, UPDATE_ERROR};
pub use events::{AppEvent, AuthEvent, CatalogEvent};
pub use notifications::{Notification, NotificationCenter, NotificationLevel};
pub use scope::{MountId, TaskScope};
pub use session::{Resolution, Route, SessionGate, View, AUTH_KEY, AUTH_SENTINEL, EMAIL_KEY};
pub use state::*;

use crate::config::{Backend, ClientConfig, Timings};
use crate::core::service::{AuthService, CatalogService, SessionStore};
use crate::services::{ApiClient, DemoAuthService, DemoCatalogService, FileStore, MemoryStore};
use event_handler::AppEventHandler;

/// The auth and catalog backends the app talks to.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
}

impl Services {
    /// One HTTP client serving both base URLs.
    pub fn http(config: &ClientConfig) -> Self {
        let client = Arc::new(ApiClient::new(config));
        Self {
            auth: client.clone(),
            catalog: client,
        }
    }

    /// Offline services with the built-in test accounts.
    pub fn demo() -> Self {
        Self {
            auth: Arc::new(DemoAuthService::new()),
            catalog: Arc::new(DemoCatalogService::new()),
        }
    }
}

pub(crate) enum MountedView {
    Auth(AuthFormController),
    Catalog(CatalogController),
}

impl MountedView {
    fn view(&self) -> View {
        match self {
            MountedView::Auth(_) => View::Auth,
            MountedView::Catalog(_) => View::Catalog,
        }
    }
}

pub struct App {
    gate: SessionGate,
    route: Route,
    pub(crate) mounted: Option<MountedView>,
    pub(crate) notifications: NotificationCenter,
    services: Services,
    timings: Timings,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
}

impl App {
    /// Build an app with nothing mounted. Call [`App::navigate`] to show the
    /// first surface.
    pub fn new(services: Services, store: Arc<dyn SessionStore>, timings: Timings) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        Self {
            gate: SessionGate::new(store),
            route: Route::Root,
            mounted: None,
            notifications: NotificationCenter::new(timings.success_toast, timings.error_toast),
            services,
            timings,
            event_tx,
            event_rx,
        }
    }

    /// Assemble from configuration. Fails only when the session file's
    /// directory cannot be created.
    pub fn from_config(config: &ClientConfig) -> crate::core::error::Result<Self> {
        let services = match config.backend {
            Backend::Http => Services::http(config),
            Backend::Demo => Services::demo(),
        };
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => {
                let store = FileStore::create(path.clone())?;
                tracing::info!(path = %store.path().display(), "Session persisted to file");
                Arc::new(store)
            }
            None => Arc::new(MemoryStore::new()),
        };
        tracing::info!(backend = ?config.backend, "App assembled");
        Ok(Self::new(services, store, config.timings))
    }

    // ---- Navigation ----

    /// Go to `route`, following the gate's redirects.
    ///
    /// Navigating to the surface that is already mounted keeps it, including
    /// its in-flight work. Mounting a different surface drops the old
    /// controller first.
    pub fn navigate(&mut self, route: Route) {
        let mut target = route;
        // A mount hook may redirect once more if the flag changed between
        // the gate decision and the mount.
        for _ in 0..3 {
            let (landed, view) = self.gate.settle(target);
            self.route = landed;

            if self.mounted.as_ref().map(MountedView::view) == Some(view) {
                return;
            }

            match self.mount(view) {
                Some(next) => target = next,
                None => return,
            }
        }
        tracing::error!(route = self.route.path(), "Navigation did not settle");
    }

    /// Navigate by path. Unknown paths land on `/`.
    pub fn navigate_path(&mut self, path: &str) {
        let route = Route::from_path(path).unwrap_or_else(|| {
            tracing::warn!(path, "Unknown path - falling back to root");
            Route::Root
        });
        self.navigate(route);
    }

    fn mount(&mut self, view: View) -> Option<Route> {
        // Drop the previous controller (and abort its tasks) before the new
        // one can start any.
        self.mounted = None;
        tracing::debug!(?view, route = self.route.path(), "Mounting view");

        let services = &self.services;
        match view {
            View::Auth => {
                let controller = AuthFormController::new(
                    Arc::clone(&services.auth),
                    self.gate.clone(),
                    self.timings,
                    self.event_tx.clone(),
                );
                let redirect = controller.on_mount();
                self.mounted = Some(MountedView::Auth(controller));
                redirect
            }
            View::Catalog => {
                let mut controller = CatalogController::new(
                    Arc::clone(&services.catalog),
                    self.gate.clone(),
                    self.timings,
                    self.event_tx.clone(),
                );
                let redirect = controller.on_mount();
                self.mounted = Some(MountedView::Catalog(controller));
                redirect
            }
        }
    }

    // ---- Accessors ----

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> Option<View> {
        self.mounted.as_ref().map(MountedView::view)
    }

    pub fn auth(&self) -> Option<&AuthFormController> {
        match &self.mounted {
            Some(MountedView::Auth(controller)) => Some(controller),
            _ => None,
        }
    }

    pub fn catalog(&self) -> Option<&CatalogController> {
        match &self.mounted {
            Some(MountedView::Catalog(controller)) => Some(controller),
            _ => None,
        }
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // ---- User actions ----

    fn auth_mut(&mut self) -> Option<&mut AuthFormController> {
        match &mut self.mounted {
            Some(MountedView::Auth(controller)) => Some(controller),
            _ => {
                tracing::debug!("Auth action ignored - auth surface not mounted");
                None
            }
        }
    }

    fn catalog_mut(&mut self) -> Option<&mut CatalogController> {
        match &mut self.mounted {
            Some(MountedView::Catalog(controller)) => Some(controller),
            _ => {
                tracing::debug!("Catalog action ignored - catalog not mounted");
                None
            }
        }
    }

    pub fn toggle_panel(&mut self) {
        if let Some(controller) = self.auth_mut() {
            controller.toggle_panel();
        }
    }

    pub fn edit_login(&mut self, field: LoginField, value: impl Into<String>) {
        if let Some(controller) = self.auth_mut() {
            controller.edit_login(field, value);
        }
    }

    pub fn edit_register(&mut self, field: RegisterField, value: impl Into<String>) {
        if let Some(controller) = self.auth_mut() {
            controller.edit_register(field, value);
        }
    }

    pub fn submit_login(&mut self) -> Option<Submission> {
        self.auth_mut().map(AuthFormController::submit_login)
    }

    pub fn submit_register(&mut self) -> Option<Submission> {
        self.auth_mut().map(AuthFormController::submit_register)
    }

    pub fn refresh(&mut self) {
        if let Some(controller) = self.catalog_mut() {
            controller.refresh();
        }
    }

    /// Re-run the catalog fetch (the error state's retry action).
    pub fn retry(&mut self) {
        if let Some(controller) = self.catalog_mut() {
            controller.fetch_products();
        }
    }

    pub fn logout(&mut self) {
        if let Some(route) = self.catalog_mut().map(CatalogController::logout) {
            self.navigate(route);
        }
    }

    // ---- Event loop ----

    /// Apply every queued task result without blocking.
    pub fn on_tick(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event_impl(event);
        }
        self.housekeeping();
    }

    /// Wait for the next task result and apply it.
    ///
    /// Returns `false` once the channel is closed. Cancel-safe: dropping the
    /// future before it completes loses no event.
    pub async fn next_event(&mut self) -> bool {
        match self.event_rx.recv().await {
            Ok(event) => {
                self.handle_event_impl(event);
                self.housekeeping();
                true
            }
            Err(_) => false,
        }
    }

    fn housekeeping(&mut self) {
        self.notifications.prune(Instant::now());
        match &mut self.mounted {
            Some(MountedView::Auth(controller)) => controller.reap(),
            Some(MountedView::Catalog(controller)) => controller.reap(),
            None => {}
        }
    }
}
