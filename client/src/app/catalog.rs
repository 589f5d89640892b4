//! # Catalog Controller
//!
//! Fetches the product collection, runs the manual refresh cycle and owns
//! the logout action.
//!
//! ```text
//!             mount (signed in)
//!                   │
//!                   ▼
//!   ┌──retry──► Loading ──► Ready(products) / Error(msg)
//!   │                              │
//!   └──────── Error ◄──fail── refresh: POST /update-products
//!                                  │ ok
//!                                  ▼
//!                        refetch_delay, then fetch
//! ```
//!
//! `is_refreshing` overlays whatever is displayed. Every settled fetch
//! clears it, success or not; a failed regeneration clears it without a
//! follow-up fetch.
//!
//! Concurrent fetches and refreshes are neither serialized nor coalesced:
//! each response is applied as it arrives, so the last one wins.

use std::sync::Arc;

use async_channel::Sender;

use super::events::{AppEvent, CatalogEvent};
use super::scope::{MountId, TaskScope};
use super::session::{Route, SessionGate};
use super::state::{CatalogState, FetchState};
use crate::config::Timings;
use crate::core::service::CatalogService;

pub const LOAD_ERROR: &str = "Could not load products. Please try again.";
pub const UPDATE_ERROR: &str = "Error updating products";

pub struct CatalogController {
    state: CatalogState,
    catalog: Arc<dyn CatalogService>,
    gate: SessionGate,
    timings: Timings,
    scope: TaskScope<CatalogEvent>,
}

fn wrap(mount: MountId, event: CatalogEvent) -> AppEvent {
    AppEvent::Catalog { mount, event }
}

impl CatalogController {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        gate: SessionGate,
        timings: Timings,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            state: CatalogState::default(),
            catalog,
            gate,
            timings,
            scope: TaskScope::new(events, wrap),
        }
    }

    pub fn mount_id(&self) -> MountId {
        self.scope.id()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Guard, then initial fetch.
    ///
    /// A signed-out session gets a redirect and no request at all.
    pub fn on_mount(&mut self) -> Option<Route> {
        if !self.gate.is_authenticated() {
            tracing::warn!("Catalog mounted without a session - redirecting before any fetch");
            return Some(Route::Root);
        }
        self.fetch_products();
        None
    }

    /// Read the collection. Also the retry action of the error state.
    pub fn fetch_products(&mut self) {
        if !self.state.is_refreshing {
            self.state.fetch = FetchState::Loading;
        }

        let catalog = Arc::clone(&self.catalog);
        self.scope
            .spawn(async move { CatalogEvent::ProductsLoaded(catalog.list_products().await) });
    }

    /// Ask the server to regenerate, then re-read after a delay.
    pub fn refresh(&mut self) {
        self.state.is_refreshing = true;

        let catalog = Arc::clone(&self.catalog);
        self.scope
            .spawn(async move { CatalogEvent::RegenerationFinished(catalog.update_products().await) });
    }

    /// Sign out. The caller navigates to the returned route, which unmounts
    /// this controller and with it every in-flight request.
    pub fn logout(&mut self) -> Route {
        tracing::info!(email = ?self.gate.user_email(), "Logging out");
        self.gate.set_authenticated(false);
        Route::Root
    }

    pub fn handle(&mut self, event: CatalogEvent) -> Option<Route> {
        match event {
            CatalogEvent::ProductsLoaded(Ok(products)) => {
                tracing::info!(count = products.len(), "Catalog loaded");
                self.state.fetch = FetchState::Ready(products);
                self.state.is_refreshing = false;
            }
            CatalogEvent::ProductsLoaded(Err(e)) => {
                tracing::error!(error = %e, "Catalog fetch failed");
                self.state.fetch = FetchState::Error(LOAD_ERROR.to_string());
                self.state.is_refreshing = false;
            }
            CatalogEvent::RegenerationFinished(Ok(body)) => {
                tracing::info!(response = %body, delay_ms = self.timings.refetch_delay.as_millis(), "Regeneration accepted - scheduling re-fetch");
                self.scope.schedule(self.timings.refetch_delay, CatalogEvent::RefetchDue);
            }
            CatalogEvent::RegenerationFinished(Err(e)) => {
                tracing::error!(error = %e, "Regeneration failed");
                self.state.fetch = FetchState::Error(e.user_message(UPDATE_ERROR));
                self.state.is_refreshing = false;
            }
            CatalogEvent::RefetchDue => self.fetch_products(),
        }
        None
    }

    pub(crate) fn reap(&mut self) {
        self.scope.reap();
    }

    /// Requests and timers started and not yet reaped.
    #[cfg(test)]
    pub(crate) fn pending_tasks(&self) -> usize {
        self.scope.pending()
    }
}
