//! # Session Gate
//!
//! Owns the "this client is authenticated" fact and decides which top-level
//! view a path may show.
//!
//! The flag is persisted in the injected [`SessionStore`] under
//! [`AUTH_KEY`]. Only the exact sentinel [`AUTH_SENTINEL`] counts as signed in;
//! a missing key or any other value reads as signed out. Signing out removes
//! the key instead of writing `"false"`, since presence of the key is what a
//! reload trusts.
//!
//! This is a client-side flag with no server check behind it. Anyone who can
//! write the store can open the catalog.
//!
//! ## Routing Rule
//!
//! | path        | signed out        | signed in              |
//! |-------------|-------------------|------------------------|
//! | `/`         | auth surface      | redirect `/products`   |
//! | `/products` | redirect `/`      | catalog surface        |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::service::SessionStore;

/// Store key holding the authentication sentinel.
pub const AUTH_KEY: &str = "isAuthenticated";
/// Store key holding the last signed-in email.
pub const EMAIL_KEY: &str = "userEmail";
/// The only value of [`AUTH_KEY`] that means "signed in".
pub const AUTH_SENTINEL: &str = "true";

/// Reachable paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` - login and registration.
    Root,
    /// `/products` - the catalog.
    Products,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Products => "/products",
        }
    }

    /// Parse a path. Trailing slashes are ignored; unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim().trim_end_matches('/') {
            "" => Some(Route::Root),
            "/products" => Some(Route::Products),
            _ => None,
        }
    }
}

/// Top-level surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Catalog,
}

/// Outcome of asking the gate about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(View),
    Redirect(Route),
}

/// Authentication flag with persistence.
///
/// Cloning is cheap and every clone shares the same flag, so controllers can
/// hold their own handle.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    authenticated: Arc<AtomicBool>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Read the persisted flag. Fails closed.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let authenticated = store.get(AUTH_KEY).as_deref() == Some(AUTH_SENTINEL);
        tracing::debug!(authenticated, "Session gate initialized from store");
        Self {
            store,
            authenticated: Arc::new(AtomicBool::new(authenticated)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Flip the flag and persist it.
    ///
    /// `true` writes the sentinel. `false` removes the flag and the stored
    /// email together. Storage failures are logged; the in-memory flag is
    /// updated regardless, so this never fails.
    pub fn set_authenticated(&self, value: bool) {
        let previous = self.authenticated.swap(value, Ordering::SeqCst);

        let persisted = if value {
            self.store.set(AUTH_KEY, AUTH_SENTINEL)
        } else {
            self.store
                .remove(AUTH_KEY)
                .and_then(|()| self.store.remove(EMAIL_KEY))
        };
        if let Err(e) = persisted {
            tracing::error!(error = %e, authenticated = value, "Failed to persist session flag");
        }

        if previous != value {
            tracing::info!(authenticated = value, "Session state changed");
        }
    }

    /// Persist the email of the account that just signed in.
    pub fn remember_email(&self, email: &str) {
        if let Err(e) = self.store.set(EMAIL_KEY, email) {
            tracing::error!(error = %e, "Failed to persist user email");
        }
    }

    pub fn user_email(&self) -> Option<String> {
        self.store.get(EMAIL_KEY)
    }

    /// Apply the routing rule to one path.
    pub fn resolve(&self, route: Route) -> Resolution {
        match (route, self.is_authenticated()) {
            (Route::Root, false) => Resolution::Render(View::Auth),
            (Route::Root, true) => Resolution::Redirect(Route::Products),
            (Route::Products, true) => Resolution::Render(View::Catalog),
            (Route::Products, false) => Resolution::Redirect(Route::Root),
        }
    }

    /// Follow redirects until a view renders. Returns where navigation lands.
    ///
    /// Redirect targets always render for the current flag, so this settles
    /// after at most one hop.
    pub fn settle(&self, route: Route) -> (Route, View) {
        let mut current = route;
        loop {
            match self.resolve(current) {
                Resolution::Render(view) => return (current, view),
                Resolution::Redirect(next) => {
                    tracing::debug!(from = current.path(), to = next.path(), "Redirecting");
                    current = next;
                }
            }
        }
    }
}
