//! # Auth Form Controller
//!
//! Drives the login and registration forms that share the auth surface.
//!
//! ## Login
//!
//! ```text
//! submit_login ──validate──► MissingFields / InvalidEmail (no request)
//!      │
//!      ▼
//!  POST /login ──Err──► inline error + error toast, form unlocked
//!      │ Ok
//!      ▼
//!  success toast ──login_redirect_delay──► gate = true, email saved, → /products
//! ```
//!
//! The delay only keeps the toast readable before the view is replaced.
//!
//! ## Registration
//!
//! Validated in order (presence, email, confirmation, length). Success shows
//! a toast and clears the form after `register_reset_delay`. It does not sign
//! the user in.

use std::sync::Arc;

use async_channel::Sender;

use super::events::{AppEvent, AuthEvent};
use super::notifications::NotificationCenter;
use super::scope::{MountId, TaskScope};
use super::session::{Route, SessionGate};
use super::state::{AuthFormState, LoginField, RegisterField, RegisterForm};
use crate::config::Timings;
use crate::core::error::{ApiError, ValidationError};
use crate::core::service::AuthService;
use crate::utils::validation::{validate_login, validate_registration};

/// Shown when the server gave no message or could not be reached.
pub const CONNECTION_ERROR: &str = "Could not connect to the server";
pub const LOGIN_SUCCESS: &str = "Signed in successfully!";
pub const REGISTER_SUCCESS: &str = "Registration complete!";

/// What happened to a submit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Request issued.
    Sent,
    /// Refused locally; the form error is set.
    Invalid(ValidationError),
    /// Another submission is still in flight.
    Busy,
}

pub struct AuthFormController {
    state: AuthFormState,
    auth: Arc<dyn AuthService>,
    gate: SessionGate,
    timings: Timings,
    scope: TaskScope<AuthEvent>,
}

fn wrap(mount: MountId, event: AuthEvent) -> AppEvent {
    AppEvent::Auth { mount, event }
}

impl AuthFormController {
    pub fn new(
        auth: Arc<dyn AuthService>,
        gate: SessionGate,
        timings: Timings,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            state: AuthFormState::default(),
            auth,
            gate,
            timings,
            scope: TaskScope::new(events, wrap),
        }
    }

    pub fn mount_id(&self) -> MountId {
        self.scope.id()
    }

    pub fn state(&self) -> &AuthFormState {
        &self.state
    }

    /// Already signed in? Then this surface should not be showing.
    pub fn on_mount(&self) -> Option<Route> {
        self.gate.is_authenticated().then_some(Route::Products)
    }

    /// Switch the primary panel. Clears both errors, keeps field values.
    pub fn toggle_panel(&mut self) {
        self.state.active_panel = self.state.active_panel.toggled();
        self.state.login_error = None;
        self.state.register_error = None;
    }

    pub fn edit_login(&mut self, field: LoginField, value: impl Into<String>) {
        *self.state.login.field_mut(field) = value.into();
        self.state.login_error = None;
    }

    pub fn edit_register(&mut self, field: RegisterField, value: impl Into<String>) {
        *self.state.register.field_mut(field) = value.into();
        self.state.register_error = None;
    }

    pub fn submit_login(&mut self) -> Submission {
        if self.state.is_submitting {
            tracing::debug!("Login submit ignored - request in flight");
            return Submission::Busy;
        }

        let form = &self.state.login;
        if let Err(e) = validate_login(&form.email, &form.password) {
            tracing::debug!(error = %e, "Login form rejected locally");
            self.state.login_error = Some(e.to_string());
            return Submission::Invalid(e);
        }

        let request = form.to_request();
        let email = request.email.clone();
        let auth = Arc::clone(&self.auth);

        self.state.is_submitting = true;
        self.scope.spawn(async move {
            let result = auth.login(request).await;
            AuthEvent::LoginFinished { email, result }
        });
        Submission::Sent
    }

    pub fn submit_register(&mut self) -> Submission {
        if self.state.is_submitting {
            tracing::debug!("Register submit ignored - request in flight");
            return Submission::Busy;
        }

        let form = &self.state.register;
        if let Err(e) = validate_registration(&form.name, &form.email, &form.password, &form.confirm_password) {
            tracing::debug!(error = %e, "Registration form rejected locally");
            self.state.register_error = Some(e.to_string());
            return Submission::Invalid(e);
        }

        let request = form.to_request();
        let auth = Arc::clone(&self.auth);

        self.state.is_submitting = true;
        self.scope.spawn(async move { AuthEvent::RegisterFinished(auth.register(request).await) });
        Submission::Sent
    }

    /// Apply a task result. Returns a navigation request when the session
    /// was committed.
    pub fn handle(&mut self, event: AuthEvent, notifications: &mut NotificationCenter) -> Option<Route> {
        match event {
            AuthEvent::LoginFinished { email, result: Ok(()) } => {
                tracing::info!(email = %email, "Login accepted - committing after delay");
                notifications.success(LOGIN_SUCCESS);
                self.scope
                    .schedule(self.timings.login_redirect_delay, AuthEvent::LoginCommitDue { email });
                None
            }
            AuthEvent::LoginFinished { result: Err(e), .. } => {
                self.state.is_submitting = false;
                let message = surface(&e);
                self.state.login_error = Some(message.clone());
                notifications.error(message);
                None
            }
            AuthEvent::LoginCommitDue { email } => {
                self.gate.set_authenticated(true);
                self.gate.remember_email(&email);
                Some(Route::Products)
            }
            AuthEvent::RegisterFinished(Ok(())) => {
                tracing::info!("Registration accepted");
                self.state.is_submitting = false;
                notifications.success(REGISTER_SUCCESS);
                self.scope
                    .schedule(self.timings.register_reset_delay, AuthEvent::RegisterResetDue);
                None
            }
            AuthEvent::RegisterFinished(Err(e)) => {
                self.state.is_submitting = false;
                let message = surface(&e);
                self.state.register_error = Some(message.clone());
                notifications.error(message);
                None
            }
            AuthEvent::RegisterResetDue => {
                self.state.register = RegisterForm::default();
                None
            }
        }
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

fn surface(error: &ApiError) -> String {
    tracing::warn!(error = %error, "Auth request failed");
    error.user_message(CONNECTION_ERROR)
}
