//! End-to-end flows through [`App`] against scripted services.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use shared::{LoginRequest, Product, RegisterRequest};

use super::*;
use crate::core::error::{ApiError, ValidationError};
use crate::core::service::{AuthService, CatalogService, SessionStore};
use crate::services::MemoryStore;

// ---- Test doubles ----

struct MockAuth {
    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    login_reply: Result<(), ApiError>,
    register_reply: Result<(), ApiError>,
}

impl MockAuth {
    fn accepting() -> Self {
        Self::replying(Ok(()), Ok(()))
    }

    fn replying(login_reply: Result<(), ApiError>, register_reply: Result<(), ApiError>) -> Self {
        Self {
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            login_reply,
            register_reply,
        }
    }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn login(&self, _request: LoginRequest) -> Result<(), ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_reply.clone()
    }

    async fn register(&self, _request: RegisterRequest) -> Result<(), ApiError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_reply.clone()
    }
}

type ListReply = (Duration, Result<Vec<Product>, ApiError>);

/// Catalog double. Scripted list replies are consumed in order; once the
/// script runs out every call gets `list_default`.
struct MockCatalog {
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    list_script: Mutex<VecDeque<ListReply>>,
    list_default: Result<Vec<Product>, ApiError>,
    update_reply: Result<serde_json::Value, ApiError>,
}

impl MockCatalog {
    fn serving(products: Vec<Product>) -> Self {
        Self {
            list_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            list_script: Mutex::new(VecDeque::new()),
            list_default: Ok(products),
            update_reply: Ok(json!({ "message": "Products updated" })),
        }
    }

    fn then(self, delay: Duration, reply: Result<Vec<Product>, ApiError>) -> Self {
        self.list_script.lock().push_back((delay, reply));
        self
    }

    fn with_update_reply(mut self, reply: Result<serde_json::Value, ApiError>) -> Self {
        self.update_reply = reply;
        self
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.list_script.lock().pop_front();
        let (delay, reply) = scripted.unwrap_or((Duration::ZERO, self.list_default.clone()));
        tokio::time::sleep(delay).await;
        reply
    }

    async fn update_products(&self) -> Result<serde_json::Value, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_reply.clone()
    }
}

// ---- Helpers ----

fn product(id: &str, title: &str) -> Product {
    Product {
        id: Some(id.to_string()),
        url: Some(format!("https://shop.example/item/{id}")),
        title: Some(title.to_string()),
        price: Some("R$ 199,90".to_string()),
    }
}

fn build(auth: &Arc<MockAuth>, catalog: &Arc<MockCatalog>, signed_in: bool) -> (App, Arc<MemoryStore>) {
    build_with_timings(auth, catalog, signed_in, Timings::immediate())
}

fn build_with_timings(
    auth: &Arc<MockAuth>,
    catalog: &Arc<MockCatalog>,
    signed_in: bool,
    timings: Timings,
) -> (App, Arc<MemoryStore>) {
    let store = if signed_in {
        MemoryStore::with_entries([(AUTH_KEY, AUTH_SENTINEL), (EMAIL_KEY, "admin@teste.com")])
    } else {
        MemoryStore::new()
    };
    let store = Arc::new(store);
    let services = Services {
        auth: auth.clone(),
        catalog: catalog.clone(),
    };
    let app = App::new(services, store.clone(), timings);
    (app, store)
}

/// Apply events until `done` holds, failing after two seconds.
async fn run_until(app: &mut App, done: impl Fn(&App) -> bool) {
    let reached = tokio::time::timeout(Duration::from_secs(2), async {
        while !done(app) {
            app.next_event().await;
        }
    })
    .await;
    assert!(reached.is_ok(), "condition not reached in time");
}

/// Give spawned tasks a chance to run, then apply whatever they queued.
///
/// Call counters only move once a task is polled, so asserting "no request"
/// right after an action proves nothing without this.
async fn settle(app: &mut App) {
    tokio::time::sleep(Duration::from_millis(20)).await;
    app.on_tick();
}

fn auth_state(app: &App) -> &AuthFormState {
    app.auth().expect("auth surface mounted").state()
}

fn catalog_state(app: &App) -> &CatalogState {
    app.catalog().expect("catalog mounted").state()
}

fn fill_login(app: &mut App, email: &str, password: &str) {
    app.edit_login(LoginField::Email, email);
    app.edit_login(LoginField::Password, password);
}

fn fill_register(app: &mut App, name: &str, email: &str, password: &str, confirm: &str) {
    app.edit_register(RegisterField::Name, name);
    app.edit_register(RegisterField::Email, email);
    app.edit_register(RegisterField::Password, password);
    app.edit_register(RegisterField::ConfirmPassword, confirm);
}

// ---- Routing ----

#[tokio::test]
async fn test_signed_out_catalog_redirects_without_fetch() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(vec![product("1", "Notebook")]));
    let (mut app, _) = build(&auth, &catalog, false);

    app.navigate(Route::Products);

    assert_eq!(app.route(), Route::Root);
    assert_eq!(app.view(), Some(View::Auth));
    settle(&mut app).await;
    assert_eq!(catalog.list_calls(), 0);
    assert_eq!(app.view(), Some(View::Auth));
}

#[tokio::test]
async fn test_catalog_mount_guard_refuses_signed_out_session() {
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let gate = SessionGate::new(Arc::new(MemoryStore::new()));
    let (tx, _rx) = async_channel::unbounded();
    let mut controller = CatalogController::new(catalog.clone(), gate, Timings::immediate(), tx);

    assert_eq!(controller.on_mount(), Some(Route::Root));
    assert_eq!(controller.pending_tasks(), 0);

    // Controller still alive, so a spawned fetch would get to run here.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(catalog.list_calls(), 0);
}

#[tokio::test]
async fn test_signed_in_root_redirects_to_catalog() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(vec![product("1", "Notebook")]));
    let (mut app, _) = build(&auth, &catalog, true);

    app.navigate(Route::Root);

    assert_eq!(app.route(), Route::Products);
    assert_eq!(app.view(), Some(View::Catalog));
}

#[tokio::test]
async fn test_unknown_path_lands_on_root() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));

    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate_path("/checkout");
    assert_eq!(app.route(), Route::Root);
    assert_eq!(app.view(), Some(View::Auth));

    // Signed in, "/" itself redirects onward.
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate_path("/does-not-exist");
    assert_eq!(app.route(), Route::Products);
}

#[tokio::test]
async fn test_navigating_to_mounted_view_keeps_controller() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(vec![product("1", "Notebook")]));
    let (mut app, _) = build(&auth, &catalog, true);

    app.navigate(Route::Products);
    let mount = app.catalog().map(CatalogController::mount_id);
    app.navigate(Route::Products);
    assert_eq!(app.catalog().map(CatalogController::mount_id), mount);

    run_until(&mut app, |app| catalog_state(app).fetch != FetchState::Loading).await;
    settle(&mut app).await;

    assert_eq!(app.catalog().map(CatalogController::mount_id), mount);
    assert_eq!(catalog_state(&app).fetch, FetchState::Ready(vec![product("1", "Notebook")]));
    assert_eq!(catalog.list_calls(), 1);
}

// ---- Auth surface ----

#[tokio::test]
async fn test_invalid_email_never_calls_auth() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    fill_login(&mut app, "user@", "secret1");
    let outcome = app.submit_login();

    assert_eq!(outcome, Some(Submission::Invalid(ValidationError::InvalidEmail)));
    assert_eq!(auth_state(&app).login_error.as_deref(), Some("Please enter a valid email"));
    assert!(!auth_state(&app).is_submitting);
    assert_eq!(app.auth().map(AuthFormController::pending_tasks), Some(0));

    settle(&mut app).await;
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_registration_mismatch_reported_before_length() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);
    app.toggle_panel();

    fill_register(&mut app, "Ana", "ana@example.com", "abc", "abd");
    assert_eq!(
        app.submit_register(),
        Some(Submission::Invalid(ValidationError::PasswordMismatch))
    );
    assert_eq!(auth_state(&app).register_error.as_deref(), Some("Passwords do not match"));

    app.edit_register(RegisterField::ConfirmPassword, "abc");
    assert_eq!(
        app.submit_register(),
        Some(Submission::Invalid(ValidationError::PasswordTooShort))
    );
    assert_eq!(
        auth_state(&app).register_error.as_deref(),
        Some("Password must be at least 6 characters")
    );
    assert_eq!(app.auth().map(AuthFormController::pending_tasks), Some(0));

    settle(&mut app).await;
    assert_eq!(auth.register_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_toggle_round_trip_keeps_fields_and_clears_errors() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    app.edit_login(LoginField::Email, "ana@example.com");
    app.submit_login();
    assert_eq!(auth_state(&app).login_error.as_deref(), Some("Please fill in all fields"));

    app.toggle_panel();
    assert_eq!(auth_state(&app).active_panel, ActivePanel::Register);
    assert!(auth_state(&app).login_error.is_none());

    app.toggle_panel();
    let state = auth_state(&app);
    assert_eq!(state.active_panel, ActivePanel::Login);
    assert_eq!(state.login.email, "ana@example.com");
    assert!(state.login_error.is_none());
    assert!(state.register_error.is_none());
}

#[tokio::test]
async fn test_editing_a_field_clears_that_forms_error() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    app.submit_login();
    assert!(auth_state(&app).login_error.is_some());

    app.edit_login(LoginField::Password, "x");
    assert!(auth_state(&app).login_error.is_none());
}

#[tokio::test]
async fn test_login_flow_reaches_catalog() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(vec![product("1", "Notebook"), product("2", "Mouse")]));
    let (mut app, store) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    fill_login(&mut app, "ana@example.com", "secret1");
    assert_eq!(app.submit_login(), Some(Submission::Sent));
    assert!(auth_state(&app).is_submitting);
    assert_eq!(app.submit_login(), Some(Submission::Busy));

    run_until(&mut app, |app| {
        app.catalog()
            .is_some_and(|c| matches!(c.state().display(), CatalogDisplay::Products(_)))
    })
    .await;

    assert_eq!(app.route(), Route::Products);
    assert!(app.gate().is_authenticated());
    assert_eq!(store.get(AUTH_KEY).as_deref(), Some(AUTH_SENTINEL));
    assert_eq!(store.get(EMAIL_KEY).as_deref(), Some("ana@example.com"));
    assert_eq!(catalog_state(&app).products().len(), 2);
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);

    let toast = app.notifications().latest().expect("success toast");
    assert_eq!(toast.level, NotificationLevel::Success);
    assert_eq!(toast.message, LOGIN_SUCCESS);
}

#[tokio::test]
async fn test_login_rejection_shows_server_message() {
    let rejected = ApiError::Rejected {
        status: 401,
        message: Some("Invalid credentials".to_string()),
    };
    let auth = Arc::new(MockAuth::replying(Err(rejected), Ok(())));
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    fill_login(&mut app, "ana@example.com", "wrong-pass");
    app.submit_login();
    run_until(&mut app, |app| !auth_state(app).is_submitting).await;

    assert_eq!(auth_state(&app).login_error.as_deref(), Some("Invalid credentials"));
    let toast = app.notifications().latest().expect("error toast");
    assert_eq!(toast.level, NotificationLevel::Error);
    assert_eq!(toast.message, "Invalid credentials");
    assert!(!app.gate().is_authenticated());
    assert_eq!(app.view(), Some(View::Auth));
}

#[tokio::test]
async fn test_login_transport_failure_uses_generic_message() {
    let offline = ApiError::Transport("connection refused".to_string());
    let auth = Arc::new(MockAuth::replying(Err(offline), Ok(())));
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    fill_login(&mut app, "ana@example.com", "secret1");
    app.submit_login();
    run_until(&mut app, |app| !auth_state(app).is_submitting).await;

    assert_eq!(auth_state(&app).login_error.as_deref(), Some(CONNECTION_ERROR));
}

#[tokio::test]
async fn test_register_success_resets_form_and_stays_signed_out() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);
    app.toggle_panel();

    fill_register(&mut app, "Ana", "ana@example.com", "secret1", "secret1");
    assert_eq!(app.submit_register(), Some(Submission::Sent));

    run_until(&mut app, |app| auth_state(app).register == RegisterForm::default()).await;

    assert!(!auth_state(&app).is_submitting);
    assert!(!app.gate().is_authenticated());
    assert_eq!(app.view(), Some(View::Auth));
    assert_eq!(auth.register_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        app.notifications().latest().map(|n| n.message.as_str()),
        Some(REGISTER_SUCCESS)
    );
}

#[tokio::test]
async fn test_register_conflict_keeps_form() {
    let conflict = ApiError::Rejected {
        status: 409,
        message: Some("Email already registered".to_string()),
    };
    let auth = Arc::new(MockAuth::replying(Ok(()), Err(conflict)));
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, false);
    app.navigate(Route::Root);

    fill_register(&mut app, "Ana", "admin@teste.com", "secret1", "secret1");
    app.submit_register();
    run_until(&mut app, |app| !auth_state(app).is_submitting).await;

    let state = auth_state(&app);
    assert_eq!(state.register_error.as_deref(), Some("Email already registered"));
    assert_eq!(state.register.email, "admin@teste.com");
}

// ---- Catalog surface ----

#[tokio::test]
async fn test_empty_catalog_is_not_an_error() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(Vec::new()));
    let (mut app, _) = build(&auth, &catalog, true);

    app.navigate(Route::Products);
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Loading);

    run_until(&mut app, |app| catalog_state(app).fetch != FetchState::Loading).await;
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Empty);
}

#[tokio::test]
async fn test_fetch_failure_offers_retry() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(vec![product("1", "Notebook")])
            .then(Duration::ZERO, Err(ApiError::Transport("timeout".to_string()))),
    );
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate(Route::Products);

    run_until(&mut app, |app| matches!(catalog_state(app).fetch, FetchState::Error(_))).await;
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Error(LOAD_ERROR));

    app.retry();
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Loading);
    run_until(&mut app, |app| !catalog_state(app).products().is_empty()).await;
    assert_eq!(catalog.list_calls(), 2);
}

#[tokio::test]
async fn test_refresh_success_refetches() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(vec![product("1", "Notebook"), product("2", "Mouse")])
            .then(Duration::ZERO, Ok(vec![product("1", "Notebook")])),
    );
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate(Route::Products);
    run_until(&mut app, |app| catalog_state(app).products().len() == 1).await;

    app.refresh();
    assert!(catalog_state(&app).is_refreshing);
    // Products stay on screen while regenerating.
    assert!(matches!(catalog_state(&app).display(), CatalogDisplay::Products(_)));

    run_until(&mut app, |app| {
        let state = catalog_state(app);
        !state.is_refreshing && state.products().len() == 2
    })
    .await;
    assert_eq!(catalog.update_calls(), 1);
    assert_eq!(catalog.list_calls(), 2);
}

#[tokio::test]
async fn test_second_refresh_during_delay_schedules_its_own_refetch() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(MockCatalog::serving(vec![product("1", "Notebook")]));
    let timings = Timings {
        refetch_delay: Duration::from_millis(100),
        ..Timings::immediate()
    };
    let (mut app, _) = build_with_timings(&auth, &catalog, true, timings);
    app.navigate(Route::Products);
    run_until(&mut app, |app| !catalog_state(app).products().is_empty()).await;

    app.refresh();
    settle(&mut app).await;
    app.refresh();
    settle(&mut app).await;

    // Both regenerations accepted, both re-fetches still waiting on the delay.
    assert_eq!(catalog.update_calls(), 2);
    assert_eq!(catalog.list_calls(), 1);
    assert!(catalog_state(&app).is_refreshing);

    run_until(&mut app, |app| catalog.list_calls() == 3 && !catalog_state(app).is_refreshing).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    app.on_tick();

    assert_eq!(catalog.update_calls(), 2);
    assert_eq!(catalog.list_calls(), 3);
    assert_eq!(catalog_state(&app).products(), [product("1", "Notebook")].as_slice());
}

#[tokio::test]
async fn test_refresh_failure_surfaces_server_message_without_refetch() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(vec![product("1", "Notebook")]).with_update_reply(Err(ApiError::Rejected {
            status: 429,
            message: Some("quota exceeded".to_string()),
        })),
    );
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate(Route::Products);
    run_until(&mut app, |app| !catalog_state(app).products().is_empty()).await;

    app.refresh();
    run_until(&mut app, |app| !catalog_state(app).is_refreshing).await;
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Error("quota exceeded"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    app.on_tick();
    assert_eq!(catalog.update_calls(), 1);
    assert_eq!(catalog.list_calls(), 1);
}

#[tokio::test]
async fn test_refresh_failure_without_message_uses_generic_text() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(Vec::new())
            .with_update_reply(Err(ApiError::Transport("connection reset".to_string()))),
    );
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate(Route::Products);
    run_until(&mut app, |app| catalog_state(app).fetch != FetchState::Loading).await;

    app.refresh();
    run_until(&mut app, |app| matches!(catalog_state(app).fetch, FetchState::Error(_))).await;
    assert_eq!(catalog_state(&app).display(), CatalogDisplay::Error(UPDATE_ERROR));
}

#[tokio::test]
async fn test_last_response_wins() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(Vec::new())
            .then(Duration::from_millis(150), Ok(vec![product("1", "Slow")]))
            .then(Duration::ZERO, Ok(vec![product("2", "Fast")])),
    );
    let (mut app, _) = build(&auth, &catalog, true);

    app.navigate(Route::Products);
    app.retry();

    run_until(&mut app, |app| catalog_state(app).products() == [product("2", "Fast")]).await;
    run_until(&mut app, |app| catalog_state(app).products() == [product("1", "Slow")]).await;
    assert_eq!(catalog.list_calls(), 2);
}

// ---- Teardown ----

#[tokio::test]
async fn test_logout_clears_session_and_discards_in_flight_fetch() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(Vec::new()).then(Duration::from_millis(100), Ok(vec![product("1", "Notebook")])),
    );
    let (mut app, store) = build(&auth, &catalog, true);
    app.navigate(Route::Products);

    app.logout();

    assert_eq!(app.route(), Route::Root);
    assert_eq!(app.view(), Some(View::Auth));
    assert!(!app.gate().is_authenticated());
    assert_eq!(store.get(AUTH_KEY), None);
    assert_eq!(store.get(EMAIL_KEY), None);

    tokio::time::sleep(Duration::from_millis(200)).await;
    app.on_tick();
    assert_eq!(app.route(), Route::Root);
    assert_eq!(app.view(), Some(View::Auth));
}

#[tokio::test]
async fn test_stale_event_is_discarded() {
    let auth = Arc::new(MockAuth::accepting());
    let catalog = Arc::new(
        MockCatalog::serving(Vec::new()).then(Duration::from_millis(200), Ok(Vec::new())),
    );
    let (mut app, _) = build(&auth, &catalog, true);
    app.navigate(Route::Products);

    let stale = AppEvent::Catalog {
        mount: MountId::new(),
        event: CatalogEvent::ProductsLoaded(Ok(vec![product("9", "Ghost")])),
    };
    app.event_tx.send(stale).await.unwrap();
    app.on_tick();

    assert_eq!(catalog_state(&app).fetch, FetchState::Loading);
}
