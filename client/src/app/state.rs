//! # Application State Types
//!
//! Plain data owned by the controllers: the two auth forms and the catalog
//! fetch state. No behavior beyond small accessors lives here.

use shared::{LoginRequest, Product, RegisterRequest};

/// Which auth form is visually primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    #[default]
    Login,
    Register,
}

impl ActivePanel {
    pub fn toggled(self) -> Self {
        match self {
            ActivePanel::Login => ActivePanel::Register,
            ActivePanel::Register => ActivePanel::Login,
        }
    }
}

/// Field in the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Field in the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn field_mut(&mut self, field: LoginField) -> &mut String {
        match field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn field_mut(&mut self, field: RegisterField) -> &mut String {
        match field {
            RegisterField::Name => &mut self.name,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
            RegisterField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

/// Everything the auth surface renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub active_panel: ActivePanel,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub login_error: Option<String>,
    pub register_error: Option<String>,
    /// A login or registration request is in flight; inputs are locked.
    pub is_submitting: bool,
}

/// Result of the most recent product fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Error(String),
    Ready(Vec<Product>),
}

/// Catalog controller state.
///
/// `is_refreshing` is orthogonal to `fetch`: a refresh keeps whatever is on
/// screen instead of dropping back to the bare loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub fetch: FetchState,
    pub is_refreshing: bool,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            fetch: FetchState::Loading,
            is_refreshing: false,
        }
    }
}

/// What the catalog surface shows, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogDisplay<'a> {
    /// Spinner. Only while loading and not refreshing.
    Loading,
    /// Error text with a retry action.
    Error(&'a str),
    /// Zero products after a successful fetch. Not a failure.
    Empty,
    Products(&'a [Product]),
}

impl CatalogState {
    pub fn display(&self) -> CatalogDisplay<'_> {
        match &self.fetch {
            FetchState::Loading if !self.is_refreshing => CatalogDisplay::Loading,
            // A refresh started before anything loaded has nothing to keep on screen.
            FetchState::Loading => CatalogDisplay::Empty,
            FetchState::Error(message) => CatalogDisplay::Error(message),
            FetchState::Ready(products) if products.is_empty() => CatalogDisplay::Empty,
            FetchState::Ready(products) => CatalogDisplay::Products(products),
        }
    }

    pub fn products(&self) -> &[Product] {
        match &self.fetch {
            FetchState::Ready(products) => products,
            FetchState::Loading | FetchState::Error(_) => &[],
        }
    }
}
