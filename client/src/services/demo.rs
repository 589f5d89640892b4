//! # Offline Demo Backend
//!
//! In-process stand-ins for the auth and catalog services. No network is
//! touched, so the whole login → catalog → refresh → logout loop can be
//! exercised on a laptop with neither backend running.
//!
//! Built-in accounts:
//!
//! | email               | password   |
//! |---------------------|------------|
//! | `admin@teste.com`   | `admin123` |
//! | `usuario@teste.com` | `senha123` |
//!
//! Registering adds an account for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::{LoginRequest, Product, RegisterRequest};

use crate::core::error::ApiError;
use crate::core::service::{AuthService, CatalogService};

const BUILTIN_ACCOUNTS: [(&str, &str); 2] = [
    ("admin@teste.com", "admin123"),
    ("usuario@teste.com", "senha123"),
];

/// Auth service backed by an in-memory account table.
#[derive(Debug)]
pub struct DemoAuthService {
    accounts: RwLock<HashMap<String, String>>,
}

impl Default for DemoAuthService {
    fn default() -> Self {
        let accounts = BUILTIN_ACCOUNTS
            .iter()
            .map(|(email, password)| (email.to_string(), password.to_string()))
            .collect();
        Self {
            accounts: RwLock::new(accounts),
        }
    }
}

impl DemoAuthService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthService for DemoAuthService {
    async fn login(&self, request: LoginRequest) -> Result<(), ApiError> {
        let accounts = self.accounts.read();
        match accounts.get(&request.email) {
            Some(password) if *password == request.password => {
                tracing::info!(email = %request.email, "Demo login accepted");
                Ok(())
            }
            _ => Err(ApiError::Rejected {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            }),
        }
    }

    async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&request.email) {
            return Err(ApiError::Rejected {
                status: 409,
                message: Some("Email already registered".to_string()),
            });
        }
        accounts.insert(request.email.clone(), request.password);
        tracing::info!(email = %request.email, "Demo account registered");
        Ok(())
    }
}

/// Catalog service serving a fixture list.
///
/// Each regeneration bumps a counter that is stamped into the titles, so a
/// refresh visibly changes what the re-fetch returns.
#[derive(Debug, Default)]
pub struct DemoCatalogService {
    generation: RwLock<u32>,
}

impl DemoCatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    fn fixture(generation: u32) -> Vec<Product> {
        let items = [
            ("1", "Smart TV 50\" 4K", "R$ 2.199,00"),
            ("2", "Notebook 15.6\" 8GB", "R$ 3.499,00"),
            ("3", "Air Fryer 4L", "R$ 399,90"),
            ("4", "Smartphone 128GB", "R$ 1.299,00"),
        ];
        items
            .iter()
            .map(|(id, title, price)| Product {
                id: Some(id.to_string()),
                url: Some(format!("https://catalog.example/products/{id}")),
                title: Some(if generation == 0 {
                    title.to_string()
                } else {
                    format!("{title} (update #{generation})")
                }),
                price: Some(price.to_string()),
            })
            .collect()
    }
}

#[async_trait]
impl CatalogService for DemoCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let generation = *self.generation.read();
        Ok(Self::fixture(generation))
    }

    async fn update_products(&self) -> Result<serde_json::Value, ApiError> {
        let mut generation = self.generation.write();
        *generation += 1;
        Ok(serde_json::json!({ "message": "Products updated", "generation": *generation }))
    }
}
