//! Command implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod session;

use std::sync::Arc;

use sunbird_client::{
    CartStore, ClientConfig, HttpGateway, SessionManager,
    services::{AdminService, AuthService, OrdersService, ProductsService},
    storage::FileStorage,
};

/// Shared wiring for every command: config, persistence, session, and the
/// gateway all constructed once and passed by reference.
pub struct Context {
    pub session: Arc<SessionManager>,
    pub cart: Arc<CartStore>,
    pub gateway: HttpGateway,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the state file
    /// cannot be opened.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        let storage = Arc::new(FileStorage::new(config.state_file())?);
        let session = Arc::new(SessionManager::load(storage.clone())?);
        let gateway = HttpGateway::new(&config, session.clone())?;
        let cart = Arc::new(CartStore::new(storage));

        Ok(Self {
            session,
            cart,
            gateway,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.gateway.clone(), self.session.clone())
    }

    pub fn products(&self) -> ProductsService {
        ProductsService::new(self.gateway.clone())
    }

    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.gateway.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.gateway.clone())
    }
}
