//! Sunbird client SDK.
//!
//! This crate is the client-side consistency layer for the Sunbird shop
//! backend: it owns the authentication session (access/refresh token pair
//! plus the signed-in profile), the persisted shopping cart, and the
//! checkout pipeline that turns cart state into a server-confirmed order.
//!
//! # Architecture
//!
//! - [`SessionManager`] - the current session, persisted across restarts
//! - [`HttpGateway`] - single request pipeline; attaches the bearer
//!   credential and performs one transparent refresh-and-retry on 401
//! - [`CartStore`] - persisted, ordered product/quantity aggregate
//! - [`CheckoutOrchestrator`] - cart + session -> created order, with an
//!   atomic clear-on-success contract
//! - [`services`] - typed wrappers for the REST resources (auth, catalog,
//!   orders, admin, files, profile)
//!
//! Persistence goes through the injected [`Storage`] capability so tests
//! can substitute an in-memory implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sunbird_client::{
//!     CartStore, CheckoutOrchestrator, ClientConfig, HttpGateway,
//!     SessionManager, ShippingDetails,
//!     services::{AuthService, OrdersService, ProductsService},
//!     storage::FileStorage,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let storage = Arc::new(FileStorage::new(config.state_file())?);
//! let session = Arc::new(SessionManager::load(storage.clone())?);
//! let gateway = HttpGateway::new(&config, session.clone())?;
//!
//! let auth = AuthService::new(gateway.clone(), session.clone());
//! auth.login_with_google(&id_token).await?;
//!
//! let cart = Arc::new(CartStore::new(storage));
//! let products = ProductsService::new(gateway.clone());
//! let page = products.list(&Default::default()).await?;
//! cart.add(page.content[0].clone())?;
//!
//! let checkout = CheckoutOrchestrator::new(
//!     session,
//!     cart,
//!     OrdersService::new(gateway),
//! );
//! let order = checkout
//!     .place_order(&ShippingDetails::new("12 Main St", "0712345678"))
//!     .await?;
//! println!("order {} is {}", order.id, order.status);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod services;
pub mod session;
pub mod storage;
pub mod types;

pub use cart::{CartItem, CartStore};
pub use checkout::{CheckoutError, CheckoutOrchestrator, ShippingDetails};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use gateway::HttpGateway;
pub use session::{Session, SessionManager};
pub use storage::{Storage, StorageError};
