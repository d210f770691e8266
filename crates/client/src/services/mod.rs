//! Typed wrappers over the REST resources.
//!
//! One module per resource, all going through the [`HttpGateway`]
//! pipeline so every call gets the bearer credential and the
//! refresh-and-retry behavior for free.
//!
//! [`HttpGateway`]: crate::gateway::HttpGateway

pub mod admin;
pub mod auth;
pub mod categories;
pub mod files;
pub mod orders;
pub mod products;
pub mod profile;

pub use admin::AdminService;
pub use auth::AuthService;
pub use categories::CategoriesService;
pub use files::FilesService;
pub use orders::OrdersService;
pub use products::ProductsService;
pub use profile::ProfileService;
