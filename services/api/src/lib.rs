//! ToDo API service
//!
//! REST backend for users, categories and the todos that belong to them.
//! Business rules live in [`services`]; [`routes`] maps them onto HTTP and
//! [`repositories`] persists them in PostgreSQL or in memory.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
