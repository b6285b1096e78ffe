// Public API - what other modules can use
pub use handlers::routes;

// Internal modules
mod handlers;
pub mod models;
pub mod registry;
mod service;
pub mod types;
