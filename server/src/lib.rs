//! OC Rates Server
//!
//! HTTP front for the rates service: `GET /api/rates` returns the provider's
//! latest rates for a base currency and `GET /api/convert` converts an amount.
//! Any failure is answered with `500 {"error": "<message>"}`.

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
