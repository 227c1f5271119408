//! # Collate Server
//!
//! HTTP gateway for Collate. Decodes `/retrieve` and `/store` requests,
//! calls into the [`Collate`](collate::Collate) service, and maps outcomes
//! to status codes.
//!
//! # Endpoints
//!
//! - `GET /retrieve/{key}` - 200 with the value as `text/plain`, 404 if absent
//! - `POST /store` - `multipart/form-data` with `key`, `value`, `passhash`;
//!   200 on success, 403 if the key is owned by another token
//!
//! Anything else is answered with 404.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use cli::Cli;
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ServerError};
pub use routes::router;
pub use server::{shutdown_signal, Server};
