//! Remote processing service.
//!
//! Exposes the local pipeline over HTTP so other instances (routing
//! `remote`) can delegate documents to it: `GET /`, `GET /health`,
//! `GET /formats`, `POST /process`.
//!
//! The router is composable: `processing_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::processing_router;
pub use server::{start_processing_server, ProcessingServer};
pub use types::ApiContext;
