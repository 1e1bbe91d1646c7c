//! HTTP surface of the symptom gate.
//!
//! `api_router()` returns a composable `Router` with the analyze endpoint
//! under `/api/` plus the liveness routes; `server` runs it.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server_on, ApiServer, ServerSession};
pub use types::ApiContext;
