//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware, peer address capture)
//!     → handlers.rs (classify → persist → JSON response)
//!     → store / stats produce the payloads
//! ```

pub mod handlers;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
