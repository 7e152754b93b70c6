//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers and store produce:
//!     → tracing events (structured logs to stdout)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; filter from env or config
//! - Metrics are cheap (atomic increments) and optional to expose

pub mod metrics;
