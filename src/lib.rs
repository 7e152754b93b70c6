//! IP Source Tracker
//!
//! A small HTTP service that records metadata about every incoming request
//! (source IP, headers, body, timestamp) and classifies each one as coming
//! from a fixed set of expected NAT egress addresses.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────┐
//!                     │                IP TRACKER                   │
//!                     │                                             │
//!   Client Request    │  ┌─────────┐   ┌────────────┐   ┌────────┐ │
//!   ──────────────────┼─▶│  http   │──▶│ classifier │──▶│ store  │ │
//!                     │  │ router  │   │ (resolve + │   │ (file- │ │
//!                     │  └────┬────┘   │  verdict)  │   │ backed │ │
//!                     │       │        └────────────┘   │  log)  │ │
//!                     │       │                         └───┬────┘ │
//!   Client Response   │       ▼                             │      │
//!   ◀─────────────────┼── JSON ack / logs ◀── stats ◀───────┘      │
//!                     │                                             │
//!                     │  ┌───────────────────────────────────────┐ │
//!                     │  │        Cross-Cutting Concerns          │ │
//!                     │  │   config │ observability │ tracing     │ │
//!                     │  └───────────────────────────────────────┘ │
//!                     └────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod classifier;
pub mod http;
pub mod stats;
pub mod store;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::TrackerConfig;
pub use http::HttpServer;
pub use store::LogStore;
