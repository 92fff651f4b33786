//! Single-upstream HTTP relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                UPSTREAM RELAY                 │
//!                     │                                               │
//!  Client Request     │  ┌─────────┐    ┌───────────┐                │
//!  ───────────────────┼─▶│  http   │───▶│ forwarder │────────────────┼──▶ Upstream
//!                     │  │ server  │    │           │                │    Origin
//!  Client Response    │  └─────────┘    └───────────┘                │
//!  ◀──────────────────┼── status + filtered headers + body ◀─────────┼──── Response
//!                     │                                               │
//!                     │  ┌─────────────────────────────────────────┐ │
//!                     │  │          Cross-Cutting Concerns          │ │
//!                     │  │  ┌────────┐ ┌─────────────┐ ┌─────────┐ │ │
//!                     │  │  │ config │ │observability│ │lifecycle│ │ │
//!                     │  │  └────────┘ └─────────────┘ └─────────┘ │ │
//!                     │  └─────────────────────────────────────────┘ │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Every inbound request is forwarded to one configured origin with its
//! `host` header overridden; the response is relayed back verbatim apart
//! from hop-by-hop headers. Redirects are never followed. An unreachable
//! upstream yields a synthesized 502 reply, a deadline overrun a 504.

// Core subsystems
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
