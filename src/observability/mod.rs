//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay handler produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
