//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → forward.rs (build outbound request, send, relay reply)
//!     → response.rs (synthesized error replies on failure)
//!     → Send to client
//! ```

pub mod forward;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarder};
pub use server::HttpServer;
