//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler and upstream client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID is attached to every relay log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
