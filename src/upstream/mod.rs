//! Upstream generation API subsystem.
//!
//! # Data Flow
//! ```text
//! validated caller request
//!     → types.rs (reshape into generateContent payload)
//!     → client.rs (POST with server credential, classify reply)
//!     → UpstreamOutcome handed back to the relay handler
//! ```

pub mod client;
pub mod types;

pub use client::{UpstreamClient, UpstreamError, UpstreamOutcome};
pub use types::{GenerateContentRequest, InlineImage, NoImageSummary};
