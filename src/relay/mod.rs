//! Image relay: the single proxied endpoint.
//!
//! # Data Flow
//! ```text
//! POST { promptText, image { data, mimeType }, model }
//!     → handler.rs (credential + method checks)
//!     → types.rs (presence checks, model resolution)
//!     → upstream client
//!     → 200 { base64Data } | { error, details? }
//! ```

pub mod handler;
pub mod types;

pub use handler::generate_image;
pub use types::{GenerateRequest, GenerateResponse, ImageInput, ValidatedRequest};
