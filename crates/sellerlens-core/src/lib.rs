//! SellerLens Core
//!
//! Core types and error handling shared across SellerLens components.
//!
//! This crate provides:
//! - The review input record and its coarse star-style rating
//! - The normalized sentiment verdict and the per-review classification result
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationResult, Rating, Review, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, Rating, Review, Sentiment};
}
