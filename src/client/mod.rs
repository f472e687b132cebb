//! Bento client modules
//!
//! `api` owns configuration, authentication and the shared request
//! primitive; each resource family adds its operations to [`BentoClient`]
//! from its own module.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod transport;
pub mod validation;

mod broadcasts;
mod commands;
mod emails;
mod events;
mod experimental;
mod fields;
mod stats;
mod subscribers;
mod tags;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use api::BentoClient;
pub use config::{ClientConfig, KeyLengthPolicy};
pub use context::Context;
pub use emails::MAX_EMAILS_PER_BATCH;
pub use error::{ApiErrorKind, BentoError};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub type Result<T> = std::result::Result<T, BentoError>;
