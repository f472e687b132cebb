//! Typed async client for the [Bento](https://bentonow.com) marketing automation API.
//!
//! ```no_run
//! use bento_client::{BentoClient, ClientConfig, Context};
//!
//! # async fn run() -> bento_client::Result<()> {
//! let client = BentoClient::new(ClientConfig::from_env()?)?;
//! let subscriber = client.find_subscriber(&Context::background(), "ada@example.com").await?;
//! println!("{}", subscriber.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod domain;
pub mod id;

pub use client::{
    ApiErrorKind, BentoClient, BentoError, ClientConfig, Context, HttpRequest, HttpResponse,
    KeyLengthPolicy, ReqwestTransport, Result, Transport, MAX_EMAILS_PER_BATCH,
};
