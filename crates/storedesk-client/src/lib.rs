#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
//! HTTP client adapter for the Storedesk admin API.
//!
//! Layout:
//! - `transport.rs`: the [`Transport`] contract controllers depend on
//! - `rest.rs`: `reqwest` implementation with bearer auth and error classification
//! - `token.rs`: session token sources
//! - `config.rs`: validated client configuration
//! - `error.rs`: the error taxonomy surfaced to controllers

pub mod config;
pub mod error;
pub mod rest;
pub mod token;
pub mod transport;

pub use config::{ClientConfig, ConfigError, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, ErrorKind};
pub use rest::RestClient;
pub use token::{EnvToken, StaticToken, TokenSource};
pub use transport::{Method, Transport};
