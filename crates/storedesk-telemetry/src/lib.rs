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
//! Logging setup shared by Storedesk binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init_logging`]
//! once at startup to decide where those events go.

mod init;

pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, command_span, init_logging,
};
