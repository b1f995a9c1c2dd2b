// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaBar` Fetch
//!
//! The quota fetcher contract and its subprocess-backed implementation.
//!
//! The fetcher is an external process: given the enabled providers, a cache
//! flag and optional credentials, it prints a JSON document keyed by provider
//! id. This crate only invokes it and decodes the top-level shape; payload
//! interpretation lives in `quotabar-providers`.
//!
//! ## Host APIs
//!
//! - [`host::process`] - Subprocess execution with timeouts
//!
//! ## Fetching
//!
//! - [`fetcher::QuotaFetcher`] - Trait for anything that produces [`RawResults`]
//! - [`fetcher::ScriptFetcher`] - Runs the quota script
//! - [`request::FetchRequest`] - What to ask the fetcher for
//! - [`response::decode_response`] - Top-level JSON decoding
//!
//! ## Example
//!
//! ```ignore
//! use quotabar_core::ProviderId;
//! use quotabar_fetch::{FetchRequest, QuotaFetcher, ScriptFetcher};
//!
//! let fetcher = ScriptFetcher::new("python3", "/path/to/cclimits.py");
//! let request = FetchRequest::new([ProviderId::Claude, ProviderId::Codex]).use_cache(true);
//! let output = fetcher.fetch(&request).await?;
//! ```
//!
//! [`RawResults`]: quotabar_core::RawResults

pub mod error;
pub mod fetcher;
pub mod host;
pub mod request;
pub mod response;

// Errors
pub use error::{FetchError, ProcessError};

// Host APIs
pub use host::process::{ProcessOutput, ProcessRunner};

// Fetching
pub use fetcher::{FetchOutput, QuotaFetcher, ScriptFetcher};
pub use request::{FetchRequest, credential_env};
pub use response::decode_response;
