// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaBar` Core
//!
//! Core types and models shared by every `QuotaBar` crate.
//!
//! ## Key Types
//!
//! ### Providers
//! - [`ProviderId`] - The fixed set of quota providers, declared in priority order
//! - [`MetricShape`] - Which payload family a provider reports
//!
//! ### Fetch Results
//! - [`RawProviderResult`] - One provider's entry in the fetcher output
//! - [`RawResults`] - The whole fetcher output, keyed by provider
//!
//! ### Metrics & Aggregation
//! - [`NormalizedMetric`] - Usage numbers plus tooltip lines for one provider
//! - [`MetricOutcome`] - A metric, or the reason a provider is unavailable
//! - [`ColorTier`] - Normal / warning / critical severity
//! - [`AggregateSnapshot`] - Everything one refresh cycle produced
//!
//! ### Configuration
//! - [`RefreshConfig`] - Immutable per-cycle configuration snapshot
//! - [`DisplayMode`] - One combined indicator or one per provider

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Providers
    MetricShape,
    ProviderId,
    // Raw fetch results
    RawProviderResult,
    RawResults,
    // Metrics
    MetricOutcome,
    NormalizedMetric,
    Unavailable,
    format_percent,
    format_usd,
    // Tiers
    ColorTier,
    // Aggregation
    AggregateSnapshot,
    PeakReading,
    SnapshotStatus,
    // Configuration
    DisplayMode,
    MIN_REFRESH_INTERVAL_SECS,
    RefreshConfig,
};
