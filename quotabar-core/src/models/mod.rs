//! Domain models for `QuotaBar`.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider identifiers and priority order
//! - [`raw`] - Raw fetcher results
//! - [`metric`] - Normalized per-provider metrics and number formatting
//! - [`tier`] - Color tier thresholds
//! - [`snapshot`] - Per-cycle aggregate snapshot
//! - [`config`] - Per-cycle refresh configuration

mod config;
mod metric;
mod provider;
mod raw;
mod snapshot;
mod tier;

pub use config::{DisplayMode, MIN_REFRESH_INTERVAL_SECS, RefreshConfig};
pub use metric::{MetricOutcome, NormalizedMetric, Unavailable, format_percent, format_usd};
pub use provider::{MetricShape, ProviderId};
pub use raw::{RawProviderResult, RawResults};
pub use snapshot::{AggregateSnapshot, PeakReading, SnapshotStatus};
pub use tier::ColorTier;
