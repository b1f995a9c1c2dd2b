// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaBar` App
//!
//! The status-bar side of `QuotaBar`: a refresh scheduler that polls the
//! quota fetcher on a timer, a refresh cycle that aggregates the results,
//! and a render sink that holds the indicator state shown to the user.
//!
//! ## Flow
//!
//! ```text
//! RefreshScheduler --tick--> RefreshCycle --fetch--> QuotaFetcher
//!                                 |
//!                                 +--aggregate--> AggregateSnapshot
//!                                 |
//!                                 +--render--> RenderSink --watch--> UI
//! ```

pub mod command;
pub mod cycle;
pub mod refresh;
pub mod render;

#[cfg(test)]
mod testing;

pub use command::{CommandError, DaemonCommand};
pub use cycle::{ConfigSource, RefreshCycle};
pub use refresh::RefreshScheduler;
pub use render::{Indicator, IndicatorIcon, IndicatorSlot, RenderSink};
