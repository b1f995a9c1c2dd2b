// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaBar` Providers
//!
//! Provider-specific payload parsing and the provider aggregator.
//!
//! Each provider module includes:
//!
//! - **Descriptor**: Static metadata (labels, aliases, description)
//! - **Parser**: Lenient payload decoding into a [`NormalizedMetric`]
//!
//! ## Supported Providers
//!
//! | Provider | Payload | Primary | Secondary |
//! |----------|---------|---------|-----------|
//! | Claude | `five_hour` / `seven_day` windows | 5h | 7d |
//! | Codex | `primary_window` / `secondary_window` | 5h | 7d |
//! | Gemini | `models` map | max across models | - |
//! | Z.AI | `token_quota.percentage` | token quota | - |
//! | `OpenRouter` | `balance_usd` | balance only | - |
//!
//! ## Usage
//!
//! ```ignore
//! use quotabar_core::{ProviderId, RawResults};
//! use quotabar_providers::aggregate;
//!
//! let snapshot = aggregate(&[ProviderId::Claude, ProviderId::Gemini], &results);
//! if let Some(peak) = snapshot.combined_peak() {
//!     println!("{}: {:?}", peak.provider, peak.tier);
//! }
//! ```
//!
//! [`NormalizedMetric`]: quotabar_core::NormalizedMetric

pub mod aggregator;
pub mod descriptor;
pub mod parser;
pub mod payload;
pub mod percent;
pub mod registry;
pub mod window;

mod de;

// Provider modules (priority order)
pub mod claude;
pub mod codex;
pub mod gemini;
pub mod zai;
pub mod openrouter;

// Re-export key types
pub use aggregator::{aggregate, aggregate_at};
pub use descriptor::ProviderDescriptor;
pub use parser::{parse, parse_at};
pub use payload::ProviderPayload;
pub use percent::parse_percent;
pub use registry::ProviderRegistry;
pub use window::{UsageWindow, format_countdown};

// Re-export provider descriptors
pub use claude::claude_descriptor;
pub use codex::codex_descriptor;
pub use gemini::gemini_descriptor;
pub use openrouter::openrouter_descriptor;
pub use zai::zai_descriptor;
