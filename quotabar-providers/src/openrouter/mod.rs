//! `OpenRouter` provider implementation.
//!
//! `OpenRouter` only reports a credit balance, so it never drives a color tier.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::openrouter_descriptor;
pub use parser::OpenRouterPayload;
