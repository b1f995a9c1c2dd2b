//! Gemini provider implementation.
//!
//! Gemini reports usage per model; the indicator shows the busiest one.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::gemini_descriptor;
pub use parser::GeminiPayload;
