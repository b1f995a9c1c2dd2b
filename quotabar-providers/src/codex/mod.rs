//! Codex provider implementation.
//!
//! ChatGPT/Codex reports a primary and a secondary rate-limit window.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::codex_descriptor;
pub use parser::CodexPayload;
