//! Claude provider implementation.
//!
//! Claude Code reports two rolling windows: a 5-hour session window and a
//! 7-day weekly window.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::claude_descriptor;
pub use parser::ClaudePayload;
