//! Z.AI provider implementation.
//!
//! Z.AI reports a single numeric share of its token quota.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::zai_descriptor;
pub use parser::ZaiPayload;
