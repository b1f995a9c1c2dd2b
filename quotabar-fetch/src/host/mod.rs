//! Host APIs for system interaction.
//!
//! - [`process`] - Subprocess execution

pub mod process;
