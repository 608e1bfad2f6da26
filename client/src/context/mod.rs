//! Client-side views of the mints the orchestrator works with.

pub mod bond;
pub mod token;
