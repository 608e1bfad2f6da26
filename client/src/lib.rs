//! Client for atomic delivery-versus-payment settlement of Token-2022 bond tokens.
//!
//! Composes token program instructions into bond issuance, participant gating, delegation and
//! two-leg settlement. Atomicity comes from submitting each workflow step as one transaction; the
//! client never compensates for partial failures because there are none to compensate for.

pub mod accounts;
pub mod amount;
pub mod context;
pub mod delegation;
pub mod error;
pub mod gating;
pub mod issuance;
pub mod ledger;
pub mod logs;
pub mod mollusk_helpers;
pub mod orchestrator;
pub mod program_ids;
pub mod settlement;
pub mod sizing;

pub use error::{
    SettlementError,
    SettlementResult,
};
pub use ledger::Ledger;
pub use logs::LogColor;
pub use orchestrator::Orchestrator;
