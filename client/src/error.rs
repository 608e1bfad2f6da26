//! Error types surfaced by the settlement orchestrator.

use solana_address::Address;
use solana_program_error::ProgramError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SettlementError {
    /// The ledger rejected or failed to confirm a submitted transaction, or the transaction
    /// couldn't be signed with the keypairs supplied.
    #[error("Failed transaction submission: {0}")]
    Submission(#[source] BoxError),

    /// A read-only ledger call failed.
    #[error("Ledger query failed: {0}")]
    Query(#[source] BoxError),

    #[error("Account {0} doesn't exist")]
    AccountNotFound(Address),

    #[error("Account {address} doesn't hold valid token program data")]
    InvalidAccountData {
        address: Address,
        #[source]
        source: ProgramError,
    },

    /// A token program instruction builder refused its arguments.
    #[error("Couldn't build instruction: {0}")]
    InvalidInstruction(#[from] ProgramError),

    #[error("Invalid bond configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("{quantity} scaled by 10^{decimals} overflows a u64")]
    AmountOverflow { quantity: u64, decimals: u8 },
}

impl SettlementError {
    pub fn submission(error: impl Into<BoxError>) -> Self {
        Self::Submission(error.into())
    }

    pub fn query(error: impl Into<BoxError>) -> Self {
        Self::Query(error.into())
    }
}

pub type SettlementResult<T> = Result<T, SettlementError>;
