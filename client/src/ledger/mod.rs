//! The ledger boundary: rent queries, account reads, and transaction submission.
//!
//! Every state change the orchestrator makes goes through [`Ledger::send_transaction`]. All the
//! instructions passed in one call land in one transaction, so they commit together or not at
//! all.

use solana_account::Account;
use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};

use crate::error::SettlementResult;

pub mod rpc;

pub use rpc::{
    RpcLedger,
    SendTransactionConfig,
};

#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// The minimum lamport balance that keeps an account of `data_len` bytes alive indefinitely.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> SettlementResult<u64>;

    /// Fetches an account, returning `None` if it doesn't exist.
    async fn get_account(&self, address: &Address) -> SettlementResult<Option<Account>>;

    /// Signs `instructions` as one transaction paid for by `payer` and submits it.
    ///
    /// `signers` must contain every other keypair whose signature the instructions require, and
    /// no keypair the instructions don't reference.
    async fn send_transaction(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> SettlementResult<Signature>;
}

/// Filters `candidates` down to the keypairs that `instructions` actually require as signers,
/// dropping duplicates and the `payer`.
pub fn required_signers<'a>(
    payer: &Keypair,
    candidates: &[&'a Keypair],
    instructions: &[Instruction],
) -> Vec<&'a Keypair> {
    let is_required = |address: &Address| {
        instructions
            .iter()
            .flat_map(|ix| ix.accounts.iter())
            .any(|meta| meta.is_signer && &meta.pubkey == address)
    };

    let mut signers: Vec<&'a Keypair> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let address = candidate.pubkey();
        if address == payer.pubkey()
            || !is_required(&address)
            || signers.iter().any(|s| s.pubkey() == address)
        {
            continue;
        }
        signers.push(candidate);
    }
    signers
}
