//! The settlement orchestrator: the identity that gates holding accounts, owns bond metadata
//! updates, and moves funds under delegated authority.
//!
//! The operations themselves live next to their concern: [`crate::issuance`], [`crate::gating`],
//! [`crate::delegation`], [`crate::settlement`] and [`crate::accounts`].

use std::fmt::Display;

use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};

use crate::{
    error::SettlementResult,
    ledger::Ledger,
    logs::{
        log_info,
        log_warning,
    },
};

pub struct Orchestrator<L> {
    ledger: L,
    authority: Keypair,
    debug_logs: bool,
}

impl<L: Ledger> Orchestrator<L> {
    pub fn new(ledger: L, authority: Keypair) -> Self {
        Self {
            ledger,
            authority,
            debug_logs: false,
        }
    }

    pub fn with_debug_logs(mut self, debug_logs: bool) -> Self {
        self.debug_logs = debug_logs;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn authority(&self) -> &Keypair {
        &self.authority
    }

    /// The orchestrator's address: gating authority, metadata update authority, and delegate.
    pub fn address(&self) -> Address {
        self.authority.pubkey()
    }

    /// Submits `instructions` as one transaction paid for and signed by the orchestrator alone.
    pub(crate) async fn send_as_orchestrator(
        &self,
        instructions: &[Instruction],
    ) -> SettlementResult<Signature> {
        self.ledger
            .send_transaction(&self.authority, &[], instructions)
            .await
    }

    pub(crate) fn log(&self, label: impl Display, msg: impl Display) {
        if self.debug_logs {
            log_info(label, msg);
        }
    }

    pub(crate) fn warn(&self, label: impl Display, msg: impl Display) {
        if self.debug_logs {
            log_warning(label, msg);
        }
    }
}
