//! An in-process [`Ledger`] on top of [`MolluskContext`], with the Token-2022 and associated token
//! programs loaded. Used to exercise the orchestrator without a validator.

use std::{
    cell::Cell,
    collections::HashMap,
};

use mollusk_svm::{
    Mollusk,
    MolluskContext,
};
use solana_account::Account;
use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::{
    hash::Hash,
    message::Message,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};

use crate::{
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::Ledger,
};

pub mod helper_trait;
pub mod settlement_fixture;
pub mod utils;

pub struct MolluskLedger {
    pub context: MolluskContext<HashMap<Address, Account>>,
    submitted: Cell<usize>,
}

impl MolluskLedger {
    /// Creates a ledger with the system, Token-2022, SPL token and associated token programs, plus
    /// every account passed in.
    pub fn new(accounts: Vec<(Address, Account)>) -> Self {
        let mut mollusk = Mollusk::default();
        // The bundled Token-2022 build can't grow a mint for its metadata under these two.
        for feature in [
            agave_feature_set::stricter_abi_and_runtime_constraints::id(),
            agave_feature_set::account_data_direct_mapping::id(),
        ] {
            mollusk.feature_set.deactivate(&feature);
        }
        mollusk_svm_programs_token::token::add_program(&mut mollusk);
        mollusk_svm_programs_token::token2022::add_program(&mut mollusk);
        mollusk_svm_programs_token::associated_token::add_program(&mut mollusk);

        let context = mollusk.with_context(HashMap::new());

        let programs = [
            mollusk_svm::program::keyed_account_for_system_program(),
            mollusk_svm_programs_token::token::keyed_account(),
            mollusk_svm_programs_token::token2022::keyed_account(),
            mollusk_svm_programs_token::associated_token::keyed_account(),
        ];
        for (address, account) in programs.into_iter().chain(accounts) {
            context.account_store.borrow_mut().insert(address, account);
        }

        Self {
            context,
            submitted: Cell::new(0),
        }
    }

    /// The number of transactions that have committed on this ledger.
    pub fn transaction_count(&self) -> usize {
        self.submitted.get()
    }

    pub fn account(&self, address: &Address) -> Option<Account> {
        self.context.account_store.borrow().get(address).cloned()
    }
}

impl Ledger for MolluskLedger {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> SettlementResult<u64> {
        Ok(self.context.mollusk.sysvars.rent.minimum_balance(data_len))
    }

    async fn get_account(&self, address: &Address) -> SettlementResult<Option<Account>> {
        // Mollusk leaves drained accounts in the store with zero lamports.
        Ok(self.account(address).filter(|account| account.lamports != 0))
    }

    async fn send_transaction(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> SettlementResult<Signature> {
        // Signing checks the keypairs against the message's required signers, the same way a
        // cluster would reject a transaction with missing or extraneous signatures.
        let mut tx = Transaction::new_unsigned(Message::new(instructions, Some(&payer.pubkey())));
        tx.try_sign(
            &[std::iter::once(payer)
                .chain(signers.iter().cloned())
                .collect::<Vec<_>>()]
            .concat(),
            Hash::default(),
        )
        .map_err(SettlementError::submission)?;

        let snapshot = self.context.account_store.borrow().clone();
        let result = self.context.process_instruction_chain(instructions);

        if result.program_result.is_ok() {
            self.submitted.set(self.submitted.get() + 1);
            Ok(tx.signatures[0])
        } else {
            // A failed transaction commits nothing, including the effects of the instructions
            // that ran before the failing one.
            *self.context.account_store.borrow_mut() = snapshot;
            Err(SettlementError::submission(format!(
                "{:?}",
                result.program_result
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_resizing_features_are_off() {
        let ledger = MolluskLedger::new(vec![]);
        let features = &ledger.context.mollusk.feature_set;
        assert!(!features.is_active(
            &agave_feature_set::stricter_abi_and_runtime_constraints::id()
        ));
        assert!(!features.is_active(
            &agave_feature_set::account_data_direct_mapping::id()
        ));
    }
}
