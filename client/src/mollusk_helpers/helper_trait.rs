use solana_address::Address;
use spl_associated_token_account_interface::address::get_associated_token_address_with_program_id;
use spl_token_2022_interface::{
    extension::StateWithExtensions,
    state::{
        Account as TokenAccount,
        AccountState,
    },
};

use crate::mollusk_helpers::MolluskLedger;

/// Synchronous account inspection for tests, reading straight from the mollusk account store.
pub trait SettlementTestHelper {
    fn token_account(&self, owner: &Address, mint: &Address, token_program: &Address)
        -> TokenAccount;

    fn get_token_balance(&self, owner: &Address, mint: &Address, token_program: &Address) -> u64 {
        self.token_account(owner, mint, token_program).amount
    }

    fn is_frozen(&self, owner: &Address, mint: &Address, token_program: &Address) -> bool {
        self.token_account(owner, mint, token_program).state == AccountState::Frozen
    }
}

impl SettlementTestHelper for MolluskLedger {
    fn token_account(
        &self,
        owner: &Address,
        mint: &Address,
        token_program: &Address,
    ) -> TokenAccount {
        let ata = get_associated_token_address_with_program_id(owner, mint, token_program);

        let acc = self.account(&ata).unwrap_or_else(|| {
            panic!("Holding account doesn't exist, owner: {owner}, token account: {ata}")
        });

        StateWithExtensions::<TokenAccount>::unpack(&acc.data)
            .map(|state| state.base)
            .expect("Should unpack token account")
    }
}
