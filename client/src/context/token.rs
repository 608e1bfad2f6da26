//! Token-level context containing mint metadata and helpers for deriving holding accounts and
//! building token instructions.

use solana_address::Address;
use solana_instruction::Instruction;
use spl_associated_token_account_interface::{
    address::get_associated_token_address_with_program_id,
    instruction::create_associated_token_account,
};
use spl_token_2022_interface::{
    check_spl_token_program_account,
    extension::StateWithExtensions,
    instruction::{
        freeze_account,
        mint_to_checked,
        thaw_account,
        transfer_checked,
    },
    state::Mint,
};

use crate::{
    amount::to_base_units,
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::Ledger,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenContext {
    pub mint_authority: Option<Address>,
    pub mint_address: Address,
    pub token_program: Address,
    pub mint_decimals: u8,
}

impl TokenContext {
    pub const fn new(
        mint_authority: Option<Address>,
        mint_address: Address,
        token_program: Address,
        mint_decimals: u8,
    ) -> Self {
        Self {
            mint_authority,
            mint_address,
            token_program,
            mint_decimals,
        }
    }

    /// Creates a [`TokenContext`] from an on-chain mint account's owner and data.
    ///
    /// Validates that the owner is a recognized SPL token program and unpacks the mint, including
    /// any Token-2022 extensions, to extract the decimals and mint authority.
    pub fn from_account_data(
        mint_address: Address,
        owner: Address,
        data: &[u8],
    ) -> SettlementResult<Self> {
        let invalid = |source| SettlementError::InvalidAccountData {
            address: mint_address,
            source,
        };
        check_spl_token_program_account(&owner).map_err(invalid)?;
        let mint = StateWithExtensions::<Mint>::unpack(data).map_err(invalid)?;
        Ok(Self::new(
            mint.base.mint_authority.into(),
            mint_address,
            owner,
            mint.base.decimals,
        ))
    }

    /// Fetches the mint at `mint_address` and builds its context.
    pub async fn load(ledger: &impl Ledger, mint_address: Address) -> SettlementResult<Self> {
        let account = ledger
            .get_account(&mint_address)
            .await?
            .ok_or(SettlementError::AccountNotFound(mint_address))?;
        Self::from_account_data(mint_address, account.owner, &account.data)
    }

    /// The canonical holding account for `owner`. A pure derivation, no lookup.
    pub fn get_holding_account_for(&self, owner: &Address) -> Address {
        get_associated_token_address_with_program_id(owner, &self.mint_address, &self.token_program)
    }

    pub fn to_base_units(&self, quantity: u64) -> SettlementResult<u64> {
        to_base_units(quantity, self.mint_decimals)
    }

    /// Builds a create-holding-account instruction for the given `owner`, funded by `funder`.
    pub fn create_holding_account(&self, funder: &Address, owner: &Address) -> Instruction {
        create_associated_token_account(funder, owner, &self.mint_address, &self.token_program)
    }

    /// Builds a `mint_to_checked` instruction that mints `amount` base units to the `owner`'s
    /// holding account.
    pub fn mint_to_owner(&self, owner: &Address, amount: u64) -> SettlementResult<Instruction> {
        let Some(ref mint_authority) = self.mint_authority else {
            return Err(SettlementError::InvalidConfig(
                "Token doesn't have a mint authority",
            ));
        };
        Ok(mint_to_checked(
            &self.token_program,
            &self.mint_address,
            &self.get_holding_account_for(owner),
            mint_authority,
            &[],
            amount,
            self.mint_decimals,
        )?)
    }

    pub fn freeze(
        &self,
        holding_account: &Address,
        freeze_authority: &Address,
    ) -> SettlementResult<Instruction> {
        Ok(freeze_account(
            &self.token_program,
            holding_account,
            &self.mint_address,
            freeze_authority,
            &[],
        )?)
    }

    pub fn thaw(
        &self,
        holding_account: &Address,
        freeze_authority: &Address,
    ) -> SettlementResult<Instruction> {
        Ok(thaw_account(
            &self.token_program,
            holding_account,
            &self.mint_address,
            freeze_authority,
            &[],
        )?)
    }

    /// Builds a `transfer_checked` of `amount` base units between the canonical holding accounts
    /// of `from` and `to`. `authority` is either `from` itself or its approved delegate.
    pub fn transfer_between(
        &self,
        from: &Address,
        to: &Address,
        authority: &Address,
        amount: u64,
    ) -> SettlementResult<Instruction> {
        Ok(transfer_checked(
            &self.token_program,
            &self.get_holding_account_for(from),
            &self.mint_address,
            &self.get_holding_account_for(to),
            authority,
            &[],
            amount,
            self.mint_decimals,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::signature::{
        Keypair,
        Signer,
    };

    use super::*;
    use crate::program_ids::{
        SPL_TOKEN_2022_ID,
        SPL_TOKEN_ID,
    };

    #[test]
    fn holding_account_derivation_depends_on_program() {
        let owner = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let classic = TokenContext::new(None, mint, SPL_TOKEN_ID, 6);
        let extended = TokenContext::new(None, mint, SPL_TOKEN_2022_ID, 6);

        assert_eq!(
            extended.get_holding_account_for(&owner),
            get_associated_token_address_with_program_id(&owner, &mint, &SPL_TOKEN_2022_ID)
        );
        assert_ne!(
            classic.get_holding_account_for(&owner),
            extended.get_holding_account_for(&owner)
        );
    }

    #[test]
    fn minting_requires_a_mint_authority() {
        let token = TokenContext::new(None, Keypair::new().pubkey(), SPL_TOKEN_2022_ID, 0);
        assert!(matches!(
            token.mint_to_owner(&Keypair::new().pubkey(), 1),
            Err(SettlementError::InvalidConfig(_))
        ));
    }
}
