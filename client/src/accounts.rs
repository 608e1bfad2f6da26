//! Read-only views of holding accounts and bond mints.

use solana_account::Account;
use solana_address::Address;
use spl_token_2022_interface::{
    extension::{
        default_account_state::DefaultAccountState,
        BaseStateWithExtensions,
        StateWithExtensions,
    },
    state::{
        Account as TokenAccount,
        AccountState,
        Mint,
    },
};
use spl_token_metadata_interface::state::TokenMetadata;

use crate::{
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::Ledger,
    orchestrator::Orchestrator,
    program_ids::SPL_TOKEN_2022_ID,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoldingAccountInfo {
    pub address: Address,
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
    pub is_frozen: bool,
    pub delegate: Option<Address>,
    pub delegated_amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BondInfo {
    pub address: Address,
    pub decimals: u8,
    pub supply: u64,
    pub mint_authority: Option<Address>,
    pub freeze_authority: Option<Address>,
    pub update_authority: Option<Address>,
    /// Whether new holding accounts start frozen.
    pub default_frozen: bool,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub additional_metadata: Vec<(String, String)>,
}

impl BondInfo {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.additional_metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<L: Ledger> Orchestrator<L> {
    async fn fetch_owned_by(
        &self,
        address: &Address,
        token_program: &Address,
    ) -> SettlementResult<Account> {
        let account = self
            .ledger()
            .get_account(address)
            .await?
            .ok_or(SettlementError::AccountNotFound(*address))?;
        if &account.owner != token_program {
            return Err(SettlementError::InvalidAccountData {
                address: *address,
                source: solana_program_error::ProgramError::IncorrectProgramId,
            });
        }
        Ok(account)
    }

    pub async fn get_account_info(
        &self,
        holding_account: &Address,
        token_program: &Address,
    ) -> SettlementResult<HoldingAccountInfo> {
        let account = self.fetch_owned_by(holding_account, token_program).await?;
        let state = StateWithExtensions::<TokenAccount>::unpack(&account.data).map_err(|source| {
            SettlementError::InvalidAccountData {
                address: *holding_account,
                source,
            }
        })?;

        Ok(HoldingAccountInfo {
            address: *holding_account,
            mint: state.base.mint,
            owner: state.base.owner,
            amount: state.base.amount,
            is_frozen: state.base.state == AccountState::Frozen,
            delegate: state.base.delegate.into(),
            delegated_amount: state.base.delegated_amount,
        })
    }

    /// Reads a bond mint with its default account state and token metadata extensions.
    pub async fn get_bond_info(&self, asset: &Address) -> SettlementResult<BondInfo> {
        let account = self.fetch_owned_by(asset, &SPL_TOKEN_2022_ID).await?;
        let invalid = |source| SettlementError::InvalidAccountData {
            address: *asset,
            source,
        };

        let state = StateWithExtensions::<Mint>::unpack(&account.data).map_err(invalid)?;
        let default_state = state
            .get_extension::<DefaultAccountState>()
            .map_err(invalid)?;
        let metadata = state
            .get_variable_len_extension::<TokenMetadata>()
            .map_err(invalid)?;

        Ok(BondInfo {
            address: *asset,
            decimals: state.base.decimals,
            supply: state.base.supply,
            mint_authority: state.base.mint_authority.into(),
            freeze_authority: state.base.freeze_authority.into(),
            update_authority: metadata.update_authority.into(),
            default_frozen: default_state.state == AccountState::Frozen as u8,
            name: metadata.name,
            symbol: metadata.symbol,
            uri: metadata.uri,
            additional_metadata: metadata.additional_metadata,
        })
    }
}
