use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};
use spl_token_2022_interface::instruction::{
    approve,
    revoke,
};

use crate::{
    amount::to_base_units,
    error::SettlementResult,
    ledger::Ledger,
    orchestrator::Orchestrator,
};

impl<L: Ledger> Orchestrator<L> {
    /// Approves the orchestrator to move up to `quantity` whole units out of `holding_account`.
    ///
    /// Custody stays with `owner`. A new approval replaces the previous ceiling rather than adding
    /// to it, and nothing is read before writing.
    pub async fn delegate_authority(
        &self,
        owner: &Keypair,
        holding_account: &Address,
        quantity: u64,
        decimals: u8,
        token_program: &Address,
    ) -> SettlementResult<Signature> {
        let amount = to_base_units(quantity, decimals)?;
        let approve = approve(
            token_program,
            holding_account,
            &self.address(),
            &owner.pubkey(),
            &[],
            amount,
        )?;
        let signature = self
            .ledger()
            .send_transaction(owner, &[], &[approve])
            .await?;
        self.log(
            "Delegated",
            format!("{amount} base units of {holding_account} to {}", self.address()),
        );
        Ok(signature)
    }

    /// Clears whatever delegation `holding_account` has.
    pub async fn revoke_delegation(
        &self,
        owner: &Keypair,
        holding_account: &Address,
        token_program: &Address,
    ) -> SettlementResult<Signature> {
        let revoke = revoke(token_program, holding_account, &owner.pubkey(), &[])?;
        self.ledger()
            .send_transaction(owner, &[], &[revoke])
            .await
    }
}
