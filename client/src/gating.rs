//! Participant gating: holding accounts are thawed to whitelist a participant and frozen to
//! remove them, under the orchestrator's freeze authority.

use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};

use crate::{
    context::token::TokenContext,
    error::SettlementResult,
    ledger::Ledger,
    orchestrator::Orchestrator,
};

impl<L: Ledger> Orchestrator<L> {
    /// Ensures `participant` has a thawed holding account for `token` and returns its address.
    ///
    /// Idempotent: a missing account is created (funded by `payer`), a frozen one is thawed, and
    /// an already thawed one is left untouched without submitting anything.
    pub async fn whitelist(
        &self,
        token: &TokenContext,
        participant: &Address,
        payer: &Keypair,
    ) -> SettlementResult<Address> {
        let holding_account = token.get_holding_account_for(participant);

        if self.ledger().get_account(&holding_account).await?.is_none() {
            let create = token.create_holding_account(&payer.pubkey(), participant);
            self.ledger()
                .send_transaction(payer, &[], &[create])
                .await?;
            self.log("Holding account created", holding_account);
        }

        let info = self
            .get_account_info(&holding_account, &token.token_program)
            .await?;
        if info.is_frozen {
            let thaw = token.thaw(&holding_account, &self.address())?;
            self.send_as_orchestrator(&[thaw]).await?;
            self.log("Whitelisted", holding_account);
        } else {
            self.warn("Already whitelisted", holding_account);
        }

        Ok(holding_account)
    }

    /// Freezes `holding_account`. Not guarded: freezing an already frozen account is submitted
    /// anyway and the token program rejects it.
    pub async fn remove_from_whitelist(
        &self,
        token: &TokenContext,
        holding_account: &Address,
    ) -> SettlementResult<Signature> {
        let freeze = token.freeze(holding_account, &self.address())?;
        let signature = self.send_as_orchestrator(&[freeze]).await?;
        self.log("Removed from whitelist", holding_account);
        Ok(signature)
    }
}
