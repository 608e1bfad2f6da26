//! Atomic delivery-versus-payment settlement.
//!
//! Both legs go into one transaction signed only by the orchestrator, which moves each side's
//! funds under the delegation that side granted earlier. Neither party has to be online at
//! settlement time, and the ledger commits both transfers or neither.

use chrono::{
    DateTime,
    Utc,
};
use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::signature::Signature;

use crate::{
    context::token::TokenContext,
    error::SettlementResult,
    ledger::Ledger,
    orchestrator::Orchestrator,
};

#[derive(Clone, Debug)]
pub struct DvpRequest {
    /// The bond being delivered.
    pub asset: TokenContext,
    /// The settlement currency paid for it.
    pub currency: TokenContext,
    /// Whole units of the bond moving from issuer to investor.
    pub asset_quantity: u64,
    /// Whole units of the currency moving from investor to issuer.
    pub currency_quantity: u64,
    pub issuer: Address,
    pub investor: Address,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DvpReceipt {
    pub signature: Signature,
    pub bond_amount: u64,
    pub usdc_amount: u64,
    pub timestamp: DateTime<Utc>,
    /// Always `true` on a returned receipt: the transaction committed, so both legs did.
    pub bonds_sent: bool,
    /// Always `true` on a returned receipt, for the same reason as `bonds_sent`.
    pub usdc_received: bool,
}

impl DvpRequest {
    /// The two legs, in order: bond issuer → investor, then currency investor → issuer.
    /// Both are authorized by `delegate` rather than by the account owners.
    pub fn settlement_instructions(
        &self,
        delegate: &Address,
    ) -> SettlementResult<[Instruction; 2]> {
        let asset_amount = self.asset.to_base_units(self.asset_quantity)?;
        let currency_amount = self.currency.to_base_units(self.currency_quantity)?;

        Ok([
            self.asset
                .transfer_between(&self.issuer, &self.investor, delegate, asset_amount)?,
            self.currency
                .transfer_between(&self.investor, &self.issuer, delegate, currency_amount)?,
        ])
    }
}

impl<L: Ledger> Orchestrator<L> {
    /// Settles both legs of `request` atomically.
    ///
    /// Any invalid leg (exceeded delegation, frozen account, short balance) fails the whole
    /// transaction and neither leg commits.
    pub async fn execute_dvp(&self, request: &DvpRequest) -> SettlementResult<DvpReceipt> {
        let instructions = request.settlement_instructions(&self.address())?;
        let signature = self.send_as_orchestrator(&instructions).await?;

        let receipt = DvpReceipt {
            signature,
            bond_amount: request.asset_quantity,
            usdc_amount: request.currency_quantity,
            timestamp: Utc::now(),
            bonds_sent: true,
            usdc_received: true,
        };
        self.log(
            "Settled",
            format!(
                "{} bonds for {} currency units: {signature}",
                receipt.bond_amount, receipt.usdc_amount
            ),
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::signature::{
        Keypair,
        Signer,
    };

    use super::*;
    use crate::program_ids::SPL_TOKEN_2022_ID;

    fn request() -> DvpRequest {
        DvpRequest {
            asset: TokenContext::new(None, Keypair::new().pubkey(), SPL_TOKEN_2022_ID, 0),
            currency: TokenContext::new(None, Keypair::new().pubkey(), SPL_TOKEN_2022_ID, 6),
            asset_quantity: 100,
            currency_quantity: 95_000,
            issuer: Keypair::new().pubkey(),
            investor: Keypair::new().pubkey(),
        }
    }

    #[test]
    fn legs_move_in_opposite_directions() {
        let request = request();
        let delegate = Keypair::new().pubkey();
        let [bond_leg, cash_leg] = request.settlement_instructions(&delegate).unwrap();

        // transfer_checked accounts: source, mint, destination, authority.
        let keys = |ix: &Instruction| ix.accounts.iter().map(|m| m.pubkey).collect::<Vec<_>>();
        assert_eq!(
            keys(&bond_leg),
            vec![
                request.asset.get_holding_account_for(&request.issuer),
                request.asset.mint_address,
                request.asset.get_holding_account_for(&request.investor),
                delegate,
            ]
        );
        assert_eq!(
            keys(&cash_leg),
            vec![
                request.currency.get_holding_account_for(&request.investor),
                request.currency.mint_address,
                request.currency.get_holding_account_for(&request.issuer),
                delegate,
            ]
        );
    }

    #[test]
    fn only_the_delegate_signs() {
        let request = request();
        let delegate = Keypair::new().pubkey();
        for leg in request.settlement_instructions(&delegate).unwrap() {
            let signers: Vec<_> = leg
                .accounts
                .iter()
                .filter(|m| m.is_signer)
                .map(|m| m.pubkey)
                .collect();
            assert_eq!(signers, vec![delegate]);
        }
    }

    #[test]
    fn quantities_are_scaled_per_mint() {
        let request = request();
        let [bond_leg, cash_leg] = request
            .settlement_instructions(&Keypair::new().pubkey())
            .unwrap();

        // TransferChecked data: tag (1 byte), amount (u64 LE), decimals (1 byte).
        let amount = |ix: &Instruction| u64::from_le_bytes(ix.data[1..9].try_into().unwrap());
        assert_eq!(amount(&bond_leg), 100);
        assert_eq!(amount(&cash_leg), 95_000_000_000);
        assert_eq!(bond_leg.data[9], 0);
        assert_eq!(cash_leg.data[9], 6);
    }
}
