use chrono::{
    TimeZone,
    Utc,
};
use rust_decimal::Decimal;
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::{
    context::{
        bond::BondTokenConfig,
        token::TokenContext,
    },
    error::SettlementResult,
    mollusk_helpers::{
        utils::funded_wallets,
        MolluskLedger,
    },
    orchestrator::Orchestrator,
};

pub const DEFAULT_CURRENCY_DECIMALS: u8 = 6;

/// A zero-decimal bond maturing at the end of 2030 with a 5.5% coupon.
pub fn default_bond_config() -> BondTokenConfig {
    BondTokenConfig {
        name: "Treasury Bond 2030".to_string(),
        symbol: "TB30".to_string(),
        decimals: 0,
        maturity_date: Utc
            .with_ymd_and_hms(2030, 12, 31, 0, 0, 0)
            .single()
            .expect("Should be a valid date"),
        coupon_rate: Decimal::new(55, 1),
        isin: Some("US912828XY99".to_string()),
        description: Some("https://example.com/tb30.json".to_string()),
        extra_fields: vec![],
    }
}

/// An orchestrator over a fresh [`MolluskLedger`] with a funded issuer, investor, and currency
/// authority.
pub struct SettlementFixture {
    pub orchestrator: Orchestrator<MolluskLedger>,
    pub issuer: Keypair,
    pub investor: Keypair,
    pub currency_authority: Keypair,
}

impl Default for SettlementFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementFixture {
    pub fn new() -> Self {
        let authority = Keypair::new();
        let issuer = Keypair::new();
        let investor = Keypair::new();
        let currency_authority = Keypair::new();

        let ledger = MolluskLedger::new(funded_wallets(&[
            authority.pubkey(),
            issuer.pubkey(),
            investor.pubkey(),
            currency_authority.pubkey(),
        ]));

        Self {
            orchestrator: Orchestrator::new(ledger, authority),
            issuer,
            investor,
            currency_authority,
        }
    }

    pub fn ledger(&self) -> &MolluskLedger {
        self.orchestrator.ledger()
    }

    /// Issues the default bond and a [`DEFAULT_CURRENCY_DECIMALS`] currency mint.
    pub async fn issue_bond_and_currency(&self) -> SettlementResult<(TokenContext, TokenContext)> {
        let bond_address = self
            .orchestrator
            .create_bond_token(&self.issuer, &default_bond_config())
            .await?;
        let bond = TokenContext::load(self.ledger(), bond_address).await?;
        let currency = self
            .orchestrator
            .create_currency_mint(&self.currency_authority, DEFAULT_CURRENCY_DECIMALS)
            .await?;
        Ok((bond, currency))
    }
}
