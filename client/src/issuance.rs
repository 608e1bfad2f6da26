//! Bond issuance, plus the supply and currency helpers around it.

use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::signature::{
    Keypair,
    Signature,
    Signer,
};
use solana_system_interface::instruction::create_account;
use spl_token_2022_interface::{
    extension::{
        default_account_state::instruction::initialize_default_account_state,
        metadata_pointer,
    },
    instruction::{
        initialize_mint2,
        set_authority,
        AuthorityType,
    },
    state::AccountState,
};
use spl_token_metadata_interface::{
    instruction::{
        initialize as initialize_metadata,
        update_field,
    },
    state::Field,
};

use crate::{
    context::{
        bond::{
            BondAuthorities,
            BondTokenConfig,
        },
        token::TokenContext,
    },
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::{
        required_signers,
        Ledger,
    },
    orchestrator::Orchestrator,
    program_ids::SPL_TOKEN_2022_ID,
    sizing::{
        bond_metadata,
        mint_sizing,
        MintFootprint,
        BOND_MINT_EXTENSIONS,
    },
};

impl<L: Ledger> Orchestrator<L> {
    /// The authorities a bond issued by `issuer` is created with: the issuer mints, the
    /// orchestrator gates holding accounts and maintains the metadata.
    pub fn bond_authorities(&self, issuer: &Address) -> BondAuthorities {
        BondAuthorities {
            issuance: *issuer,
            gating: self.address(),
            metadata_update: self.address(),
        }
    }

    /// Creates a new bond mint under a freshly generated address and returns that address.
    pub async fn create_bond_token(
        &self,
        issuer: &Keypair,
        config: &BondTokenConfig,
    ) -> SettlementResult<Address> {
        self.create_bond_token_at(issuer, &Keypair::new(), config)
            .await
    }

    /// Creates a new bond mint at `mint`'s address.
    ///
    /// Everything happens in one transaction, so a rejected submission leaves no partial mint.
    pub async fn create_bond_token_at(
        &self,
        issuer: &Keypair,
        mint: &Keypair,
        config: &BondTokenConfig,
    ) -> SettlementResult<Address> {
        config.validate()?;

        let authorities = self.bond_authorities(&issuer.pubkey());
        let instructions = self
            .bond_creation_instructions(&issuer.pubkey(), &mint.pubkey(), config, &authorities)
            .await?;

        // The update authority only signs when there are fields to write.
        let signers = required_signers(issuer, &[mint, self.authority()], &instructions);
        let signature = self
            .ledger()
            .send_transaction(issuer, &signers, &instructions)
            .await?;

        self.log(
            "Bond created",
            format!("{} ({}) at {}: {signature}", config.name, config.symbol, mint.pubkey()),
        );
        Ok(mint.pubkey())
    }

    /// Builds the creation instructions in the order the token program requires:
    ///
    /// 1. Allocate the mint at its base size, funded for its final size.
    /// 2. Point the metadata pointer at the mint itself. This must precede mint initialization.
    /// 3. Make every new holding account start frozen.
    /// 4. Initialize the mint with the issuance and gating authorities.
    /// 5. Write name, symbol and URI.
    /// 6. Write each non-empty open attribute.
    pub async fn bond_creation_instructions(
        &self,
        payer: &Address,
        mint: &Address,
        config: &BondTokenConfig,
        authorities: &BondAuthorities,
    ) -> SettlementResult<Vec<Instruction>> {
        let token_program = SPL_TOKEN_2022_ID;
        let attributes = config.open_attributes();

        let metadata = bond_metadata(
            *mint,
            authorities.metadata_update,
            config.name.clone(),
            config.symbol.clone(),
            config.uri(),
            attributes.clone().into_inner(),
        )?;
        let sizing = mint_sizing(self.ledger(), &BOND_MINT_EXTENSIONS, Some(&metadata)).await?;

        let mut instructions = vec![
            create_account(
                payer,
                mint,
                sizing.total_reserved_lamports,
                sizing.base_length() as u64,
                &token_program,
            ),
            metadata_pointer::instruction::initialize(
                &token_program,
                mint,
                Some(authorities.metadata_update),
                Some(*mint),
            )?,
            initialize_default_account_state(&token_program, mint, &AccountState::Frozen)?,
            initialize_mint2(
                &token_program,
                mint,
                &authorities.issuance,
                Some(&authorities.gating),
                config.decimals,
            )?,
            initialize_metadata(
                &token_program,
                mint,
                &authorities.metadata_update,
                mint,
                &authorities.issuance,
                metadata.name,
                metadata.symbol,
                metadata.uri,
            ),
        ];

        instructions.extend(attributes.iter().map(|(key, value)| {
            update_field(
                &token_program,
                mint,
                &authorities.metadata_update,
                Field::Key(key.clone()),
                value.clone(),
            )
        }));

        Ok(instructions)
    }

    /// Writes or overwrites one open attribute on a bond, signed by the orchestrator as the
    /// metadata update authority.
    pub async fn update_bond_field(
        &self,
        asset: &Address,
        key: &str,
        value: &str,
    ) -> SettlementResult<Signature> {
        if key.is_empty() || value.is_empty() {
            return Err(SettlementError::InvalidConfig(
                "Bond fields need a non-empty key and value",
            ));
        }

        // The field may grow the record; top up the mint so it stays rent exempt.
        let mint_account = self
            .ledger()
            .get_account(asset)
            .await?
            .ok_or(SettlementError::AccountNotFound(*asset))?;
        let grown_len = mint_account.data.len() + 4 + key.len() + 4 + value.len();
        let required = self
            .ledger()
            .minimum_balance_for_rent_exemption(grown_len)
            .await?;

        let mut instructions = vec![];
        if let Some(top_up) = required.checked_sub(mint_account.lamports).filter(|l| *l > 0) {
            instructions.push(solana_system_interface::instruction::transfer(
                &self.address(),
                asset,
                top_up,
            ));
        }
        instructions.push(update_field(
            &SPL_TOKEN_2022_ID,
            asset,
            &self.address(),
            Field::Key(key.to_string()),
            value.to_string(),
        ));

        self.send_as_orchestrator(&instructions).await
    }

    /// Creates a plain Token-2022 mint for the settlement currency. `authority` mints supply and
    /// the orchestrator holds the freeze authority.
    pub async fn create_currency_mint(
        &self,
        authority: &Keypair,
        decimals: u8,
    ) -> SettlementResult<TokenContext> {
        let mint = Keypair::new();
        let footprint = MintFootprint::new(&[], None)?;
        let lamports = self
            .ledger()
            .minimum_balance_for_rent_exemption(footprint.total_length())
            .await?;

        let instructions = [
            create_account(
                &authority.pubkey(),
                &mint.pubkey(),
                lamports,
                footprint.base_length as u64,
                &SPL_TOKEN_2022_ID,
            ),
            initialize_mint2(
                &SPL_TOKEN_2022_ID,
                &mint.pubkey(),
                &authority.pubkey(),
                Some(&self.address()),
                decimals,
            )?,
        ];
        self.ledger()
            .send_transaction(authority, &[&mint], &instructions)
            .await?;

        Ok(TokenContext::new(
            Some(authority.pubkey()),
            mint.pubkey(),
            SPL_TOKEN_2022_ID,
            decimals,
        ))
    }

    /// Mints `quantity` whole units of `token` into `owner`'s holding account. The holding
    /// account must exist and be thawed.
    pub async fn mint_to(
        &self,
        mint_authority: &Keypair,
        token: &TokenContext,
        owner: &Address,
        quantity: u64,
    ) -> SettlementResult<Signature> {
        let amount = token.to_base_units(quantity)?;
        let mint_to = token.mint_to_owner(owner, amount)?;
        self.ledger()
            .send_transaction(mint_authority, &[], &[mint_to])
            .await
    }

    /// Rotates (or with `new_authority: None`, removes) the mint or freeze authority of `token`.
    pub async fn set_mint_authority(
        &self,
        token: &TokenContext,
        authority_type: AuthorityType,
        current_authority: &Keypair,
        new_authority: Option<&Address>,
    ) -> SettlementResult<Signature> {
        let instruction = set_authority(
            &token.token_program,
            &token.mint_address,
            new_authority,
            authority_type,
            &current_authority.pubkey(),
            &[],
        )?;
        self.ledger()
            .send_transaction(current_authority, &[], &[instruction])
            .await
    }
}
