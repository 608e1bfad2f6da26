//! Sizing for bond mints.
//!
//! A bond mint is allocated at its base size (the mint plus its fixed-size extensions) and the
//! token metadata is appended by later instructions in the same transaction. The account must be
//! funded for the final size up front, or the metadata writes fail for lack of lamports.

use solana_address::Address;
use spl_token_2022_interface::{
    extension::ExtensionType,
    state::Mint,
};
use spl_token_metadata_interface::state::TokenMetadata;

use crate::{
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::Ledger,
};

/// TLV framing around the variable-length metadata extension: a 2-byte type and a 2-byte length.
pub const METADATA_EXTENSION_OVERHEAD: usize = 4;

/// The fixed-size extensions every bond mint carries.
pub const BOND_MINT_EXTENSIONS: [ExtensionType; 2] = [
    ExtensionType::MetadataPointer,
    ExtensionType::DefaultAccountState,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintFootprint {
    /// The mint plus its fixed-size extensions. This is the size the account is allocated at.
    pub base_length: usize,
    /// The serialized length of the token metadata record, or zero if there is none.
    pub metadata_length: usize,
}

impl MintFootprint {
    pub fn new(
        extensions: &[ExtensionType],
        metadata: Option<&TokenMetadata>,
    ) -> SettlementResult<Self> {
        let base_length = ExtensionType::try_calculate_account_len::<Mint>(extensions)?;
        let metadata_length = match metadata {
            Some(metadata) => borsh::to_vec(metadata)
                .map_err(|_| SettlementError::InvalidConfig("Token metadata can't be serialized"))?
                .len(),
            None => 0,
        };
        Ok(Self {
            base_length,
            metadata_length,
        })
    }

    /// The size of the account once every instruction in the creation transaction has run.
    pub fn total_length(&self) -> usize {
        match self.metadata_length {
            0 => self.base_length,
            len => self.base_length + METADATA_EXTENSION_OVERHEAD + len,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintSizing {
    pub footprint: MintFootprint,
    /// The rent-exempt minimum for [`MintFootprint::total_length`] bytes.
    pub total_reserved_lamports: u64,
}

impl MintSizing {
    pub fn base_length(&self) -> usize {
        self.footprint.base_length
    }

    pub fn metadata_length(&self) -> usize {
        self.footprint.metadata_length
    }
}

/// Computes the footprint of a mint with `extensions` and `metadata`, then asks the ledger for the
/// balance that keeps it rent exempt at its final size.
pub async fn mint_sizing(
    ledger: &impl Ledger,
    extensions: &[ExtensionType],
    metadata: Option<&TokenMetadata>,
) -> SettlementResult<MintSizing> {
    let footprint = MintFootprint::new(extensions, metadata)?;
    let total_reserved_lamports = ledger
        .minimum_balance_for_rent_exemption(footprint.total_length())
        .await?;
    Ok(MintSizing {
        footprint,
        total_reserved_lamports,
    })
}

/// The metadata record exactly as it will read once the creation transaction commits.
pub fn bond_metadata(
    mint: Address,
    update_authority: Address,
    name: String,
    symbol: String,
    uri: String,
    additional_metadata: Vec<(String, String)>,
) -> SettlementResult<TokenMetadata> {
    Ok(TokenMetadata {
        update_authority: Some(update_authority).try_into()?,
        mint,
        name,
        symbol,
        uri,
        additional_metadata,
    })
}

#[cfg(test)]
mod tests {
    use solana_sdk::program_pack::Pack;

    use super::*;

    fn metadata(name: &str, fields: &[(&str, &str)]) -> TokenMetadata {
        bond_metadata(
            Address::new_from_array([1; 32]),
            Address::new_from_array([2; 32]),
            name.to_string(),
            "SYM".to_string(),
            String::new(),
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn base_length_matches_extension_layout() {
        let plain = MintFootprint::new(&[], None).unwrap();
        assert_eq!(plain.base_length, Mint::LEN);
        assert_eq!(plain.total_length(), Mint::LEN);

        let bond = MintFootprint::new(&BOND_MINT_EXTENSIONS, None).unwrap();
        assert!(bond.base_length > Mint::LEN);
    }

    #[test]
    fn metadata_length_is_the_serialized_record() {
        // 32 (update authority) + 32 (mint) + 4 + 4 (name) + 4 + 3 (symbol) + 4 (uri)
        // + 4 (field count) + 4 + 4 (key) + 4 + 3 (value)
        let md = metadata("Bond", &[("isin", "US9")]);
        let footprint = MintFootprint::new(&BOND_MINT_EXTENSIONS, Some(&md)).unwrap();
        assert_eq!(footprint.metadata_length, 102);
        assert_eq!(
            footprint.total_length(),
            footprint.base_length + METADATA_EXTENSION_OVERHEAD + 102
        );
    }

    #[test]
    fn every_field_grows_the_footprint() {
        let bare = MintFootprint::new(&BOND_MINT_EXTENSIONS, Some(&metadata("Bond", &[]))).unwrap();
        let with_field = MintFootprint::new(
            &BOND_MINT_EXTENSIONS,
            Some(&metadata("Bond", &[("coupon_rate", "5.5")])),
        )
        .unwrap();
        assert_eq!(
            with_field.metadata_length - bare.metadata_length,
            4 + "coupon_rate".len() + 4 + "5.5".len()
        );
    }
}
