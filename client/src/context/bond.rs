//! Bond configuration: fixed attributes, the open key/value attributes written into token
//! metadata, and the authorities assigned to a new bond mint.

use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use rust_decimal::Decimal;
use solana_address::Address;

use crate::error::{
    SettlementError,
    SettlementResult,
};

pub const COUPON_RATE_KEY: &str = "coupon_rate";
pub const MATURITY_DATE_KEY: &str = "maturity_date";
pub const ISIN_KEY: &str = "isin";

#[derive(Clone, Debug)]
pub struct BondTokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub maturity_date: DateTime<Utc>,
    pub coupon_rate: Decimal,
    pub isin: Option<String>,
    /// Written as the metadata URI.
    pub description: Option<String>,
    /// Additional open attributes, written after the coupon rate, maturity date and ISIN.
    pub extra_fields: Vec<(String, String)>,
}

impl BondTokenConfig {
    pub fn validate(&self) -> SettlementResult<()> {
        if self.name.is_empty() {
            return Err(SettlementError::InvalidConfig("Bond name is empty"));
        }
        if self.symbol.is_empty() {
            return Err(SettlementError::InvalidConfig("Bond symbol is empty"));
        }
        Ok(())
    }

    pub fn uri(&self) -> String {
        self.description.clone().unwrap_or_default()
    }

    /// The open attributes in the order they're written to the mint.
    pub fn open_attributes(&self) -> OpenAttributes {
        let mut attributes = OpenAttributes::default();
        attributes.insert(COUPON_RATE_KEY, self.coupon_rate.normalize().to_string());
        attributes.insert(MATURITY_DATE_KEY, format_maturity_date(&self.maturity_date));
        attributes.insert(ISIN_KEY, self.isin.clone().unwrap_or_default());
        for (key, value) in &self.extra_fields {
            attributes.insert(key, value);
        }
        attributes
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2030-12-31T00:00:00.000Z`.
pub fn format_maturity_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The authorities of a bond mint. Each is compared by the token program at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BondAuthorities {
    /// May mint new supply.
    pub issuance: Address,
    /// May freeze and thaw any holding account of the bond.
    pub gating: Address,
    /// May add or overwrite open attributes.
    pub metadata_update: Address,
}

/// An insertion-ordered key/value list. The order determines the order of the field writes and
/// therefore the serialized metadata layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenAttributes(Vec<(String, String)>);

impl OpenAttributes {
    /// Inserts `key` with `value`. An existing key keeps its position and takes the new value.
    /// Empty values are treated as an absent field and skipped.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if value.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, String)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::dec;

    use super::*;

    fn sample_config() -> BondTokenConfig {
        BondTokenConfig {
            name: "Treasury Bond 2030".to_string(),
            symbol: "TB30".to_string(),
            decimals: 0,
            maturity_date: Utc.with_ymd_and_hms(2030, 12, 31, 0, 0, 0).unwrap(),
            coupon_rate: dec!(5.50),
            isin: Some("US912828XY99".to_string()),
            description: None,
            extra_fields: vec![],
        }
    }

    #[test]
    fn open_attributes_keep_write_order() {
        let attributes = sample_config().open_attributes().into_inner();
        assert_eq!(
            attributes,
            vec![
                (COUPON_RATE_KEY.to_string(), "5.5".to_string()),
                (
                    MATURITY_DATE_KEY.to_string(),
                    "2030-12-31T00:00:00.000Z".to_string()
                ),
                (ISIN_KEY.to_string(), "US912828XY99".to_string()),
            ]
        );
    }

    #[test]
    fn empty_values_are_omitted() {
        let config = BondTokenConfig {
            isin: Some(String::new()),
            extra_fields: vec![("rating".to_string(), String::new())],
            ..sample_config()
        };
        let attributes = config.open_attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes.get(ISIN_KEY), None);
        assert_eq!(attributes.get("rating"), None);
    }

    #[test]
    fn reinserting_a_key_replaces_in_place() {
        let config = BondTokenConfig {
            extra_fields: vec![
                ("rating".to_string(), "AA".to_string()),
                (COUPON_RATE_KEY.to_string(), "6".to_string()),
            ],
            ..sample_config()
        };
        let attributes = config.open_attributes().into_inner();
        assert_eq!(attributes[0], (COUPON_RATE_KEY.to_string(), "6".to_string()));
        assert_eq!(attributes[3], ("rating".to_string(), "AA".to_string()));
    }

    #[test]
    fn name_and_symbol_are_required() {
        let unnamed = BondTokenConfig {
            name: String::new(),
            ..sample_config()
        };
        let no_symbol = BondTokenConfig {
            symbol: String::new(),
            ..sample_config()
        };
        assert!(sample_config().validate().is_ok());
        assert!(matches!(
            unnamed.validate(),
            Err(SettlementError::InvalidConfig(_))
        ));
        assert!(matches!(
            no_symbol.validate(),
            Err(SettlementError::InvalidConfig(_))
        ));
    }
}
