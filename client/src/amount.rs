use crate::error::{
    SettlementError,
    SettlementResult,
};

/// Scales a whole-unit `quantity` into base units for a mint with `decimals` decimals.
pub fn to_base_units(quantity: u64, decimals: u8) -> SettlementResult<u64> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|factor| quantity.checked_mul(factor))
        .ok_or(SettlementError::AmountOverflow { quantity, decimals })
}
