//! Program IDs of the token programs the orchestrator targets.

use solana_address::Address;

/// The SPL Token program ID.
pub const SPL_TOKEN_ID: Address =
    Address::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
/// The SPL Token 2022 program ID. Bond mints always live here, since they rely on the metadata
/// pointer, token metadata and default account state extensions.
pub const SPL_TOKEN_2022_ID: Address =
    Address::from_str_const("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
/// The SPL Associated Token Account program ID.
pub const SPL_ASSOCIATED_TOKEN_ACCOUNT_ID: Address =
    Address::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
