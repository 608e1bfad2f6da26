use solana_account::Account;
use solana_address::Address;

pub const DEFAULT_USER_LAMPORTS: u64 = 100_000_000_000;

/// Create the data necessary to send to [`super::MolluskLedger::new`] to mock a funded wallet.
pub fn create_mock_user_account(address: Address, lamport_balance: u64) -> (Address, Account) {
    (
        address,
        Account::new(lamport_balance, 0, &solana_system_interface::program::ID),
    )
}

/// Mocks a wallet for each address funded with [`DEFAULT_USER_LAMPORTS`].
pub fn funded_wallets(addresses: &[Address]) -> Vec<(Address, Account)> {
    addresses
        .iter()
        .map(|address| create_mock_user_account(*address, DEFAULT_USER_LAMPORTS))
        .collect()
}
