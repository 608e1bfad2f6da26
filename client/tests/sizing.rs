use bond_dvp_client::{
    mollusk_helpers::MolluskLedger,
    sizing::{
        bond_metadata,
        mint_sizing,
        METADATA_EXTENSION_OVERHEAD,
        BOND_MINT_EXTENSIONS,
    },
    Ledger,
};
use solana_sdk::signature::{
    Keypair,
    Signer,
};

#[tokio::test]
async fn reserved_lamports_cover_the_final_size() -> anyhow::Result<()> {
    let ledger = MolluskLedger::new(vec![]);
    let payloads: Vec<(String, String, String, Vec<(String, String)>)> = vec![
        ("B".into(), "S".into(), String::new(), vec![]),
        (
            "Treasury Bond 2030".into(),
            "TB30".into(),
            "https://example.com/tb30.json".into(),
            vec![],
        ),
        (
            "Treasury Bond 2030".into(),
            "TB30".into(),
            String::new(),
            vec![
                ("coupon_rate".into(), "5.5".into()),
                ("maturity_date".into(), "2030-12-31T00:00:00.000Z".into()),
                ("isin".into(), "US912828XY99".into()),
            ],
        ),
        (
            "x".repeat(200),
            "LONG".into(),
            "u".repeat(300),
            (0..20)
                .map(|i| (format!("field_{i}"), "v".repeat(i * 10 + 1)))
                .collect(),
        ),
    ];

    for (name, symbol, uri, fields) in payloads {
        let metadata = bond_metadata(
            Keypair::new().pubkey(),
            Keypair::new().pubkey(),
            name,
            symbol,
            uri,
            fields,
        )?;
        let sizing = mint_sizing(&ledger, &BOND_MINT_EXTENSIONS, Some(&metadata)).await?;

        let final_len =
            sizing.base_length() + sizing.metadata_length() + METADATA_EXTENSION_OVERHEAD;
        let minimum = ledger.minimum_balance_for_rent_exemption(final_len).await?;
        assert!(sizing.total_reserved_lamports >= minimum);
        assert!(sizing.metadata_length() > 0);
    }

    Ok(())
}
