//! [`Ledger`] implementation backed by a Solana JSON RPC endpoint.

use colored::Colorize;
use solana_account::Account;
use solana_address::Address;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    nonblocking::rpc_client::RpcClient,
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction::Instruction;
use solana_sdk::{
    message::Message,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};

use crate::{
    error::{
        SettlementError,
        SettlementResult,
    },
    ledger::Ledger,
    logs::{
        log_error,
        log_info,
        log_success,
        LogColor,
    },
};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";
pub const RPC_URL_ENV_VAR: &str = "SOLANA_RPC_URL";

pub struct SendTransactionConfig {
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    pub commitment: CommitmentConfig,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

pub struct RpcLedger {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl RpcLedger {
    /// Connects to `url`, or [`DEFAULT_RPC_URL`] if none is passed.
    pub fn new(url: Option<String>, config: Option<SendTransactionConfig>) -> Self {
        let config = config.unwrap_or_default();
        let url = url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Self {
            client: RpcClient::new_with_commitment(url, config.commitment),
            config,
        }
    }

    /// Connects to the URL in the `SOLANA_RPC_URL` environment variable, falling back to
    /// [`DEFAULT_RPC_URL`].
    pub fn from_env(config: Option<SendTransactionConfig>) -> Self {
        Self::new(std::env::var(RPC_URL_ENV_VAR).ok(), config)
    }

    fn debug_logs(&self) -> bool {
        matches!(self.config.debug_logs, Some(true))
    }
}

impl Default for RpcLedger {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Ledger for RpcLedger {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> SettlementResult<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(SettlementError::query)
    }

    async fn get_account(&self, address: &Address) -> SettlementResult<Option<Account>> {
        self.client
            .get_account_with_commitment(address, self.config.commitment)
            .await
            .map(|response| response.value)
            .map_err(SettlementError::query)
    }

    async fn send_transaction(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> SettlementResult<Signature> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(SettlementError::query)?;

        let compute_budget = self.config.compute_budget.map_or(vec![], |budget| {
            vec![
                ComputeBudgetInstruction::set_compute_unit_limit(budget),
                ComputeBudgetInstruction::set_compute_unit_price(1),
            ]
        });
        let num_prefix_instructions = compute_budget.len();

        let msg = Message::new(
            &[compute_budget, instructions.to_vec()].concat(),
            Some(&payer.pubkey()),
        );

        let mut tx = Transaction::new_unsigned(msg);
        tx.try_sign(
            &[std::iter::once(payer)
                .chain(signers.iter().cloned())
                .collect::<Vec<_>>()]
            .concat(),
            bh,
        )
        .map_err(SettlementError::submission)?;

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(sig) => {
                if self.debug_logs() {
                    let sender_info =
                        format!("{}: {}", "sender".color(LogColor::Gray), payer.pubkey());
                    log_success("Signature", format!("{sig}\n{sender_info}"));
                }
                Ok(sig)
            }
            Err(error) => {
                if self.debug_logs() {
                    log_instruction_error(&error, instructions, num_prefix_instructions);
                    log_info("Payer", payer.pubkey());
                }
                Err(SettlementError::submission(error))
            }
        }
    }
}

/// Logs which instruction a preflight failure points at, skipping the compute budget
/// instructions prepended to the submitted message.
pub fn log_instruction_error(
    error: &ClientError,
    instructions: &[Instruction],
    num_prefix_instructions: usize,
) {
    use solana_client::rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    };
    use solana_instruction_error::InstructionError;
    use solana_transaction_error::TransactionError;

    let kind = error.kind();
    let ClientErrorKind::RpcError(RpcResponseError {
        data:
            RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                err: Some(ui_err),
                ..
            }),
        ..
    }) = kind
    else {
        log_error("Generic error", error);
        return;
    };

    let TransactionError::InstructionError(ixn_idx, ixn_error) = ui_err.clone().into() else {
        log_error("Transaction error", error);
        return;
    };

    let Some(instruction) = (ixn_idx as usize)
        .checked_sub(num_prefix_instructions)
        .and_then(|idx| instructions.get(idx))
    else {
        log_error("Instruction error", format!("#{ixn_idx}: {ixn_error}"));
        return;
    };

    match ixn_error {
        InstructionError::Custom(code) => log_error(
            "Program error",
            format!("(program {}, custom code {code})", instruction.program_id),
        ),
        other => log_error(
            "Instruction error",
            format!("(program {}, {other})", instruction.program_id),
        ),
    }
}
