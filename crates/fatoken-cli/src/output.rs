// crates/fatoken-cli/src/output.rs
//
// Output formatting utilities for the fatoken CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use fatoken_rpc::handlers::query::GetAccountResponse;
use fatoken_rpc::handlers::staking::PositionResponse;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// One `field | value` row.
#[derive(Debug, Clone, Tabled)]
pub struct FieldRow {
    pub field: String,
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// One account in a storage listing.
#[derive(Debug, Clone, Tabled)]
pub struct AccountRow {
    pub address: String,
    pub balance: String,
    pub staked: String,
    pub last_reward_per_share: String,
    pub allowances: usize,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Rows shared by every staking command's output.
pub fn position_rows(resp: &PositionResponse) -> Vec<FieldRow> {
    vec![
        FieldRow::new("reward realized", resp.receipt.reward_realized),
        FieldRow::new("balance", resp.balance),
        FieldRow::new("staked", resp.staked),
        FieldRow::new("pool total staked", resp.total_staked),
        FieldRow::new("reward per share", resp.receipt.reward_per_share),
        FieldRow::new("applied at", resp.receipt.applied_at),
    ]
}

pub fn account_rows(resp: &GetAccountResponse) -> Vec<FieldRow> {
    let mut rows = vec![FieldRow::new("address", &resp.address)];
    match &resp.account {
        Some(account) => {
            rows.push(FieldRow::new("balance", account.balance));
            rows.push(FieldRow::new("staked", account.staked));
            rows.push(FieldRow::new(
                "last reward per share",
                account.last_reward_per_share,
            ));
            rows.push(FieldRow::new("pending reward", resp.pending_reward));
            for (spender, amount) in &account.allowances {
                rows.push(FieldRow::new(&format!("allowance: {}", spender), amount));
            }
        }
        None => rows.push(FieldRow::new("record", "none")),
    }
    rows
}
