// crates/fatoken-cli/src/commands/query.rs
//
// `fatoken query {balance, allowance, account, storage, supply}`.
// Read-only; figures are as of the ledger's last committed operation.

use clap::Subcommand;

use fatoken_core::identity::Address;
use fatoken_rpc::handlers::query::{
    GetAccountRequest, GetAccountResponse, GetAllowanceRequest, GetAllowanceResponse,
    GetBalanceRequest, GetBalanceResponse, GetStorageRequest, GetTotalSupplyRequest,
    GetTotalSupplyResponse,
};

use crate::commands::Context;
use crate::output::{account_rows, format_json, format_table, AccountRow, FieldRow, OutputFormat};

/// Query subcommands.
#[derive(Debug, Subcommand)]
pub enum QueryCmd {
    /// Liquid balance, stake and pending reward of an address.
    Balance { address: Address },
    /// Remaining amount `spender` may move out of `owner`.
    Allowance { owner: Address, spender: Address },
    /// Full account record.
    Account { address: Address },
    /// Dump the whole ledger storage.
    Storage,
    /// Supply, stake and reward totals. "genesis supply" excludes issued
    /// rewards and stays at the amount minted at genesis.
    Supply,
}

/// Run the query subcommand.
pub async fn run(ctx: &Context, cmd: &QueryCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        QueryCmd::Balance { address } => {
            let request = GetBalanceRequest {
                address: address.clone(),
            };
            let resp: GetBalanceResponse = ctx.client.call("query/balance", &request).await?;
            print_fields(
                ctx.format,
                &resp,
                vec![
                    FieldRow::new("address", &resp.address),
                    FieldRow::new("balance", resp.balance),
                    FieldRow::new("staked", resp.staked),
                    FieldRow::new("pending reward", resp.pending_reward),
                ],
            );
        }
        QueryCmd::Allowance { owner, spender } => {
            let request = GetAllowanceRequest {
                owner: owner.clone(),
                spender: spender.clone(),
            };
            let resp: GetAllowanceResponse = ctx.client.call("query/allowance", &request).await?;
            print_fields(
                ctx.format,
                &resp,
                vec![
                    FieldRow::new("owner", &resp.owner),
                    FieldRow::new("spender", &resp.spender),
                    FieldRow::new("allowance", resp.allowance),
                ],
            );
        }
        QueryCmd::Account { address } => {
            let request = GetAccountRequest {
                address: address.clone(),
            };
            let resp: GetAccountResponse = ctx.client.call("query/account", &request).await?;
            print_fields(ctx.format, &resp, account_rows(&resp));
        }
        QueryCmd::Storage => {
            // Decoded loosely so the dump shows whatever the daemon stores.
            let resp: serde_json::Value =
                ctx.client.call("query/storage", &GetStorageRequest {}).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", format_json(&resp)),
                OutputFormat::Table => println!("{}", format_table(&storage_rows(&resp))),
            }
        }
        QueryCmd::Supply => {
            let resp: GetTotalSupplyResponse = ctx
                .client
                .call("query/total_supply", &GetTotalSupplyRequest {})
                .await?;
            print_fields(
                ctx.format,
                &resp,
                vec![
                    FieldRow::new("total supply", resp.total_supply),
                    FieldRow::new("genesis supply", resp.genesis_supply),
                    FieldRow::new("total staked", resp.total_staked),
                    FieldRow::new("rewards issued", resp.rewards_issued),
                    FieldRow::new("dust", resp.dust),
                    FieldRow::new("reward per share", resp.reward_per_share),
                    FieldRow::new("reward rate / s", resp.reward_rate_per_second),
                    FieldRow::new("last update", resp.last_update_time),
                ],
            );
        }
    }

    Ok(())
}

fn print_fields<T: serde::Serialize>(format: OutputFormat, resp: &T, rows: Vec<FieldRow>) {
    match format {
        OutputFormat::Json => println!("{}", format_json(resp)),
        OutputFormat::Table => println!("{}", format_table(&rows)),
    }
}

/// One row per account in a storage dump.
fn storage_rows(storage: &serde_json::Value) -> Vec<AccountRow> {
    let Some(ledger) = storage.get("ledger").and_then(|l| l.as_object()) else {
        return Vec::new();
    };
    let field = |record: &serde_json::Value, name: &str| {
        record
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0".to_string())
    };
    ledger
        .iter()
        .map(|(address, record)| AccountRow {
            address: address.clone(),
            balance: field(record, "balance"),
            staked: field(record, "staked"),
            last_reward_per_share: field(record, "last_reward_per_share"),
            allowances: record
                .get("allowances")
                .and_then(|a| a.as_object())
                .map(|a| a.len())
                .unwrap_or(0),
        })
        .collect()
}
