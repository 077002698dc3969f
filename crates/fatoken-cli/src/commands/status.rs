// crates/fatoken-cli/src/commands/status.rs
//
// `fatoken status`: daemon health and ledger totals.

use fatoken_rpc::handlers::node::{GetHealthRequest, GetHealthResponse};

use crate::commands::Context;
use crate::output::{format_json, format_table, FieldRow, OutputFormat};

/// Run the status command.
pub async fn run(ctx: &Context, endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let resp: GetHealthResponse = ctx.client.call("node/health", &GetHealthRequest {}).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => {
            let mut rows = vec![
                FieldRow::new("endpoint", endpoint),
                FieldRow::new("status", &resp.status),
                FieldRow::new("version", &resp.version),
                FieldRow::new("uptime (s)", resp.uptime_seconds),
                FieldRow::new("accounts", resp.account_count),
                FieldRow::new("last update", resp.last_update_time),
            ];
            if let Some(details) = &resp.details {
                rows.push(FieldRow::new("details", details));
            }
            println!("{}", format_table(&rows));
        }
    }
    Ok(())
}
