// crates/fatoken-cli/src/commands/token.rs
//
// `fatoken transfer` and `fatoken approve`.

use fatoken_core::identity::Address;
use fatoken_rpc::handlers::token::{
    ApproveRequest, ApproveResponse, TransferRequest, TransferResponse,
};

use crate::commands::Context;
use crate::output::{format_json, format_table, FieldRow, OutputFormat};

/// Move `amount` from `from` (default: the caller) to `to`.
pub async fn transfer(
    ctx: &Context,
    from: Option<&Address>,
    to: &Address,
    amount: u128,
) -> Result<(), Box<dyn std::error::Error>> {
    let caller = ctx.caller()?;
    let request = TransferRequest {
        from: from.cloned().unwrap_or_else(|| caller.clone()),
        caller,
        to: to.clone(),
        amount,
    };
    let resp: TransferResponse = ctx.client.call("token/transfer", &request).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => {
            println!("Transferred {} from {} to {}", amount, request.from, request.to);
            let mut rows = vec![
                FieldRow::new(&format!("{} balance", request.from), resp.from_balance),
                FieldRow::new(&format!("{} balance", request.to), resp.to_balance),
                FieldRow::new("reward realized", resp.receipt.reward_realized),
            ];
            if request.from != request.caller {
                rows.push(FieldRow::new("remaining allowance", resp.remaining_allowance));
            }
            println!("{}", format_table(&rows));
        }
    }
    Ok(())
}

/// Set the caller's allowance for `spender`.
pub async fn approve(
    ctx: &Context,
    spender: &Address,
    amount: u128,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = ApproveRequest {
        caller: ctx.caller()?,
        spender: spender.clone(),
        amount,
    };
    let resp: ApproveResponse = ctx.client.call("token/approve", &request).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => println!(
            "{} may now spend {} from {}",
            resp.spender, resp.allowance, resp.owner
        ),
    }
    Ok(())
}
