// crates/fatoken-cli/src/commands/stake.rs
//
// `fatoken stake {stake, unstake, settle}`: staking commands.

use clap::Subcommand;

use fatoken_rpc::handlers::staking::{
    PositionResponse, SettleRequest, StakeRequest, UnstakeRequest,
};

use crate::commands::Context;
use crate::output::{format_json, format_table, position_rows, OutputFormat};

/// Staking subcommands.
#[derive(Debug, Subcommand)]
pub enum StakeCmd {
    /// Lock liquid balance into the staking pool.
    Stake {
        #[arg(long)]
        amount: u128,
    },
    /// Release stake back to liquid balance.
    Unstake {
        #[arg(long)]
        amount: u128,
    },
    /// Realize pending rewards without changing the stake.
    Settle,
}

/// Run the stake subcommand.
pub async fn run(ctx: &Context, cmd: &StakeCmd) -> Result<(), Box<dyn std::error::Error>> {
    let caller = ctx.caller()?;
    let resp: PositionResponse = match cmd {
        StakeCmd::Stake { amount } => {
            let request = StakeRequest {
                caller,
                amount: *amount,
            };
            ctx.client.call("staking/stake", &request).await?
        }
        StakeCmd::Unstake { amount } => {
            let request = UnstakeRequest {
                caller,
                amount: *amount,
            };
            ctx.client.call("staking/unstake", &request).await?
        }
        StakeCmd::Settle => {
            ctx.client
                .call("staking/settle", &SettleRequest { caller })
                .await?
        }
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&resp)),
        OutputFormat::Table => println!("{}", format_table(&position_rows(&resp))),
    }
    Ok(())
}
