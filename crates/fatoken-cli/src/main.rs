// crates/fatoken-cli/src/main.rs
//
// CLI entrypoint for the fatoken developer tools.
//
// Talks to a running fatoken-daemon over JSON-RPC: transfers, allowances,
// staking and read-only queries.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::query::QueryCmd;
use commands::stake::StakeCmd;
use commands::Context;
use output::OutputFormat;
use rpc_client::RpcClient;

use fatoken_core::identity::Address;

/// fatoken CLI: developer tools for the staking ledger.
#[derive(Parser, Debug)]
#[command(name = "fatoken", version, about = "fatoken staking ledger CLI")]
struct Cli {
    /// RPC endpoint of the fatoken-daemon.
    #[arg(long, global = true, default_value = "http://127.0.0.1:50061")]
    rpc: String,

    /// Identity to act as for mutating commands.
    #[arg(long, global = true)]
    caller: Option<Address>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Move liquid tokens. Spends an allowance when --from is not the caller.
    Transfer {
        /// Account to debit (default: the caller).
        #[arg(long)]
        from: Option<Address>,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: u128,
    },

    /// Set how much a spender may move out of the caller's balance.
    Approve {
        #[arg(long)]
        spender: Address,
        #[arg(long)]
        amount: u128,
    },

    /// Staking: stake, unstake, settle.
    #[command(subcommand)]
    Stake(StakeCmd),

    /// Read-only ledger queries.
    #[command(subcommand)]
    Query(QueryCmd),

    /// Display daemon health and version info.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let ctx = Context {
        client: RpcClient::new(&cli.rpc),
        caller: cli.caller.clone(),
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        },
    };

    match &cli.command {
        Commands::Transfer { from, to, amount } => {
            commands::token::transfer(&ctx, from.as_ref(), to, *amount).await?
        }
        Commands::Approve { spender, amount } => {
            commands::token::approve(&ctx, spender, *amount).await?
        }
        Commands::Stake(cmd) => commands::stake::run(&ctx, cmd).await?,
        Commands::Query(cmd) => commands::query::run(&ctx, cmd).await?,
        Commands::Status => commands::status::run(&ctx, &cli.rpc).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_transfer_with_global_flags() {
        let cli = Cli::try_parse_from([
            "fatoken", "--caller", "bob", "transfer", "--from", "alice", "--to", "carol",
            "--amount", "340282366920938463463374607431768211455", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.caller.unwrap().as_str(), "bob");
        match cli.command {
            Commands::Transfer { from, to, amount } => {
                assert_eq!(from.unwrap().as_str(), "alice");
                assert_eq!(to.as_str(), "carol");
                assert_eq!(amount, u128::MAX);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_stake_and_query() {
        let cli = Cli::try_parse_from(["fatoken", "stake", "unstake", "--amount", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Stake(StakeCmd::Unstake { amount: 5 })));

        let cli = Cli::try_parse_from(["fatoken", "query", "allowance", "alice", "bob"]).unwrap();
        assert!(matches!(cli.command, Commands::Query(QueryCmd::Allowance { .. })));
    }

    #[test]
    fn test_invalid_address_rejected() {
        assert!(Cli::try_parse_from(["fatoken", "query", "balance", ""]).is_err());
    }
}
