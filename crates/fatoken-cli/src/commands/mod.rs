// crates/fatoken-cli/src/commands/mod.rs
//
// Command module declarations for the fatoken CLI.

pub mod query;
pub mod stake;
pub mod status;
pub mod token;

use fatoken_core::identity::Address;

use crate::output::OutputFormat;
use crate::rpc_client::{CliError, RpcClient};

/// Everything a command needs from the global flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: RpcClient,
    pub caller: Option<Address>,
    pub format: OutputFormat,
}

impl Context {
    /// The identity mutating commands act as.
    pub fn caller(&self) -> Result<Address, CliError> {
        self.caller.clone().ok_or(CliError::MissingCaller)
    }
}
