// crates/fatoken-rpc/src/handlers/mod.rs
//
// RPC handler modules for the fatoken JSON-RPC server.

pub mod node;
pub mod query;
pub mod staking;
pub mod token;
