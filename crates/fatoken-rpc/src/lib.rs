// crates/fatoken-rpc/src/lib.rs
//
// fatoken-rpc: JSON-RPC server and handlers for the fatoken ledger.
//
// A tonic-based server with one unary service. Every mutating call runs
// through `LedgerState`, which serializes operations and stamps them with
// the sequencer's clock.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use server::{FaRpcServer, JsonRpcRequest, JsonRpcResponse, RpcConfig, SERVICE_NAME};
pub use state::{CommitCallback, LedgerState};
