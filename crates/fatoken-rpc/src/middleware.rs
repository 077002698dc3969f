// crates/fatoken-rpc/src/middleware.rs
//
// Middleware for the RPC server.

use tonic::{Request, Status};

/// Logging interceptor for incoming requests.
///
/// Callers are not authenticated here; the `caller` carried in each
/// request's params is trusted as sequenced.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    tracing::info!(
        remote = ?req.remote_addr(),
        "Incoming RPC request: {:?}",
        req.metadata()
    );
    Ok(req)
}
