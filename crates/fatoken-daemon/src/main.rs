// crates/fatoken-daemon/src/main.rs
//
// Binary entrypoint for the fatoken daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, restores
// the ledger (or creates it from genesis), and serves RPC until Ctrl-C.
// The daemon is the ledger's sequencer: it supplies the clock and
// serializes every operation through `LedgerState`.

mod bootstrap;
mod config;
mod state;
mod store;

use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;
use state::{DaemonState, DaemonStateMachine};
use store::SnapshotStore;

use fatoken_core::traits::{Clock, MonotonicClock, SystemClock};
use fatoken_rpc::{CommitCallback, FaRpcServer, LedgerState, RpcConfig};

/// fatoken daemon: sequences and serves the staking ledger.
#[derive(Parser, Debug)]
#[command(name = "fatoken-daemon", version, about = "fatoken staking ledger daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.fatoken/config.toml")]
    config: String,

    /// RPC port; overrides the config file.
    #[arg(long)]
    rpc_port: Option<u16>,

    /// Data directory; overrides the config file.
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before installing the subscriber so `log_level`
    // can seed the filter; report the outcome once logging is up.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);
    let mut daemon_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    match loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    // CLI flags override the config file.
    if let Some(port) = args.rpc_port {
        daemon_config.rpc_port = port;
    }
    if let Some(dir) = args.data_dir {
        daemon_config.data_dir = dir;
    }

    tracing::info!("fatoken daemon v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", daemon_config.data_dir);
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );

    let mut state_machine = DaemonStateMachine::new();
    state_machine.transition(DaemonState::Loading)?;

    // ---------------------------------------------------------------
    // Restore or create the ledger.
    // ---------------------------------------------------------------
    let store = SnapshotStore::open(expand_tilde(&daemon_config.data_dir))?;
    let ledger = match bootstrap::open_ledger(&store, &daemon_config.genesis, SystemClock.now()) {
        Ok(ledger) => ledger,
        Err(e) => {
            tracing::error!("Cannot open ledger: {}", e);
            return Err(e.into());
        }
    };

    // Never hand the ledger a time earlier than the one it last saw, even
    // if the wall clock steps backwards across a restart.
    let clock = MonotonicClock::with_floor(SystemClock, ledger.accumulator().last_update_time);

    let mut ledger_state = LedgerState::new(ledger, Arc::new(clock));
    if daemon_config.persist {
        let persist_store = store.clone();
        let on_commit: CommitCallback = Arc::new(move |snapshot| {
            if let Err(e) = persist_store.save(snapshot) {
                tracing::error!("Failed to persist snapshot: {}", e);
            }
        });
        ledger_state = ledger_state.with_commit_callback(on_commit);
    } else {
        tracing::warn!("Persistence disabled; ledger state is lost on exit");
    }

    // ---------------------------------------------------------------
    // Serve until Ctrl-C.
    // ---------------------------------------------------------------
    state_machine.transition(DaemonState::Serving)?;

    let rpc_config = RpcConfig {
        host: daemon_config.rpc_host.clone(),
        port: daemon_config.rpc_port,
    };
    let rpc_server = FaRpcServer::new(rpc_config, ledger_state.clone());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
        tracing::info!("Shutdown signal received");
    };

    let served = rpc_server.start_with_shutdown(shutdown).await;
    state_machine.transition(DaemonState::ShuttingDown)?;

    if daemon_config.persist {
        let snapshot = ledger_state.read(|ledger| ledger.storage()).await;
        match store.save(&snapshot) {
            Ok(()) => tracing::info!("Final snapshot written to {}", store.path().display()),
            Err(e) => tracing::error!("Failed to write final snapshot: {}", e),
        }
    }

    if let Err(e) = served {
        tracing::error!("RPC server error: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
