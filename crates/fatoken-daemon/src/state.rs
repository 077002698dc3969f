// crates/fatoken-daemon/src/state.rs
//
// Daemon lifecycle state machine.
//
// Valid transitions:
//   Initializing -> Loading -> Serving
//   Any state -> ShuttingDown

use std::fmt;

/// Lifecycle states of the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonState {
    /// Reading configuration and installing logging.
    Initializing,
    /// Restoring the snapshot or creating the genesis ledger.
    Loading,
    /// Accepting RPC requests.
    Serving,
    /// Draining requests and writing the final snapshot.
    ShuttingDown,
}

impl fmt::Display for DaemonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonState::Initializing => write!(f, "Initializing"),
            DaemonState::Loading => write!(f, "Loading"),
            DaemonState::Serving => write!(f, "Serving"),
            DaemonState::ShuttingDown => write!(f, "ShuttingDown"),
        }
    }
}

/// State machine for managing daemon lifecycle transitions.
pub struct DaemonStateMachine {
    pub current: DaemonState,
}

impl DaemonStateMachine {
    /// Create a new state machine starting in the Initializing state.
    pub fn new() -> Self {
        Self {
            current: DaemonState::Initializing,
        }
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns an error if the transition is not valid.
    pub fn transition(&mut self, new_state: DaemonState) -> Result<(), String> {
        let valid = match (&self.current, &new_state) {
            (_, DaemonState::ShuttingDown) => true,
            (DaemonState::Initializing, DaemonState::Loading) => true,
            (DaemonState::Loading, DaemonState::Serving) => true,
            _ => false,
        };

        if valid {
            tracing::info!("State transition: {} -> {}", self.current, new_state);
            self.current = new_state;
            Ok(())
        } else {
            Err(format!(
                "Invalid state transition: {} -> {}",
                self.current, new_state
            ))
        }
    }
}

impl Default for DaemonStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_sequence() {
        let mut sm = DaemonStateMachine::new();
        sm.transition(DaemonState::Loading).unwrap();
        sm.transition(DaemonState::Serving).unwrap();
        sm.transition(DaemonState::ShuttingDown).unwrap();
        assert_eq!(sm.current, DaemonState::ShuttingDown);
    }

    #[test]
    fn test_cannot_skip_loading() {
        let mut sm = DaemonStateMachine::new();
        assert!(sm.transition(DaemonState::Serving).is_err());
        assert_eq!(sm.current, DaemonState::Initializing);
    }

    #[test]
    fn test_shutdown_from_anywhere() {
        let mut sm = DaemonStateMachine::new();
        sm.transition(DaemonState::ShuttingDown).unwrap();
        assert!(sm.transition(DaemonState::Loading).is_err());
    }
}
