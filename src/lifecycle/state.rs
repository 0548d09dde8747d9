//! Process lifecycle state machine.
//!
//! # States
//! ```text
//! Building → Starting → Ready → Draining → Stopped
//!     ↘          ↘        ↘         ↘
//!                   Failed
//! ```
//!
//! # Design Decisions
//! - Stopped and Failed are terminal; recovery belongs to the supervisor
//! - Invalid transitions are rejected and leave the state untouched
//! - Observers subscribe through a watch channel

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle state of the launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Configuration and application are being assembled.
    Building,
    /// Binding the listener.
    Starting,
    /// Listening and serving requests.
    Ready,
    /// Stop requested; in-flight requests are finishing.
    Draining,
    /// Clean stop.
    Stopped,
    /// Unrecoverable failure.
    Failed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Building => "building",
            LifecycleState::Starting => "starting",
            LifecycleState::Ready => "ready",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Failed => "failed",
        }
    }

    /// Numeric code exported as the `launcher_lifecycle_state` gauge.
    pub fn code(&self) -> u8 {
        match self {
            LifecycleState::Building => 0,
            LifecycleState::Starting => 1,
            LifecycleState::Ready => 2,
            LifecycleState::Draining => 3,
            LifecycleState::Stopped => 4,
            LifecycleState::Failed => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Failed)
    }

    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        match (self, next) {
            (Stopped | Failed, _) => false,
            (_, Failed) => true,
            (Building, Starting) | (Starting, Ready) | (Ready, Draining) | (Draining, Stopped) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid lifecycle transition from {from} to {to}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Shared handle to the process lifecycle.
///
/// Cloning is cheap; all clones observe and drive the same state.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    /// Create a lifecycle in the `Building` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Building);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Move to `next`, or return the rejected transition.
    pub fn transition(&self, next: LifecycleState) -> Result<LifecycleState, TransitionError> {
        let mut result = Ok(next);
        self.tx.send_if_modified(|state| {
            if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                result = Err(TransitionError {
                    from: *state,
                    to: next,
                });
                false
            }
        });

        match result {
            Ok(state) => {
                tracing::info!(state = %state, "Lifecycle transition");
                crate::observability::metrics::record_lifecycle_state(state);
            }
            Err(e) => tracing::debug!(error = %e, "Lifecycle transition rejected"),
        }
        result
    }

    /// Mark the process failed unless it already reached a terminal state.
    pub fn fail(&self) {
        if !self.current().is_terminal() {
            let _ = self.transition(LifecycleState::Failed);
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Wait until the state satisfies `predicate`.
    pub async fn wait_for<P>(&self, predicate: P) -> LifecycleState
    where
        P: FnMut(&LifecycleState) -> bool,
    {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(predicate).await {
            Ok(state) => *state,
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.current(),
        };
        state
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn happy_path_reaches_stopped() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.current(), Building);

        for next in [Starting, Ready, Draining, Stopped] {
            assert_eq!(lifecycle.transition(next), Ok(next));
        }
        assert!(lifecycle.current().is_terminal());
    }

    #[test]
    fn any_live_state_can_fail() {
        for path in [vec![], vec![Starting], vec![Starting, Ready], vec![Starting, Ready, Draining]] {
            let lifecycle = Lifecycle::new();
            for state in path {
                lifecycle.transition(state).unwrap();
            }
            assert_eq!(lifecycle.transition(Failed), Ok(Failed));
        }
    }

    #[test]
    fn terminal_states_are_final() {
        let lifecycle = Lifecycle::new();
        lifecycle.transition(Failed).unwrap();

        let err = lifecycle.transition(Starting).unwrap_err();
        assert_eq!(err, TransitionError { from: Failed, to: Starting });
        assert_eq!(lifecycle.current(), Failed);

        lifecycle.fail();
        assert_eq!(lifecycle.current(), Failed);
    }

    #[test]
    fn skipping_states_is_rejected() {
        let lifecycle = Lifecycle::new();
        assert!(lifecycle.transition(Ready).is_err());
        assert!(lifecycle.transition(Stopped).is_err());
        assert_eq!(lifecycle.current(), Building);
    }

    #[tokio::test]
    async fn observers_see_transitions() {
        let lifecycle = Lifecycle::new();
        let observer = lifecycle.clone();
        let waiter = tokio::spawn(async move { observer.wait_for(|s| *s == Ready).await });

        lifecycle.transition(Starting).unwrap();
        lifecycle.transition(Ready).unwrap();

        assert_eq!(waiter.await.unwrap(), Ready);
    }
}
