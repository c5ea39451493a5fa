use std::fmt;
use std::sync::Mutex;

use thiserror::Error;

/// Lifecycle state of a managed component.
///
/// `Stopped` and `Failed` are terminal: a component is started at most once
/// per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentState {
    NotStarted,
    Running,
    Stopped,
    Failed,
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not-started"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A start or stop requested from a state that does not allow it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("{component} cannot be started: it is {state}")]
    CannotStart {
        component: &'static str,
        state: ComponentState,
    },

    #[error("{component} cannot be stopped: it is {state}")]
    CannotStop {
        component: &'static str,
        state: ComponentState,
    },
}

/// Checked state machine shared by every start/stop component.
///
/// Transitions are claimed before the actual work runs, so two concurrent
/// `start` calls cannot both succeed.
pub struct Lifecycle {
    component: &'static str,
    state: Mutex<ComponentState>,
}

impl Lifecycle {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            state: Mutex::new(ComponentState::NotStarted),
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn state(&self) -> ComponentState {
        *self.state.lock().expect("lifecycle lock poisoned")
    }

    pub fn is_running(&self) -> bool {
        self.state() == ComponentState::Running
    }

    /// `NotStarted -> Running`. Call [`Lifecycle::fail`] if the start work
    /// then fails.
    pub fn claim_start(&self) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().expect("lifecycle lock poisoned");
        if *state != ComponentState::NotStarted {
            return Err(LifecycleError::CannotStart {
                component: self.component,
                state: *state,
            });
        }
        *state = ComponentState::Running;
        Ok(())
    }

    /// Mark a start attempt as failed. Terminal.
    pub fn fail(&self) {
        *self.state.lock().expect("lifecycle lock poisoned") = ComponentState::Failed;
    }

    /// `Running -> Stopped`. The component counts as stopped from here on,
    /// even if the stop work itself reports an error.
    pub fn claim_stop(&self) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().expect("lifecycle lock poisoned");
        if *state != ComponentState::Running {
            return Err(LifecycleError::CannotStop {
                component: self.component,
                state: *state,
            });
        }
        *state = ComponentState::Stopped;
        Ok(())
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("component", &self.component)
            .field("state", &self.state())
            .finish()
    }
}
