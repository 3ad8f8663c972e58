use crate::base::UnresolvedReference;
use thiserror::Error;

/// Defines the errors that abort a material point test
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DriverError {
    /// The time step could not be completed even after sub-stepping
    #[error("sub-stepping exhausted at t = {time:?} with Δt = {dt:?}: {reason}")]
    SubSteppingExhausted {
        /// Time at the beginning of the failing time step
        time: f64,

        /// Last attempted time increment
        dt: f64,

        /// Name of the offending component, if known
        component: Option<String>,

        /// Description of the last failure
        reason: String,
    },

    /// The test is inconsistently defined
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The behaviour returned an unrecoverable error
    #[error("behaviour failed: {0}")]
    Behaviour(String),

    /// An evolution could not be evaluated
    #[error("unresolved evolution: {0}")]
    UnresolvedEvolution(#[from] UnresolvedReference),
}

/// Defines the recoverable failures of one attempt to complete a time step
///
/// These failures never reach the caller; they trigger sub-stepping.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AttemptFailure {
    /// The behaviour reported a local non-convergence
    #[error("the behaviour integration did not converge")]
    RecoverableBehaviourFailure,

    /// The Newton iterations did not converge
    #[error("Newton iterations did not converge after {iterations} iterations ({})", .criteria.join("; "))]
    NewtonDivergence {
        /// Number of performed iterations
        iterations: usize,

        /// Name of the offending component, if known
        component: Option<String>,

        /// Description of the failed criteria
        criteria: Vec<String>,
    },
}

impl AttemptFailure {
    /// Returns the name of the offending component, if any
    pub fn component(&self) -> Option<String> {
        match self {
            AttemptFailure::RecoverableBehaviourFailure => None,
            AttemptFailure::NewtonDivergence { component, .. } => component.clone(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
