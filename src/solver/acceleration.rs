use crate::StrError;
use russell_lab::Vector;
use std::collections::VecDeque;

/// Holds the name of the parameter giving the first accelerated iteration
pub const ACCELERATION_TRIGGER: &str = "AccelerationTrigger";

/// Holds the default value of the AccelerationTrigger parameter
pub const DEFAULT_ACCELERATION_TRIGGER: usize = 3;

/// Specifies the essential functions of algorithms accelerating the Newton iterations
///
/// Lifecycle: `initialize` once; then, for each time step, `pre_execute_tasks`, zero or more
/// `execute`, and `post_execute_tasks` if the time step converged.
pub trait AccelerationTrait: Send {
    /// Returns the name of the algorithm
    fn name(&self) -> &'static str;

    /// Sets a parameter given as a key-value pair
    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), StrError>;

    /// Allocates the internal arrays
    fn initialize(&mut self, problem_size: usize);

    /// Resets the history of iterates at the beginning of a time step
    fn pre_execute_tasks(&mut self);

    /// Accelerates the current iterate u1 (in place)
    ///
    /// # Input
    ///
    /// * `u1` -- current iterate (may be overwritten)
    /// * `u0` -- previous iterate
    /// * `r` -- residual vector
    /// * `eeps` -- tolerance on the driving variables
    /// * `seps` -- tolerance on the thermodynamic forces
    /// * `iter` -- current iteration number (the first one is 1)
    ///
    /// Returns `true` if u1 has been modified.
    fn execute(&mut self, u1: &mut Vector, u0: &Vector, r: &Vector, eeps: f64, seps: f64, iter: usize) -> bool;

    /// Performs tasks after the time step has converged
    fn post_execute_tasks(&mut self);
}

/// Parses the AccelerationTrigger parameter
pub(crate) fn parse_trigger(key: &str, value: &str) -> Result<usize, StrError> {
    if key != ACCELERATION_TRIGGER {
        return Err("unknown acceleration parameter");
    }
    let trigger = value
        .trim()
        .parse::<usize>()
        .map_err(|_| "AccelerationTrigger must be a positive integer")?;
    if trigger < 1 {
        return Err("AccelerationTrigger must be a positive integer");
    }
    Ok(trigger)
}

/// Returns the smallest acceptable squared norm of the second difference of iterates
pub(crate) fn denominator_threshold(eeps: f64) -> f64 {
    f64::max(1e-4 * eeps * eeps, 100.0 * f64::MIN_POSITIVE)
}

/// Holds the last iterates (oldest first)
pub(crate) struct IterateHistory {
    capacity: usize,
    all: VecDeque<Vector>,
}

impl IterateHistory {
    /// Allocates a new instance
    pub(crate) fn new(capacity: usize) -> Self {
        IterateHistory {
            capacity,
            all: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends an iterate, dropping the oldest one if full
    pub(crate) fn push(&mut self, u: &Vector) {
        if self.all.len() == self.capacity {
            self.all.pop_front();
        }
        self.all.push_back(u.clone());
    }

    /// Replaces the most recent iterate
    pub(crate) fn replace_last(&mut self, u: &Vector) {
        if let Some(last) = self.all.back_mut() {
            *last = u.clone();
        }
    }

    /// Returns true if the history is full
    pub(crate) fn full(&self) -> bool {
        self.all.len() == self.capacity
    }

    /// Returns the i-th iterate (oldest first)
    pub(crate) fn get(&self, i: usize) -> &Vector {
        &self.all[i]
    }

    /// Clears the history
    pub(crate) fn clear(&mut self) {
        self.all.clear();
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
