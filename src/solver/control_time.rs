use crate::base::Config;
use crate::StrError;

/// Assists in the time loop control along the periods of the loading path
///
/// Each period `[tᵢ, tᵢ₊₁]` is first attempted in one step. After a failed attempt, the
/// time increment is halved; after a converged step, the time increment is set to the
/// remaining length of the period. Thus, the sum of the committed increments never
/// exceeds the length of the period.
pub struct ControlTime<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the times of the loading path (sorted; at least two)
    times: &'a [f64],

    /// Index of the current period
    index: usize,

    /// Current time
    t: f64,

    /// Current time increment
    dt: f64,

    /// Number of failed attempts in the current period
    n_sub_steps: usize,
}

impl<'a> ControlTime<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, times: &'a [f64]) -> Result<Self, StrError> {
        if times.len() < 2 {
            return Err("there must be at least two times in the loading path");
        }
        for i in 1..times.len() {
            if !(times[i] > times[i - 1]) {
                return Err("the times of the loading path must be strictly increasing");
            }
        }
        Ok(ControlTime {
            config,
            times,
            index: 0,
            t: times[0],
            dt: times[1] - times[0],
            n_sub_steps: 0,
        })
    }

    /// Returns the current time
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Returns the current time increment
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of failed attempts in the current period
    pub fn n_sub_steps(&self) -> usize {
        self.n_sub_steps
    }

    /// Returns true if the final time has been reached
    pub fn finished(&self) -> bool {
        self.index + 1 >= self.times.len()
    }

    /// Advances the time after a converged step
    pub fn advance(&mut self) {
        let te = self.times[self.index + 1];
        if self.dt >= te - self.t {
            self.t = te;
            self.index += 1;
            self.n_sub_steps = 0;
            if !self.finished() {
                self.dt = self.times[self.index + 1] - self.t;
            }
        } else {
            self.t += self.dt;
            self.dt = te - self.t;
        }
    }

    /// Halves the time increment after a failed attempt
    ///
    /// Returns an error if the maximum number of sub-steps is reached or if
    /// the time increment becomes smaller than the allowed minimum.
    pub fn reduce(&mut self) -> Result<(), StrError> {
        self.n_sub_steps += 1;
        if self.n_sub_steps >= self.config.n_max_sub_steps {
            return Err("the maximum number of sub-steps has been reached");
        }
        let dt = 0.5 * self.dt;
        if dt < self.config.dt_min {
            return Err("Δt is smaller than the allowed minimum");
        }
        self.dt = dt;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
