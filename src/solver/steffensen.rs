use super::{denominator_threshold, parse_trigger, AccelerationTrait, IterateHistory, DEFAULT_ACCELERATION_TRIGGER};
use crate::StrError;
use russell_lab::{vec_inner, Vector};

/// Implements the Steffensen (vector Δ² secant) acceleration algorithm
///
/// With the last three iterates `u₀, u₁, u₂` (oldest first):
///
/// ```text
/// d₁ = u₁ - u₀
/// d₂ = u₂ - u₁
/// D  = d₂ - d₁
/// u ← u₀ - (d₁ · D) / (D · D) d₁
/// ```
///
/// The history restarts from the accelerated iterate.
pub struct Steffensen {
    trigger: usize,
    history: IterateHistory,
    d1: Vector,
    dd: Vector,
}

impl Steffensen {
    /// Allocates a new instance
    pub fn new() -> Self {
        Steffensen {
            trigger: DEFAULT_ACCELERATION_TRIGGER,
            history: IterateHistory::new(3),
            d1: Vector::new(0),
            dd: Vector::new(0),
        }
    }
}

impl AccelerationTrait for Steffensen {
    fn name(&self) -> &'static str {
        "Steffensen"
    }

    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), StrError> {
        self.trigger = parse_trigger(key, value)?;
        Ok(())
    }

    fn initialize(&mut self, problem_size: usize) {
        self.d1 = Vector::new(problem_size);
        self.dd = Vector::new(problem_size);
        self.history.clear();
    }

    fn pre_execute_tasks(&mut self) {
        self.history.clear();
    }

    fn execute(&mut self, u1: &mut Vector, _u0: &Vector, _r: &Vector, eeps: f64, _seps: f64, iter: usize) -> bool {
        if iter < self.trigger {
            return false;
        }
        self.history.push(u1);
        if !self.history.full() {
            return false;
        }
        let n = u1.dim();
        if self.d1.dim() != n {
            self.initialize(n);
            return false;
        }
        let (ua0, ua1, ua2) = (self.history.get(0), self.history.get(1), self.history.get(2));
        for i in 0..n {
            self.d1[i] = ua1[i] - ua0[i];
            self.dd[i] = (ua2[i] - ua1[i]) - self.d1[i];
        }
        let den = vec_inner(&self.dd, &self.dd);
        if !(den > denominator_threshold(eeps)) {
            return false;
        }
        let c = vec_inner(&self.d1, &self.dd) / den;
        if !c.is_finite() {
            return false;
        }
        for i in 0..n {
            u1[i] = ua0[i] - c * self.d1[i];
        }
        self.history.clear();
        self.history.push(u1);
        true
    }

    fn post_execute_tasks(&mut self) {}
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
