use super::{denominator_threshold, parse_trigger, AccelerationTrait, IterateHistory, DEFAULT_ACCELERATION_TRIGGER};
use crate::StrError;
use russell_lab::{vec_inner, Vector};

/// Implements the Irons-Tuck acceleration algorithm
///
/// With the last three iterates `u₀, u₁, u₂` (oldest first):
///
/// ```text
/// Δu  = u₂ - u₁
/// Δ²u = u₂ - 2 u₁ + u₀
/// u ← u₂ - (Δu · Δ²u) / (Δ²u · Δ²u) Δu
/// ```
///
/// The iterate is left unchanged if `Δ²u · Δ²u` is too small or if the result is not finite.
pub struct IronsTuck {
    trigger: usize,
    history: IterateHistory,
    du: Vector,
    ddu: Vector,
}

impl IronsTuck {
    /// Allocates a new instance
    pub fn new() -> Self {
        IronsTuck {
            trigger: DEFAULT_ACCELERATION_TRIGGER,
            history: IterateHistory::new(3),
            du: Vector::new(0),
            ddu: Vector::new(0),
        }
    }
}

impl AccelerationTrait for IronsTuck {
    fn name(&self) -> &'static str {
        "IronsTuck"
    }

    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), StrError> {
        self.trigger = parse_trigger(key, value)?;
        Ok(())
    }

    fn initialize(&mut self, problem_size: usize) {
        self.du = Vector::new(problem_size);
        self.ddu = Vector::new(problem_size);
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
        if self.du.dim() != n {
            self.initialize(n);
            return false;
        }
        let (ua0, ua1, ua2) = (self.history.get(0), self.history.get(1), self.history.get(2));
        for i in 0..n {
            self.du[i] = ua2[i] - ua1[i];
            self.ddu[i] = ua2[i] - 2.0 * ua1[i] + ua0[i];
        }
        let den = vec_inner(&self.ddu, &self.ddu);
        if !(den > denominator_threshold(eeps)) {
            return false;
        }
        let c = vec_inner(&self.du, &self.ddu) / den;
        if !c.is_finite() {
            return false;
        }
        for i in 0..n {
            u1[i] = ua2[i] - c * self.du[i];
        }
        self.history.replace_last(u1);
        true
    }

    fn post_execute_tasks(&mut self) {}
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
