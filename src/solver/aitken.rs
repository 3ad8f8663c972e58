use super::{denominator_threshold, parse_trigger, AccelerationTrait, IterateHistory, DEFAULT_ACCELERATION_TRIGGER};
use crate::StrError;
use russell_lab::Vector;

/// Implements the component-wise Aitken Δ² acceleration algorithm
///
/// For each component, with the last three values `x₀, x₁, x₂` (oldest first):
///
/// ```text
/// x ← x₂ - (x₂ - x₁)² / (x₂ - 2 x₁ + x₀)
/// ```
///
/// Components with a too small denominator are left unchanged.
pub struct Aitken {
    trigger: usize,
    history: IterateHistory,
}

impl Aitken {
    /// Allocates a new instance
    pub fn new() -> Self {
        Aitken {
            trigger: DEFAULT_ACCELERATION_TRIGGER,
            history: IterateHistory::new(3),
        }
    }
}

impl AccelerationTrait for Aitken {
    fn name(&self) -> &'static str {
        "Aitken"
    }

    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), StrError> {
        self.trigger = parse_trigger(key, value)?;
        Ok(())
    }

    fn initialize(&mut self, _problem_size: usize) {
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
        let tiny = f64::sqrt(denominator_threshold(eeps));
        let (x0, x1, x2) = (self.history.get(0), self.history.get(1), self.history.get(2));
        let mut modified = false;
        for i in 0..u1.dim() {
            let d2 = x2[i] - x1[i];
            let den = d2 - (x1[i] - x0[i]);
            if !(f64::abs(den) > tiny) {
                continue;
            }
            let value = x2[i] - d2 * d2 / den;
            if value.is_finite() {
                u1[i] = value;
                modified = true;
            }
        }
        if modified {
            self.history.replace_last(u1);
        }
        modified
    }

    fn post_execute_tasks(&mut self) {}
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Aitken;
    use crate::solver::AccelerationTrait;
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn execute_works() {
        // x: fixed point of 0.5 x + 1 is 2; y: constant increments (untouched)
        let mut acc = Aitken::new();
        assert_eq!(acc.name(), "Aitken");
        acc.set_parameter("AccelerationTrigger", "2").unwrap();
        acc.initialize(2);
        acc.pre_execute_tasks();
        let r = Vector::new(2);
        let u0 = Vector::new(2);
        let mut u1 = Vector::from(&[-10.0, -10.0]);
        assert_eq!(acc.execute(&mut u1, &u0, &r, 1e-12, 1e-3, 1), false);
        assert_eq!(u1.as_data(), &[-10.0, -10.0]);
        let xs = [0.0, 1.0, 1.5];
        for k in 0..3 {
            u1[0] = xs[k];
            u1[1] = k as f64;
            let accelerated = acc.execute(&mut u1, &u0, &r, 1e-12, 1e-3, k + 2);
            assert_eq!(accelerated, k == 2);
        }
        approx_eq(u1[0], 2.0, 1e-15);
        assert_eq!(u1[1], 2.0);
    }
}
