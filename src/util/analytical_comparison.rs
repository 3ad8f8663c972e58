use super::{TestResult, UTestTrait};
use crate::base::{Evolution, EvolutionManager, Quantity};
use russell_lab::Vector;

/// Compares a quantity at each committed step against an analytical solution
///
/// The solution is an evolution (typically a formula) evaluated at `t+Δt`.
pub struct AnalyticalComparison {
    name: String,
    quantity: Quantity,
    solution: Evolution,
    eps: f64,
    n_checked: usize,
    max_diff: f64,
    first_failure: Option<String>,
}

impl AnalyticalComparison {
    /// Allocates a new instance
    pub fn new(name: &str, quantity: Quantity, solution: Evolution, eps: f64) -> Self {
        AnalyticalComparison {
            name: name.to_string(),
            quantity,
            solution,
            eps,
            n_checked: 0,
            max_diff: 0.0,
            first_failure: None,
        }
    }
}

impl UTestTrait for AnalyticalComparison {
    fn check(
        &mut self,
        e: &Vector,
        s: &Vector,
        iv: &Vector,
        t: f64,
        dt: f64,
        period: usize,
        evolutions: &EvolutionManager,
    ) {
        if self.first_failure.is_some() {
            return;
        }
        self.n_checked += 1;
        let time = t + dt;
        let value = match self.quantity.extract(e.as_data(), s.as_data(), iv.as_data()) {
            Some(v) => v,
            None => {
                self.first_failure = Some(format!("{}: quantity {:?} is not available", self.name, self.quantity));
                return;
            }
        };
        let expected = match self.solution.value(time, evolutions) {
            Ok(v) => v,
            Err(err) => {
                self.first_failure = Some(format!("{}: {}", self.name, err));
                return;
            }
        };
        let diff = f64::abs(value - expected);
        if diff > self.max_diff || diff.is_nan() {
            self.max_diff = diff;
        }
        if !(diff <= self.eps) {
            self.first_failure = Some(format!(
                "{}: step {} (t = {:?}) differs: |{:e} - {:e}| = {:e} > {:e}",
                self.name, period, time, value, expected, diff, self.eps
            ));
        }
    }

    fn results(&self) -> TestResult {
        match &self.first_failure {
            Some(message) => TestResult::new(false, message),
            None => TestResult::new(
                true,
                &format!(
                    "{}: {} steps match the analytical solution (max difference = {:e})",
                    self.name, self.n_checked, self.max_diff
                ),
            ),
        }
    }

    fn evolutions(&self) -> Vec<&Evolution> {
        vec![&self.solution]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
