use super::{ReferenceTable, TestResult, UTestTrait};
use crate::base::{EvolutionManager, Quantity};
use russell_lab::Vector;

/// Compares a quantity at each committed step against a reference table
///
/// Row `period` of the table is compared with the state committed at `t+Δt`; a
/// failure records the first offending row.
pub struct ReferenceComparison {
    name: String,
    quantity: Quantity,
    table: ReferenceTable,
    eps: f64,
    verbose: bool,
    n_checked: usize,
    max_diff: f64,
    first_failure: Option<String>,
}

impl ReferenceComparison {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `name` -- name of the quantity (e.g., "SXX")
    /// * `quantity` -- the compared quantity
    /// * `table` -- the reference (time, value) rows; row 0 is the initial state
    /// * `eps` -- absolute tolerance
    pub fn new(name: &str, quantity: Quantity, table: ReferenceTable, eps: f64) -> Self {
        ReferenceComparison {
            name: name.to_string(),
            quantity,
            table,
            eps,
            verbose: false,
            n_checked: 0,
            max_diff: 0.0,
            first_failure: None,
        }
    }

    /// Enables printing of the differences
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Records a failure (only the first one is kept)
    fn fail(&mut self, message: String) {
        if self.first_failure.is_none() {
            self.first_failure = Some(message);
        }
    }
}

impl UTestTrait for ReferenceComparison {
    fn check(
        &mut self,
        e: &Vector,
        s: &Vector,
        iv: &Vector,
        t: f64,
        dt: f64,
        period: usize,
        _evolutions: &EvolutionManager,
    ) {
        self.n_checked += 1;
        let time = t + dt;
        let value = match self.quantity.extract(e.as_data(), s.as_data(), iv.as_data()) {
            Some(v) => v,
            None => {
                self.fail(format!("{}: quantity {:?} is not available", self.name, self.quantity));
                return;
            }
        };
        let (t_ref, v_ref) = match self.table.rows.get(period) {
            Some(row) => *row,
            None => {
                self.fail(format!("{}: row {} (t = {:?}) is missing in the reference", self.name, period, time));
                return;
            }
        };
        if f64::abs(t_ref - time) > 1e-10 * f64::max(1.0, f64::abs(time)) {
            self.fail(format!(
                "{}: row {} has time {:?} but the committed time is {:?}",
                self.name, period, t_ref, time
            ));
            return;
        }
        let diff = f64::abs(value - v_ref);
        let fail = !(diff <= self.eps);
        if self.verbose {
            let mrk = if fail { "❌" } else { "➖" };
            println!("{} row {:>4} t = {:>13.6e}: {:9.2e} vs {:9.2e} ({:9.2e}{})", self.name, period, time, value, v_ref, diff, mrk);
        }
        if diff > self.max_diff || diff.is_nan() {
            self.max_diff = diff;
        }
        if fail {
            self.fail(format!(
                "{}: row {} (t = {:?}) differs: |{:e} - {:e}| = {:e} > {:e}",
                self.name, period, time, value, v_ref, diff, self.eps
            ));
        }
    }

    fn results(&self) -> TestResult {
        match &self.first_failure {
            Some(message) => TestResult::new(false, message),
            None => TestResult::new(
                true,
                &format!(
                    "{}: {} rows match the reference (max difference = {:e})",
                    self.name, self.n_checked, self.max_diff
                ),
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ReferenceComparison;
    use crate::base::{EvolutionManager, Quantity};
    use crate::util::{ReferenceTable, UTestTrait};
    use russell_lab::Vector;

    #[test]
    fn check_works() {
        let evolutions = EvolutionManager::new();
        let table = ReferenceTable::new(vec![(0.0, 0.0), (0.5, 10.0), (1.0, 20.0)]);
        let mut validator = ReferenceComparison::new("SXX", Quantity::ThermodynamicForce(0), table, 1e-6);
        let e = Vector::new(1);
        let iv = Vector::new(0);
        validator.check(&e, &Vector::from(&[10.0]), &iv, 0.0, 0.5, 1, &evolutions);
        validator.check(&e, &Vector::from(&[20.0]), &iv, 0.5, 0.5, 2, &evolutions);
        let res = validator.results();
        assert!(res.success);
        assert_eq!(res.message, "SXX: 2 rows match the reference (max difference = 0e0)");
    }

    #[test]
    fn check_reports_first_failing_row() {
        let evolutions = EvolutionManager::new();
        let table = ReferenceTable::new(vec![(0.0, 0.0), (0.5, 10.0), (1.0, 21.0)]);
        let mut validator = ReferenceComparison::new("SXX", Quantity::ThermodynamicForce(0), table, 1e-6);
        validator.set_verbose(false);
        let e = Vector::new(1);
        let iv = Vector::new(0);
        validator.check(&e, &Vector::from(&[10.0]), &iv, 0.0, 0.5, 1, &evolutions);
        validator.check(&e, &Vector::from(&[20.0]), &iv, 0.5, 0.5, 2, &evolutions);
        validator.check(&e, &Vector::from(&[30.0]), &iv, 1.0, 0.5, 3, &evolutions);
        let res = validator.results();
        assert!(!res.success);
        assert_eq!(res.message, "SXX: row 2 (t = 1.0) differs: |2e1 - 2.1e1| = 1e0 > 1e-6");
    }

    #[test]
    fn check_reports_missing_data() {
        let evolutions = EvolutionManager::new();
        let e = Vector::new(1);
        let s = Vector::new(1);
        let iv = Vector::new(0);

        let table = ReferenceTable::new(vec![(0.0, 0.0)]);
        let mut validator = ReferenceComparison::new("SXX", Quantity::ThermodynamicForce(0), table, 1e-6);
        validator.check(&e, &s, &iv, 0.0, 0.5, 1, &evolutions);
        assert_eq!(
            validator.results().message,
            "SXX: row 1 (t = 0.5) is missing in the reference"
        );

        let table = ReferenceTable::new(vec![(0.0, 0.0), (0.5, 0.0)]);
        let mut validator = ReferenceComparison::new("p", Quantity::InternalVariable(0), table, 1e-6);
        validator.check(&e, &s, &iv, 0.0, 0.5, 1, &evolutions);
        assert_eq!(
            validator.results().message,
            "p: quantity InternalVariable(0) is not available"
        );

        let table = ReferenceTable::new(vec![(0.0, 0.0), (0.25, 0.0)]);
        let mut validator = ReferenceComparison::new("SXX", Quantity::ThermodynamicForce(0), table, 1e-6);
        validator.check(&e, &s, &iv, 0.0, 0.5, 1, &evolutions);
        assert_eq!(
            validator.results().message,
            "SXX: row 1 has time 0.25 but the committed time is 0.5"
        );
    }
}
