use crate::base::Quantity;
use crate::util::{ReferenceTable, TestResult};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the committed state at the end of a time step
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StepRecord {
    /// Number of committed time steps (zero for the initial state)
    pub period: usize,

    /// Time at the end of the time step
    pub t: f64,

    /// Time increment
    pub dt: f64,

    /// Number of Newton iterations of the converged attempt
    pub iterations: usize,

    /// Last norm of the correction of the driving variables
    pub norm_mdu: f64,

    /// Last norm of the residual of the thermodynamic forces
    pub norm_rr: f64,

    /// Driving variables
    pub e: Vec<f64>,

    /// Thermodynamic forces
    pub s: Vec<f64>,

    /// Internal variables
    pub iv: Vec<f64>,

    /// Lagrange multipliers
    pub lagrange: Vec<f64>,
}

/// Holds the outcome of one attempt to complete a time step
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AttemptRecord {
    /// Time at the beginning of the attempt
    pub t: f64,

    /// Attempted time increment
    pub dt: f64,

    /// Number of Newton iterations
    pub iterations: usize,

    /// Indicates that the attempt converged (and has been committed)
    pub converged: bool,
}

/// Holds the results of a material point test
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TestOutput {
    /// Names of the driving variables
    pub driving_variable_names: Vec<String>,

    /// Names of the thermodynamic forces
    pub thermodynamic_force_names: Vec<String>,

    /// Names of the internal variables
    pub internal_variable_names: Vec<String>,

    /// Committed states; the first one is the initial state
    pub steps: Vec<StepRecord>,

    /// All attempts (converged or not) in chronological order
    pub attempts: Vec<AttemptRecord>,

    /// Total number of Newton iterations
    pub n_iterations: usize,

    /// Total number of sub-steps (failed attempts)
    pub n_sub_steps: usize,

    /// Number of iterations where the stiffness differed from the numerical tangent
    pub n_tangent_mismatches: usize,

    /// Aggregated outcome of the validators
    pub result: TestResult,
}

impl TestOutput {
    /// Allocates a new instance
    pub fn new(
        driving_variable_names: Vec<String>,
        thermodynamic_force_names: Vec<String>,
        internal_variable_names: Vec<String>,
    ) -> Self {
        TestOutput {
            driving_variable_names,
            thermodynamic_force_names,
            internal_variable_names,
            steps: Vec::new(),
            attempts: Vec::new(),
            n_iterations: 0,
            n_sub_steps: 0,
            n_tangent_mismatches: 0,
            result: TestResult::aggregate("no validators", Vec::new()),
        }
    }

    /// Returns the name of a quantity
    pub fn name(&self, quantity: Quantity) -> Option<&str> {
        let (names, i) = match quantity {
            Quantity::DrivingVariable(i) => (&self.driving_variable_names, i),
            Quantity::ThermodynamicForce(i) => (&self.thermodynamic_force_names, i),
            Quantity::InternalVariable(i) => (&self.internal_variable_names, i),
        };
        names.get(i).map(|s| s.as_str())
    }

    /// Returns the times and values of a quantity along the committed states
    pub fn series(&self, quantity: Quantity) -> Result<(Vec<f64>, Vec<f64>), StrError> {
        let mut times = Vec::with_capacity(self.steps.len());
        let mut values = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let v = quantity.extract(&step.e, &step.s, &step.iv).ok_or("quantity is not available")?;
            times.push(step.t);
            values.push(v);
        }
        Ok((times, values))
    }

    /// Returns a reference table with the values of a quantity along the committed states
    pub fn reference_table(&self, quantity: Quantity) -> Result<ReferenceTable, StrError> {
        let (times, values) = self.series(quantity)?;
        ReferenceTable::from_columns(&times, &values)
    }

    /// Reads a JSON file containing the results
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "file not found")?;
        let reader = BufReader::new(file);
        let data = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
        Ok(data)
    }

    /// Writes a JSON file with the results
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{StepRecord, TestOutput};
    use crate::base::{Quantity, DEFAULT_TEST_DIR};

    fn sample() -> TestOutput {
        let mut output = TestOutput::new(
            vec!["EXX".to_string()],
            vec!["SXX".to_string()],
            vec!["EquivalentPlasticStrain".to_string()],
        );
        for k in 0..3 {
            let x = k as f64;
            output.steps.push(StepRecord {
                period: k,
                t: 0.5 * x,
                dt: if k == 0 { 0.0 } else { 0.5 },
                iterations: k,
                norm_mdu: 0.0,
                norm_rr: 0.0,
                e: vec![0.001 * x],
                s: vec![10.0 * x],
                iv: vec![0.0],
                lagrange: vec![-10.0 * x],
            });
        }
        output
    }

    #[test]
    fn series_works() {
        let output = sample();
        assert_eq!(output.name(Quantity::ThermodynamicForce(0)), Some("SXX"));
        assert_eq!(output.name(Quantity::ThermodynamicForce(1)), None);
        let (times, values) = output.series(Quantity::ThermodynamicForce(0)).unwrap();
        assert_eq!(times, &[0.0, 0.5, 1.0]);
        assert_eq!(values, &[0.0, 10.0, 20.0]);
        assert_eq!(
            output.series(Quantity::DrivingVariable(3)).err(),
            Some("quantity is not available")
        );
        let table = output.reference_table(Quantity::DrivingVariable(0)).unwrap();
        assert_eq!(table.rows, &[(0.0, 0.0), (0.5, 0.001), (1.0, 0.002)]);
    }

    #[test]
    fn read_write_json_work() {
        let output = sample();
        let path = format!("{}/test_output.json", DEFAULT_TEST_DIR);
        output.write_json(&path).unwrap();
        let read = TestOutput::read_json(&path).unwrap();
        assert_eq!(read.steps.len(), 3);
        assert_eq!(read.steps[2].s, &[20.0]);
        assert_eq!(read.result, output.result);
        assert_eq!(
            TestOutput::read_json("/tmp/pmtest/__not_found__.json").err(),
            Some("file not found")
        );
    }
}
