use super::EvolutionManager;
use crate::StrError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Defines a function of time and the values of named arguments
pub type FormulaFn = Arc<dyn Fn(f64, &[f64]) -> f64 + Send + Sync>;

/// Defines a function of time loaded from outside
pub type ExternalFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Indicates that a formula references an evolution that cannot be evaluated
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UnresolvedReference {
    /// The named evolution is not registered
    #[error("evolution '{0}' is not defined")]
    Missing(String),

    /// The named evolution depends on itself
    #[error("evolution '{0}' depends on itself")]
    Cycle(String),
}

/// Holds an ordered piecewise-linear time → value mapping
#[derive(Clone, Debug)]
pub struct Table {
    /// Holds the (time, value) samples sorted by time (never empty)
    samples: Vec<(f64, f64)>,
}

impl Table {
    /// Allocates a new instance
    ///
    /// The samples are sorted by time; if a time is given twice, the last value wins.
    pub fn new(times: &[f64], values: &[f64]) -> Result<Self, StrError> {
        if times.len() != values.len() {
            return Err("times and values must have the same length");
        }
        if times.len() < 1 {
            return Err("there must be at least one sample");
        }
        let mut table = Table { samples: Vec::new() };
        for i in 0..times.len() {
            table.set_value(times[i], values[i]);
        }
        Ok(table)
    }

    /// Returns the samples
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Sets a sample (overwrites the value if the time already exists)
    pub fn set_value(&mut self, t: f64, value: f64) {
        let k = self.samples.partition_point(|(x, _)| *x < t);
        if k < self.samples.len() && self.samples[k].0 == t {
            self.samples[k].1 = value;
        } else {
            self.samples.insert(k, (t, value));
        }
    }

    /// Evaluates the mapping at time t (clamped at both ends)
    ///
    /// Returns NaN if t is NaN and there is more than one sample.
    pub fn value(&self, t: f64) -> f64 {
        let n = self.samples.len();
        let (first, last) = (self.samples[0], self.samples[n - 1]);
        if n == 1 || t <= first.0 {
            return first.1;
        }
        if t.is_nan() {
            return f64::NAN;
        }
        if t >= last.0 {
            return last.1;
        }
        let k = self.samples.partition_point(|(x, _)| *x <= t);
        let (x0, y0) = self.samples[k - 1];
        let (x1, y1) = self.samples[k];
        (y1 - y0) / (x1 - x0) * (t - x0) + y0
    }
}

/// Holds a formula depending on time and on other (named) evolutions
#[derive(Clone)]
pub struct Formula {
    /// Names of the evolutions passed as arguments
    args: Vec<String>,

    /// The function f(t, args)
    function: FormulaFn,

    /// Explicitly set (time, value) pairs
    pinned: Vec<(f64, f64)>,
}

impl Formula {
    /// Returns the names of the arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Defines a function of time
///
/// # Examples
///
/// ```
/// use pmtest::base::{Evolution, EvolutionManager};
///
/// let manager = EvolutionManager::new();
/// let ramp = Evolution::table(&[0.0, 1.0], &[0.0, 0.01]).unwrap();
/// assert_eq!(ramp.value(0.5, &manager), Ok(0.005));
/// assert_eq!(ramp.value(2.0, &manager), Ok(0.01));
/// ```
#[derive(Clone)]
pub enum Evolution {
    /// Constant value
    Constant(f64),

    /// Piecewise-linear table
    Table(Table),

    /// Formula over time and other evolutions
    Formula(Formula),

    /// Function loaded from outside
    External(ExternalFn),
}

impl Evolution {
    /// Allocates a constant evolution
    pub fn constant(value: f64) -> Self {
        Evolution::Constant(value)
    }

    /// Allocates a piecewise-linear evolution
    pub fn table(times: &[f64], values: &[f64]) -> Result<Self, StrError> {
        Ok(Evolution::Table(Table::new(times, values)?))
    }

    /// Allocates a formula evolution
    ///
    /// The function receives the time and the values of the named arguments (in the given order).
    pub fn formula<F>(args: &[&str], function: F) -> Self
    where
        F: Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        Evolution::Formula(Formula {
            args: args.iter().map(|a| a.to_string()).collect(),
            function: Arc::new(function),
            pinned: Vec::new(),
        })
    }

    /// Allocates an evolution given by an external function
    pub fn external<F>(function: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Evolution::External(Arc::new(function))
    }

    /// Indicates whether the evolution does not depend on time
    pub fn is_constant(&self) -> bool {
        match self {
            Evolution::Constant(_) => true,
            Evolution::Table(table) => table.samples.len() == 1,
            _ => false,
        }
    }

    /// Sets the value at a given time
    ///
    /// Only tables and formulas accept new values. For formulas, the value is
    /// returned instead of the expression exactly at time t.
    pub fn set_value(&mut self, t: f64, value: f64) -> Result<(), StrError> {
        match self {
            Evolution::Table(table) => table.set_value(t, value),
            Evolution::Formula(formula) => match formula.pinned.iter_mut().find(|(x, _)| *x == t) {
                Some(pair) => pair.1 = value,
                None => formula.pinned.push((t, value)),
            },
            Evolution::Constant(_) => return Err("cannot set the value of a constant evolution"),
            Evolution::External(_) => return Err("cannot set the value of an external evolution"),
        }
        Ok(())
    }

    /// Evaluates the evolution at time t
    ///
    /// Formula arguments are resolved through the manager.
    pub fn value(&self, t: f64, manager: &EvolutionManager) -> Result<f64, UnresolvedReference> {
        let mut memo = HashMap::new();
        let mut stack = Vec::new();
        self.evaluate(t, manager, &mut memo, &mut stack)
    }

    /// Evaluates the evolution with memoized resolution of the arguments
    pub(crate) fn evaluate(
        &self,
        t: f64,
        manager: &EvolutionManager,
        memo: &mut HashMap<String, f64>,
        stack: &mut Vec<String>,
    ) -> Result<f64, UnresolvedReference> {
        match self {
            Evolution::Constant(value) => Ok(*value),
            Evolution::Table(table) => Ok(table.value(t)),
            Evolution::Formula(formula) => {
                if let Some((_, value)) = formula.pinned.iter().find(|(x, _)| *x == t) {
                    return Ok(*value);
                }
                let mut values = Vec::with_capacity(formula.args.len());
                for arg in &formula.args {
                    values.push(manager.resolve(arg, t, memo, stack)?);
                }
                Ok((formula.function)(t, &values))
            }
            Evolution::External(function) => Ok(function(t)),
        }
    }
}

impl fmt::Debug for Evolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evolution::Constant(value) => write!(f, "Constant({:?})", value),
            Evolution::Table(table) => write!(f, "Table({:?})", table.samples),
            Evolution::Formula(formula) => write!(f, "Formula({:?})", formula.args),
            Evolution::External(_) => write!(f, "External"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Evolution, Table};
    use crate::base::EvolutionManager;
    use russell_lab::approx_eq;

    #[test]
    fn table_new_captures_errors() {
        assert_eq!(
            Table::new(&[0.0, 1.0], &[0.0]).err(),
            Some("times and values must have the same length")
        );
        assert_eq!(Table::new(&[], &[]).err(), Some("there must be at least one sample"));
    }

    #[test]
    fn table_sorts_and_overwrites() {
        let table = Table::new(&[1.0, 0.0, 1.0], &[10.0, 0.0, 20.0]).unwrap();
        assert_eq!(table.samples(), &[(0.0, 0.0), (1.0, 20.0)]);
    }

    #[test]
    fn table_value_works() {
        let m = EvolutionManager::new();

        let single = Evolution::table(&[0.5], &[3.0]).unwrap();
        assert!(single.is_constant());
        assert_eq!(single.value(-1.0, &m), Ok(3.0));
        assert_eq!(single.value(10.0, &m), Ok(3.0));

        let ev = Evolution::table(&[0.0, 1.0, 3.0], &[0.0, 2.0, 0.0]).unwrap();
        assert!(!ev.is_constant());
        assert_eq!(ev.value(-1.0, &m), Ok(0.0));
        assert_eq!(ev.value(0.0, &m), Ok(0.0));
        assert_eq!(ev.value(1.0, &m), Ok(2.0));
        assert_eq!(ev.value(2.0, &m), Ok(1.0));
        assert_eq!(ev.value(3.0, &m), Ok(0.0));
        assert_eq!(ev.value(5.0, &m), Ok(0.0));
    }

    #[test]
    fn table_value_handles_nan() {
        let m = EvolutionManager::new();
        let ev = Evolution::table(&[0.0, 1.0, 3.0], &[0.0, 2.0, 0.0]).unwrap();
        assert!(ev.value(f64::NAN, &m).unwrap().is_nan());
        let single = Evolution::table(&[0.5], &[3.0]).unwrap();
        assert_eq!(single.value(f64::NAN, &m), Ok(3.0));
    }

    #[test]
    fn table_is_affine_between_samples() {
        let m = EvolutionManager::new();
        let ev = Evolution::table(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        let (a, b) = (0.3, 1.7);
        let va = ev.value(a, &m).unwrap();
        let vb = ev.value(b, &m).unwrap();
        for lambda in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let v = ev.value(a + lambda * (b - a), &m).unwrap();
            approx_eq(v, va + lambda * (vb - va), 1e-14);
        }
    }

    #[test]
    fn set_value_works() {
        let m = EvolutionManager::new();

        let mut ev = Evolution::table(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        ev.set_value(2.0, 4.0).unwrap();
        assert_eq!(ev.value(1.5, &m), Ok(2.5));
        ev.set_value(2.0, 3.0).unwrap();
        assert_eq!(ev.value(2.0, &m), Ok(3.0));

        let mut ev = Evolution::formula(&[], |t, _| 2.0 * t);
        ev.set_value(1.0, -1.0).unwrap();
        assert_eq!(ev.value(0.5, &m), Ok(1.0));
        assert_eq!(ev.value(1.0, &m), Ok(-1.0));

        let mut ev = Evolution::constant(1.0);
        assert_eq!(ev.set_value(0.0, 2.0).err(), Some("cannot set the value of a constant evolution"));
        let mut ev = Evolution::external(|t| t);
        assert_eq!(ev.set_value(0.0, 2.0).err(), Some("cannot set the value of an external evolution"));
    }

    #[test]
    fn external_and_constant_work() {
        let m = EvolutionManager::new();
        let ev = Evolution::external(|t| t * t);
        assert_eq!(ev.value(3.0, &m), Ok(9.0));
        assert!(!ev.is_constant());
        let ev = Evolution::constant(7.0);
        assert_eq!(ev.value(123.0, &m), Ok(7.0));
        assert!(ev.is_constant());
        assert_eq!(format!("{:?}", ev), "Constant(7.0)");
    }
}
