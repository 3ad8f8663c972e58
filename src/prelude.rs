//! Makes available common structures needed to run a material point test
//!
//! You may write `use pmtest::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, Evolution, EvolutionManager, Hypothesis, LagrangeScaling, Prediction, Quantity};
pub use crate::base::{StiffnessType, DEFAULT_TEST_DIR};
pub use crate::material::{BehaviourInput, BehaviourOutput, BehaviourTrait, LinearElastic, VonMises};
pub use crate::solver::{DriverError, Registry, TestDriver, TestOutput};
pub use crate::util::{plot_results, AnalyticalComparison, ReferenceComparison, ReferenceTable, TestResult};
pub use crate::StrError;
