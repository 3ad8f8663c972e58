use super::{Hypothesis, LagrangeScaling, Prediction, StiffnessType, CONFIG_MIN_DT_MIN, CONFIG_MIN_TOL};
use russell_lab::Matrix;
use std::fmt;

/// Holds configuration parameters for the material point test
pub struct Config {
    /// Modelling hypothesis
    pub hypothesis: Hypothesis,

    /// Maximum number of Newton iterations per time step
    pub n_max_iterations: usize,

    /// Maximum number of sub-steps (failed attempts) per period of the loading path
    pub n_max_sub_steps: usize,

    /// Minimum allowed time increment min(Δt)
    pub dt_min: f64,

    /// Absolute tolerance on the driving variables (strain)
    pub tol_driving: f64,

    /// Absolute tolerance on the thermodynamic forces (stress)
    pub tol_force: f64,

    /// Stiffness operator requested during the Newton iterations
    pub stiffness: StiffnessType,

    /// Prediction policy at the beginning of each time step
    pub prediction: Prediction,

    /// Normalisation factor of the Lagrange multiplier equations
    pub lagrange_scaling: LagrangeScaling,

    /// Rotation matrix from the global frame to the material frame (3 × 3)
    pub rotation: Matrix,

    /// Compares the stiffness given by the behaviour with a finite difference approximation
    pub compare_to_numerical_tangent: bool,

    /// Perturbation of the driving variables used by the numerical tangent
    pub numerical_tangent_perturbation: f64,

    /// Tolerance (relative to max |Kᵢⱼ|) used when comparing with the numerical tangent
    pub numerical_tangent_tolerance: f64,

    /// Verbose mode during timesteps
    pub verbose_timesteps: bool,

    /// Verbose mode during iterations
    pub verbose_iterations: bool,

    /// Verbose mode when a time step is sub-divided
    pub verbose_sub_steps: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new(hypothesis: Hypothesis) -> Self {
        Config {
            hypothesis,
            n_max_iterations: 100,
            n_max_sub_steps: 10,
            dt_min: CONFIG_MIN_DT_MIN,
            tol_driving: 1e-12,
            tol_force: 1e-3,
            stiffness: StiffnessType::ConsistentTangent,
            prediction: Prediction::Tangent,
            lagrange_scaling: LagrangeScaling::Auto,
            rotation: Matrix::identity(3),
            compare_to_numerical_tangent: false,
            numerical_tangent_perturbation: 1e-7,
            numerical_tangent_tolerance: 1e-3,
            verbose_timesteps: false,
            verbose_iterations: false,
            verbose_sub_steps: false,
        }
    }

    /// Sets the maximum number of Newton iterations
    pub fn set_n_max_iterations(&mut self, value: usize) -> &mut Self {
        self.n_max_iterations = value;
        self
    }

    /// Sets the maximum number of sub-steps per period
    pub fn set_n_max_sub_steps(&mut self, value: usize) -> &mut Self {
        self.n_max_sub_steps = value;
        self
    }

    /// Sets the minimum allowed time increment
    pub fn set_dt_min(&mut self, value: f64) -> &mut Self {
        self.dt_min = value;
        self
    }

    /// Sets the tolerances on the driving variables and thermodynamic forces
    pub fn set_tolerances(&mut self, tol_driving: f64, tol_force: f64) -> &mut Self {
        self.tol_driving = tol_driving;
        self.tol_force = tol_force;
        self
    }

    /// Sets the stiffness operator used in the Newton iterations
    pub fn set_stiffness(&mut self, value: StiffnessType) -> &mut Self {
        self.stiffness = value;
        self
    }

    /// Sets the prediction policy
    pub fn set_prediction(&mut self, value: Prediction) -> &mut Self {
        self.prediction = value;
        self
    }

    /// Sets the normalisation factor of the Lagrange multiplier equations
    pub fn set_lagrange_scaling(&mut self, value: LagrangeScaling) -> &mut Self {
        self.lagrange_scaling = value;
        self
    }

    /// Enables the comparison with the numerical tangent
    pub fn set_compare_to_numerical_tangent(&mut self, flag: bool, perturbation: f64, tolerance: f64) -> &mut Self {
        self.compare_to_numerical_tangent = flag;
        self.numerical_tangent_perturbation = perturbation;
        self.numerical_tangent_tolerance = tolerance;
        self
    }

    /// Sets the verbose flags
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool, sub_steps: bool) -> &mut Self {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self.verbose_sub_steps = sub_steps;
        self
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.n_max_iterations < 1 {
            return Some(format!(
                "n_max_iterations = {} is incorrect; it must be ≥ 1",
                self.n_max_iterations
            ));
        }
        if self.n_max_sub_steps < 1 {
            return Some(format!(
                "n_max_sub_steps = {} is incorrect; it must be ≥ 1",
                self.n_max_sub_steps
            ));
        }
        if self.dt_min < CONFIG_MIN_DT_MIN {
            return Some(format!(
                "dt_min = {:?} is incorrect; it must be ≥ {:e}",
                self.dt_min, CONFIG_MIN_DT_MIN
            ));
        }
        if self.tol_driving < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_driving = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_driving, CONFIG_MIN_TOL
            ));
        }
        if self.tol_force < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_force = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_force, CONFIG_MIN_TOL
            ));
        }
        if let LagrangeScaling::Fixed(a) = self.lagrange_scaling {
            if !(a > 0.0) {
                return Some(format!("lagrange_scaling = {:?} is incorrect; it must be > 0.0", a));
            }
        }
        if self.rotation.dims() != (3, 3) {
            return Some(format!(
                "rotation has dims = {:?} which is incorrect; it must be (3, 3)",
                self.rotation.dims()
            ));
        }
        if self.numerical_tangent_perturbation <= 0.0 {
            return Some(format!(
                "numerical_tangent_perturbation = {:?} is incorrect; it must be > 0.0",
                self.numerical_tangent_perturbation
            ));
        }
        if !(self.numerical_tangent_tolerance >= 0.0) {
            return Some(format!(
                "numerical_tangent_tolerance = {:?} is incorrect; it must be ≥ 0.0",
                self.numerical_tangent_tolerance
            ));
        }
        None // all good
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "hypothesis = {:?}\n", self.hypothesis)?;
        write!(f, "n_max_iterations = {:?}\n", self.n_max_iterations)?;
        write!(f, "n_max_sub_steps = {:?}\n", self.n_max_sub_steps)?;
        write!(f, "dt_min = {:?}\n", self.dt_min)?;
        write!(f, "tol_driving = {:?}\n", self.tol_driving)?;
        write!(f, "tol_force = {:?}\n", self.tol_force)?;
        write!(f, "stiffness = {:?}\n", self.stiffness)?;
        write!(f, "prediction = {:?}\n", self.prediction)?;
        write!(f, "lagrange_scaling = {:?}\n", self.lagrange_scaling)?;
        write!(f, "compare_to_numerical_tangent = {:?}\n", self.compare_to_numerical_tangent)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
