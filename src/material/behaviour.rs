use crate::base::{Hypothesis, StiffnessType};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_tensor::{Mandel, Tensor2};

/// Holds the input data of a behaviour integration over one time increment
pub struct BehaviourInput<'a> {
    /// Rotation matrix from the global frame to the material frame
    pub rotation: &'a Matrix,

    /// Driving variables (mechanical strain) at the beginning of the time step
    pub e0: &'a Vector,

    /// Increment of the driving variables (mechanical strain)
    pub de: &'a Vector,

    /// Thermodynamic forces at the beginning of the time step
    pub s0: &'a Vector,

    /// Material properties at the end of the time step
    pub mprops: &'a Vector,

    /// Internal variables at the beginning of the time step
    pub iv0: &'a Vector,

    /// External state variables at the beginning of the time step
    pub esv0: &'a Vector,

    /// Increments of the external state variables
    pub desv: &'a Vector,

    /// Modelling hypothesis
    pub hypothesis: Hypothesis,

    /// Time increment (must be positive)
    pub dt: f64,

    /// Requested stiffness operator
    pub stiffness: StiffnessType,
}

/// Holds the output data of a behaviour integration
pub struct BehaviourOutput {
    /// Stiffness operator (n_force × n_driving)
    pub kt: Matrix,

    /// Thermodynamic forces at the end of the time step
    pub s1: Vector,

    /// Internal variables at the end of the time step
    pub iv1: Vector,
}

impl BehaviourOutput {
    /// Allocates a new instance
    pub fn new(n_driving: usize, n_force: usize, n_internal: usize) -> Self {
        BehaviourOutput {
            kt: Matrix::new(n_force, n_driving),
            s1: Vector::new(n_force),
            iv1: Vector::new(n_internal),
        }
    }
}

/// Specifies the essential functions of a constitutive behaviour
///
/// The behaviour is a black box integrating the constitutive equations over a time step.
pub trait BehaviourTrait: Send {
    /// Returns the number of driving variables (e.g., strain components)
    fn n_driving_variables(&self, hypothesis: Hypothesis) -> usize {
        hypothesis.n_components()
    }

    /// Returns the number of thermodynamic forces (e.g., stress components)
    fn n_thermodynamic_forces(&self, hypothesis: Hypothesis) -> usize {
        hypothesis.n_components()
    }

    /// Returns the names of the material properties (in the order of BehaviourInput::mprops)
    fn material_property_names(&self) -> Vec<String>;

    /// Returns the names of the internal variables
    fn internal_variable_names(&self) -> Vec<String>;

    /// Returns the names of the external state variables (in the order of BehaviourInput::esv0)
    fn external_state_variable_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Integrates the behaviour over the time increment
    ///
    /// Returns `Ok(false)` if the local integration did not converge (the caller may
    /// then retry with a smaller time increment). Errors are unrecoverable.
    fn integrate(&mut self, input: &BehaviourInput, output: &mut BehaviourOutput) -> Result<bool, StrError>;
}

/// Allocates a second-order tensor with the values of a Mandel vector
pub(crate) fn tensor_from_vector(mandel: Mandel, v: &Vector) -> Result<Tensor2, StrError> {
    let mut tt = Tensor2::new(mandel);
    if v.dim() != tt.vector().dim() {
        return Err("vector dimension is incompatible with the modelling hypothesis");
    }
    let data = tt.vector_mut();
    for i in 0..v.dim() {
        data[i] = v[i];
    }
    Ok(tt)
}

/// Checks the consistency of the input and output data
pub(crate) fn check_dimensions(input: &BehaviourInput, output: &BehaviourOutput, n_mprops: usize) -> Result<(), StrError> {
    let n = input.hypothesis.n_components();
    if input.e0.dim() != n || input.de.dim() != n || input.s0.dim() != n || output.s1.dim() != n {
        return Err("array sizes are inconsistent with the modelling hypothesis");
    }
    if output.kt.dims() != (n, n) {
        return Err("stiffness matrix dimensions are inconsistent with the modelling hypothesis");
    }
    if input.mprops.dim() != n_mprops {
        return Err("the number of material properties is incorrect");
    }
    if input.dt <= 0.0 {
        return Err("the time increment must be positive");
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
