use serde::{Deserialize, Serialize};

/// Defines the kind of stiffness operator requested from the behaviour
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum StiffnessType {
    /// Elastic operator
    Elastic,

    /// Secant operator
    Secant,

    /// Continuum tangent operator
    Tangent,

    /// Consistent (algorithmic) tangent operator
    ConsistentTangent,
}

/// Defines how the first trial of a time step is computed
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Prediction {
    /// The trial equals the committed state
    None,

    /// Linear extrapolation from the two last committed states
    Linear,

    /// Solves the constraints once with the elastic operator
    Elastic,

    /// Solves the constraints once with the secant operator
    Secant,

    /// Solves the constraints once with the tangent operator
    Tangent,
}

impl Prediction {
    /// Returns the stiffness operator employed by an operator-based prediction
    pub fn stiffness(&self) -> Option<StiffnessType> {
        match self {
            Prediction::Elastic => Some(StiffnessType::Elastic),
            Prediction::Secant => Some(StiffnessType::Secant),
            Prediction::Tangent => Some(StiffnessType::Tangent),
            _ => None,
        }
    }
}

/// Defines the normalisation factor multiplying the Lagrange multiplier equations
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum LagrangeScaling {
    /// Uses the largest absolute value of the first assembled stiffness matrix
    Auto,

    /// Uses the given (positive) factor
    Fixed(f64),
}

/// Identifies a quantity of the material point
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Quantity {
    /// Driving variable (strain) component
    DrivingVariable(usize),

    /// Thermodynamic force (stress) component
    ThermodynamicForce(usize),

    /// Internal variable
    InternalVariable(usize),
}

impl Quantity {
    /// Extracts the quantity from the arrays of driving variables, forces, and internal variables
    ///
    /// Returns None if the index is out of range.
    pub fn extract(&self, e: &[f64], s: &[f64], iv: &[f64]) -> Option<f64> {
        match *self {
            Quantity::DrivingVariable(i) => e.get(i).copied(),
            Quantity::ThermodynamicForce(i) => s.get(i).copied(),
            Quantity::InternalVariable(i) => iv.get(i).copied(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
