use russell_tensor::Mandel;
use serde::{Deserialize, Serialize};

/// Holds the names of the driving variables (strain) in 3D
const DV_3D: [&str; 6] = ["EXX", "EYY", "EZZ", "EXY", "EYZ", "EXZ"];

/// Holds the names of the thermodynamic forces (stress) in 3D
const TF_3D: [&str; 6] = ["SXX", "SYY", "SZZ", "SXY", "SYZ", "SXZ"];

/// Holds the names of the driving variables (strain) in plane-strain
const DV_PLANE: [&str; 4] = ["EXX", "EYY", "EZZ", "EXY"];

/// Holds the names of the thermodynamic forces (stress) in plane-strain
const TF_PLANE: [&str; 4] = ["SXX", "SYY", "SZZ", "SXY"];

/// Holds the names of the driving variables (strain) with axisymmetry
const DV_AXISYM: [&str; 4] = ["ERR", "EZZ", "ETT", "ERZ"];

/// Holds the names of the thermodynamic forces (stress) with axisymmetry
const TF_AXISYM: [&str; 4] = ["SRR", "SZZ", "STT", "SRZ"];

/// Defines the modelling hypothesis
///
/// The components follow the Mandel representation; thus the off-diagonal
/// components of strain and stress are multiplied by √2.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Hypothesis {
    /// Full 3D case with 6 components
    Tridimensional,

    /// Plane-strain case with 4 components (xx, yy, zz, xy)
    PlaneStrain,

    /// Axisymmetric case with 4 components (rr, zz, θθ, rz)
    Axisymmetrical,
}

impl Hypothesis {
    /// Returns the symmetric Mandel representation associated with the hypothesis
    pub fn mandel(&self) -> Mandel {
        match self {
            Hypothesis::Tridimensional => Mandel::Symmetric,
            _ => Mandel::Symmetric2D,
        }
    }

    /// Indicates a 2D case
    pub fn two_dim(&self) -> bool {
        *self != Hypothesis::Tridimensional
    }

    /// Returns the number of components of the strain and stress tensors
    pub fn n_components(&self) -> usize {
        self.mandel().dim()
    }

    /// Returns the names of the driving variables
    pub fn driving_variable_names(&self) -> &'static [&'static str] {
        match self {
            Hypothesis::Tridimensional => &DV_3D,
            Hypothesis::PlaneStrain => &DV_PLANE,
            Hypothesis::Axisymmetrical => &DV_AXISYM,
        }
    }

    /// Returns the names of the thermodynamic forces
    pub fn thermodynamic_force_names(&self) -> &'static [&'static str] {
        match self {
            Hypothesis::Tridimensional => &TF_3D,
            Hypothesis::PlaneStrain => &TF_PLANE,
            Hypothesis::Axisymmetrical => &TF_AXISYM,
        }
    }

    /// Returns the index of a driving variable given its name
    pub fn driving_variable_index(&self, name: &str) -> Option<usize> {
        self.driving_variable_names().iter().position(|n| *n == name)
    }

    /// Returns the index of a thermodynamic force given its name
    pub fn thermodynamic_force_index(&self, name: &str) -> Option<usize> {
        self.thermodynamic_force_names().iter().position(|n| *n == name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
