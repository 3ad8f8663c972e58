use super::{check_dimensions, BehaviourInput, BehaviourOutput, BehaviourTrait};
use crate::StrError;
use russell_tensor::LinElasticity;

/// Holds the index of the Young modulus in the material properties
const YOUNG: usize = 0;

/// Holds the index of the Poisson coefficient in the material properties
const POISSON: usize = 1;

/// Implements an isotropic linear elastic behaviour
///
/// Material properties: `YoungModulus` and `PoissonRatio`.
///
/// ```text
/// σ₁ = σ₀ + D : Δε
/// ```
pub struct LinearElastic {}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new() -> Self {
        LinearElastic {}
    }
}

impl BehaviourTrait for LinearElastic {
    fn material_property_names(&self) -> Vec<String> {
        vec!["YoungModulus".to_string(), "PoissonRatio".to_string()]
    }

    fn internal_variable_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Updates the stress; any stiffness type yields the elastic modulus
    fn integrate(&mut self, input: &BehaviourInput, output: &mut BehaviourOutput) -> Result<bool, StrError> {
        check_dimensions(input, output, 2)?;
        let young = input.mprops[YOUNG];
        let poisson = input.mprops[POISSON];
        if young <= 0.0 {
            return Err("YoungModulus must be positive");
        }
        let model = LinElasticity::new(young, poisson, input.hypothesis.two_dim(), false);
        let dd = model.get_modulus().matrix();
        let n = input.s0.dim();
        for i in 0..n {
            output.s1[i] = input.s0[i];
            for j in 0..n {
                output.s1[i] += dd.get(i, j) * input.de[j]; // σ += D : Δε
                output.kt.set(i, j, dd.get(i, j));
            }
        }
        Ok(true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearElastic;
    use crate::base::{Hypothesis, StiffnessType};
    use crate::material::{BehaviourInput, BehaviourOutput, BehaviourTrait};
    use russell_lab::{approx_eq, Matrix, Vector};

    #[test]
    fn names_work() {
        let model = LinearElastic::new();
        assert_eq!(model.material_property_names(), &["YoungModulus", "PoissonRatio"]);
        assert_eq!(model.internal_variable_names().len(), 0);
        assert_eq!(model.external_state_variable_names().len(), 0);
        assert_eq!(model.n_driving_variables(Hypothesis::Tridimensional), 6);
        assert_eq!(model.n_thermodynamic_forces(Hypothesis::PlaneStrain), 4);
    }

    #[test]
    fn integrate_works() {
        let (young, poisson) = (200_000.0, 0.25);
        let rotation = Matrix::identity(3);
        let e0 = Vector::new(6);
        let de = Vector::from(&[1e-3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let s0 = Vector::from(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mprops = Vector::from(&[young, poisson]);
        let empty = Vector::new(0);
        let input = BehaviourInput {
            rotation: &rotation,
            e0: &e0,
            de: &de,
            s0: &s0,
            mprops: &mprops,
            iv0: &empty,
            esv0: &empty,
            desv: &empty,
            hypothesis: Hypothesis::Tridimensional,
            dt: 1.0,
            stiffness: StiffnessType::ConsistentTangent,
        };
        let mut output = BehaviourOutput::new(6, 6, 0);
        let mut model = LinearElastic::new();
        assert_eq!(model.integrate(&input, &mut output), Ok(true));

        // D₀₀ = E (1-ν) / ((1+ν)(1-2ν)), D₀₁ = E ν / ((1+ν)(1-2ν))
        let c = young / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
        approx_eq(output.kt.get(0, 0), c * (1.0 - poisson), 1e-9);
        approx_eq(output.kt.get(0, 1), c * poisson, 1e-9);
        approx_eq(output.kt.get(3, 3), young / (1.0 + poisson), 1e-9);
        approx_eq(output.s1[0], 10.0 + c * (1.0 - poisson) * 1e-3, 1e-9);
        approx_eq(output.s1[1], c * poisson * 1e-3, 1e-9);
        approx_eq(output.s1[3], 0.0, 1e-15);
    }

    #[test]
    fn integrate_captures_errors() {
        let rotation = Matrix::identity(3);
        let v = Vector::new(4);
        let mprops = Vector::from(&[0.0, 0.3]);
        let empty = Vector::new(0);
        let input = BehaviourInput {
            rotation: &rotation,
            e0: &v,
            de: &v,
            s0: &v,
            mprops: &mprops,
            iv0: &empty,
            esv0: &empty,
            desv: &empty,
            hypothesis: Hypothesis::PlaneStrain,
            dt: 1.0,
            stiffness: StiffnessType::Elastic,
        };
        let mut output = BehaviourOutput::new(4, 4, 0);
        let mut model = LinearElastic::new();
        assert_eq!(model.integrate(&input, &mut output).err(), Some("YoungModulus must be positive"));
    }
}
