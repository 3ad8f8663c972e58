use super::{check_dimensions, tensor_from_vector, BehaviourInput, BehaviourOutput, BehaviourTrait};
use crate::base::StiffnessType;
use crate::StrError;
use russell_tensor::{t4_ddot_t2_update, LinElasticity, Tensor2};
use russell_tensor::{IDENTITY2, P_SYMDEV, SQRT_2_BY_3};

/// Defines an alias to IDENTITY2
const I: &[f64; 9] = &IDENTITY2;

/// Defines an alias to P_SYMDEV
const PSD: &[[f64; 9]; 9] = &P_SYMDEV;

/// Holds the index of the equivalent plastic strain in the internal variables
const P: usize = 0;

/// Implements the von Mises plasticity model with linear isotropic hardening
///
/// Material properties: `YoungModulus`, `PoissonRatio`, `YieldStress`, and `HardeningSlope`.
///
/// Internal variables: `EquivalentPlasticStrain`.
///
/// The yield function is:
///
/// ```text
/// f = σd - (σy + H p)
/// ```
///
/// The stress update employs the radial return algorithm.
///
/// **Note:** This model works in 2D (plane-strain and axisymmetric) or 3D.
pub struct VonMises {}

impl VonMises {
    /// Allocates a new instance
    pub fn new() -> Self {
        VonMises {}
    }
}

impl BehaviourTrait for VonMises {
    fn material_property_names(&self) -> Vec<String> {
        vec![
            "YoungModulus".to_string(),
            "PoissonRatio".to_string(),
            "YieldStress".to_string(),
            "HardeningSlope".to_string(),
        ]
    }

    fn internal_variable_names(&self) -> Vec<String> {
        vec!["EquivalentPlasticStrain".to_string()]
    }

    /// Updates the stress and the equivalent plastic strain
    ///
    /// The `Elastic` and `Secant` stiffness types both yield the elastic modulus.
    /// `Tangent` yields the continuum modulus and `ConsistentTangent` the algorithmic one.
    fn integrate(&mut self, input: &BehaviourInput, output: &mut BehaviourOutput) -> Result<bool, StrError> {
        check_dimensions(input, output, 4)?;
        if input.iv0.dim() != 1 || output.iv1.dim() != 1 {
            return Err("von Mises model requires one internal variable");
        }
        let (young, poisson) = (input.mprops[0], input.mprops[1]);
        let (sig_y, hh) = (input.mprops[2], input.mprops[3]);
        if young <= 0.0 || sig_y <= 0.0 {
            return Err("YoungModulus and YieldStress must be positive");
        }

        // elastic modulus
        let mandel = input.hypothesis.mandel();
        let lin_elasticity = LinElasticity::new(young, poisson, input.hypothesis.two_dim(), false);
        let (kk, gg) = lin_elasticity.get_bulk_shear();
        let dd = lin_elasticity.get_modulus();

        // trial stress: σ ← σ₀ + D : Δε
        let mut sigma = tensor_from_vector(mandel, input.s0)?;
        let delta_epsilon = tensor_from_vector(mandel, input.de)?;
        t4_ddot_t2_update(&mut sigma, 1.0, dd, &delta_epsilon, 1.0);

        // elastic update
        let p0 = input.iv0[P];
        let sigma_d_trial = sigma.invariant_sigma_d();
        let f_trial = sigma_d_trial - (sig_y + hh * p0);
        let nd = mandel.dim();
        if f_trial <= 0.0 {
            for i in 0..nd {
                output.s1[i] = sigma.vector()[i];
                for j in 0..nd {
                    output.kt.set(i, j, dd.matrix().get(i, j));
                }
            }
            output.iv1[P] = p0;
            return Ok(true);
        }

        // radial return
        let d = 3.0 * gg + hh;
        if d <= 0.0 {
            return Ok(false); // excessive softening
        }
        let lambda = f_trial / d;
        let m = 1.0 - lambda * 3.0 * gg / sigma_d_trial;
        let sigma_m_trial = sigma.invariant_sigma_m();
        let mut s = Tensor2::new(mandel);
        sigma.deviator(&mut s); // s ← s_trial
        let s_trial = s.vector();

        // σ_new = m s_trial + σm_trial I
        for i in 0..nd {
            output.s1[i] = m * s_trial[i] + sigma_m_trial * I[i];
        }
        output.iv1[P] = p0 + lambda;

        // stiffness
        match input.stiffness {
            StiffnessType::Elastic | StiffnessType::Secant => {
                for i in 0..nd {
                    for j in 0..nd {
                        output.kt.set(i, j, dd.matrix().get(i, j));
                    }
                }
            }
            StiffnessType::Tangent | StiffnessType::ConsistentTangent => {
                // the continuum tangent corresponds to λ → 0 in the first coefficient
                let lam = if input.stiffness == StiffnessType::Tangent {
                    0.0
                } else {
                    lambda
                };
                let sigma_d = sigma_d_trial - 3.0 * gg * lambda;
                let norm_s = sigma_d * SQRT_2_BY_3;
                let a = 2.0 * gg * (1.0 - lam * 3.0 * gg / sigma_d_trial);
                let b = 6.0 * gg * gg * (lam / sigma_d_trial - 1.0 / d) / (norm_s * norm_s);
                for i in 0..nd {
                    for j in 0..nd {
                        let sn_i = m * s_trial[i];
                        let sn_j = m * s_trial[j];
                        output.kt.set(i, j, a * PSD[i][j] + b * sn_i * sn_j + kk * I[i] * I[j]);
                    }
                }
            }
        }
        Ok(true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::VonMises;
    use crate::base::{Hypothesis, StiffnessType};
    use crate::material::{BehaviourInput, BehaviourOutput, BehaviourTrait};
    use russell_lab::{approx_eq, Matrix, Vector};
    use russell_tensor::{Mandel, Tensor2};

    const YOUNG: f64 = 1500.0;
    const POISSON: f64 = 0.25;
    const SIG_Y: f64 = 9.0;
    const HH: f64 = 800.0;

    fn run(hypothesis: Hypothesis, s0: &Vector, de: &Vector, p0: f64, stiffness: StiffnessType) -> BehaviourOutput {
        let n = hypothesis.n_components();
        let rotation = Matrix::identity(3);
        let e0 = Vector::new(n);
        let mprops = Vector::from(&[YOUNG, POISSON, SIG_Y, HH]);
        let iv0 = Vector::from(&[p0]);
        let empty = Vector::new(0);
        let input = BehaviourInput {
            rotation: &rotation,
            e0: &e0,
            de,
            s0,
            mprops: &mprops,
            iv0: &iv0,
            esv0: &empty,
            desv: &empty,
            hypothesis,
            dt: 1.0,
            stiffness,
        };
        let mut output = BehaviourOutput::new(n, n, 1);
        let mut model = VonMises::new();
        assert_eq!(model.integrate(&input, &mut output), Ok(true));
        output
    }

    fn sigma_d(mandel: Mandel, s: &Vector) -> f64 {
        let mut tt = Tensor2::new(mandel);
        for i in 0..s.dim() {
            tt.vector_mut()[i] = s[i];
        }
        tt.invariant_sigma_d()
    }

    #[test]
    fn names_work() {
        let model = VonMises::new();
        assert_eq!(model.material_property_names().len(), 4);
        assert_eq!(model.internal_variable_names(), &["EquivalentPlasticStrain"]);
    }

    #[test]
    fn elastic_update_works() {
        let s0 = Vector::new(6);
        let de = Vector::from(&[1e-3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let out = run(Hypothesis::Tridimensional, &s0, &de, 0.0, StiffnessType::ConsistentTangent);
        let c = YOUNG / ((1.0 + POISSON) * (1.0 - 2.0 * POISSON));
        approx_eq(out.s1[0], c * (1.0 - POISSON) * 1e-3, 1e-12);
        approx_eq(out.kt.get(0, 0), c * (1.0 - POISSON), 1e-12);
        assert_eq!(out.iv1[0], 0.0);
    }

    #[test]
    fn plastic_update_works() {
        // deviatoric strain increment large enough to yield
        let gg = YOUNG / (2.0 * (1.0 + POISSON));
        let s0 = Vector::new(4);
        let de = Vector::from(&[0.01, -0.01, 0.0, 0.0]);
        let out = run(Hypothesis::PlaneStrain, &s0, &de, 0.0, StiffnessType::ConsistentTangent);

        // trial: σd_trial = 3 G εd with εd = √(2/3) |Δε_dev|
        let eps_d = f64::sqrt(2.0 / 3.0) * f64::sqrt(0.01 * 0.01 * 2.0);
        let sigma_d_trial = 3.0 * gg * eps_d;
        let lambda = (sigma_d_trial - SIG_Y) / (3.0 * gg + HH);
        approx_eq(out.iv1[0], lambda, 1e-12);

        // the new stress lies on the hardened yield surface
        let sd = sigma_d(Mandel::Symmetric2D, &out.s1);
        approx_eq(sd, SIG_Y + HH * lambda, 1e-10);
    }

    #[test]
    fn consistent_tangent_matches_finite_differences() {
        let s0 = Vector::new(6);
        let de = Vector::from(&[0.008, -0.002, 0.001, 0.003, 0.0, 0.001]);
        let out = run(Hypothesis::Tridimensional, &s0, &de, 0.0, StiffnessType::ConsistentTangent);
        let h = 1e-7;
        for j in 0..6 {
            let mut de_p = de.clone();
            let mut de_m = de.clone();
            de_p[j] += h;
            de_m[j] -= h;
            let out_p = run(Hypothesis::Tridimensional, &s0, &de_p, 0.0, StiffnessType::Elastic);
            let out_m = run(Hypothesis::Tridimensional, &s0, &de_m, 0.0, StiffnessType::Elastic);
            for i in 0..6 {
                let num = (out_p.s1[i] - out_m.s1[i]) / (2.0 * h);
                approx_eq(out.kt.get(i, j), num, 1e-4);
            }
        }
    }

    #[test]
    fn elastic_stiffness_is_returned_on_request() {
        let s0 = Vector::new(4);
        let de = Vector::from(&[0.01, -0.01, 0.0, 0.0]);
        let out = run(Hypothesis::PlaneStrain, &s0, &de, 0.0, StiffnessType::Elastic);
        let c = YOUNG / ((1.0 + POISSON) * (1.0 - 2.0 * POISSON));
        approx_eq(out.kt.get(0, 0), c * (1.0 - POISSON), 1e-12);
        assert!(out.iv1[0] > 0.0);
    }

    #[test]
    fn secant_stiffness_equals_elastic_stiffness() {
        let s0 = Vector::new(4);
        let de = Vector::from(&[0.01, -0.01, 0.0, 0.0]);
        let elastic = run(Hypothesis::PlaneStrain, &s0, &de, 0.0, StiffnessType::Elastic);
        let secant = run(Hypothesis::PlaneStrain, &s0, &de, 0.0, StiffnessType::Secant);
        assert!(secant.iv1[0] > 0.0);
        for i in 0..4 {
            assert_eq!(secant.s1[i], elastic.s1[i]);
            for j in 0..4 {
                assert_eq!(secant.kt.get(i, j), elastic.kt.get(i, j));
            }
        }
    }
}
