use super::{ConstraintArgs, ConstraintTrait};
use crate::base::{Evolution, EvolutionManager, UnresolvedReference};
use russell_lab::{Matrix, Vector};

/// Imposes the evolution of one thermodynamic force (e.g., a stress component)
///
/// No Lagrange multiplier is needed; the target is subtracted from the residual:
///
/// ```text
/// r[c] -= target(t+Δt)
/// ```
pub struct ImposedThermodynamicForce {
    name: String,
    component: usize,
    target: Evolution,
}

impl ImposedThermodynamicForce {
    /// Allocates a new instance
    pub fn new(name: &str, component: usize, target: Evolution) -> Self {
        ImposedThermodynamicForce {
            name: name.to_string(),
            component,
            target,
        }
    }
}

impl ConstraintTrait for ImposedThermodynamicForce {
    fn description(&self) -> String {
        format!("imposed thermodynamic force {}", self.name)
    }

    fn component(&self) -> usize {
        self.component
    }

    fn target(&self) -> &Evolution {
        &self.target
    }

    fn n_lagrange_multipliers(&self) -> usize {
        0
    }

    fn set_values(&self, _kk: &mut Matrix, rr: &mut Vector, args: &ConstraintArgs) -> Result<(), UnresolvedReference> {
        let value = self.target.value(args.t + args.dt, args.evolutions)?;
        rr[self.component] -= value;
        Ok(())
    }

    fn check_convergence(
        &self,
        _u: &Vector,
        s: &Vector,
        _eeps: f64,
        seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> Result<bool, UnresolvedReference> {
        let value = self.target.value(t + dt, evolutions)?;
        let err = f64::abs(s[self.component] - value);
        Ok(err.is_finite() && err < seps)
    }

    fn failed_criterion_diagnostic(
        &self,
        _u: &Vector,
        s: &Vector,
        _eeps: f64,
        seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> String {
        match self.target.value(t + dt, evolutions) {
            Ok(value) => format!(
                "{}: |{:e} - {:e}| = {:e} is not below {:e}",
                self.description(),
                s[self.component],
                value,
                f64::abs(s[self.component] - value),
                seps
            ),
            Err(err) => format!("{}: {}", self.description(), err),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ImposedThermodynamicForce;
    use crate::base::{Evolution, EvolutionManager};
    use crate::solver::{ConstraintArgs, ConstraintTrait};
    use russell_lab::{Matrix, Vector};

    #[test]
    fn set_values_and_check_convergence_work() {
        let evolutions = EvolutionManager::new();
        let constraint = ImposedThermodynamicForce::new("SXX", 0, Evolution::table(&[0.0, 1.0], &[0.0, 100.0]).unwrap());
        assert_eq!(constraint.description(), "imposed thermodynamic force SXX");
        assert_eq!(constraint.n_lagrange_multipliers(), 0);

        let u = Vector::new(2);
        let s1 = Vector::from(&[40.0, 0.0]);
        let mut kk = Matrix::new(2, 2);
        let mut rr = Vector::from(&[40.0, 0.0]);
        let args = ConstraintArgs {
            u0: &u,
            u1: &u,
            s1: &s1,
            lagrange_pos: 2,
            t: 0.0,
            dt: 0.5,
            a: 1.0,
            evolutions: &evolutions,
        };
        constraint.set_values(&mut kk, &mut rr, &args).unwrap();
        assert_eq!(rr.as_data(), &[-10.0, 0.0]);
        assert_eq!(kk.get(0, 0), 0.0);

        assert_eq!(constraint.check_convergence(&u, &s1, 1e-12, 1e-3, 0.0, 0.4, &evolutions), Ok(true));
        assert_eq!(constraint.check_convergence(&u, &s1, 1e-12, 1e-3, 0.0, 0.5, &evolutions), Ok(false));
        let msg = constraint.failed_criterion_diagnostic(&u, &s1, 1e-12, 1e-3, 0.0, 0.5, &evolutions);
        assert!(msg.starts_with("imposed thermodynamic force SXX: "));
    }
}
