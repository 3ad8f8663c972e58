use super::{ConstraintArgs, ConstraintTrait};
use crate::base::{Evolution, EvolutionManager, UnresolvedReference};
use russell_lab::{Matrix, Vector};

/// Imposes the evolution of one driving variable (e.g., a strain component)
///
/// The constraint `u[c] = target(t+Δt)` is enforced by one Lagrange multiplier λ at
/// position p of the unknowns vector, scaled by the normalisation factor `a`:
///
/// ```text
/// K[c,p] += a    K[p,c] += a
/// r[c]   += a λ
/// r[p]   -= a (target(t+Δt) - u[c])
/// ```
pub struct ImposedDrivingVariable {
    name: String,
    component: usize,
    target: Evolution,
}

impl ImposedDrivingVariable {
    /// Allocates a new instance
    pub fn new(name: &str, component: usize, target: Evolution) -> Self {
        ImposedDrivingVariable {
            name: name.to_string(),
            component,
            target,
        }
    }
}

impl ConstraintTrait for ImposedDrivingVariable {
    fn description(&self) -> String {
        format!("imposed driving variable {}", self.name)
    }

    fn component(&self) -> usize {
        self.component
    }

    fn target(&self) -> &Evolution {
        &self.target
    }

    fn n_lagrange_multipliers(&self) -> usize {
        1
    }

    fn set_values(&self, kk: &mut Matrix, rr: &mut Vector, args: &ConstraintArgs) -> Result<(), UnresolvedReference> {
        let (c, p, a) = (self.component, args.lagrange_pos, args.a);
        let value = self.target.value(args.t + args.dt, args.evolutions)?;
        kk.set(c, p, kk.get(c, p) + a);
        kk.set(p, c, kk.get(p, c) + a);
        rr[c] += a * args.u1[p];
        rr[p] -= a * (value - args.u1[c]);
        Ok(())
    }

    fn check_convergence(
        &self,
        u: &Vector,
        _s: &Vector,
        eeps: f64,
        _seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> Result<bool, UnresolvedReference> {
        let value = self.target.value(t + dt, evolutions)?;
        let err = f64::abs(u[self.component] - value);
        Ok(err.is_finite() && err < eeps)
    }

    fn failed_criterion_diagnostic(
        &self,
        u: &Vector,
        _s: &Vector,
        eeps: f64,
        _seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> String {
        match self.target.value(t + dt, evolutions) {
            Ok(value) => format!(
                "{}: |{:e} - {:e}| = {:e} is not below {:e}",
                self.description(),
                u[self.component],
                value,
                f64::abs(u[self.component] - value),
                eeps
            ),
            Err(err) => format!("{}: {}", self.description(), err),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
