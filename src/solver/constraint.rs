use crate::base::{Evolution, EvolutionManager, UnresolvedReference};
use russell_lab::{Matrix, Vector};

/// Holds the arguments passed to the constraints when assembling the linear system
pub struct ConstraintArgs<'a> {
    /// Unknowns at the beginning of the time step
    pub u0: &'a Vector,

    /// Unknowns (trial)
    pub u1: &'a Vector,

    /// Thermodynamic forces (trial)
    pub s1: &'a Vector,

    /// Position of the first Lagrange multiplier of the constraint in the unknowns vector
    pub lagrange_pos: usize,

    /// Time at the beginning of the time step
    pub t: f64,

    /// Time increment
    pub dt: f64,

    /// Normalisation factor of the Lagrange multiplier equations
    pub a: f64,

    /// All evolutions (to resolve formulas)
    pub evolutions: &'a EvolutionManager,
}

/// Specifies the essential functions of constraints imposed on the material point
pub trait ConstraintTrait: Send {
    /// Returns a short description such as "imposed driving variable EXX"
    fn description(&self) -> String;

    /// Returns the index of the constrained component
    fn component(&self) -> usize;

    /// Returns the evolution giving the imposed value
    fn target(&self) -> &Evolution;

    /// Returns the number of Lagrange multipliers owned by the constraint
    fn n_lagrange_multipliers(&self) -> usize;

    /// Adds the contributions of the constraint to the stiffness matrix and residual vector
    fn set_values(&self, kk: &mut Matrix, rr: &mut Vector, args: &ConstraintArgs) -> Result<(), UnresolvedReference>;

    /// Checks whether the constraint is satisfied by the current unknowns and forces
    fn check_convergence(
        &self,
        u: &Vector,
        s: &Vector,
        eeps: f64,
        seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> Result<bool, UnresolvedReference>;

    /// Returns a description of the failed convergence criterion
    fn failed_criterion_diagnostic(
        &self,
        u: &Vector,
        s: &Vector,
        eeps: f64,
        seps: f64,
        t: f64,
        dt: f64,
        evolutions: &EvolutionManager,
    ) -> String;
}
