use super::TestResult;
use crate::base::{Evolution, EvolutionManager};
use russell_lab::Vector;

/// Specifies the essential functions of validators checking the committed states of a test
///
/// A failed validation never aborts the test; the outcomes are collected by `results`.
pub trait UTestTrait: Send {
    /// Checks the committed state at the end of a time step
    ///
    /// # Input
    ///
    /// * `e` -- driving variables at t+Δt
    /// * `s` -- thermodynamic forces at t+Δt
    /// * `iv` -- internal variables at t+Δt
    /// * `t` -- time at the beginning of the time step
    /// * `dt` -- time increment
    /// * `period` -- number of committed time steps (including this one)
    /// * `evolutions` -- all evolutions (to resolve formulas)
    fn check(
        &mut self,
        e: &Vector,
        s: &Vector,
        iv: &Vector,
        t: f64,
        dt: f64,
        period: usize,
        evolutions: &EvolutionManager,
    );

    /// Returns the outcome of all checks
    fn results(&self) -> TestResult;

    /// Returns the evolutions evaluated by the validator (to check them before running)
    fn evolutions(&self) -> Vec<&Evolution> {
        Vec::new()
    }
}
