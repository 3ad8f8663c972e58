//! Pmtest drives nonlinear constitutive behaviours along a loading path at a single material point
//!
//! The loading path imposes the evolution of some driving variables (e.g., strain) and
//! thermodynamic forces (e.g., stress); the remaining components are found by Newton
//! iterations with Lagrange multipliers, and the committed states may be checked by
//! validators against reference or analytical results.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod material;
pub mod prelude;
pub mod solver;
pub mod util;
