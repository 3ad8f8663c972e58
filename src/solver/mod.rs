//! Implements the material point test driver

mod acceleration;
mod aitken;
mod constraint;
mod control_convergence;
mod control_time;
mod error;
mod imposed_driving_variable;
mod imposed_thermodynamic_force;
mod irons_tuck;
mod linear_system_lag;
mod output;
mod registry;
mod steffensen;
mod test_driver;
pub use crate::solver::acceleration::*;
pub use crate::solver::aitken::*;
pub use crate::solver::constraint::*;
pub use crate::solver::control_convergence::*;
pub use crate::solver::control_time::*;
pub use crate::solver::error::*;
pub use crate::solver::imposed_driving_variable::*;
pub use crate::solver::imposed_thermodynamic_force::*;
pub use crate::solver::irons_tuck::*;
pub use crate::solver::linear_system_lag::*;
pub use crate::solver::output::*;
pub use crate::solver::registry::*;
pub use crate::solver::steffensen::*;
pub use crate::solver::test_driver::*;
