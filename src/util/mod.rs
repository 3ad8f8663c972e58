//! Implements the validators and some utilities to post-process the results

mod analytical_comparison;
mod plotter;
mod reference_comparison;
mod reference_data;
mod test_result;
mod utest;
pub use crate::util::analytical_comparison::*;
pub use crate::util::plotter::*;
pub use crate::util::reference_comparison::*;
pub use crate::util::reference_data::*;
pub use crate::util::test_result::*;
pub use crate::util::utest::*;
