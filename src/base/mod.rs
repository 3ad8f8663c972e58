//! Implements the base structures for a material point test

mod config;
mod constants;
mod enums;
mod evolution;
mod evolution_manager;
mod idealization;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::evolution::*;
pub use crate::base::evolution_manager::*;
pub use crate::base::idealization::*;
