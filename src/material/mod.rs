//! Implements the material point state and the constitutive behaviours

mod behaviour;
mod current_state;
mod linear_elastic;
mod von_mises;
pub use crate::material::behaviour::*;
pub use crate::material::current_state::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::von_mises::*;
