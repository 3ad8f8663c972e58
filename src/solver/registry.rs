use super::{AccelerationTrait, Aitken, ConstraintTrait, ImposedDrivingVariable, ImposedThermodynamicForce};
use super::{IronsTuck, Steffensen};
use crate::base::Evolution;
use crate::material::{BehaviourTrait, LinearElastic, VonMises};
use crate::StrError;
use std::collections::HashMap;

/// Defines a function allocating an acceleration algorithm
pub type AccelerationMaker = fn() -> Box<dyn AccelerationTrait>;

/// Defines a function allocating a behaviour
pub type BehaviourMaker = fn() -> Box<dyn BehaviourTrait>;

/// Defines a function allocating a constraint given the component name, index, and target
pub type ConstraintMaker = fn(&str, usize, Evolution) -> Box<dyn ConstraintTrait>;

/// Holds the constructors of acceleration algorithms, behaviours, and constraints by name
///
/// The registry is built once and passed to the test driver.
pub struct Registry {
    accelerations: HashMap<String, AccelerationMaker>,
    behaviours: HashMap<String, BehaviourMaker>,
    constraints: HashMap<String, ConstraintMaker>,
}

impl Registry {
    /// Allocates an empty registry
    pub fn new() -> Self {
        Registry {
            accelerations: HashMap::new(),
            behaviours: HashMap::new(),
            constraints: HashMap::new(),
        }
    }

    /// Allocates a registry with the algorithms, behaviours, and constraints of this crate
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry
            .register_acceleration("IronsTuck", || Box::new(IronsTuck::new()))
            .register_acceleration("Steffensen", || Box::new(Steffensen::new()))
            .register_acceleration("Aitken", || Box::new(Aitken::new()))
            .register_behaviour("LinearElastic", || Box::new(LinearElastic::new()))
            .register_behaviour("VonMises", || Box::new(VonMises::new()))
            .register_constraint("ImposedDrivingVariable", |name, component, target| {
                Box::new(ImposedDrivingVariable::new(name, component, target))
            })
            .register_constraint("ImposedThermodynamicForce", |name, component, target| {
                Box::new(ImposedThermodynamicForce::new(name, component, target))
            });
        registry
    }

    /// Registers (or replaces) an acceleration algorithm
    pub fn register_acceleration(&mut self, name: &str, maker: AccelerationMaker) -> &mut Self {
        self.accelerations.insert(name.to_string(), maker);
        self
    }

    /// Registers (or replaces) a behaviour
    pub fn register_behaviour(&mut self, name: &str, maker: BehaviourMaker) -> &mut Self {
        self.behaviours.insert(name.to_string(), maker);
        self
    }

    /// Registers (or replaces) a kind of constraint
    pub fn register_constraint(&mut self, name: &str, maker: ConstraintMaker) -> &mut Self {
        self.constraints.insert(name.to_string(), maker);
        self
    }

    /// Allocates an acceleration algorithm
    pub fn acceleration(&self, name: &str) -> Result<Box<dyn AccelerationTrait>, StrError> {
        let maker = self.accelerations.get(name).ok_or("acceleration algorithm is not registered")?;
        Ok(maker())
    }

    /// Allocates a behaviour
    pub fn behaviour(&self, name: &str) -> Result<Box<dyn BehaviourTrait>, StrError> {
        let maker = self.behaviours.get(name).ok_or("behaviour is not registered")?;
        Ok(maker())
    }

    /// Allocates a constraint
    pub fn constraint(
        &self,
        kind: &str,
        name: &str,
        component: usize,
        target: Evolution,
    ) -> Result<Box<dyn ConstraintTrait>, StrError> {
        let maker = self.constraints.get(kind).ok_or("constraint is not registered")?;
        Ok(maker(name, component, target))
    }

    /// Returns the sorted names of the registered acceleration algorithms
    pub fn acceleration_names(&self) -> Vec<String> {
        sorted_keys(&self.accelerations)
    }

    /// Returns the sorted names of the registered behaviours
    pub fn behaviour_names(&self) -> Vec<String> {
        sorted_keys(&self.behaviours)
    }

    /// Returns the sorted names of the registered constraints
    pub fn constraint_names(&self) -> Vec<String> {
        sorted_keys(&self.constraints)
    }
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<String> {
    let mut keys: Vec<_> = map.keys().cloned().collect();
    keys.sort();
    keys
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
