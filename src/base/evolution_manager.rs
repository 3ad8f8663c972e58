use super::{Evolution, UnresolvedReference};
use std::collections::HashMap;

/// Holds all named evolutions of a test
///
/// Formula evolutions reference other evolutions by name; the manager
/// resolves these references (with memoization) when evaluating.
#[derive(Clone, Debug)]
pub struct EvolutionManager {
    all: HashMap<String, Evolution>,
}

impl EvolutionManager {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        EvolutionManager { all: HashMap::new() }
    }

    /// Sets (or replaces) a named evolution
    pub fn set(&mut self, name: &str, evolution: Evolution) -> &mut Self {
        self.all.insert(name.to_string(), evolution);
        self
    }

    /// Returns a named evolution
    pub fn get(&self, name: &str) -> Option<&Evolution> {
        self.all.get(name)
    }

    /// Returns a named evolution for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Evolution> {
        self.all.get_mut(name)
    }

    /// Indicates whether a named evolution exists
    pub fn contains(&self, name: &str) -> bool {
        self.all.contains_key(name)
    }

    /// Evaluates a named evolution at time t
    pub fn value(&self, name: &str, t: f64) -> Result<f64, UnresolvedReference> {
        let mut memo = HashMap::new();
        let mut stack = Vec::new();
        self.resolve(name, t, &mut memo, &mut stack)
    }

    /// Checks that all formula arguments exist and that there are no circular dependencies
    pub fn check_references(&self) -> Result<(), UnresolvedReference> {
        let mut names: Vec<_> = self.all.keys().collect();
        names.sort();
        for name in names {
            let mut stack = Vec::new();
            self.check(name, &mut stack)?;
        }
        Ok(())
    }

    /// Checks the arguments of an evolution used by a constraint or validator
    pub fn check_evolution(&self, evolution: &Evolution) -> Result<(), UnresolvedReference> {
        if let Evolution::Formula(formula) = evolution {
            for arg in formula.args() {
                let mut stack = Vec::new();
                self.check(arg, &mut stack)?;
            }
        }
        Ok(())
    }

    /// Resolves a named evolution at time t
    pub(crate) fn resolve(
        &self,
        name: &str,
        t: f64,
        memo: &mut HashMap<String, f64>,
        stack: &mut Vec<String>,
    ) -> Result<f64, UnresolvedReference> {
        if let Some(value) = memo.get(name) {
            return Ok(*value);
        }
        if stack.iter().any(|n| n == name) {
            return Err(UnresolvedReference::Cycle(name.to_string()));
        }
        let evolution = self
            .all
            .get(name)
            .ok_or_else(|| UnresolvedReference::Missing(name.to_string()))?;
        stack.push(name.to_string());
        let value = evolution.evaluate(t, self, memo, stack)?;
        stack.pop();
        memo.insert(name.to_string(), value);
        Ok(value)
    }

    /// Walks the dependency graph from a named evolution
    fn check(&self, name: &str, stack: &mut Vec<String>) -> Result<(), UnresolvedReference> {
        if stack.iter().any(|n| n == name) {
            return Err(UnresolvedReference::Cycle(name.to_string()));
        }
        let evolution = self
            .all
            .get(name)
            .ok_or_else(|| UnresolvedReference::Missing(name.to_string()))?;
        if let Evolution::Formula(formula) = evolution {
            stack.push(name.to_string());
            for arg in formula.args() {
                self.check(arg, stack)?;
            }
            stack.pop();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::EvolutionManager;
    use crate::base::{Evolution, UnresolvedReference};
    use russell_lab::approx_eq;

    #[test]
    fn formula_resolves_arguments() {
        let mut manager = EvolutionManager::new();
        manager
            .set("Temperature", Evolution::table(&[0.0, 1.0], &[293.15, 393.15]).unwrap())
            .set("Alpha", Evolution::constant(1e-5))
            .set(
                "ThermalStrain",
                Evolution::formula(&["Alpha", "Temperature"], |_, a| a[0] * (a[1] - 293.15)),
            )
            .set("Twice", Evolution::formula(&["ThermalStrain"], |_, a| 2.0 * a[0]));
        assert!(manager.contains("Twice"));
        assert_eq!(manager.check_references(), Ok(()));
        approx_eq(manager.value("ThermalStrain", 0.5).unwrap(), 5e-4, 1e-15);
        approx_eq(manager.value("Twice", 1.0).unwrap(), 2e-3, 1e-15);
    }

    #[test]
    fn unresolved_references_are_reported() {
        let mut manager = EvolutionManager::new();
        manager.set("A", Evolution::formula(&["B"], |t, a| t + a[0]));
        assert_eq!(manager.value("A", 0.0), Err(UnresolvedReference::Missing("B".to_string())));
        assert_eq!(
            manager.check_references(),
            Err(UnresolvedReference::Missing("B".to_string()))
        );
        assert_eq!(manager.value("Z", 0.0), Err(UnresolvedReference::Missing("Z".to_string())));

        manager.set("B", Evolution::formula(&["A"], |_, a| a[0]));
        assert_eq!(manager.value("A", 0.0), Err(UnresolvedReference::Cycle("A".to_string())));
        assert_eq!(manager.check_references(), Err(UnresolvedReference::Cycle("A".to_string())));

        let ev = Evolution::formula(&["C"], |_, a| a[0]);
        assert_eq!(
            manager.check_evolution(&ev),
            Err(UnresolvedReference::Missing("C".to_string()))
        );
        assert_eq!(
            format!("{}", UnresolvedReference::Missing("C".to_string())),
            "evolution 'C' is not defined"
        );
    }

    #[test]
    fn get_mut_allows_set_value() {
        let mut manager = EvolutionManager::new();
        manager.set("P", Evolution::table(&[0.0], &[1.0]).unwrap());
        manager.get_mut("P").unwrap().set_value(1.0, 3.0).unwrap();
        assert_eq!(manager.value("P", 0.5), Ok(2.0));
        assert!(manager.get("Q").is_none());
    }
}
