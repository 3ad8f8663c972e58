use crate::base::{EvolutionManager, UnresolvedReference};
use crate::base::{TEMPERATURE, THERMAL_EXPANSION, THERMAL_EXPANSION_REFERENCE_TEMPERATURE};
use russell_lab::Vector;

/// Copies the values of src into dest (same dimensions)
pub(crate) fn copy_vector(dest: &mut Vector, src: &Vector) {
    for i in 0..dest.dim() {
        dest[i] = src[i];
    }
}

/// Holds the state of the material point during a test
///
/// The "1"-suffixed fields hold the current Newton trial; the "0"-suffixed fields hold
/// the committed values at the beginning of the time step; and the "_1"-suffixed fields
/// hold the committed values of the previous time step.
///
/// The global unknowns `u` hold the driving variables followed by the Lagrange multipliers.
pub struct CurrentState {
    /// Thermodynamic forces at the previous time step
    pub s_1: Vector,

    /// Thermodynamic forces at the beginning of the time step
    pub s0: Vector,

    /// Thermodynamic forces (trial)
    pub s1: Vector,

    /// Driving variables at the beginning of the time step
    pub e0: Vector,

    /// Driving variables (trial)
    pub e1: Vector,

    /// Thermal strain at the beginning of the time step
    pub e_th0: Vector,

    /// Thermal strain at the end of the time step
    pub e_th1: Vector,

    /// Material properties at the end of the time step
    pub mprops1: Vector,

    /// Internal variables at the previous time step
    pub iv_1: Vector,

    /// Internal variables at the beginning of the time step
    pub iv0: Vector,

    /// Internal variables (trial)
    pub iv1: Vector,

    /// External state variables at the beginning of the time step
    pub esv0: Vector,

    /// Increments of the external state variables
    pub desv: Vector,

    /// Unknowns at the previous time step
    pub u_1: Vector,

    /// Unknowns at the beginning of the time step
    pub u0: Vector,

    /// Unknowns (trial)
    pub u1: Vector,

    /// Unknowns at the previous iteration
    pub u10: Vector,

    /// Previous time increment (zero before the first committed step)
    pub dt_1: f64,

    /// Number of committed time steps
    pub period: usize,

    /// Total number of Newton iterations (of converged and failed attempts)
    pub iterations: usize,

    /// Total number of sub-steps (failed attempts)
    pub sub_steps: usize,
}

impl CurrentState {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `n_driving` -- number of driving variables
    /// * `n_force` -- number of thermodynamic forces
    /// * `n_internal` -- number of internal variables
    /// * `n_mprops` -- number of material properties
    /// * `n_esv` -- number of external state variables
    /// * `n_lagrange` -- number of Lagrange multipliers
    pub fn new(
        n_driving: usize,
        n_force: usize,
        n_internal: usize,
        n_mprops: usize,
        n_esv: usize,
        n_lagrange: usize,
    ) -> Self {
        let n_unknown = n_driving + n_lagrange;
        CurrentState {
            s_1: Vector::new(n_force),
            s0: Vector::new(n_force),
            s1: Vector::new(n_force),
            e0: Vector::new(n_driving),
            e1: Vector::new(n_driving),
            e_th0: Vector::new(n_driving),
            e_th1: Vector::new(n_driving),
            mprops1: Vector::new(n_mprops),
            iv_1: Vector::new(n_internal),
            iv0: Vector::new(n_internal),
            iv1: Vector::new(n_internal),
            esv0: Vector::new(n_esv),
            desv: Vector::new(n_esv),
            u_1: Vector::new(n_unknown),
            u0: Vector::new(n_unknown),
            u1: Vector::new(n_unknown),
            u10: Vector::new(n_unknown),
            dt_1: 0.0,
            period: 0,
            iterations: 0,
            sub_steps: 0,
        }
    }

    /// Sets the initial driving variables, thermodynamic forces, and internal variables
    ///
    /// All histories (previous, committed, and trial values) receive the same values.
    pub fn initialize(&mut self, e: &[f64], s: &[f64], iv: &[f64]) {
        for i in 0..e.len().min(self.e0.dim()) {
            self.e0[i] = e[i];
            self.u0[i] = e[i];
        }
        for i in 0..s.len().min(self.s0.dim()) {
            self.s0[i] = s[i];
        }
        for i in 0..iv.len().min(self.iv0.dim()) {
            self.iv0[i] = iv[i];
        }
        copy_vector(&mut self.s_1, &self.s0);
        copy_vector(&mut self.iv_1, &self.iv0);
        copy_vector(&mut self.u_1, &self.u0);
        self.revert();
    }

    /// Copies the driving variables from the unknowns u1 into e1
    pub fn sync_driving_variables(&mut self) {
        for i in 0..self.e1.dim() {
            self.e1[i] = self.u1[i];
        }
    }

    /// Commits the trial state (after a converged time step)
    pub fn commit(&mut self, dt: f64) {
        copy_vector(&mut self.s_1, &self.s0);
        copy_vector(&mut self.s0, &self.s1);
        copy_vector(&mut self.e0, &self.e1);
        copy_vector(&mut self.e_th0, &self.e_th1);
        copy_vector(&mut self.iv_1, &self.iv0);
        copy_vector(&mut self.iv0, &self.iv1);
        copy_vector(&mut self.u_1, &self.u0);
        copy_vector(&mut self.u0, &self.u1);
        self.dt_1 = dt;
        self.period += 1;
    }

    /// Restores the trial state from the committed state (after a failed attempt)
    pub fn revert(&mut self) {
        copy_vector(&mut self.s1, &self.s0);
        copy_vector(&mut self.e1, &self.e0);
        copy_vector(&mut self.e_th1, &self.e_th0);
        copy_vector(&mut self.iv1, &self.iv0);
        copy_vector(&mut self.u1, &self.u0);
        copy_vector(&mut self.u10, &self.u0);
    }

    /// Evaluates the material properties at the end of the time step
    pub fn update_material_properties(
        &mut self,
        names: &[String],
        evolutions: &EvolutionManager,
        t_end: f64,
    ) -> Result<(), UnresolvedReference> {
        for (i, name) in names.iter().enumerate() {
            self.mprops1[i] = evolutions.value(name, t_end)?;
        }
        Ok(())
    }

    /// Evaluates the external state variables at the beginning of the time step and their increments
    pub fn update_external_state_variables(
        &mut self,
        names: &[String],
        evolutions: &EvolutionManager,
        t: f64,
        dt: f64,
    ) -> Result<(), UnresolvedReference> {
        for (i, name) in names.iter().enumerate() {
            let v0 = evolutions.value(name, t)?;
            let v1 = evolutions.value(name, t + dt)?;
            self.esv0[i] = v0;
            self.desv[i] = v1 - v0;
        }
        Ok(())
    }

    /// Computes the (isotropic) thermal strains at the beginning and end of the time step
    ///
    /// The thermal strain `α(T) (T - Tref)` is added to the first three (diagonal)
    /// components. Nothing is done unless the temperature and the thermal expansion
    /// evolutions are both defined.
    pub fn update_thermal_strain(
        &mut self,
        evolutions: &EvolutionManager,
        t: f64,
        dt: f64,
    ) -> Result<(), UnresolvedReference> {
        if !evolutions.contains(TEMPERATURE) || !evolutions.contains(THERMAL_EXPANSION) {
            return Ok(());
        }
        let t_ref = evolutions.value(THERMAL_EXPANSION_REFERENCE_TEMPERATURE, t)?;
        let thermal = |time: f64| -> Result<f64, UnresolvedReference> {
            let alpha = evolutions.value(THERMAL_EXPANSION, time)?;
            let temp = evolutions.value(TEMPERATURE, time)?;
            Ok(alpha * (temp - t_ref))
        };
        let (th0, th1) = (thermal(t)?, thermal(t + dt)?);
        for i in 0..usize::min(3, self.e_th0.dim()) {
            self.e_th0[i] = th0;
            self.e_th1[i] = th1;
        }
        Ok(())
    }

    /// Computes the mechanical strain at the beginning of the time step and its increment
    pub fn mechanical_strain(&self, e0_mech: &mut Vector, de_mech: &mut Vector) {
        for i in 0..self.e0.dim() {
            e0_mech[i] = self.e0[i] - self.e_th0[i];
            de_mech[i] = (self.e1[i] - self.e0[i]) - (self.e_th1[i] - self.e_th0[i]);
        }
    }

    /// Returns the Lagrange multipliers (trial)
    pub fn lagrange_multipliers(&self) -> Vec<f64> {
        self.u1.as_data()[self.e1.dim()..].to_vec()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
