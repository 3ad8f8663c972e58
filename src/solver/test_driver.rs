use super::{AccelerationTrait, AttemptFailure, ConstraintArgs, ConstraintTrait, ControlConvergence, ControlTime};
use super::{AttemptRecord, DriverError, LinearSystemLag, Registry, StepRecord, TestOutput};
use crate::base::{Config, Evolution, EvolutionManager, LagrangeScaling, Prediction, StiffnessType};
use crate::base::{TEMPERATURE, THERMAL_EXPANSION, THERMAL_EXPANSION_REFERENCE_TEMPERATURE};
use crate::material::{copy_vector, BehaviourInput, BehaviourOutput, BehaviourTrait, CurrentState};
use crate::util::{TestResult, UTestTrait};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use std::collections::HashSet;

/// Drives a constitutive behaviour along a loading path at a single material point
///
/// The unknowns of each time step are the driving variables (e.g., strain) and the
/// Lagrange multipliers of the constraints. The Newton iterations solve:
///
/// ```text
/// ┌       ┐ ┌     ┐   ┌    ┐
/// │ Kt  Aᵀ│ │ mdu │ = │ rr │    u ← u - mdu
/// │ A   0 │ │     │   │    │
/// └       ┘ └     ┘   └    ┘
/// ```
///
/// Each period of the loading path is first attempted in one step; failed attempts
/// halve the time increment (sub-stepping).
///
/// # Examples
///
/// ```
/// use pmtest::prelude::*;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new(Hypothesis::Tridimensional);
///     let registry = Registry::with_defaults();
///     let mut driver = TestDriver::new(&config, &registry, "LinearElastic")?;
///     driver
///         .set_times(&[0.0, 1.0])
///         .set_evolution("YoungModulus", Evolution::constant(1000.0))
///         .set_evolution("PoissonRatio", Evolution::constant(0.25));
///     driver.impose_driving_variable("EXX", Evolution::table(&[0.0, 1.0], &[0.0, 0.01])?)?;
///     let output = driver.run()?;
///     let sxx = output.steps.last().unwrap().s[0];
///     assert!(f64::abs(sxx - 10.0) < 1e-8);
///     Ok(())
/// }
/// ```
pub struct TestDriver<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the constructors of algorithms and constraints
    registry: &'a Registry,

    /// Holds the behaviour
    behaviour: Box<dyn BehaviourTrait>,

    /// Holds the acceleration algorithm (optional)
    acceleration: Option<Box<dyn AccelerationTrait>>,

    /// Holds all evolutions (material properties, external state variables, etc.)
    evolutions: EvolutionManager,

    /// Holds the constraints in registration order
    constraints: Vec<Box<dyn ConstraintTrait>>,

    /// Holds the validators
    validators: Vec<Box<dyn UTestTrait>>,

    /// Holds the times of the loading path
    times: Vec<f64>,

    /// Holds the initial driving variables (empty means zero)
    initial_e: Vec<f64>,

    /// Holds the initial thermodynamic forces (empty means zero)
    initial_s: Vec<f64>,

    /// Holds the initial internal variables (empty means zero)
    initial_iv: Vec<f64>,
}

/// Holds the outcome of one attempt to complete a time step
enum Outcome {
    Converged { iterations: usize },
    Failed { iterations: usize, failure: AttemptFailure },
}

/// Holds the work arrays of a run
struct Workspace {
    state: CurrentState,
    lin_sys: LinearSystemLag,
    output: BehaviourOutput,
    perturbed: BehaviourOutput,
    e0_mech: Vector,
    de_mech: Vector,
    lagrange_pos: Vec<usize>,
    mprop_names: Vec<String>,
    esv_names: Vec<String>,
    driving_names: Vec<String>,
    force_names: Vec<String>,
    scale: Option<f64>,
    n_tangent_mismatches: usize,
}

impl<'a> TestDriver<'a> {
    /// Allocates a new instance with a behaviour given by name
    pub fn new(config: &'a Config, registry: &'a Registry, behaviour: &str) -> Result<Self, StrError> {
        let behaviour = registry.behaviour(behaviour)?;
        Ok(TestDriver::with_behaviour(config, registry, behaviour))
    }

    /// Allocates a new instance with a custom behaviour
    pub fn with_behaviour(config: &'a Config, registry: &'a Registry, behaviour: Box<dyn BehaviourTrait>) -> Self {
        TestDriver {
            config,
            registry,
            behaviour,
            acceleration: None,
            evolutions: EvolutionManager::new(),
            constraints: Vec::new(),
            validators: Vec::new(),
            times: Vec::new(),
            initial_e: Vec::new(),
            initial_s: Vec::new(),
            initial_iv: Vec::new(),
        }
    }

    /// Sets the times of the loading path (strictly increasing; at least two)
    pub fn set_times(&mut self, times: &[f64]) -> &mut Self {
        self.times = times.to_vec();
        self
    }

    /// Sets a named evolution (material property, external state variable, formula argument, etc.)
    pub fn set_evolution(&mut self, name: &str, evolution: Evolution) -> &mut Self {
        self.evolutions.set(name, evolution);
        self
    }

    /// Returns access to the evolutions (e.g., to pin values)
    pub fn evolutions_mut(&mut self) -> &mut EvolutionManager {
        &mut self.evolutions
    }

    /// Imposes the evolution of a driving variable given by name (e.g., "EXX")
    pub fn impose_driving_variable(&mut self, name: &str, evolution: Evolution) -> Result<&mut Self, StrError> {
        let component = self
            .config
            .hypothesis
            .driving_variable_index(name)
            .ok_or("the name of the driving variable is not available in the modelling hypothesis")?;
        let constraint = self
            .registry
            .constraint("ImposedDrivingVariable", name, component, evolution)?;
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Imposes the evolution of a thermodynamic force given by name (e.g., "SXX")
    pub fn impose_thermodynamic_force(&mut self, name: &str, evolution: Evolution) -> Result<&mut Self, StrError> {
        let component = self
            .config
            .hypothesis
            .thermodynamic_force_index(name)
            .ok_or("the name of the thermodynamic force is not available in the modelling hypothesis")?;
        let constraint = self
            .registry
            .constraint("ImposedThermodynamicForce", name, component, evolution)?;
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Adds a custom constraint
    pub fn add_constraint(&mut self, constraint: Box<dyn ConstraintTrait>) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the acceleration algorithm given by name (e.g., "IronsTuck")
    pub fn set_acceleration(&mut self, name: &str) -> Result<&mut Self, StrError> {
        self.acceleration = Some(self.registry.acceleration(name)?);
        Ok(self)
    }

    /// Sets a parameter of the acceleration algorithm (e.g., "AccelerationTrigger")
    pub fn set_acceleration_parameter(&mut self, key: &str, value: &str) -> Result<&mut Self, StrError> {
        match self.acceleration.as_mut() {
            Some(acceleration) => acceleration.set_parameter(key, value)?,
            None => return Err("the acceleration algorithm must be set first"),
        }
        Ok(self)
    }

    /// Adds a validator checking the committed states
    pub fn add_validator(&mut self, validator: Box<dyn UTestTrait>) -> &mut Self {
        self.validators.push(validator);
        self
    }

    /// Sets the initial driving variables, thermodynamic forces, and internal variables
    ///
    /// An empty slice means zero values.
    pub fn set_initial_values(&mut self, e: &[f64], s: &[f64], iv: &[f64]) -> &mut Self {
        self.initial_e = e.to_vec();
        self.initial_s = s.to_vec();
        self.initial_iv = iv.to_vec();
        self
    }

    /// Runs the test
    ///
    /// Returns the committed states and the aggregated outcome of the validators. Failures
    /// of the validators do not abort the run.
    ///
    /// **Note:** The validators keep their state; thus, this function should be called once.
    pub fn run(&mut self) -> Result<TestOutput, DriverError> {
        self.check_setup()?;
        let config = self.config;
        let times = self.times.clone();
        let mut control_time = ControlTime::new(config, &times).map_err(|e| DriverError::Configuration(e.to_string()))?;
        let mut control_conv = ControlConvergence::new(config);
        let mut ws = self.allocate_workspace()?;
        let n_unknown = ws.lin_sys.n_equation;
        if let Some(acceleration) = self.acceleration.as_mut() {
            acceleration.initialize(n_unknown);
        }

        // output with the initial state
        let mut output = TestOutput::new(
            ws.driving_names.clone(),
            ws.force_names.clone(),
            self.behaviour.internal_variable_names(),
        );
        output.steps.push(StepRecord {
            period: 0,
            t: times[0],
            dt: 0.0,
            iterations: 0,
            norm_mdu: 0.0,
            norm_rr: 0.0,
            e: ws.state.e0.as_data().to_vec(),
            s: ws.state.s0.as_data().to_vec(),
            iv: ws.state.iv0.as_data().to_vec(),
            lagrange: ws.state.lagrange_multipliers(),
        });

        // time loop
        control_conv.print_header();
        while !control_time.finished() {
            let (t, dt) = (control_time.t(), control_time.dt());
            control_conv.print_timestep(ws.state.period, t, dt);
            control_conv.reset();
            match self.attempt(&mut ws, &mut control_conv, t, dt)? {
                Outcome::Converged { iterations } => {
                    ws.state.iterations += iterations;
                    ws.state.commit(dt);
                    control_conv.add_converged();
                    for validator in self.validators.iter_mut() {
                        validator.check(
                            &ws.state.e0,
                            &ws.state.s0,
                            &ws.state.iv0,
                            t,
                            dt,
                            ws.state.period,
                            &self.evolutions,
                        );
                    }
                    output.steps.push(StepRecord {
                        period: ws.state.period,
                        t: t + dt,
                        dt,
                        iterations,
                        norm_mdu: control_conv.norm_mdu(),
                        norm_rr: control_conv.norm_rr(),
                        e: ws.state.e0.as_data().to_vec(),
                        s: ws.state.s0.as_data().to_vec(),
                        iv: ws.state.iv0.as_data().to_vec(),
                        lagrange: ws.state.lagrange_multipliers(),
                    });
                    output.attempts.push(AttemptRecord {
                        t,
                        dt,
                        iterations,
                        converged: true,
                    });
                    control_time.advance();
                }
                Outcome::Failed { iterations, failure } => {
                    ws.state.iterations += iterations;
                    ws.state.sub_steps += 1;
                    ws.state.revert();
                    control_conv.add_sub_step();
                    output.attempts.push(AttemptRecord {
                        t,
                        dt,
                        iterations,
                        converged: false,
                    });
                    let reason = failure.to_string();
                    control_conv.print_sub_step(t, dt, &reason);
                    if let Err(message) = control_time.reduce() {
                        control_conv.print_footer();
                        return Err(DriverError::SubSteppingExhausted {
                            time: t,
                            dt,
                            component: failure.component(),
                            reason: format!("{}; {}", message, reason),
                        });
                    }
                }
            }
        }
        control_conv.print_footer();

        output.n_iterations = ws.state.iterations;
        output.n_sub_steps = ws.state.sub_steps;
        output.n_tangent_mismatches = ws.n_tangent_mismatches;
        output.result = TestResult::aggregate(
            "validators",
            self.validators.iter().map(|v| v.results()).collect(),
        );
        Ok(output)
    }

    /// Checks the consistency of the test definition
    fn check_setup(&self) -> Result<(), DriverError> {
        let err = |message: String| Err(DriverError::Configuration(message));
        if let Some(message) = self.config.validate() {
            return err(message);
        }
        let hypothesis = self.config.hypothesis;
        let n_driving = self.behaviour.n_driving_variables(hypothesis);
        let n_force = self.behaviour.n_thermodynamic_forces(hypothesis);
        if n_driving != n_force {
            return err(format!(
                "the number of driving variables ({}) must equal the number of thermodynamic forces ({})",
                n_driving, n_force
            ));
        }

        // initial values
        let n_internal = self.behaviour.internal_variable_names().len();
        for (what, values, n) in [
            ("driving variables", &self.initial_e, n_driving),
            ("thermodynamic forces", &self.initial_s, n_force),
            ("internal variables", &self.initial_iv, n_internal),
        ] {
            if values.len() != 0 && values.len() != n {
                return err(format!("the number of initial {} must be {}", what, n));
            }
        }

        // constraints
        let mut constrained = HashSet::new();
        for constraint in &self.constraints {
            let component = constraint.component();
            if component >= n_driving {
                return err(format!(
                    "{} refers to component {} which is out of range",
                    constraint.description(),
                    component
                ));
            }
            if !constrained.insert(component) {
                return err(format!(
                    "{} refers to component {} which is already constrained",
                    constraint.description(),
                    component
                ));
            }
        }

        // evolutions feeding the behaviour
        for name in self.behaviour.material_property_names() {
            if !self.evolutions.contains(&name) {
                return err(format!("the evolution of the material property '{}' is not defined", name));
            }
        }
        for name in self.behaviour.external_state_variable_names() {
            if !self.evolutions.contains(&name) {
                return err(format!(
                    "the evolution of the external state variable '{}' is not defined",
                    name
                ));
            }
        }
        if self.evolutions.contains(TEMPERATURE)
            && self.evolutions.contains(THERMAL_EXPANSION)
            && !self.evolutions.contains(THERMAL_EXPANSION_REFERENCE_TEMPERATURE)
        {
            return err(format!(
                "the evolution '{}' is required by the thermal strain",
                THERMAL_EXPANSION_REFERENCE_TEMPERATURE
            ));
        }

        // formula arguments
        if let Err(e) = self.evolutions.check_references() {
            return err(e.to_string());
        }
        for constraint in &self.constraints {
            if let Err(e) = self.evolutions.check_evolution(constraint.target()) {
                return err(format!("{}: {}", constraint.description(), e));
            }
        }
        for validator in &self.validators {
            for evolution in validator.evolutions() {
                if let Err(e) = self.evolutions.check_evolution(evolution) {
                    return err(format!("validator: {}", e));
                }
            }
        }
        Ok(())
    }

    /// Allocates the state and the work arrays
    fn allocate_workspace(&self) -> Result<Workspace, DriverError> {
        let hypothesis = self.config.hypothesis;
        let n_driving = self.behaviour.n_driving_variables(hypothesis);
        let n_force = self.behaviour.n_thermodynamic_forces(hypothesis);
        let mprop_names = self.behaviour.material_property_names();
        let esv_names = self.behaviour.external_state_variable_names();
        let n_internal = self.behaviour.internal_variable_names().len();

        // Lagrange multipliers are stored after the driving variables
        let mut lagrange_pos = Vec::with_capacity(self.constraints.len());
        let mut n_lagrange = 0;
        for constraint in &self.constraints {
            lagrange_pos.push(n_driving + n_lagrange);
            n_lagrange += constraint.n_lagrange_multipliers();
        }

        let lin_sys = LinearSystemLag::new(n_driving, n_lagrange).map_err(|e| DriverError::Configuration(e.to_string()))?;
        let mut state = CurrentState::new(
            n_driving,
            n_force,
            n_internal,
            mprop_names.len(),
            esv_names.len(),
            n_lagrange,
        );
        state.initialize(&self.initial_e, &self.initial_s, &self.initial_iv);

        let (driving_names, force_names) = if n_driving == hypothesis.n_components() {
            (
                hypothesis.driving_variable_names().iter().map(|s| s.to_string()).collect(),
                hypothesis.thermodynamic_force_names().iter().map(|s| s.to_string()).collect(),
            )
        } else {
            (
                (0..n_driving).map(|i| format!("E{}", i)).collect(),
                (0..n_force).map(|i| format!("S{}", i)).collect(),
            )
        };

        let scale = match self.config.lagrange_scaling {
            LagrangeScaling::Auto => None,
            LagrangeScaling::Fixed(a) => Some(a),
        };

        Ok(Workspace {
            state,
            lin_sys,
            output: BehaviourOutput::new(n_driving, n_force, n_internal),
            perturbed: BehaviourOutput::new(n_driving, n_force, n_internal),
            e0_mech: Vector::new(n_driving),
            de_mech: Vector::new(n_driving),
            lagrange_pos,
            mprop_names,
            esv_names,
            driving_names,
            force_names,
            scale,
            n_tangent_mismatches: 0,
        })
    }

    /// Attempts to complete the time step [t, t+Δt]
    ///
    /// Recoverable failures are returned as `Outcome::Failed`; errors are fatal.
    fn attempt(
        &mut self,
        ws: &mut Workspace,
        control_conv: &mut ControlConvergence,
        t: f64,
        dt: f64,
    ) -> Result<Outcome, DriverError> {
        let config = self.config;
        let (eeps, seps) = (config.tol_driving, config.tol_force);

        // data at the end of the time step
        ws.state.revert();
        ws.state.update_material_properties(&ws.mprop_names, &self.evolutions, t + dt)?;
        ws.state
            .update_external_state_variables(&ws.esv_names, &self.evolutions, t, dt)?;
        ws.state.update_thermal_strain(&self.evolutions, t, dt)?;
        if let Some(acceleration) = self.acceleration.as_mut() {
            acceleration.pre_execute_tasks();
        }

        // prediction
        match config.prediction {
            Prediction::None => (),
            Prediction::Linear => {
                if ws.state.dt_1 > 0.0 {
                    let r = dt / ws.state.dt_1;
                    for i in 0..ws.state.u1.dim() {
                        ws.state.u1[i] = ws.state.u0[i] + (ws.state.u0[i] - ws.state.u_1[i]) * r;
                    }
                    ws.state.sync_driving_variables();
                }
            }
            Prediction::Elastic | Prediction::Secant | Prediction::Tangent => {
                let stiffness = config.prediction.stiffness().unwrap_or(StiffnessType::Tangent);
                if !self.integrate(ws, stiffness, dt)? {
                    return Ok(Outcome::Failed {
                        iterations: 0,
                        failure: AttemptFailure::RecoverableBehaviourFailure,
                    });
                }
                self.assemble(ws, t, dt)?;
                if let Err(e) = ws.lin_sys.solve() {
                    return Ok(Outcome::Failed {
                        iterations: 0,
                        failure: AttemptFailure::NewtonDivergence {
                            iterations: 0,
                            component: None,
                            criteria: vec![format!("prediction: {}", e)],
                        },
                    });
                }
                for i in 0..ws.lin_sys.n_equation {
                    ws.state.u1[i] -= ws.lin_sys.mdu[i];
                }
                ws.state.sync_driving_variables();
            }
        }
        copy_vector(&mut ws.state.u10, &ws.state.u1);

        // Newton iterations
        let mut constraint_failures = Vec::new();
        for iteration in 1..=config.n_max_iterations {
            // behaviour
            if !self.integrate(ws, config.stiffness, dt)? {
                return Ok(Outcome::Failed {
                    iterations: iteration,
                    failure: AttemptFailure::RecoverableBehaviourFailure,
                });
            }
            if config.compare_to_numerical_tangent {
                if !self.numerical_tangent_matches(ws, dt)? {
                    ws.n_tangent_mismatches += 1;
                    if config.verbose_iterations {
                        println!("{:>8} the stiffness differs from the numerical tangent", "⚠");
                    }
                }
            }

            // linear system
            self.assemble(ws, t, dt)?;
            if let Err(e) = ws.lin_sys.solve() {
                return Ok(Outcome::Failed {
                    iterations: iteration,
                    failure: AttemptFailure::NewtonDivergence {
                        iterations: iteration,
                        component: None,
                        criteria: vec![e.to_string()],
                    },
                });
            }
            for i in 0..ws.lin_sys.n_equation {
                ws.state.u1[i] -= ws.lin_sys.mdu[i];
            }
            ws.state.sync_driving_variables();

            // convergence
            control_conv.analyze(iteration, &ws.lin_sys.mdu, &ws.lin_sys.rr, ws.lin_sys.n_driving);
            control_conv.print_iteration();
            constraint_failures.clear();
            for constraint in &self.constraints {
                let ok =
                    constraint.check_convergence(&ws.state.u1, &ws.state.s1, eeps, seps, t, dt, &self.evolutions)?;
                if !ok {
                    constraint_failures.push((
                        constraint.description(),
                        constraint.failed_criterion_diagnostic(
                            &ws.state.u1,
                            &ws.state.s1,
                            eeps,
                            seps,
                            t,
                            dt,
                            &self.evolutions,
                        ),
                    ));
                }
            }
            let converged = control_conv.converged_on_norms()
                && constraint_failures.is_empty()
                && (config.prediction != Prediction::None || iteration > 1);
            if converged {
                if let Some(acceleration) = self.acceleration.as_mut() {
                    acceleration.post_execute_tasks();
                }
                return Ok(Outcome::Converged { iterations: iteration });
            }

            // acceleration
            if iteration < config.n_max_iterations {
                if let Some(acceleration) = self.acceleration.as_mut() {
                    if acceleration.execute(
                        &mut ws.state.u1,
                        &ws.state.u10,
                        &ws.lin_sys.rr,
                        eeps,
                        seps,
                        iteration,
                    ) {
                        ws.state.sync_driving_variables();
                    }
                }
                copy_vector(&mut ws.state.u10, &ws.state.u1);
            }
        }

        // divergence
        let mut criteria = control_conv.failed_criteria();
        let component = if !control_conv.converged_on_norms() {
            let i = control_conv.offending_component();
            let names = if control_conv.force_criterion_failed() {
                &ws.force_names
            } else {
                &ws.driving_names
            };
            names.get(i).cloned()
        } else {
            constraint_failures.first().map(|(description, _)| description.clone())
        };
        criteria.extend(constraint_failures.into_iter().map(|(_, diagnostic)| diagnostic));
        Ok(Outcome::Failed {
            iterations: config.n_max_iterations,
            failure: AttemptFailure::NewtonDivergence {
                iterations: config.n_max_iterations,
                component,
                criteria,
            },
        })
    }

    /// Integrates the behaviour at the current trial and copies the forces and internal variables
    ///
    /// Returns false if the behaviour did not converge.
    fn integrate(&mut self, ws: &mut Workspace, stiffness: StiffnessType, dt: f64) -> Result<bool, DriverError> {
        ws.state.mechanical_strain(&mut ws.e0_mech, &mut ws.de_mech);
        let input = BehaviourInput {
            rotation: &self.config.rotation,
            e0: &ws.e0_mech,
            de: &ws.de_mech,
            s0: &ws.state.s0,
            mprops: &ws.state.mprops1,
            iv0: &ws.state.iv0,
            esv0: &ws.state.esv0,
            desv: &ws.state.desv,
            hypothesis: self.config.hypothesis,
            dt,
            stiffness,
        };
        let ok = self
            .behaviour
            .integrate(&input, &mut ws.output)
            .map_err(|e| DriverError::Behaviour(e.to_string()))?;
        if ok {
            copy_vector(&mut ws.state.s1, &ws.output.s1);
            copy_vector(&mut ws.state.iv1, &ws.output.iv1);
        }
        Ok(ok)
    }

    /// Assembles the stiffness matrix and the residual vector (including the constraints)
    fn assemble(&mut self, ws: &mut Workspace, t: f64, dt: f64) -> Result<(), DriverError> {
        ws.lin_sys.reset();
        let n_driving = ws.lin_sys.n_driving;
        for i in 0..n_driving {
            ws.lin_sys.rr[i] = ws.state.s1[i];
            for j in 0..n_driving {
                ws.lin_sys.kk.set(i, j, ws.output.kt.get(i, j));
            }
        }
        let a = match ws.scale {
            Some(a) => a,
            None => {
                let max = ws.lin_sys.max_abs_stiffness();
                let a = if max > 0.0 && max.is_finite() { max } else { 1.0 };
                ws.scale = Some(a);
                a
            }
        };
        for (k, constraint) in self.constraints.iter().enumerate() {
            let args = ConstraintArgs {
                u0: &ws.state.u0,
                u1: &ws.state.u1,
                s1: &ws.state.s1,
                lagrange_pos: ws.lagrange_pos[k],
                t,
                dt,
                a,
                evolutions: &self.evolutions,
            };
            constraint.set_values(&mut ws.lin_sys.kk, &mut ws.lin_sys.rr, &args)?;
        }
        Ok(())
    }

    /// Compares the stiffness of the behaviour with a centered finite-difference approximation
    ///
    /// ```text
    /// Kᵢⱼ ≈ (σᵢ(Δε + h eⱼ) - σᵢ(Δε - h eⱼ)) / 2h
    /// ```
    fn numerical_tangent_matches(&mut self, ws: &mut Workspace, dt: f64) -> Result<bool, DriverError> {
        let h = self.config.numerical_tangent_perturbation;
        let n = ws.de_mech.dim();
        let kt = &ws.output.kt;
        let mut max_kt: f64 = 1.0;
        for i in 0..n {
            for j in 0..n {
                max_kt = f64::max(max_kt, f64::abs(kt.get(i, j)));
            }
        }
        let tol = self.config.numerical_tangent_tolerance * max_kt;
        let mut numerical = Matrix::new(n, n);
        let mut de = ws.de_mech.clone();
        let mut s_plus = Vector::new(n);
        for j in 0..n {
            for (sign, delta) in [(1.0, h), (-1.0, -h)] {
                de[j] = ws.de_mech[j] + delta;
                let input = BehaviourInput {
                    rotation: &self.config.rotation,
                    e0: &ws.e0_mech,
                    de: &de,
                    s0: &ws.state.s0,
                    mprops: &ws.state.mprops1,
                    iv0: &ws.state.iv0,
                    esv0: &ws.state.esv0,
                    desv: &ws.state.desv,
                    hypothesis: self.config.hypothesis,
                    dt,
                    stiffness: StiffnessType::Elastic,
                };
                let ok = self
                    .behaviour
                    .integrate(&input, &mut ws.perturbed)
                    .map_err(|e| DriverError::Behaviour(e.to_string()))?;
                if !ok {
                    return Ok(true); // cannot compare
                }
                if sign > 0.0 {
                    copy_vector(&mut s_plus, &ws.perturbed.s1);
                } else {
                    for i in 0..n {
                        numerical.set(i, j, (s_plus[i] - ws.perturbed.s1[i]) / (2.0 * h));
                    }
                }
            }
            de[j] = ws.de_mech[j];
        }
        let kt = &ws.output.kt;
        for i in 0..n {
            for j in 0..n {
                if !(f64::abs(kt.get(i, j) - numerical.get(i, j)) <= tol) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
