use crate::base::Config;
use russell_lab::Vector;

/// Controls the convergence of the Newton iterations of a time step
///
/// The iterations converge when:
///
/// 1. The largest correction of the driving variables `‖mdu‖∞` is below `tol_driving`
/// 2. The largest residual of the thermodynamic forces `‖R‖∞` is below `tol_force`
/// 3. Both norms are finite
pub struct ControlConvergence<'a> {
    config: &'a Config,
    iteration: usize,
    norm_mdu: f64,
    norm_rr: f64,
    norm_mdu_prev: f64,
    norm_mdu_prev_prev: f64,
    arg_max_mdu: usize,
    arg_max_rr: usize,
    found_nan_or_inf: bool,
    n_iterations_total: usize,
    n_sub_steps_total: usize,
    n_steps_total: usize,
}

impl<'a> ControlConvergence<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Self {
        ControlConvergence {
            config,
            iteration: 0,
            norm_mdu: 0.0,
            norm_rr: 0.0,
            norm_mdu_prev: 0.0,
            norm_mdu_prev_prev: 0.0,
            arg_max_mdu: 0,
            arg_max_rr: 0,
            found_nan_or_inf: false,
            n_iterations_total: 0,
            n_sub_steps_total: 0,
            n_steps_total: 0,
        }
    }

    // setters

    /// Resets the norms at the beginning of an attempt
    pub fn reset(&mut self) {
        self.iteration = 0;
        self.norm_mdu = 0.0;
        self.norm_rr = 0.0;
        self.norm_mdu_prev = 0.0;
        self.norm_mdu_prev_prev = 0.0;
        self.found_nan_or_inf = false;
    }

    /// Increments the number of converged time steps
    pub fn add_converged(&mut self) {
        self.n_steps_total += 1;
    }

    /// Increments the number of sub-steps (failed attempts)
    pub fn add_sub_step(&mut self) {
        self.n_sub_steps_total += 1;
    }

    // getters

    /// Returns the norm of the correction of the driving variables
    pub fn norm_mdu(&self) -> f64 {
        self.norm_mdu
    }

    /// Returns the norm of the residual of the thermodynamic forces
    pub fn norm_rr(&self) -> f64 {
        self.norm_rr
    }

    /// Returns the total number of iterations
    pub fn n_iterations_total(&self) -> usize {
        self.n_iterations_total
    }

    /// Returns the total number of sub-steps
    pub fn n_sub_steps_total(&self) -> usize {
        self.n_sub_steps_total
    }

    /// Returns the total number of converged steps
    pub fn n_steps_total(&self) -> usize {
        self.n_steps_total
    }

    /// Returns true if both norms are finite and below the tolerances
    pub fn converged_on_norms(&self) -> bool {
        !self.found_nan_or_inf && self.norm_mdu < self.config.tol_driving && self.norm_rr < self.config.tol_force
    }

    /// Returns true if NaN or Inf has been found
    pub fn found_nan_or_inf(&self) -> bool {
        self.found_nan_or_inf
    }

    /// Returns the index of the component with the largest violation
    ///
    /// The residual is checked first, then the correction.
    pub fn offending_component(&self) -> usize {
        if self.force_criterion_failed() {
            self.arg_max_rr
        } else {
            self.arg_max_mdu
        }
    }

    /// Returns true if the residual of the forces fails the tolerance
    pub fn force_criterion_failed(&self) -> bool {
        !(self.norm_rr < self.config.tol_force)
    }

    /// Returns an estimate of the order of convergence from the last three corrections
    ///
    /// ```text
    /// p ≈ ln(‖mduₖ‖ / ‖mduₖ₋₁‖) / ln(‖mduₖ₋₁‖ / ‖mduₖ₋₂‖)
    /// ```
    pub fn convergence_order(&self) -> Option<f64> {
        if self.iteration < 3 || self.found_nan_or_inf {
            return None;
        }
        let (a, b, c) = (self.norm_mdu, self.norm_mdu_prev, self.norm_mdu_prev_prev);
        if !(a > 0.0 && b > 0.0 && c > 0.0) || b == c {
            return None;
        }
        let order = f64::ln(a / b) / f64::ln(b / c);
        if order.is_finite() {
            Some(order)
        } else {
            None
        }
    }

    /// Returns the descriptions of the failed criteria
    pub fn failed_criteria(&self) -> Vec<String> {
        let mut criteria = Vec::new();
        if self.found_nan_or_inf {
            criteria.push("found NaN or Inf".to_string());
        }
        if !(self.norm_mdu < self.config.tol_driving) {
            criteria.push(format!(
                "‖mdu‖∞ = {:e} is not below {:e}",
                self.norm_mdu, self.config.tol_driving
            ));
        }
        if !(self.norm_rr < self.config.tol_force) {
            criteria.push(format!(
                "‖R‖∞ = {:e} is not below {:e}",
                self.norm_rr, self.config.tol_force
            ));
        }
        criteria
    }

    // analysis

    /// Analyzes the correction of the driving variables and the residual of the forces
    ///
    /// Only the first `n_driving` components are considered (the Lagrange multipliers are excluded).
    pub fn analyze(&mut self, iteration: usize, mdu: &Vector, rr: &Vector, n_driving: usize) {
        self.iteration = iteration;
        self.n_iterations_total += 1;
        self.norm_mdu_prev_prev = self.norm_mdu_prev;
        self.norm_mdu_prev = self.norm_mdu;
        let (norm_mdu, arg_max_mdu) = max_abs(mdu, n_driving);
        let (norm_rr, arg_max_rr) = max_abs(rr, n_driving);
        self.norm_mdu = norm_mdu;
        self.norm_rr = norm_rr;
        self.arg_max_mdu = arg_max_mdu;
        self.arg_max_rr = arg_max_rr;
        self.found_nan_or_inf = !norm_mdu.is_finite() || !norm_rr.is_finite();
    }

    /// Prints the header of the table with timestep and iteration data
    pub fn print_header(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("Legend:");
            println!("✅ : converged");
            println!("👍 : converging");
            println!("🥵 : diverging");
            println!("😱 : found NaN or Inf\n");
            println!(
                "{:>8} {:>13} {:>13} {:>5} {:>9}   {:>9}  ",
                "timestep", "t", "Δt", "iter", "‖mdu‖∞", "‖R‖∞"
            );
        }
    }

    /// Prints timestep data
    #[rustfmt::skip]
    pub fn print_timestep(&self, timestep: usize, t: f64, dt: f64) {
        if !self.config.verbose_timesteps {
            return;
        }
        println!(
            "{:>8} {:>13.6e} {:>13.6e} {:>5} {:>9}   {:>9}  ",
            timestep + 1, t, dt, ".", ".", "."
        );
    }

    /// Prints iteration data
    pub fn print_iteration(&self) {
        if !self.config.verbose_iterations {
            return;
        }
        let (l, r) = if self.found_nan_or_inf {
            ("😱", "😱")
        } else {
            let l = if self.norm_mdu < self.config.tol_driving {
                "✅"
            } else if self.iteration > 1 && self.norm_mdu > self.norm_mdu_prev {
                "🥵"
            } else {
                "👍"
            };
            let r = if self.norm_rr < self.config.tol_force {
                "✅"
            } else {
                "  "
            };
            (l, r)
        };
        match self.convergence_order() {
            Some(order) => println!(
                "{:>8} {:>13} {:>13} {:>5} {:>9.2e}{} {:>9.2e}{} p ≈ {:.2}",
                ".", ".", ".", self.iteration, self.norm_mdu, l, self.norm_rr, r, order
            ),
            None => println!(
                "{:>8} {:>13} {:>13} {:>5} {:>9.2e}{} {:>9.2e}{}",
                ".", ".", ".", self.iteration, self.norm_mdu, l, self.norm_rr, r
            ),
        }
    }

    /// Prints a message when the time step is sub-divided
    pub fn print_sub_step(&self, t: f64, dt: f64, reason: &str) {
        if self.config.verbose_sub_steps {
            println!("{:>8} {:>13.6e} {:>13.6e} sub-stepping: {}", "✂", t, dt, reason);
        }
    }

    /// Prints the footer with the totals
    pub fn print_footer(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!(
                "\nsteps = {}, iterations = {}, sub-steps = {}",
                self.n_steps_total, self.n_iterations_total, self.n_sub_steps_total
            );
        }
    }
}

/// Returns the max absolute value of the first n components and its index
fn max_abs(v: &Vector, n: usize) -> (f64, usize) {
    let mut max = 0.0;
    let mut arg = 0;
    for i in 0..n {
        let value = f64::abs(v[i]);
        if value.is_nan() {
            return (f64::NAN, i);
        }
        if value > max {
            max = value;
            arg = i;
        }
    }
    (max, arg)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
