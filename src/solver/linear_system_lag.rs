use crate::StrError;
use russell_lab::{mat_copy, solve_lin_sys, Matrix, Vector};

/// Holds variables to solve the linear system of a time step (with Lagrange multipliers for the constraints)
///
/// The unknowns hold the driving variables followed by the Lagrange multipliers:
///
/// ```text
/// ┌       ┐ ┌     ┐   ┌    ┐
/// │ Kt  Aᵀ│ │ mdu │ = │ rr │
/// │ A   0 │ │     │   │    │
/// └       ┘ └     ┘   └    ┘
/// ```
pub struct LinearSystemLag {
    /// Number of driving variables
    pub n_driving: usize,

    /// Total number of equations (driving variables plus Lagrange multipliers)
    pub n_equation: usize,

    /// Holds the residual vector R
    pub rr: Vector,

    /// Holds the global Jacobian matrix K
    pub kk: Matrix,

    /// Holds the "minus-delta-U" vector (the solution of the linear system)
    pub mdu: Vector,

    /// Holds a copy of K that is destroyed by the solver
    work: Matrix,
}

impl LinearSystemLag {
    /// Allocates a new instance
    pub fn new(n_driving: usize, n_lagrange: usize) -> Result<Self, StrError> {
        let n_equation = n_driving + n_lagrange;
        if n_equation < 1 {
            return Err("the number of equations must be ≥ 1");
        }
        Ok(LinearSystemLag {
            n_driving,
            n_equation,
            rr: Vector::new(n_equation),
            kk: Matrix::new(n_equation, n_equation),
            mdu: Vector::new(n_equation),
            work: Matrix::new(n_equation, n_equation),
        })
    }

    /// Clears K and R
    pub fn reset(&mut self) {
        self.kk.fill(0.0);
        self.rr.fill(0.0);
    }

    /// Returns the largest absolute value of the stiffness block
    pub fn max_abs_stiffness(&self) -> f64 {
        let mut max = 0.0;
        for i in 0..self.n_driving {
            for j in 0..self.n_driving {
                max = f64::max(max, f64::abs(self.kk.get(i, j)));
            }
        }
        max
    }

    /// Solves K · mdu = R
    pub fn solve(&mut self) -> Result<(), StrError> {
        mat_copy(&mut self.work, &self.kk)?;
        for i in 0..self.n_equation {
            self.mdu[i] = self.rr[i];
        }
        solve_lin_sys(&mut self.mdu, &mut self.work)?;
        for i in 0..self.n_equation {
            if !self.mdu[i].is_finite() {
                return Err("found NaN or Inf in the solution of the linear system");
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
