//! Position solver of the vector-loop equations.
//!
//! For a fixed input angle `θ2`, the unknown coupler angle `θ3` and follower
//! angle `θ4` satisfy
//!
//! ```text
//! L2·cos θ2 + L3·cos θ3 − L1 − L4·cos θ4 = 0
//! L2·sin θ2 + L3·sin θ3 − L4·sin θ4 = 0
//! ```
//!
//! The system is solved with damped least squares (Levenberg-Marquardt).
//! The damping keeps the step finite where the Jacobian is singular, which is
//! always the case for the cold-start guess `θ3 = θ4`.
//!
//! The equations are solved on the lengths divided by the longest link, so the
//! tolerance and the damping hold for any unit of length.
use crate::{Error, LinkSet, Result};
use nalgebra::{Matrix2, Vector2};
use std::f64::consts::TAU;

const DAMPING_MIN: f64 = 1e-15;
const DAMPING_MAX: f64 = 1e15;

/// Configuration of the position solver.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverCfg {
    /// Convergence tolerance on the residual of both equations, relative to
    /// the longest link.
    pub tol: f64,
    /// Maximum number of residual evaluations.
    pub max_eval: usize,
    /// Initial damping factor (lambda).
    pub damping: f64,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self { tol: 1e-10, max_eval: 200, damping: 1e-3 }
    }
}

/// Residual of the loop-closure equations.
pub fn loop_closure(links: &LinkSet, theta2: f64, [theta3, theta4]: [f64; 2]) -> [f64; 2] {
    let LinkSet { l1, l2, l3, l4 } = *links;
    [
        l2 * theta2.cos() + l3 * theta3.cos() - l1 - l4 * theta4.cos(),
        l2 * theta2.sin() + l3 * theta3.sin() - l4 * theta4.sin(),
    ]
}

fn residual(links: &LinkSet, theta2: f64, x: &Vector2<f64>) -> Vector2<f64> {
    Vector2::from(loop_closure(links, theta2, [x.x, x.y]))
}

// Shift `x` by the multiple of 2π closest to `guess`
fn wrap_near(x: f64, guess: f64) -> f64 {
    x - TAU * ((x - guess) / TAU).round()
}

// Partial derivatives of the residual by (θ3, θ4)
fn jacobian(links: &LinkSet, x: &Vector2<f64>) -> Matrix2<f64> {
    let (s3, c3) = x.x.sin_cos();
    let (s4, c4) = x.y.sin_cos();
    Matrix2::new(
        -links.l3 * s3,
        links.l4 * s4,
        links.l3 * c3,
        -links.l4 * c4,
    )
}

/// Damped least squares solver of the loop-closure equations.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    cfg: SolverCfg,
}

impl Solver {
    /// Create a new solver with the given configuration.
    pub const fn new(cfg: SolverCfg) -> Self {
        Self { cfg }
    }

    /// Get the configuration.
    pub const fn cfg(&self) -> &SolverCfg {
        &self.cfg
    }

    /// Solve `[θ3, θ4]` at input angle `theta2`.
    ///
    /// `guess` is the last converged `[θ3, θ4]` of the sweep. Without it the
    /// solver starts from `[θ2, θ2]`. Seeding from the previous solution keeps
    /// the result on the same assembly branch. The result is shifted by whole
    /// turns to lie within π of the guess.
    ///
    /// Returns [`Error::SingularConfiguration`] if the residual cannot be
    /// reduced under the tolerance within [`SolverCfg::max_eval`]
    /// evaluations.
    pub fn solve(&self, links: &LinkSet, theta2: f64, guess: Option<[f64; 2]>) -> Result<[f64; 2]> {
        let SolverCfg { tol, max_eval, damping } = self.cfg;
        let fail = |evals| Error::SingularConfiguration { theta2, evals };
        let links = &links.normalized();
        let guess = guess.unwrap_or([theta2, theta2]);
        let mut x = Vector2::from(guess);
        let mut f = residual(links, theta2, &x);
        let mut cost = f.norm_squared();
        let mut evals = 1;
        let mut lambda = damping;
        loop {
            if f.amax() < tol {
                return Ok([wrap_near(x.x, guess[0]), wrap_near(x.y, guess[1])]);
            }
            let jac = jacobian(links, &x);
            let jtj = jac.transpose() * jac;
            let grad = jac.transpose() * f;
            // Raise the damping until the step reduces the residual
            loop {
                let Some(inv) = (jtj + Matrix2::identity() * lambda).try_inverse() else {
                    return Err(fail(evals));
                };
                let x_new = x - inv * grad;
                let f_new = residual(links, theta2, &x_new);
                evals += 1;
                if evals > max_eval {
                    return Err(fail(evals));
                }
                let cost_new = f_new.norm_squared();
                if cost_new < cost {
                    (x, f, cost) = (x_new, f_new, cost_new);
                    lambda = (lambda / 3.).max(DAMPING_MIN);
                    break;
                }
                lambda *= 4.;
                if lambda > DAMPING_MAX {
                    return Err(fail(evals));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cold_start_converges() {
        let links = LinkSet::example();
        let solver = Solver::default();
        let [t3, t4] = solver.solve(&links, 1e-3, None).unwrap();
        for r in loop_closure(&links, 1e-3, [t3, t4]) {
            assert_abs_diff_eq!(r, 0., epsilon = 1e-10);
        }
        // Upper (open) assembly of the example at the zero crank position
        assert_abs_diff_eq!(t3, 1.0191, epsilon = 1e-3);
        assert_abs_diff_eq!(t4, 1.8601, epsilon = 1e-3);
    }

    #[test]
    fn warm_start_keeps_branch() {
        let links = LinkSet::example();
        let solver = Solver::default();
        let upper = solver.solve(&links, 1e-3, None).unwrap();
        // Seed from the mirrored assembly
        let lower = solver.solve(&links, 1e-3, Some([-upper[0], -upper[1]])).unwrap();
        assert_abs_diff_eq!(lower[0], -upper[0], epsilon = 2e-3);
        assert_abs_diff_eq!(lower[1], -upper[1], epsilon = 2e-3);
        let next = solver.solve(&links, 0.1, Some(upper)).unwrap();
        assert!((next[0] - upper[0]).abs() < 0.1);
        assert!((next[1] - upper[1]).abs() < 0.1);
    }

    #[test]
    fn unreachable_angle_is_singular() {
        // Double rocker, the driver cannot reach θ2 = π
        let links = LinkSet::new(2., 1.5, 1., 1.8);
        let err = Solver::default()
            .solve(&links, std::f64::consts::PI, None)
            .unwrap_err();
        assert!(matches!(err, Error::SingularConfiguration { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn evaluation_budget() {
        let cfg = SolverCfg { max_eval: 1, ..SolverCfg::default() };
        let err = Solver::new(cfg)
            .solve(&LinkSet::example(), 1e-3, None)
            .unwrap_err();
        assert_eq!(err, Error::SingularConfiguration { theta2: 1e-3, evals: 2 });
    }

    #[test]
    fn independent_of_length_unit() {
        let solver = Solver::default();
        let base = LinkSet::example();
        let expected = solver.solve(&base, 1e-3, None).unwrap();
        for k in [1e-12, 1e-9, 1e3, 1e6, 1e9] {
            let links = LinkSet::new(base.l1 * k, base.l2 * k, base.l3 * k, base.l4 * k);
            let [t3, t4] = solver.solve(&links, 1e-3, None).unwrap();
            assert_abs_diff_eq!(t3, expected[0], epsilon = 1e-9);
            assert_abs_diff_eq!(t4, expected[1], epsilon = 1e-9);
            for r in loop_closure(&links, 1e-3, [t3, t4]) {
                assert_abs_diff_eq!(r, 0., epsilon = 1e-10 * k);
            }
        }
    }

    #[test]
    fn result_stays_within_half_turn_of_guess() {
        let links = LinkSet::example();
        let solver = Solver::default();
        let upper = solver.solve(&links, 1e-3, None).unwrap();
        let turns = 3. * TAU;
        let guess = [upper[0] + turns, upper[1] - turns];
        let [t3, t4] = solver.solve(&links, 1e-3, Some(guess)).unwrap();
        assert_abs_diff_eq!(t3, upper[0] + turns, epsilon = 1e-9);
        assert_abs_diff_eq!(t4, upper[1] - turns, epsilon = 1e-9);
    }
}
