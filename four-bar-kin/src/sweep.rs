use crate::{Error, LinkSet, Result, Solver};
use std::f64::consts::TAU;

/// Configuration of the input angle sweep.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepCfg {
    /// Input angle step in radians.
    pub step: f64,
    /// Crank angular speed in rad/s.
    pub speed: f64,
    /// Start angle in radians.
    ///
    /// A small positive offset avoids starting exactly on the toggle position
    /// at the zero crank angle.
    pub start: f64,
}

impl Default for SweepCfg {
    fn default() -> Self {
        Self::from_deg_rpm(1., 30.)
    }
}

impl SweepCfg {
    /// Default start angle in radians.
    pub const START: f64 = 1e-3;
    /// Upper bound of [`SweepCfg::steps()`].
    pub const MAX_STEPS: usize = 1 << 20;

    /// Create from a step in degrees and a crank speed in RPM.
    pub fn from_deg_rpm(step_deg: f64, rpm: f64) -> Self {
        Self { step: step_deg.to_radians(), speed: rpm * TAU / 60., start: Self::START }
    }

    /// Time elapsed per step.
    pub fn dt(&self) -> f64 {
        self.step / self.speed
    }

    /// Number of input angles in one revolution, solved or not.
    pub fn steps(&self) -> usize {
        if self.start > TAU {
            0
        } else {
            ((TAU - self.start) / self.step).floor() as usize + 1
        }
    }

    /// Check the step and the speed.
    ///
    /// The step must be finite and positive, the speed must be finite and
    /// positive so that time increases with the input angle. The step count
    /// is bounded by [`SweepCfg::MAX_STEPS`].
    pub fn check(&self) -> Result<()> {
        for (name, value) in [("step", self.step), ("speed", self.speed)] {
            if !value.is_finite() || value <= 0. {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        if !self.start.is_finite() || self.start < 0. {
            return Err(Error::InvalidParameter { name: "start", value: self.start });
        }
        if self.steps() > Self::MAX_STEPS {
            return Err(Error::InvalidParameter { name: "step", value: self.step });
        }
        Ok(())
    }
}

/// One converged sample of the sweep.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Time in seconds
    pub time: f64,
    /// Input angle
    pub theta2: f64,
    /// Coupler angle
    pub theta3: f64,
    /// Follower angle
    pub theta4: f64,
}

/// Result of a sweep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sweep {
    /// Converged frames, strictly increasing in time and input angle.
    pub frames: Vec<Frame>,
    /// Number of skipped singular steps.
    pub skipped: usize,
}

impl Sweep {
    /// Time series.
    pub fn time(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }
}

/// Solve one input angle of the sweep.
///
/// `cont` holds the last converged `[θ3, θ4]` and seeds the solve. It is
/// replaced on success and left as is on a singular step, which returns
/// `Ok(None)`. Other errors are returned unchanged.
pub fn advance(
    solver: &Solver,
    links: &LinkSet,
    cont: &mut Option<[f64; 2]>,
    theta2: f64,
) -> Result<Option<[f64; 2]>> {
    match solver.solve(links, theta2, *cont) {
        Ok(x) => {
            *cont = Some(x);
            Ok(Some(x))
        }
        Err(Error::SingularConfiguration { evals, .. }) => {
            tracing::debug!(theta2, evals, "skip singular configuration");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Sweep the input angle over one revolution.
///
/// The linkage is validated first, a linkage failing the Grashof condition
/// produces no frame. Steps where the solver does not converge are skipped
/// and the next step is still seeded from the last converged configuration.
///
/// The sweep stops once the input angle exceeds 2π. Since it starts at
/// [`SweepCfg::start`], the last frame does not close the revolution.
pub fn sweep(links: &LinkSet, cfg: &SweepCfg, solver: &Solver) -> Result<Sweep> {
    links.check()?;
    cfg.check()?;
    let dt = cfg.dt();
    let steps = cfg.steps();
    let mut frames = Vec::with_capacity(steps);
    let mut skipped = 0;
    let mut cont = None;
    for i in 0..steps {
        let theta2 = cfg.start + i as f64 * cfg.step;
        match advance(solver, links, &mut cont, theta2)? {
            Some([theta3, theta4]) => {
                let time = i as f64 * dt;
                frames.push(Frame { time, theta2, theta3, theta4 });
            }
            None => skipped += 1,
        }
    }
    tracing::debug!(frames = frames.len(), skipped, "sweep finished");
    Ok(Sweep { frames, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loop_closure;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn config_from_degree_and_rpm() {
        let cfg = SweepCfg::from_deg_rpm(2., 30.);
        assert_abs_diff_eq!(cfg.step, 2f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(cfg.speed, std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(cfg.dt(), 2f64.to_radians() / std::f64::consts::PI, epsilon = 1e-12);
        assert_eq!(cfg.steps(), 180);
        assert_eq!(SweepCfg::default().steps(), 360);
        assert_eq!(SweepCfg::from_deg_rpm(360., 30.).steps(), 1);
    }

    #[test]
    fn config_rejects_bad_values() {
        for (cfg, name) in [
            (SweepCfg::from_deg_rpm(0., 30.), "step"),
            (SweepCfg::from_deg_rpm(-1., 30.), "step"),
            (SweepCfg::from_deg_rpm(1., 0.), "speed"),
            (SweepCfg::from_deg_rpm(1., f64::NAN), "speed"),
            (SweepCfg { start: -1., ..SweepCfg::default() }, "start"),
            (SweepCfg::from_deg_rpm(1e-6, 30.), "step"),
        ] {
            match cfg.check() {
                Err(Error::InvalidParameter { name: n, .. }) => assert_eq!(n, name),
                r => panic!("unexpected result: {r:?}"),
            }
        }
    }

    #[test]
    fn crank_rocker_full_revolution() {
        let links = LinkSet::example();
        let cfg = SweepCfg::from_deg_rpm(2., 30.);
        let sweep = sweep(&links, &cfg, &Solver::default()).unwrap();
        assert_eq!(sweep.frames.len() + sweep.skipped, 180);
        assert_eq!(sweep.skipped, 0);
        let first = sweep.frames[0];
        assert_eq!(first.time, 0.);
        assert_eq!(first.theta2, SweepCfg::START);
        for w in sweep.frames.windows(2) {
            assert!(w[1].time > w[0].time);
            assert!(w[1].theta2 > w[0].theta2);
            // Same branch: no jump between neighbors
            assert!((w[1].theta3 - w[0].theta3).abs() < 0.1);
            assert!((w[1].theta4 - w[0].theta4).abs() < 0.1);
        }
        for f in &sweep.frames {
            assert!(f.theta2 > 0. && f.theta2 <= TAU);
            for r in loop_closure(&links, f.theta2, [f.theta3, f.theta4]) {
                assert_abs_diff_eq!(r, 0., epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn double_rocker_skips_unreachable_angles() {
        let links = LinkSet::new(2., 1.5, 1., 1.8);
        let cfg = SweepCfg::from_deg_rpm(2., 30.);
        let sweep = sweep(&links, &cfg, &Solver::default()).unwrap();
        assert!(sweep.skipped > 0);
        assert!(!sweep.frames.is_empty());
        assert_eq!(sweep.frames.len() + sweep.skipped, 180);
        // Gaps make the time spacing non-uniform
        let dt = cfg.dt();
        assert!(sweep.frames.windows(2).any(|w| w[1].time - w[0].time > 1.5 * dt));
        for f in &sweep.frames {
            for r in loop_closure(&links, f.theta2, [f.theta3, f.theta4]) {
                assert_abs_diff_eq!(r, 0., epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn non_grashof_produces_no_frame() {
        let links = LinkSet::new(1., 5., 1., 1.);
        let err = sweep(&links, &SweepCfg::default(), &Solver::default()).unwrap_err();
        assert!(matches!(err, Error::MechanismInvalid { .. }));
    }

    #[test]
    fn singular_step_keeps_continuation() {
        let links = LinkSet::new(2., 1.5, 1., 1.8);
        let cfg = SweepCfg::from_deg_rpm(1., 30.);
        let solver = Solver::default();
        let mut cont = None;
        let mut last: Option<[f64; 2]> = None;
        let mut gap = false;
        let mut resumed = 0;
        for i in 0..cfg.steps() {
            let theta2 = cfg.start + i as f64 * cfg.step;
            // Only a converged step updates the state
            assert_eq!(cont, last);
            match advance(&solver, &links, &mut cont, theta2).unwrap() {
                None => {
                    assert_eq!(cont, last);
                    gap = last.is_some();
                }
                Some(x) => {
                    assert_eq!(cont, Some(x));
                    if let (true, Some(prev)) = (gap, last) {
                        // Seeded from the frame before the gap, on the same branch
                        assert_eq!(solver.solve(&links, theta2, Some(prev)), Ok(x));
                        let side = |[t3, t4]: [f64; 2]| (t3 - t4).sin().signum();
                        assert_eq!(side(x), side(prev));
                        resumed += 1;
                    }
                    gap = false;
                    last = Some(x);
                }
            }
        }
        assert_eq!(resumed, 1);
    }

    #[test]
    fn no_whole_turn_jumps() {
        for links in [LinkSet::new(2., 1.5, 1., 1.8), LinkSet::new(2., 1.8, 1.5, 1.)] {
            let cfg = SweepCfg::from_deg_rpm(1., 30.);
            let sweep = sweep(&links, &cfg, &Solver::default()).unwrap();
            assert!(sweep.skipped > 0);
            for w in sweep.frames.windows(2) {
                assert!((w[1].theta3 - w[0].theta3).abs() <= PI);
                assert!((w[1].theta4 - w[0].theta4).abs() <= PI);
            }
        }
    }
}
