use crate::*;

/// Parameters of a kinematic analysis.
///
/// Built from the link lengths, every other parameter has a default.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Link lengths
    pub links: LinkSet,
    /// Input angle sweep
    pub sweep: SweepCfg,
    /// Position solver
    pub solver: SolverCfg,
    /// Tracer point
    pub coupler: Coupler,
}

impl Analysis {
    /// Create with default parameters.
    pub fn new(links: LinkSet) -> Self {
        Self {
            links,
            sweep: SweepCfg::default(),
            solver: SolverCfg::default(),
            coupler: Coupler::default(),
        }
    }

    /// Set the sweep configuration.
    pub fn sweep(self, sweep: SweepCfg) -> Self {
        Self { sweep, ..self }
    }

    /// Set the solver configuration.
    pub fn solver(self, solver: SolverCfg) -> Self {
        Self { solver, ..self }
    }

    /// Set the tracer point.
    pub fn coupler(self, coupler: Coupler) -> Self {
        Self { coupler, ..self }
    }

    /// Run the analysis.
    ///
    /// Fails before any solve if a parameter is out of its domain or the
    /// linkage fails the Grashof condition. Fails with
    /// [`Error::InsufficientSamples`] if fewer than two frames converged.
    pub fn run(&self) -> Result<Report> {
        let ty = self.links.check()?;
        self.sweep.check()?;
        self.coupler.check()?;
        let sweep = sweep(&self.links, &self.sweep, &Solver::new(self.solver))?;
        let time = sweep.time();
        let geo = geometry(&self.links, &self.coupler, &sweep.frames);
        let p = geo.iter().map(|js| js.p).collect::<Vec<_>>();
        let Derivatives { vel, acc } = Derivatives::from_series(&p, &time)?;
        let Sweep { frames, skipped } = sweep;
        macro_rules! unzip {
            ($iter:expr, $($field:ident),+) => {
                ($($iter.iter().map(|x| x.$field).collect::<Vec<_>>()),+)
            };
        }
        let (theta2, theta3, theta4) = unzip!(frames, theta2, theta3, theta4);
        let (a, b, c, d) = unzip!(geo, a, b, c, d);
        let (vx, vy) = (vel.iter().map(|v| v[0]).collect(), vel.iter().map(|v| v[1]).collect());
        let (ax, ay) = (acc.iter().map(|v| v[0]).collect(), acc.iter().map(|v| v[1]).collect());
        Ok(Report { ty, skipped, time, theta2, theta3, theta4, a, b, c, d, p, vx, vy, ax, ay })
    }
}

/// Result of a kinematic analysis.
///
/// Every series is aligned by index across the converged frames.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// Type of the linkage
    pub ty: FourBarTy,
    /// Number of skipped singular steps
    pub skipped: usize,
    /// Time in seconds
    pub time: Vec<f64>,
    /// Input angle
    pub theta2: Vec<f64>,
    /// Coupler angle
    pub theta3: Vec<f64>,
    /// Follower angle
    pub theta4: Vec<f64>,
    /// Driver pivot
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    pub a: Vec<[f64; 2]>,
    /// Driver-coupler joint
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    pub b: Vec<[f64; 2]>,
    /// Coupler-follower joint
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    pub c: Vec<[f64; 2]>,
    /// Follower pivot
    #[cfg_attr(feature = "serde", serde(rename = "D"))]
    pub d: Vec<[f64; 2]>,
    /// Tracer point
    #[cfg_attr(feature = "serde", serde(rename = "P"))]
    pub p: Vec<[f64; 2]>,
    /// Tracer velocity, X component
    pub vx: Vec<f64>,
    /// Tracer velocity, Y component
    pub vy: Vec<f64>,
    /// Tracer acceleration, X component
    pub ax: Vec<f64>,
    /// Tracer acceleration, Y component
    pub ay: Vec<f64>,
}

impl Report {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Return true if there is no frame.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Joint positions of a frame.
    pub fn joints(&self, i: usize) -> Option<Joints> {
        Some(Joints {
            a: *self.a.get(i)?,
            b: *self.b.get(i)?,
            c: *self.c.get(i)?,
            d: *self.d.get(i)?,
            p: *self.p.get(i)?,
        })
    }

    /// Maximum tracer speed.
    pub fn max_speed(&self) -> f64 {
        self.vx
            .iter()
            .zip(&self.vy)
            .map(|(x, y)| x.hypot(*y))
            .fold(0., f64::max)
    }
}
