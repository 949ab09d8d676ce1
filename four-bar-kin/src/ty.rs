use crate::{Error, Result};

/// Link lengths of a planar four-bar linkage.
///
/// + Ground link `l1`
/// + Driver (crank) link `l2`
/// + Coupler link `l3`
/// + Follower (rocker) link `l4`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkSet {
    /// Length of the ground link
    pub l1: f64,
    /// Length of the driver link
    pub l2: f64,
    /// Length of the coupler link
    pub l3: f64,
    /// Length of the follower link
    pub l4: f64,
}

impl std::fmt::Display for LinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Self { l1, l2, l3, l4 } = self;
        write!(f, "L1={l1}, L2={l2}, L3={l3}, L4={l4}")
    }
}

impl LinkSet {
    /// Create a new instance.
    pub const fn new(l1: f64, l2: f64, l3: f64, l4: f64) -> Self {
        Self { l1, l2, l3, l4 }
    }

    /// An example crank rocker.
    pub const fn example() -> Self {
        Self::new(1., 0.3, 0.9, 0.8)
    }

    /// Get the planar loop `[l1, l2, l3, l4]`.
    pub const fn planar_loop(&self) -> [f64; 4] {
        [self.l1, self.l2, self.l3, self.l4]
    }

    /// Return the type of this linkage.
    pub fn ty(&self) -> FourBarTy {
        FourBarTy::from_loop(self.planar_loop())
    }

    /// Length of the longest link.
    pub fn longest(&self) -> f64 {
        sorted(self.planar_loop())[3]
    }

    /// Divide every link by the longest one.
    ///
    /// The angles of a linkage do not depend on its size, so the solver works
    /// on the normalized lengths.
    pub fn normalized(&self) -> Self {
        let unit = self.longest();
        let [l1, l2, l3, l4] = self.planar_loop().map(|l| l / unit);
        Self { l1, l2, l3, l4 }
    }

    /// Validate the lengths and the Grashof condition.
    ///
    /// Every length must be finite and positive, otherwise
    /// [`Error::InvalidParameter`] is returned. A linkage failing the Grashof
    /// condition is rejected with [`Error::MechanismInvalid`].
    pub fn check(&self) -> Result<FourBarTy> {
        const NAMES: [&str; 4] = ["L1", "L2", "L3", "L4"];
        for (name, value) in NAMES.into_iter().zip(self.planar_loop()) {
            if !value.is_finite() || value <= 0. {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        let ty = self.ty();
        if ty.is_grashof() {
            Ok(ty)
        } else {
            Err(Error::MechanismInvalid { links: *self, ty })
        }
    }
}

fn sorted(mut fb_loop: [f64; 4]) -> [f64; 4] {
    fb_loop.sort_unstable_by(f64::total_cmp);
    fb_loop
}

/// Type of the four-bar linkage.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum FourBarTy {
    /// Ground link is the shortest, both the driver and the follower rotate
    GCCC,
    /// Driver is the shortest and rotates, the follower rocks
    GCRR,
    /// Coupler is the shortest, the driver and the follower rock
    GRCR,
    /// Follower is the shortest and rotates, the driver rocks
    GRRC,
    /// No link rotates, the ground link is the longest
    RRR1,
    /// No link rotates, the driver is the longest
    RRR2,
    /// No link rotates, the coupler is the longest
    RRR3,
    /// No link rotates, the follower is the longest
    RRR4,
    /// The longest link exceeds the sum of the others, no assembly exists
    Invalid,
}

impl std::fmt::Display for FourBarTy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FourBarTy {
    /// Detect from four-bar loop `[l1, l2, l3, l4]`.
    ///
    /// The change-point case `s + l == p + q` counts as Grashof.
    pub fn from_loop(fb_loop: [f64; 4]) -> Self {
        let [l1, l2, l3, l4] = fb_loop;
        let [s, p, q, l] = sorted(fb_loop);
        if l.is_nan() || l > s + p + q {
            return Self::Invalid;
        }
        macro_rules! arms {
            ($d:expr, $c1:expr, $c2:expr, $c3:expr, $c4:expr) => {
                match $d {
                    d if d == l1 => $c1,
                    d if d == l2 => $c2,
                    d if d == l3 => $c3,
                    d if d == l4 => $c4,
                    _ => Self::Invalid,
                }
            };
        }
        if s + l <= p + q {
            arms!(s, Self::GCCC, Self::GCRR, Self::GRCR, Self::GRRC)
        } else {
            arms!(l, Self::RRR1, Self::RRR2, Self::RRR3, Self::RRR4)
        }
    }

    /// Name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GCCC => "double crank",
            Self::GCRR => "crank rocker",
            Self::GRCR => "double rocker",
            Self::GRRC => "rocker crank",
            Self::RRR1 | Self::RRR2 | Self::RRR3 | Self::RRR4 => "triple rocker",
            Self::Invalid => "unassemblable",
        }
    }

    /// Return true if the type is Grashof linkage.
    pub const fn is_grashof(&self) -> bool {
        matches!(self, Self::GCCC | Self::GCRR | Self::GRCR | Self::GRRC)
    }
}
