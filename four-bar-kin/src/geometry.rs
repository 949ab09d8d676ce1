use crate::{Error, Frame, LinkSet, Point, Result};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Tracer point on the coupler link.
///
/// The point is placed at `ratio * L3` from joint B, rotated by `phi` from
/// the coupler direction. The default places it on joint C.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coupler {
    /// Distance from joint B as a fraction of the coupler length
    pub ratio: f64,
    /// Angle offset from the coupler link in radians
    pub phi: f64,
}

impl Default for Coupler {
    fn default() -> Self {
        Self { ratio: 1., phi: 0. }
    }
}

impl Coupler {
    /// Check the values are finite.
    pub fn check(&self) -> Result<()> {
        for (name, value) in [("ratio", self.ratio), ("phi", self.phi)] {
            if !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Joint positions of one frame.
///
/// A and D are the ground pivots, B joins the driver and the coupler, C joins
/// the coupler and the follower, P is the tracer point.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Joints {
    /// Driver pivot
    pub a: [f64; 2],
    /// Driver-coupler joint
    pub b: [f64; 2],
    /// Coupler-follower joint
    pub c: [f64; 2],
    /// Follower pivot
    pub d: [f64; 2],
    /// Tracer point
    pub p: [f64; 2],
}

/// Joint positions from the input angle `theta2` and the coupler angle
/// `theta3`.
pub fn joints(links: &LinkSet, coupler: &Coupler, theta2: f64, theta3: f64) -> Joints {
    let a = [0., 0.];
    let d = [links.l1, 0.];
    let b = a.pla(links.l2, theta2);
    let c = b.pla(links.l3, theta3);
    let p = b.pla(coupler.ratio * links.l3, theta3 + coupler.phi);
    Joints { a, b, c, d, p }
}

/// Joint positions of every frame.
pub fn geometry(links: &LinkSet, coupler: &Coupler, frames: &[Frame]) -> Vec<Joints> {
    let to_joints = |f: &Frame| joints(links, coupler, f.theta2, f.theta3);
    #[cfg(feature = "rayon")]
    let iter = frames.par_iter();
    #[cfg(not(feature = "rayon"))]
    let iter = frames.iter();
    iter.map(to_joints).collect()
}
