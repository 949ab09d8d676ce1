//! Four🍀bar kinematics computes the motion of a planar four-bar linkage over
//! one crank revolution.
//!
//! The pipeline is:
//!
//! 1. [`LinkSet::check()`] rejects linkages that fail the Grashof condition.
//! 2. [`sweep()`] drives the crank angle and solves the loop-closure
//!    equations with [`Solver`], warm-starting every step from the last
//!    converged configuration and skipping singular (toggle) steps.
//! 3. [`joints()`] maps every solved frame to joint coordinates and the
//!    tracer point.
//! 4. [`Derivatives::from_series()`] estimates the tracer velocity and
//!    acceleration by finite differences over the (possibly non-uniform)
//!    time series.
//!
//! [`Analysis::run()`] runs the whole pipeline.
//!
//! ```
//! use four_bar_kin::*;
//!
//! let report = Analysis::new(LinkSet::new(1., 0.3, 0.9, 0.8))
//!     .sweep(SweepCfg::from_deg_rpm(2., 30.))
//!     .run()
//!     .unwrap();
//! assert_eq!(report.ty, FourBarTy::GCRR);
//! assert!(report.len() <= 180);
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]
pub use crate::analysis::*;
pub use crate::derivative::*;
pub use crate::error::*;
pub use crate::geometry::*;
pub use crate::point::*;
pub use crate::solver::*;
pub use crate::sweep::*;
pub use crate::ty::*;

mod analysis;
#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod derivative;
mod error;
mod geometry;
mod point;
mod solver;
mod sweep;
mod ty;
