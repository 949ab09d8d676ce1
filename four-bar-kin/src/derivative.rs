use crate::{Error, Point, Result};
use std::cmp::Ordering;

/// Minimum number of samples of a finite difference.
pub const MIN_SAMPLES: usize = 2;

/// First derivative of a 2D series by finite differences.
///
/// Forward difference at the first sample, central difference at the interior
/// samples and backward difference at the last sample. Every divisor is the
/// actual elapsed time between the referenced samples, so the time series may
/// have gaps.
pub fn diff(values: &[[f64; 2]], time: &[f64]) -> Result<Vec<[f64; 2]>> {
    if values.len() != time.len() {
        return Err(Error::LengthMismatch { pos: values.len(), time: time.len() });
    }
    let n = time.len();
    if n < MIN_SAMPLES {
        return Err(Error::InsufficientSamples { len: n, min: MIN_SAMPLES });
    }
    let increasing = |w: &[f64]| w[0].partial_cmp(&w[1]) == Some(Ordering::Less);
    if let Some(i) = time.windows(2).position(|w| !increasing(w)) {
        return Err(Error::NonIncreasingTime { index: i + 1 });
    }
    let slope = |i: usize, j: usize| values[j].sub(&values[i]).div(time[j] - time[i]);
    let mut d = Vec::with_capacity(n);
    d.push(slope(0, 1));
    d.extend((1..n - 1).map(|i| slope(i - 1, i + 1)));
    d.push(slope(n - 2, n - 1));
    Ok(d)
}

/// Velocity and acceleration of a point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Derivatives {
    /// Velocity
    pub vel: Vec<[f64; 2]>,
    /// Acceleration
    pub acc: Vec<[f64; 2]>,
}

impl Derivatives {
    /// Differentiate the position series twice with the same scheme.
    ///
    /// At least [`MIN_SAMPLES`] samples are required, otherwise
    /// [`Error::InsufficientSamples`] is returned.
    pub fn from_series(pos: &[[f64; 2]], time: &[f64]) -> Result<Self> {
        let vel = diff(pos, time)?;
        let acc = diff(&vel, time)?;
        Ok(Self { vel, acc })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.vel.len()
    }

    /// Return true if there is no sample.
    pub fn is_empty(&self) -> bool {
        self.vel.is_empty()
    }
}
