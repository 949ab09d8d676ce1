/// A point-like memory layout to achieve zero copy.
///
/// Joint positions, velocities and accelerations are all stored as
/// `[f64; 2]`, this trait provides the vector arithmetic between them.
pub trait Point: Sized + Copy {
    /// Create a new point.
    fn point(x: f64, y: f64) -> Self;
    /// X coordinate.
    fn x(&self) -> f64;
    /// Y coordinate.
    fn y(&self) -> f64;

    /// Polar offset: the point at distance `d0` and angle `a0` from `self`.
    fn pla(&self, d0: f64, a0: f64) -> Self {
        Self::point(self.x() + d0 * a0.cos(), self.y() + d0 * a0.sin())
    }

    /// Distance to another point.
    fn dist(&self, rhs: &Self) -> f64 {
        (rhs.x() - self.x()).hypot(rhs.y() - self.y())
    }

    /// Difference `self - rhs`.
    fn sub(&self, rhs: &Self) -> Self {
        Self::point(self.x() - rhs.x(), self.y() - rhs.y())
    }

    /// Divide both coordinates by `d`.
    fn div(&self, d: f64) -> Self {
        Self::point(self.x() / d, self.y() / d)
    }
}

impl Point for [f64; 2] {
    #[inline(always)]
    fn point(x: f64, y: f64) -> Self {
        [x, y]
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self[1]
    }
}
