use crate::error::SplineError;

/// Knot represents a node the spline passes through.
/// - `x` - coordinate,
/// - `y` - coordinate.
#[derive(Debug, Clone, Copy)]
pub struct Knot {
    x: f64,
    y: f64,
}

impl Knot {
    /// Creates a [Knot] from its coordinates.
    /// # Example
    /// ```
    /// use spline_sensitivity::Knot;
    ///
    /// let knot = Knot::new(1.0, 2.0);
    /// assert_eq!(knot.get_x(), 1.0);
    /// assert_eq!(knot.get_y(), 2.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Knot { x, y }
    }

    /// Pairs x and y coordinates into knots, keeping their order.
    /// # Errors
    /// [SplineError::ShapeMismatch] when the slices differ in length and
    /// [SplineError::InvalidInput] when any coordinate is not finite.
    /// ```
    /// use spline_sensitivity::Knot;
    ///
    /// assert!(Knot::from_xy(&[0.0, 1.0, 2.0], &[1.0, 2.0]).is_err());
    /// assert!(Knot::from_xy(&[0.0, f64::NAN], &[1.0, 2.0]).is_err());
    /// ```
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Vec<Self>, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::ShapeMismatch { x_len: xs.len(), y_len: ys.len() });
        }
        if let Some(idx) = xs.iter().position(|x| !x.is_finite()) {
            return Err(SplineError::invalid(format!("non-finite x value at index {idx}")));
        }
        if let Some(idx) = ys.iter().position(|y| !y.is_finite()) {
            return Err(SplineError::invalid(format!("non-finite y value at index {idx}")));
        }

        Ok(xs.iter().zip(ys).map(|(x, y)| Knot::new(*x, *y)).collect())
    }

    pub fn get_x(&self) -> f64 {
        self.x
    }

    pub fn get_y(&self) -> f64 {
        self.y
    }
}

impl Ord for Knot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.x.total_cmp(&other.x)
    }
}

impl PartialOrd for Knot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Knot {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
    }
}

impl Eq for Knot { }


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let knot = Knot::new(1.0, 2.5);

        assert_eq!(1.0, knot.x);
        assert_eq!(2.5, knot.y);
    }

    #[test]
    fn test_from_xy_keeps_order() {
        let knots = Knot::from_xy(&[0.0, 2.0, 1.0], &[5.0, 6.0, 7.0]).unwrap();

        assert_eq!(3, knots.len());
        assert_eq!(2.0, knots[1].get_x());
        assert_eq!(6.0, knots[1].get_y());
        assert_eq!(1.0, knots[2].get_x());
    }

    #[test]
    fn test_from_xy_shape_mismatch() {
        let result = Knot::from_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0]);

        assert!(matches!(result, Err(SplineError::ShapeMismatch { x_len: 3, y_len: 2 })));
    }

    #[test]
    fn test_from_xy_non_finite() {
        assert!(matches!(
            Knot::from_xy(&[0.0, 1.0], &[f64::INFINITY, 1.0]),
            Err(SplineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_xy_empty() {
        let knots = Knot::from_xy(&[], &[]).unwrap();

        assert!(knots.is_empty());
    }

    #[test]
    fn test_ordering_by_x() {
        let mut knots = vec![Knot::new(2.0, 0.0), Knot::new(-1.0, 3.0), Knot::new(0.5, 1.0)];
        knots.sort();

        assert_eq!(-1.0, knots[0].get_x());
        assert_eq!(2.0, knots[2].get_x());
        assert_eq!(Knot::new(0.5, 10.0), knots[1]);
    }
}
