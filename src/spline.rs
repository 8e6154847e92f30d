use nalgebra::{DMatrix, DVector};

use crate::{error::SplineError, knot::Knot, polynomial::{falling_factorial, Polynomial}};

/// Smallest spacing accepted between neighbouring knots.
pub const MIN_KNOT_SPACING: f64 = 1e-12;

const CUBIC_COEFFICIENTS: usize = 4;

/// Extra conditions closing the cubic spline system at the two outer knots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryCondition {
    /// Second derivative is zero at the first and the last knot.
    #[default]
    Natural,
    /// Third derivative is continuous at the second and the second-to-last knot.
    NotAKnot,
}

impl BoundaryCondition {
    pub fn name(self) -> &'static str {
        match self {
            BoundaryCondition::Natural => "natural",
            BoundaryCondition::NotAKnot => "not-a-knot",
        }
    }
}

/// Piecewise cubic spline, twice continuously differentiable at interior knots.
#[derive(Debug, Clone)]
pub struct Spline {
    knots: Vec<Knot>,
    polynomials: Vec<Polynomial>,
    boundary: BoundaryCondition,
    min_x: f64,
    max_x: f64,
    is_knot_spacing_uniform: bool,
}

impl Spline {
    /// Builds a spline through `knots`, which must have strictly increasing x.
    ///
    /// # Errors
    /// [SplineError::DegenerateInput] for fewer than 2 knots, repeated or decreasing x,
    /// or a singular coefficient system. [SplineError::InvalidInput] for non-finite coordinates.
    pub fn new(knots: Vec<Knot>, boundary: BoundaryCondition) -> Result<Self, SplineError> {

        if knots.len() < 2 {
            return Err(SplineError::degenerate(format!(
                "spline must have at least 2 knots, got {}",
                knots.len()
            )));
        }
        if knots.iter().any(|k| !k.get_x().is_finite() || !k.get_y().is_finite()) {
            return Err(SplineError::invalid("knot coordinates must be finite"));
        }

        let number_of_intervals = knots.len() - 1;
        let min_x = knots[0].get_x();
        let max_x = knots[number_of_intervals].get_x();
        let mut spline = Spline {
            knots,
            polynomials: Vec::with_capacity(number_of_intervals),
            boundary,
            min_x,
            max_x,
            is_knot_spacing_uniform: false,
        };

        spline.check_knots_spacing()?;
        spline.calculate_polynomials()?;

        tracing::trace!(
            knots = spline.knots.len(),
            boundary = boundary.name(),
            uniform = spline.is_knot_spacing_uniform,
            "spline built"
        );
        Ok(spline)
    }

    /// Builds a spline from separate coordinate slices.
    pub fn from_xy(xs: &[f64], ys: &[f64], boundary: BoundaryCondition) -> Result<Self, SplineError> {
        Spline::new(Knot::from_xy(xs, ys)?, boundary)
    }

    /// Builds a natural cubic spline.
    ///
    /// # Example
    /// ```
    /// use spline_sensitivity::Spline;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let spline = Spline::natural(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 4.0, 9.0]).unwrap();
    /// assert_approx_eq!(spline.evaluate(2.0).unwrap(), 4.0, 1e-9);
    /// assert_approx_eq!(spline.evaluate(1.5).unwrap(), 2.2, 1e-9);
    /// ```
    pub fn natural(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        Spline::from_xy(xs, ys, BoundaryCondition::Natural)
    }

    /// Evaluates the spline at any finite `x`. Outside the knot range the
    /// polynomial of the nearest boundary interval is used.
    pub fn evaluate(&self, x: f64) -> Result<f64, SplineError> {
        if !x.is_finite() {
            return Err(SplineError::invalid(format!("cannot evaluate spline at {x}")));
        }
        Ok(self.extrapolate(x))
    }

    /// Evaluates the spline, rejecting `x` outside the knot range.
    pub fn interpolate(&self, x: f64) -> Result<f64, SplineError> {
        if self.is_in_range(x) {
            let index = self.find_interval_index(x);
            Ok(self.polynomials[index].evaluate(x))
        } else {
            Err(SplineError::OutOfRange { x, min: self.min_x, max: self.max_x })
        }
    }

    pub fn batch_interpolate(&self, x_vector: &[f64]) -> Result<Vec<f64>, SplineError> {

        if let Some(x) = x_vector.iter().find(|x| !self.is_in_range(**x)) {
            return Err(SplineError::OutOfRange { x: *x, min: self.min_x, max: self.max_x });
        }

        let mut results = Vec::with_capacity(x_vector.len());
        let mut index = 0;

        for x in x_vector {
            index = self.find_interval_index_with_hint(index, *x);
            results.push(self.polynomials[index].evaluate(*x));
        }
        Ok(results)
    }

    pub fn extrapolate(&self, x: f64) -> f64 {
        let index = self.piece_index(x);
        self.polynomials[index].evaluate(x)
    }

    pub fn batch_extrapolate(&self, x_vector: &[f64]) -> Vec<f64> {

        let mut results = Vec::with_capacity(x_vector.len());
        let mut index = 0;

        for x in x_vector {
            match self.boundary_interval(*x) {
                Some(boundary_index) => results.push(self.polynomials[boundary_index].evaluate(*x)),
                None => {
                    index = self.find_interval_index_with_hint(index, *x);
                    results.push(self.polynomials[index].evaluate(*x));
                },
            }
        }
        results
    }

    /// Derivative of the given order of the piece covering `x`.
    /// At an interior knot the piece to the right is used.
    pub fn derivative(&self, x: f64, order: usize) -> f64 {
        let index = self.piece_index(x);
        self.polynomials[index].evaluate_derivative(x, order)
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    fn check_knots_spacing(&mut self) -> Result<(), SplineError> {

        let x_spacing_vec: Vec<f64> = self.knots
            .windows(2)
            .map(|w| w[1].get_x() - w[0].get_x())
            .collect();

        if let Some(index) = x_spacing_vec.iter().position(|spacing| *spacing < MIN_KNOT_SPACING) {
            let (x0, x1) = (self.knots[index].get_x(), self.knots[index + 1].get_x());
            return Err(SplineError::degenerate(if x1 < x0 {
                format!("x values must be strictly increasing, got {x0} before {x1}")
            } else {
                format!("knots have equal x values: {x0} and {x1}")
            }));
        }

        let tolerance = 1e-9 * (self.max_x - self.min_x);
        self.is_knot_spacing_uniform = x_spacing_vec
            .windows(2)
            .map(|spacing| (spacing[1] - spacing[0]).abs())
            .all(|difference| difference < tolerance);

        Ok(())
    }

    fn calculate_polynomials(&mut self) -> Result<(), SplineError> {
        let number_of_intervals = self.knots.len() - 1;
        let matrix_size = CUBIC_COEFFICIENTS * number_of_intervals;

        let mut matrix = DMatrix::<f64>::zeros(matrix_size, matrix_size);
        let mut rhs = DVector::<f64>::zeros(matrix_size);
        let mut equation_counter = 0;

        // every piece is expanded around its left knot, so t = 0 there
        let t0_pow = [1.0, 0.0, 0.0, 0.0];

        for i in 0..number_of_intervals {
            let index_start = CUBIC_COEFFICIENTS * i;
            let t1_pow = self.interval_powers(i);

            function_value_equation_coefficients(
                index_start,
                &t0_pow,
                self.knots[i].get_y(),
                &mut equation_counter,
                &mut matrix,
                &mut rhs,
            );

            function_value_equation_coefficients(
                index_start,
                &t1_pow,
                self.knots[i + 1].get_y(),
                &mut equation_counter,
                &mut matrix,
                &mut rhs,
            );

            if i < number_of_intervals - 1 {
                for order in 1..=2 {
                    continuity_equation_coefficients(
                        order,
                        index_start,
                        index_start + CUBIC_COEFFICIENTS,
                        &t1_pow,
                        &t0_pow,
                        &mut equation_counter,
                        &mut matrix,
                    );
                }
            }
        }

        self.boundary_equation_coefficients(number_of_intervals, &mut equation_counter, &mut matrix);
        debug_assert_eq!(equation_counter, matrix_size);

        let solution = match matrix.lu().solve(&rhs) {
            Some(solution) => solution,
            None => return Err(SplineError::degenerate("spline coefficient system is singular")),
        };

        for i in 0..number_of_intervals {
            self.create_polynomial_for_interval(i, &solution);
        }
        Ok(())
    }

    fn boundary_equation_coefficients(
        &self,
        number_of_intervals: usize,
        equation_counter: &mut usize,
        matrix: &mut DMatrix<f64>,
    ) {
        let last = number_of_intervals - 1;
        match self.boundary {
            BoundaryCondition::Natural => {
                derivative_value_equation_coefficients(0, 2, &[1.0, 0.0, 0.0, 0.0], equation_counter, matrix);
                derivative_value_equation_coefficients(
                    CUBIC_COEFFICIENTS * last,
                    2,
                    &self.interval_powers(last),
                    equation_counter,
                    matrix,
                );
            }
            BoundaryCondition::NotAKnot => match number_of_intervals {
                // single interval: straight line through both knots
                1 => {
                    zero_coefficient_equation(2, equation_counter, matrix);
                    zero_coefficient_equation(3, equation_counter, matrix);
                }
                // two intervals: one parabola through all three knots
                2 => {
                    zero_coefficient_equation(3, equation_counter, matrix);
                    zero_coefficient_equation(CUBIC_COEFFICIENTS + 3, equation_counter, matrix);
                }
                _ => {
                    // third derivative of a cubic is 6 * c3 everywhere on its piece
                    for (left, right) in [(0, 1), (last - 1, last)] {
                        matrix[(*equation_counter, CUBIC_COEFFICIENTS * left + 3)] = 1.0;
                        matrix[(*equation_counter, CUBIC_COEFFICIENTS * right + 3)] = -1.0;
                        *equation_counter += 1;
                    }
                }
            },
        }
    }

    fn interval_powers(&self, interval_index: usize) -> [f64; CUBIC_COEFFICIENTS] {
        let h = self.knots[interval_index + 1].get_x() - self.knots[interval_index].get_x();
        [1.0, h, h * h, h * h * h]
    }

    fn create_polynomial_for_interval(&mut self, interval_index: usize, solution: &DVector<f64>) {
        let index_start = CUBIC_COEFFICIENTS * interval_index;
        let coefficients = solution.rows(index_start, CUBIC_COEFFICIENTS).iter().copied().collect();

        self.polynomials.push(Polynomial::new(self.knots[interval_index].get_x(), coefficients));
    }

    fn is_in_range(&self, x: f64) -> bool {
        self.min_x <= x && x <= self.max_x
    }

    fn piece_index(&self, x: f64) -> usize {
        match self.boundary_interval(x) {
            Some(index) => index,
            None => self.find_interval_index(x),
        }
    }

    fn find_interval_index(&self, x: f64) -> usize {
        if self.is_knot_spacing_uniform {
            self.find_interval_index_uniform(x)
        } else {
            self.find_interval_index_bisect(x)
        }
    }

    fn find_interval_index_bisect(&self, x: f64) -> usize {
        let mut min = 0;
        let mut max = self.knots.len() - 1;

        while max - min > 1 {
            let mid = (min + max) / 2;
            if x < self.knots[mid].get_x() {
                max = mid;
            } else {
                min = mid;
            }
        }
        min
    }

    fn find_interval_index_uniform(&self, x: f64) -> usize {
        let number_of_intervals = self.knots.len() - 1;
        let relative_x = ((x - self.min_x) / (self.max_x - self.min_x)).clamp(0.0, 1.0);
        let index = (relative_x * number_of_intervals as f64).floor() as usize;
        index.min(number_of_intervals - 1)
    }

    fn find_interval_index_with_hint(&self, index_hint: usize, x: f64) -> usize {

        if !self.is_in_interval_range(index_hint, x) {

            if index_hint + 2 < self.knots.len() && self.is_in_interval_range(index_hint + 1, x) {
                return index_hint + 1;
            } else {
                return self.find_interval_index(x);
            }
        }
        index_hint
    }

    fn is_in_interval_range(&self, interval_index: usize, x: f64) -> bool {
        self.knots[interval_index].get_x() <= x && x <= self.knots[interval_index + 1].get_x()
    }

    /// Index of the outer piece when `x` lies beyond the first or last interior knot.
    fn boundary_interval(&self, x: f64) -> Option<usize> {
        let size = self.knots.len();
        if x < self.knots[1].get_x() {
            Some(0)
        } else if x > self.knots[size - 2].get_x() {
            Some(size - 2)
        } else {
            None
        }
    }
}

fn function_value_equation_coefficients(
    index_start: usize,
    t_pow: &[f64; CUBIC_COEFFICIENTS],
    y_value: f64,
    equation_counter: &mut usize,
    matrix: &mut DMatrix<f64>,
    rhs: &mut DVector<f64>,
) {
    for c in 0..CUBIC_COEFFICIENTS {
        matrix[(*equation_counter, index_start + c)] = t_pow[c];
    }
    rhs[*equation_counter] = y_value;
    *equation_counter += 1;
}

/// Derivative of `order` of the left piece at its right end equals that of the right piece at its left end.
fn continuity_equation_coefficients(
    order: usize,
    index_start_0: usize,
    index_start_1: usize,
    t_pow_0: &[f64; CUBIC_COEFFICIENTS],
    t_pow_1: &[f64; CUBIC_COEFFICIENTS],
    equation_counter: &mut usize,
    matrix: &mut DMatrix<f64>,
) {
    for c in 0..CUBIC_COEFFICIENTS {
        matrix[(*equation_counter, index_start_0 + c)] = derivative_equation_coefficient(c, order, t_pow_0);
        matrix[(*equation_counter, index_start_1 + c)] = -derivative_equation_coefficient(c, order, t_pow_1);
    }
    *equation_counter += 1;
}

/// Derivative of `order` of one piece is zero at the point described by `t_pow`.
fn derivative_value_equation_coefficients(
    index_start: usize,
    order: usize,
    t_pow: &[f64; CUBIC_COEFFICIENTS],
    equation_counter: &mut usize,
    matrix: &mut DMatrix<f64>,
) {
    for c in 0..CUBIC_COEFFICIENTS {
        matrix[(*equation_counter, index_start + c)] = derivative_equation_coefficient(c, order, t_pow);
    }
    *equation_counter += 1;
}

fn zero_coefficient_equation(coefficient_index: usize, equation_counter: &mut usize, matrix: &mut DMatrix<f64>) {
    matrix[(*equation_counter, coefficient_index)] = 1.0;
    *equation_counter += 1;
}

fn derivative_equation_coefficient(
    polynomial_order: usize,
    derivative_order: usize,
    t_pow: &[f64; CUBIC_COEFFICIENTS],
) -> f64 {
    if polynomial_order < derivative_order {
        0.0
    } else {
        t_pow[polynomial_order - derivative_order] * falling_factorial(polynomial_order, derivative_order)
    }
}
