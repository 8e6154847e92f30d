/// Polynomial in powers of `(x - origin)`, coefficients from the constant term up.
#[derive(Debug, Clone)]
pub struct Polynomial {
    origin: f64,
    coefficients: Vec<f64>,
}

impl Polynomial {

    pub fn new(origin: f64, coefficients: Vec<f64>) -> Self {
        Polynomial { origin, coefficients }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = x - self.origin;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c)
    }

    pub fn evaluate_derivative(&self, x: f64, order: usize) -> f64 {
        let t = x - self.origin;
        let mut result = 0.0;
        for i in (order..self.coefficients.len()).rev() {
            result = result * t + self.coefficients[i] * falling_factorial(i, order);
        }
        result
    }
}

/// `n * (n - 1) * ... * (n - k + 1)`, the factor a `k`-th derivative brings down from `t^n`.
pub(crate) fn falling_factorial(n: usize, k: usize) -> f64 {
    let mut multiplier = 1.0;
    let mut coeff = n as f64;
    for _ in 0..k {
        multiplier *= coeff;
        coeff -= 1.0;
    }
    multiplier
}
