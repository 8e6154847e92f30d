use std::fmt::Display;

use crate::error::SplineError;

/// Reference functions that can generate node values and be drawn next to a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFunction {
    Square,
    Sine,
    Cosine,
    Tangent,
    Absolute,
    NegativeExponential,
}

impl ReferenceFunction {
    /// Registry in menu order; the key of an entry is its position plus one.
    pub const ALL: [ReferenceFunction; 6] = [
        ReferenceFunction::Square,
        ReferenceFunction::Sine,
        ReferenceFunction::Cosine,
        ReferenceFunction::Tangent,
        ReferenceFunction::Absolute,
        ReferenceFunction::NegativeExponential,
    ];

    /// Looks a function up by its menu key.
    /// # Example
    /// ```
    /// use spline_sensitivity::ReferenceFunction;
    ///
    /// assert_eq!(ReferenceFunction::from_key(2).unwrap(), ReferenceFunction::Sine);
    /// assert!(ReferenceFunction::from_key(7).is_err());
    /// ```
    pub fn from_key(key: i64) -> Result<Self, SplineError> {
        usize::try_from(key)
            .ok()
            .and_then(|k| k.checked_sub(1))
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| SplineError::invalid(format!("unknown function key {key}")))
    }

    pub fn key(self) -> i64 {
        match self {
            ReferenceFunction::Square => 1,
            ReferenceFunction::Sine => 2,
            ReferenceFunction::Cosine => 3,
            ReferenceFunction::Tangent => 4,
            ReferenceFunction::Absolute => 5,
            ReferenceFunction::NegativeExponential => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReferenceFunction::Square => "x^2",
            ReferenceFunction::Sine => "sin(x)",
            ReferenceFunction::Cosine => "cos(x)",
            ReferenceFunction::Tangent => "tan(x)",
            ReferenceFunction::Absolute => "|x|",
            ReferenceFunction::NegativeExponential => "e^(-x)",
        }
    }

    pub fn evaluate(self, x: f64) -> f64 {
        match self {
            ReferenceFunction::Square => x * x,
            ReferenceFunction::Sine => x.sin(),
            ReferenceFunction::Cosine => x.cos(),
            ReferenceFunction::Tangent => x.tan(),
            ReferenceFunction::Absolute => x.abs(),
            ReferenceFunction::NegativeExponential => (-x).exp(),
        }
    }
}

impl Display for ReferenceFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
