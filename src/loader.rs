//! Reads spline nodes from plain text.
//!
//! The first line holds whitespace-separated x values. The optional second
//! line holds the matching y values; when it is missing, y values are
//! generated from a [`ReferenceFunction`].

use std::{io::ErrorKind, path::Path};

use crate::{error::SplineError, function::ReferenceFunction};

/// Ordered x and y coordinates of spline nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSet {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl NodeSet {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.xs, self.ys)
    }
}

/// Parses nodes from `text`.
///
/// A second line always wins over `function`.
/// # Example
/// ```
/// use spline_sensitivity::{loader, ReferenceFunction};
///
/// let nodes = loader::load_str("1 2 3\n", Some(ReferenceFunction::Square)).unwrap();
/// assert_eq!(nodes.ys, vec![1.0, 4.0, 9.0]);
/// ```
pub fn load_str(text: &str, function: Option<ReferenceFunction>) -> Result<NodeSet, SplineError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let Some(first_line) = lines.first() else {
        return Err(SplineError::invalid("source is empty"));
    };
    let xs = parse_line(first_line, 1)?;
    if xs.is_empty() {
        return Err(SplineError::invalid("line 1 holds no x values"));
    }

    let ys = match (lines.get(1), function) {
        (Some(line), _) => {
            let ys = parse_line(line, 2)?;
            if xs.len() != ys.len() {
                return Err(SplineError::ShapeMismatch { x_len: xs.len(), y_len: ys.len() });
            }
            ys
        }
        (None, Some(function)) => generate(&xs, function)?,
        (None, None) => {
            return Err(SplineError::invalid(
                "not enough data: y values line is missing and no function was given",
            ))
        }
    };

    tracing::debug!(nodes = xs.len(), generated = lines.len() == 1, "nodes loaded");
    Ok(NodeSet { xs, ys })
}

/// Reads nodes from the file at `path`.
pub fn load_path(path: impl AsRef<Path>, function: Option<ReferenceFunction>) -> Result<NodeSet, SplineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SplineError::NotFound { path: path.to_path_buf() },
        _ => SplineError::Io(err),
    })?;

    tracing::debug!(path = %path.display(), "reading nodes");
    load_str(&text, function)
}

/// Same as [`load_path`], with the function given by its registry key.
pub fn load_path_with_key(path: impl AsRef<Path>, key: Option<i64>) -> Result<NodeSet, SplineError> {
    let function = key.map(ReferenceFunction::from_key).transpose()?;
    load_path(path, function)
}

fn parse_line(line: &str, line_number: usize) -> Result<Vec<f64>, SplineError> {
    line.split_whitespace()
        .map(|token| {
            let value: f64 = token.parse().map_err(|_| {
                SplineError::invalid(format!("line {line_number}: '{token}' is not a number"))
            })?;
            if !value.is_finite() {
                return Err(SplineError::invalid(format!(
                    "line {line_number}: '{token}' is not a finite number"
                )));
            }
            Ok(value)
        })
        .collect()
}

fn generate(xs: &[f64], function: ReferenceFunction) -> Result<Vec<f64>, SplineError> {
    xs.iter()
        .map(|x| {
            let y = function.evaluate(*x);
            if y.is_finite() {
                Ok(y)
            } else {
                Err(SplineError::invalid(format!("{function} is not finite at x = {x}")))
            }
        })
        .collect()
}
