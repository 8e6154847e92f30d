//! Cubic spline interpolation of sampled or function-generated nodes,
//! and sensitivity of the spline to a single perturbed node.
//!
//! # Example
//! ```
//! use spline_sensitivity::{loader, sensitivity, ReferenceFunction, Spline};
//! use assert_approx_eq::assert_approx_eq;
//!
//! let nodes = loader::load_str("0 1 2 3", Some(ReferenceFunction::Square)).unwrap();
//! let spline = Spline::natural(&nodes.xs, &nodes.ys).unwrap();
//!
//! assert_approx_eq!(spline.evaluate(1.0).unwrap(), 1.0, 1e-9);
//! assert_approx_eq!(spline.evaluate(1.5).unwrap(), 2.2, 1e-9);
//!
//! let deviation = sensitivity::compare(&nodes.xs, &nodes.ys, 3, 2.0).unwrap();
//! assert!(deviation > 6.9);
//! ```

mod error;
mod function;
mod knot;
mod polynomial;
mod spline;

pub mod loader;
pub mod logging;
pub mod menu;
pub mod render;
pub mod sensitivity;

pub use error::SplineError;
pub use function::ReferenceFunction;
pub use knot::Knot;
pub use loader::NodeSet;
pub use logging::init_logging;
pub use spline::{BoundaryCondition, Spline, MIN_KNOT_SPACING};
