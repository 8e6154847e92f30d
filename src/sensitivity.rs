//! Sensitivity of a spline to one perturbed node, and its distance to a reference function.
//!
//! Both analyses sample curves on a uniform grid spanning the knot range,
//! ends included, and report the largest absolute gap between them.

use crate::{
    error::SplineError,
    function::ReferenceFunction,
    loader::NodeSet,
    spline::{BoundaryCondition, Spline},
};

/// Number of grid points used when no resolution is configured.
pub const DEFAULT_RESOLUTION: usize = 200;

/// Sampling grid and spline settings shared by the analyses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityCfg {
    resolution: usize,
    boundary: BoundaryCondition,
}

impl Default for SensitivityCfg {
    fn default() -> Self {
        Self { resolution: DEFAULT_RESOLUTION, boundary: BoundaryCondition::Natural }
    }
}

impl SensitivityCfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// [SplineError::InvalidInput] when `resolution < 2`.
    pub fn set_resolution(mut self, resolution: usize) -> Result<Self, SplineError> {
        if resolution < 2 {
            return Err(SplineError::invalid(format!(
                "grid resolution must be at least 2, got {resolution}"
            )));
        }
        self.resolution = resolution;
        Ok(self)
    }

    pub fn set_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn resolution(&self) -> usize { self.resolution }
    pub fn boundary(&self) -> BoundaryCondition { self.boundary }
}

/// Outcome of [`analyze`].
#[derive(Debug, Clone)]
pub struct SensitivityReport {
    pub index: usize,
    pub original_value: f64,
    pub new_value: f64,
    pub grid: Vec<f64>,
    pub baseline: Vec<f64>,
    pub perturbed: Vec<f64>,
    pub max_deviation: f64,
    /// Grid point where `max_deviation` is reached.
    pub argmax: f64,
}

/// Outcome of [`approximation_error`].
#[derive(Debug, Clone)]
pub struct ApproximationReport {
    pub function: ReferenceFunction,
    pub grid: Vec<f64>,
    pub reference: Vec<f64>,
    pub interpolated: Vec<f64>,
    pub max_deviation: f64,
    pub argmax: f64,
}

/// `n` evenly spaced points from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n - 1).map(|i| start + step * i as f64).collect();
            grid.push(end);
            grid
        }
    }
}

/// Largest `|ys_baseline - ys_modified|` on the default grid, where `ys_modified`
/// is `ys` with `ys[index]` replaced by `new_value`.
///
/// # Example
/// ```
/// use spline_sensitivity::sensitivity::compare;
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 1.0, 4.0, 9.0];
/// assert_eq!(compare(&xs, &ys, 2, 4.0).unwrap(), 0.0);
/// assert!(compare(&xs, &ys, 2, 5.0).unwrap() > 0.9);
/// ```
pub fn compare(xs: &[f64], ys: &[f64], index: usize, new_value: f64) -> Result<f64, SplineError> {
    analyze(&SensitivityCfg::default(), xs, ys, index, new_value).map(|report| report.max_deviation)
}

/// Builds the baseline and the perturbed spline and samples both on the configured grid.
pub fn analyze(
    cfg: &SensitivityCfg,
    xs: &[f64],
    ys: &[f64],
    index: usize,
    new_value: f64,
) -> Result<SensitivityReport, SplineError> {
    let Some(original_value) = ys.get(index).copied() else {
        return Err(SplineError::invalid(format!(
            "perturbed index {index} is out of range for {} nodes",
            ys.len()
        )));
    };

    let mut perturbed_ys = ys.to_vec();
    perturbed_ys[index] = new_value;

    let baseline_spline = Spline::from_xy(xs, ys, cfg.boundary)?;
    let perturbed_spline = Spline::from_xy(xs, &perturbed_ys, cfg.boundary)?;

    let grid = linspace(baseline_spline.min_x(), baseline_spline.max_x(), cfg.resolution);
    let baseline = baseline_spline.batch_extrapolate(&grid);
    let perturbed = perturbed_spline.batch_extrapolate(&grid);

    let (max_deviation, argmax) = max_abs_gap(&grid, &baseline, &perturbed);

    tracing::debug!(index, original_value, new_value, max_deviation, argmax, "sensitivity analyzed");
    Ok(SensitivityReport {
        index,
        original_value,
        new_value,
        grid,
        baseline,
        perturbed,
        max_deviation,
        argmax,
    })
}

/// Samples `function` and the spline through `nodes` on the same grid and reports their largest gap.
/// Grid points where the function is not finite are left out of the maximum.
pub fn approximation_error(
    cfg: &SensitivityCfg,
    nodes: &NodeSet,
    function: ReferenceFunction,
) -> Result<ApproximationReport, SplineError> {
    let spline = Spline::from_xy(&nodes.xs, &nodes.ys, cfg.boundary)?;

    let grid = linspace(spline.min_x(), spline.max_x(), cfg.resolution);
    let reference: Vec<f64> = grid.iter().map(|x| function.evaluate(*x)).collect();
    let interpolated = spline.batch_extrapolate(&grid);

    let (max_deviation, argmax) = max_abs_gap(&grid, &reference, &interpolated);

    tracing::debug!(function = function.name(), max_deviation, argmax, "approximation error measured");
    Ok(ApproximationReport { function, grid, reference, interpolated, max_deviation, argmax })
}

fn max_abs_gap(grid: &[f64], a: &[f64], b: &[f64]) -> (f64, f64) {
    grid.iter()
        .zip(a.iter().zip(b))
        .map(|(x, (a, b))| ((a - b).abs(), *x))
        .filter(|(gap, _)| gap.is_finite())
        .fold((0.0, grid.first().copied().unwrap_or(0.0)), |best, candidate| {
            if candidate.0 > best.0 { candidate } else { best }
        })
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    const XS: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
    const YS: [f64; 4] = [0.0, 1.0, 4.0, 9.0];

    #[test]
    fn linspace_includes_both_ends() {
        let grid = linspace(-1.0, 2.0, 200);

        assert_eq!(grid.len(), 200);
        assert_eq!(grid[0], -1.0);
        assert_eq!(grid[199], 2.0);
        assert_approx_eq!(grid[1] - grid[0], 3.0 / 199.0, 1e-12);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
    }

    #[test]
    fn unchanged_value_gives_zero() {
        for index in 0..XS.len() {
            assert_eq!(compare(&XS, &YS, index, YS[index]).unwrap(), 0.0);
        }
    }

    #[test]
    fn deviation_is_never_negative() {
        let up = compare(&XS, &YS, 1, YS[1] + 0.5).unwrap();
        let down = compare(&XS, &YS, 1, YS[1] - 0.5).unwrap();

        assert!(up > 0.0);
        assert!(down > 0.0);
        // a spline is linear in its y values, so equal and opposite shifts give equal deviations
        assert_approx_eq!(up, down, 1e-12);
    }

    #[test]
    fn deviation_at_perturbed_node_is_reached() {
        let cfg = SensitivityCfg::new().set_resolution(4).unwrap();
        let report = analyze(&cfg, &XS, &YS, 3, 2.0).unwrap();

        // the grid coincides with the knots, so the gap is the shift itself
        assert_eq!(report.grid, XS.to_vec());
        assert_approx_eq!(report.max_deviation, 7.0, 1e-9);
        assert_eq!(report.argmax, 3.0);
        assert_eq!(report.original_value, 9.0);
        assert_eq!(report.new_value, 2.0);
    }

    #[test]
    fn report_series_have_grid_length() {
        let report = analyze(&SensitivityCfg::default(), &XS, &YS, 2, 0.0).unwrap();

        assert_eq!(report.grid.len(), DEFAULT_RESOLUTION);
        assert_eq!(report.baseline.len(), DEFAULT_RESOLUTION);
        assert_eq!(report.perturbed.len(), DEFAULT_RESOLUTION);
        assert!(report.max_deviation > 3.5);
    }

    #[test]
    fn boundary_condition_is_used() {
        let natural = SensitivityCfg::new();
        let not_a_knot = SensitivityCfg::new().set_boundary(BoundaryCondition::NotAKnot);

        let a = analyze(&natural, &XS, &YS, 1, 3.0).unwrap();
        let b = analyze(&not_a_knot, &XS, &YS, 1, 3.0).unwrap();

        assert_eq!(not_a_knot.boundary(), BoundaryCondition::NotAKnot);
        assert!((a.max_deviation - b.max_deviation).abs() > 1e-6);
    }

    #[test]
    fn index_out_of_range() {
        let result = compare(&XS, &YS, 4, 1.0);

        assert!(matches!(result, Err(SplineError::InvalidInput(_))));
    }

    #[test]
    fn degenerate_nodes_fail() {
        assert!(matches!(compare(&[1.0], &[2.0], 0, 3.0), Err(SplineError::DegenerateInput(_))));
        assert!(matches!(compare(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0], 0, 3.0), Err(SplineError::DegenerateInput(_))));
        assert!(compare(&[], &[], 0, 3.0).is_err());
    }

    #[test]
    fn resolution_must_allow_both_ends() {
        assert!(SensitivityCfg::new().set_resolution(1).is_err());
        assert_eq!(SensitivityCfg::new().set_resolution(2).unwrap().resolution(), 2);
    }

    #[test]
    fn approximation_of_exact_cubic_is_zero() {
        let nodes = NodeSet { xs: XS.to_vec(), ys: YS.to_vec() };
        let cfg = SensitivityCfg::new().set_boundary(BoundaryCondition::NotAKnot);

        let report = approximation_error(&cfg, &nodes, ReferenceFunction::Square).unwrap();

        assert_eq!(report.function, ReferenceFunction::Square);
        assert_eq!(report.reference.len(), DEFAULT_RESOLUTION);
        assert!(report.max_deviation < 1e-9);
    }

    #[test]
    fn approximation_of_natural_spline() {
        let nodes = NodeSet { xs: XS.to_vec(), ys: YS.to_vec() };

        let report = approximation_error(&SensitivityCfg::default(), &nodes, ReferenceFunction::Square).unwrap();

        // natural ends flatten the curvature, the gap peaks inside the outer intervals
        assert!(report.max_deviation > 0.05);
        assert!(report.max_deviation < 0.5);
        assert!(report.argmax > 0.0 && report.argmax < 3.0);
    }

    #[test]
    fn approximation_skips_non_finite_reference() {
        let gap = max_abs_gap(&[0.0, 1.0, 2.0], &[f64::INFINITY, 1.0, 2.0], &[0.0, 1.5, 2.0]);

        assert_eq!(gap, (0.5, 1.0));
    }
}
