use std::fs;

use assert_approx_eq::assert_approx_eq;
use spline_sensitivity::{
    loader,
    menu::{Menu, MenuConfig, Outcome, ScriptedPrompt},
    render::{Renderer, SensitivityPlot, SeriesWriter},
    sensitivity::{self, SensitivityCfg},
    BoundaryCondition, ReferenceFunction, Spline, SplineError,
};
use tempfile::tempdir;

#[test]
fn two_line_file_to_point_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test_input.txt");
    fs::write(&path, "1.0 2.0 3.0\n4.0 5.0 6.0\n").unwrap();

    let nodes = loader::load_path(&path, None).unwrap();
    assert_eq!(nodes.clone().into_parts(), (vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]));

    let spline = Spline::natural(&nodes.xs, &nodes.ys).unwrap();
    assert_approx_eq!(spline.evaluate(2.5).unwrap(), 5.5, 1e-9);
    assert_approx_eq!(spline.evaluate(10.0).unwrap(), 13.0, 1e-9);
}

#[test]
fn loader_failures_are_values() {
    let dir = tempdir().unwrap();
    let mismatch = dir.path().join("test_input_mismatch.txt");
    let invalid = dir.path().join("test_input_invalid.txt");
    fs::write(&mismatch, "1 2 3\n4 5\n").unwrap();
    fs::write(&invalid, "1 2 a\n4 5 6\n").unwrap();

    assert!(matches!(loader::load_path(&mismatch, None), Err(SplineError::ShapeMismatch { .. })));
    assert!(matches!(loader::load_path(&invalid, None), Err(SplineError::InvalidInput(_))));
    assert!(matches!(
        loader::load_path(dir.path().join("non_existent.txt"), None),
        Err(SplineError::NotFound { .. })
    ));
}

#[test]
fn x_squared_nodes_with_either_boundary() {
    let xs = [0.0, 1.0, 2.0, 3.0];
    let ys = [0.0, 1.0, 4.0, 9.0];

    let not_a_knot = Spline::from_xy(&xs, &ys, BoundaryCondition::NotAKnot).unwrap();
    assert!((not_a_knot.evaluate(1.5).unwrap() - 2.25).abs() < 0.01);

    let natural = Spline::natural(&xs, &ys).unwrap();
    assert_approx_eq!(natural.evaluate(1.5).unwrap(), 2.2, 1e-9);
    assert!(natural.evaluate(4.0).unwrap().is_finite());
}

#[test]
fn empty_nodes_fail_cleanly() {
    assert!(Spline::natural(&[], &[]).is_err());
    assert!(sensitivity::compare(&[], &[], 0, 1.0).is_err());
}

#[test]
fn sine_nodes_sensitivity_rendered() {
    let xs: Vec<f64> = (0..5).map(|i| i as f64 * std::f64::consts::FRAC_PI_2).collect();
    let nodes = loader::load_str(
        &xs.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" "),
        Some(ReferenceFunction::Sine),
    )
    .unwrap();

    let cfg = SensitivityCfg::new().set_resolution(50).unwrap();
    let report = sensitivity::analyze(&cfg, &nodes.xs, &nodes.ys, 3, 2.0).unwrap();
    // sin(3pi/2) = -1 moved to 2
    assert!(report.max_deviation > 2.5);

    let mut writer = SeriesWriter::new(Vec::new());
    writer.draw_sensitivity(&SensitivityPlot::new(&report, &nodes.xs, &nodes.ys)).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();

    // title, header, 50 rows, node header, 5 node rows
    assert_eq!(text.lines().count(), 1 + 1 + 50 + 1 + 5);
}

#[test]
fn menu_runs_against_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("nodes.txt"), "-2 -1 0 1 2\n").unwrap();
    let config = MenuConfig {
        input_path: dir.path().join("input.txt"),
        nodes_path: dir.path().join("nodes.txt"),
        ..MenuConfig::default()
    };

    let mut prompt = ScriptedPrompt::new(["2", "5"]);
    let mut writer = SeriesWriter::new(Vec::new());
    let outcome = Menu::new(&config, &mut prompt, &mut writer).run();

    assert!(matches!(outcome, Outcome::Plotted { function: ReferenceFunction::Absolute, .. }));
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.starts_with("# spline interpolation of |x|\n"));

    let mut prompt = ScriptedPrompt::new(["1", "0.5"]);
    let mut writer = SeriesWriter::new(Vec::new());
    let outcome = Menu::new(&config, &mut prompt, &mut writer).run();

    assert!(matches!(outcome, Outcome::Failed(_)));
    assert!(prompt.shown.iter().any(|line| line.starts_with("Error: source not found")));
}
