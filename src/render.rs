//! Hands sampled curves to whatever draws them.

use std::io::{self, Write};

use crate::{
    function::ReferenceFunction,
    sensitivity::{ApproximationReport, SensitivityReport},
};

/// Spline drawn against the reference function it was built from.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationPlot<'a> {
    pub function: ReferenceFunction,
    pub x: &'a [f64],
    pub reference: &'a [f64],
    pub interpolated: &'a [f64],
    pub nodes_x: &'a [f64],
    pub nodes_y: &'a [f64],
}

impl<'a> InterpolationPlot<'a> {
    pub fn new(report: &'a ApproximationReport, nodes_x: &'a [f64], nodes_y: &'a [f64]) -> Self {
        Self {
            function: report.function,
            x: &report.grid,
            reference: &report.reference,
            interpolated: &report.interpolated,
            nodes_x,
            nodes_y,
        }
    }
}

/// Baseline spline drawn against its perturbed copy.
#[derive(Debug, Clone, Copy)]
pub struct SensitivityPlot<'a> {
    pub x: &'a [f64],
    pub baseline: &'a [f64],
    pub perturbed: &'a [f64],
    pub nodes_x: &'a [f64],
    pub nodes_y: &'a [f64],
}

impl<'a> SensitivityPlot<'a> {
    pub fn new(report: &'a SensitivityReport, nodes_x: &'a [f64], nodes_y: &'a [f64]) -> Self {
        Self {
            x: &report.grid,
            baseline: &report.baseline,
            perturbed: &report.perturbed,
            nodes_x,
            nodes_y,
        }
    }
}

pub trait Renderer {
    fn draw_interpolation(&mut self, plot: &InterpolationPlot<'_>) -> io::Result<()>;

    fn draw_sensitivity(&mut self, plot: &SensitivityPlot<'_>) -> io::Result<()>;
}

/// Writes every series as semicolon-separated rows under a header line, nodes last.
pub struct SeriesWriter<W: Write> {
    out: W,
    precision: usize,
}

impl<W: Write> SeriesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, precision: 6 }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_rows(&mut self, header: &str, columns: &[&[f64]]) -> io::Result<()> {
        writeln!(self.out, "{header}")?;
        let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
        for row in 0..rows {
            let line: Vec<String> = columns
                .iter()
                .map(|column| format!("{:.*}", self.precision, column[row]))
                .collect();
            writeln!(self.out, "{}", line.join(";"))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for SeriesWriter<W> {
    fn draw_interpolation(&mut self, plot: &InterpolationPlot<'_>) -> io::Result<()> {
        writeln!(self.out, "# spline interpolation of {}", plot.function)?;
        self.write_rows("x;reference;spline", &[plot.x, plot.reference, plot.interpolated])?;
        self.write_rows("node_x;node_y", &[plot.nodes_x, plot.nodes_y])?;
        self.out.flush()
    }

    fn draw_sensitivity(&mut self, plot: &SensitivityPlot<'_>) -> io::Result<()> {
        writeln!(self.out, "# spline sensitivity")?;
        self.write_rows("x;baseline;perturbed", &[plot.x, plot.baseline, plot.perturbed])?;
        self.write_rows("node_x;node_y", &[plot.nodes_x, plot.nodes_y])?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_rows() {
        let plot = InterpolationPlot {
            function: ReferenceFunction::Square,
            x: &[0.0, 0.5],
            reference: &[0.0, 0.25],
            interpolated: &[0.0, 0.3],
            nodes_x: &[0.0],
            nodes_y: &[0.0],
        };
        let mut writer = SeriesWriter::new(Vec::new()).with_precision(2);

        writer.draw_interpolation(&plot).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        assert_eq!(
            text,
            "# spline interpolation of x^2\nx;reference;spline\n0.00;0.00;0.00\n0.50;0.25;0.30\nnode_x;node_y\n0.00;0.00\n"
        );
    }

    #[test]
    fn sensitivity_rows() {
        let plot = SensitivityPlot {
            x: &[1.0, 2.0, 3.0],
            baseline: &[1.0, 4.0, 9.0],
            perturbed: &[1.0, 2.0, 9.0],
            nodes_x: &[1.0, 2.0, 3.0],
            nodes_y: &[1.0, 4.0, 9.0],
        };
        let mut writer = SeriesWriter::new(Vec::new()).with_precision(1);

        writer.draw_sensitivity(&plot).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# spline sensitivity");
        assert_eq!(lines[1], "x;baseline;perturbed");
        assert_eq!(lines[3], "2.0;4.0;2.0");
        assert_eq!(lines[5], "node_x;node_y");
        assert_eq!(lines.len(), 9);
    }
}
