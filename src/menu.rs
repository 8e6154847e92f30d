//! Console menu over the loader, the spline and the analyses.
//!
//! All interactive input goes through [`Prompt`] and all drawing through
//! [`Renderer`], so the menu runs the same against a terminal or a script.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use crate::{
    error::SplineError,
    function::ReferenceFunction,
    loader,
    render::{InterpolationPlot, Renderer, SensitivityPlot},
    sensitivity::{self, SensitivityCfg},
    spline::Spline,
};

/// Position perturbed by the sensitivity action unless configured otherwise.
pub const DEFAULT_PERTURB_INDEX: usize = 3;
/// Value written at the perturbed position unless configured otherwise.
pub const DEFAULT_PERTURB_VALUE: f64 = 2.0;

/// Line-oriented user input.
pub trait Prompt {
    /// Shows `prompt` and returns the next line without its line break.
    /// End of input yields an empty string.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    fn show(&mut self, message: &str) -> io::Result<()>;

    fn read_number(&mut self, prompt: &str) -> Result<f64, SplineError> {
        let line = self.read_line(prompt)?;
        match line.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(SplineError::invalid(format!("'{}' is not a valid number", line.trim()))),
        }
    }

    fn read_integer(&mut self, prompt: &str) -> Result<i64, SplineError> {
        let line = self.read_line(prompt)?;
        line.trim()
            .parse::<i64>()
            .map_err(|_| SplineError::invalid(format!("'{}' is not a valid integer", line.trim())))
    }
}

/// [`Prompt`] over a reader and a writer, usually stdin and stdout.
pub struct ConsolePrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn show(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}

/// [`Prompt`] answering from a fixed list of lines and recording everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { answers: answers.into_iter().map(Into::into).collect(), shown: Vec::new() }
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.shown.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn show(&mut self, message: &str) -> io::Result<()> {
        self.shown.push(message.to_string());
        Ok(())
    }
}

/// The three menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Evaluate,
    PlotInterpolation,
    Sensitivity,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Evaluate, Action::PlotInterpolation, Action::Sensitivity];

    pub fn from_choice(choice: i64) -> Result<Self, SplineError> {
        match choice {
            1 => Ok(Action::Evaluate),
            2 => Ok(Action::PlotInterpolation),
            3 => Ok(Action::Sensitivity),
            _ => Err(SplineError::invalid(format!("unknown action {choice}"))),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Action::Evaluate => "Approximate function value at a point",
            Action::PlotInterpolation => "Plot the interpolating spline",
            Action::Sensitivity => "Study spline sensitivity",
        }
    }
}

/// File locations and analysis settings used by the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    /// Two-line node file read by [`Action::Evaluate`].
    pub input_path: PathBuf,
    /// x-node file read by the plotting and sensitivity actions.
    pub nodes_path: PathBuf,
    pub sensitivity: SensitivityCfg,
    pub perturb_index: usize,
    pub perturb_value: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("input.txt"),
            nodes_path: PathBuf::from("nodes.txt"),
            sensitivity: SensitivityCfg::default(),
            perturb_index: DEFAULT_PERTURB_INDEX,
            perturb_value: DEFAULT_PERTURB_VALUE,
        }
    }
}

/// What one run of the menu ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Evaluated { x: f64, value: f64 },
    Plotted { function: ReferenceFunction, max_deviation: f64 },
    Analyzed { function: ReferenceFunction, index: usize, max_deviation: f64 },
    Failed(String),
}

pub struct Menu<'a, P: Prompt, R: Renderer> {
    config: &'a MenuConfig,
    prompt: &'a mut P,
    renderer: &'a mut R,
}

impl<'a, P: Prompt, R: Renderer> Menu<'a, P, R> {
    pub fn new(config: &'a MenuConfig, prompt: &'a mut P, renderer: &'a mut R) -> Self {
        Self { config, prompt, renderer }
    }

    /// Shows the menu, runs the chosen action once and reports any failure to the user.
    pub fn run(&mut self) -> Outcome {
        match self.run_action() {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "menu action failed");
                let message = format!("Error: {err}");
                if let Err(io_err) = self.prompt.show(&message) {
                    tracing::error!(error = %io_err, "failed to report error to user");
                }
                Outcome::Failed(err.to_string())
            }
        }
    }

    fn run_action(&mut self) -> Result<Outcome, SplineError> {
        self.prompt.show("Choose an action:")?;
        for (number, action) in Action::ALL.iter().enumerate() {
            self.prompt.show(&format!("{}. {}", number + 1, action.title()))?;
        }

        let action = Action::from_choice(self.prompt.read_integer("Enter action number: ")?)?;
        tracing::info!(?action, "menu action selected");

        match action {
            Action::Evaluate => self.evaluate(),
            Action::PlotInterpolation => {
                let function = self.choose_function()?;
                self.plot_interpolation(function)
            }
            Action::Sensitivity => {
                let function = self.choose_function()?;
                self.analyze_sensitivity(function)
            }
        }
    }

    fn choose_function(&mut self) -> Result<ReferenceFunction, SplineError> {
        self.prompt.show("Choose a function:")?;
        for function in ReferenceFunction::ALL {
            self.prompt.show(&format!("{}. {}", function.key(), function))?;
        }
        ReferenceFunction::from_key(self.prompt.read_integer("Enter function number: ")?)
    }

    fn evaluate(&mut self) -> Result<Outcome, SplineError> {
        let nodes = loader::load_path(&self.config.input_path, None)?;
        let x = self.prompt.read_number("Enter interpolation point: ")?;

        let spline = Spline::from_xy(&nodes.xs, &nodes.ys, self.config.sensitivity.boundary())?;
        let value = spline.evaluate(x)?;

        self.prompt.show(&format!("Value at point {x}: {value}"))?;
        Ok(Outcome::Evaluated { x, value })
    }

    fn plot_interpolation(&mut self, function: ReferenceFunction) -> Result<Outcome, SplineError> {
        let nodes = loader::load_path(&self.config.nodes_path, Some(function))?;
        let report = sensitivity::approximation_error(&self.config.sensitivity, &nodes, function)?;

        self.renderer.draw_interpolation(&InterpolationPlot::new(&report, &nodes.xs, &nodes.ys))?;
        self.prompt.show(&format!("Maximum deviation: {}", report.max_deviation))?;

        Ok(Outcome::Plotted { function, max_deviation: report.max_deviation })
    }

    fn analyze_sensitivity(&mut self, function: ReferenceFunction) -> Result<Outcome, SplineError> {
        let nodes = loader::load_path(&self.config.nodes_path, Some(function))?;
        let report = sensitivity::analyze(
            &self.config.sensitivity,
            &nodes.xs,
            &nodes.ys,
            self.config.perturb_index,
            self.config.perturb_value,
        )?;

        self.renderer.draw_sensitivity(&SensitivityPlot::new(&report, &nodes.xs, &nodes.ys))?;
        self.prompt.show(&format!("Maximum deviation: {}", report.max_deviation))?;

        Ok(Outcome::Analyzed { function, index: report.index, max_deviation: report.max_deviation })
    }
}
