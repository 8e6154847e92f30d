use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use spline_sensitivity::{
    init_logging,
    menu::{ConsolePrompt, Menu, MenuConfig, Outcome, DEFAULT_PERTURB_INDEX, DEFAULT_PERTURB_VALUE},
    render::SeriesWriter,
    sensitivity::{SensitivityCfg, DEFAULT_RESOLUTION},
    BoundaryCondition,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Boundary {
    Natural,
    NotAKnot,
}

impl From<Boundary> for BoundaryCondition {
    fn from(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Natural => BoundaryCondition::Natural,
            Boundary::NotAKnot => BoundaryCondition::NotAKnot,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "spline_sensitivity")]
#[command(about = "Cubic spline interpolation and single-node sensitivity analysis")]
struct Args {
    /// Two-line node file used to evaluate the spline at a point
    #[arg(long, default_value = "input.txt")]
    input: PathBuf,

    /// x-node file used for plotting and sensitivity analysis
    #[arg(long, default_value = "nodes.txt")]
    nodes: PathBuf,

    /// Boundary condition closing the spline system
    #[arg(long, value_enum, default_value_t = Boundary::Natural)]
    boundary: Boundary,

    /// Number of grid points sampled between the outer nodes
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,

    /// Node index changed by the sensitivity analysis
    #[arg(long, default_value_t = DEFAULT_PERTURB_INDEX)]
    perturb_index: usize,

    /// Value written at the perturbed node
    #[arg(long, default_value_t = DEFAULT_PERTURB_VALUE, allow_negative_numbers = true)]
    perturb_value: f64,

    /// File receiving the plotted series (default: stdout)
    #[arg(long)]
    plot_out: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn menu_config(&self) -> color_eyre::Result<MenuConfig> {
        let sensitivity = SensitivityCfg::new()
            .set_resolution(self.resolution)?
            .set_boundary(self.boundary.into());

        Ok(MenuConfig {
            input_path: self.input.clone(),
            nodes_path: self.nodes.clone(),
            sensitivity,
            perturb_index: self.perturb_index,
            perturb_value: self.perturb_value,
        })
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = args.menu_config()?;
    tracing::debug!(?config, "starting menu");

    let plot_out: Box<dyn Write> = match &args.plot_out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let mut renderer = SeriesWriter::new(plot_out);
    let mut prompt = ConsolePrompt::new(io::stdin().lock(), io::stdout());

    let outcome = Menu::new(&config, &mut prompt, &mut renderer).run();
    if let Outcome::Failed(message) = &outcome {
        tracing::info!(%message, "finished with a reported error");
    }

    Ok(())
}
