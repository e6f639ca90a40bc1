mod prompt;
mod session;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

use sc_app::{
    load_config, query, AppError, AppResult, FileLoader, Session, SessionConfig, StoreRenderer,
};
use sc_core::{DomainSpec, MeasuredSeries};
use sc_import::SourceFormat;
use sc_results::PlotStore;
use sc_signals::{FormulaId, FormulaRegistry, ScaleMode, ScaleTransform};

use crate::prompt::Prompter;

#[derive(Parser)]
#[command(name = "sc-cli")]
#[command(about = "sigcomp CLI - compare measured signals against analytic references", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive plotting session
    Session {
        /// Session config YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory for stored plots (overrides the config file)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Layout of imported data files
        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,
    },
    /// Parse a data file and print a summary
    Inspect {
        /// Path to the instrument export
        file: PathBuf,
        /// Layout of the file
        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,
    },
    /// List the built-in formulas
    Formulas,
    /// Evaluate one formula and export it as CSV
    Evaluate {
        /// Formula id (see `formulas`)
        formula: String,
        /// Domain start (defaults to the formula family default)
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,
        /// Domain end
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,
        /// Number of samples
        #[arg(long)]
        count: Option<usize>,
        /// Magnitude scale
        #[arg(long, value_enum, default_value_t = ScaleArg::Linear)]
        scale: ScaleArg,
        /// Divide by the peak magnitude before scaling
        #[arg(long)]
        normalize: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List plots written by the plot store
    Plots {
        /// Plot store directory
        dir: PathBuf,
        /// Remove the plot with this id instead of listing
        #[arg(long)]
        delete: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Frequency,
    Time,
}

impl From<FormatArg> for SourceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => SourceFormat::Auto,
            FormatArg::Frequency => SourceFormat::FrequencyResponse,
            FormatArg::Time => SourceFormat::TimeSeries,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Linear,
    Db,
}

impl From<ScaleArg> for ScaleMode {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Linear => ScaleMode::Linear,
            ScaleArg::Db => ScaleMode::Decibel,
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so stdout stays clean for CSV and prompts
    log_subscriber(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Session {
            config,
            output_dir,
            format,
        } => cmd_session(config.as_deref(), output_dir, format.into()),
        Commands::Inspect { file, format } => cmd_inspect(&file, format.into()),
        Commands::Formulas => cmd_formulas(),
        Commands::Evaluate {
            formula,
            min,
            max,
            count,
            scale,
            normalize,
            output,
        } => cmd_evaluate(
            &formula,
            (min, max, count),
            ScaleTransform::new(scale.into(), normalize),
            output.as_deref(),
        ),
        Commands::Plots { dir, delete } => cmd_plots(&dir, delete.as_deref()),
    }
}

fn log_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt().with_writer(writer).finish()
}

fn cmd_session(
    config_path: Option<&Path>,
    output_dir: Option<PathBuf>,
    format: SourceFormat,
) -> AppResult<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if output_dir.is_some() {
        config.output_dir = output_dir;
    }

    let mut store = match &config.output_dir {
        Some(dir) => Some(StoreRenderer::new(PlotStore::new(dir.clone())?)),
        None => None,
    };

    let mut session = Session::new(config, Box::new(FileLoader::new(format)));
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    prompter.say("sigcomp interactive session (Ctrl-D to quit)")?;
    session::run_session(&mut session, &mut prompter, store.as_mut())?;

    if let Some(store) = &store {
        if !store.saved().is_empty() {
            println!(
                "✓ Saved {} plot(s) to {}",
                store.saved().len(),
                store.store().root().display()
            );
        }
    }
    Ok(())
}

fn cmd_inspect(file: &Path, format: SourceFormat) -> AppResult<()> {
    let (series, skipped) = sc_import::load_series(file, format)?;
    print_summary(&series);

    if !skipped.is_empty() {
        println!("\nSkipped lines:");
        for line in &skipped {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn print_summary(series: &MeasuredSeries) {
    let summary = query::summarize_series(series);
    println!("Series: {}", summary.handle);
    println!("  Kind: {}", summary.kind);
    println!("  Points: {}", summary.points);
    println!(
        "  Domain: {} .. {} {}",
        summary.domain_range.0,
        summary.domain_range.1,
        summary.kind.unit()
    );
    match summary.phase_range {
        Some((lo, hi)) => {
            println!(
                "  Magnitude: {} .. {} dB",
                summary.value_range.0, summary.value_range.1
            );
            println!("  Phase: {} .. {} deg", lo, hi);
        }
        None => println!(
            "  Values: {} .. {}",
            summary.value_range.0, summary.value_range.1
        ),
    }
}

fn cmd_formulas() -> AppResult<()> {
    let registry = FormulaRegistry::builtin();
    println!("Built-in formulas:");
    for entry in registry.entries() {
        println!("  {} [{}] - {}", entry.id, entry.family(), entry.name);
        println!("      {}", entry.expression);
    }
    Ok(())
}

fn cmd_evaluate(
    formula: &str,
    range: (Option<f64>, Option<f64>, Option<usize>),
    transform: ScaleTransform,
    output: Option<&Path>,
) -> AppResult<()> {
    // Write to file or stdout
    if let Some(path) = output {
        let mut csv = Vec::new();
        let points = write_evaluation(&mut csv, formula, range, transform)?;
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", points, path.display());
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_evaluation(&mut out, formula, range, transform)?;
        out.flush()?;
    }

    Ok(())
}

/// Evaluate `formula` and write `domain,value` CSV rows to `out`. Returns
/// the number of rows written.
fn write_evaluation<W: Write>(
    out: &mut W,
    formula: &str,
    (min, max, count): (Option<f64>, Option<f64>, Option<usize>),
    transform: ScaleTransform,
) -> AppResult<usize> {
    let id: FormulaId = formula.parse()?;
    let defaults = SessionConfig::default().defaults_for(id.family());
    let spec = DomainSpec::custom(
        min.unwrap_or(defaults.min),
        max.unwrap_or(defaults.max),
        count.unwrap_or(defaults.count),
    )?;

    // scale warnings are logged by the transform itself
    let samples = query::sample_formula(&FormulaRegistry::builtin(), id, &spec, transform)?;

    writeln!(out, "domain,value")?;
    for (x, v) in samples.domain.iter().zip(&samples.values) {
        writeln!(out, "{},{}", x, v)?;
    }
    Ok(samples.domain.len())
}

fn cmd_plots(dir: &Path, delete: Option<&str>) -> AppResult<()> {
    if !dir.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Not a plot directory: {}",
            dir.display()
        )));
    }

    let store = PlotStore::new(dir.to_path_buf())?;
    if let Some(plot_id) = delete {
        store.delete_plot(plot_id)?;
        println!("✓ Deleted plot {}", plot_id);
        return Ok(());
    }

    let plots = store.list_plots()?;
    if plots.is_empty() {
        println!("No plots found in {}", dir.display());
    } else {
        println!("Plots in {}:", dir.display());
        for manifest in plots {
            println!(
                "  round {} #{}: {} [{}] ({})",
                manifest.round,
                manifest.index + 1,
                manifest.title,
                manifest.series_labels.join(", "),
                manifest.timestamp
            );
            println!("      {}", manifest.plot_id);
        }
    }
    Ok(())
}
