//! Command line surface: argument parsing and one `run_*` per subcommand.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::data::export::{pivot_frame, raw_frame, write_long_csv};
use crate::data::extract::extract_records;
use crate::data::loader::read_input;
use crate::data::parser::{parse_input, Directives, ParsedInput};
use crate::error::{ReshapeError, Result};
use crate::processing::compare::{compare, DEFAULT_BASELINE, DEFAULT_SYSTEMS};
use crate::processing::pivot::Aggregation;
use crate::processing::reshape::{kept_lines, reshape, ReshapedTables};
use crate::render::bar_chart::BarChart;
use crate::render::legend::LegendOnly;
use crate::render::line_chart::LineChart;
use crate::render::save_chart;
use crate::state::chart_config::{ChartConfig, StyleFile};

#[derive(Parser, Debug)]
#[command(name = "benchplot", version, about = "Reshape and chart benchmark results")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Don't print the pivoted tables
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Multi-series line chart of the mean pivot
    Lines(LinesArgs),
    /// Grouped or stacked bar chart with min/max error bars
    Bars(BarsArgs),
    /// Reshape and print the mean/min/max pivots without rendering
    Table(InputArgs),
    /// Average allocator-comparison results and report the baseline's improvement
    Compare(CompareArgs),
    /// Pull a numeric field out of captured benchmark output as `series x y` records
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Lines of `<series> <x> <y>` or `<series> <y>`; stdin when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Also write the pivots as long-form CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// Chart title; a TITLE line in the input wins
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(long, alias = "x-title")]
    pub x_label: Option<String>,

    #[arg(long, alias = "y-title")]
    pub y_label: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Width in inches
    #[arg(long)]
    pub width: Option<f64>,

    /// Height in inches
    #[arg(long)]
    pub height: Option<f64>,

    #[arg(long)]
    pub dpi: Option<u32>,

    /// Font size in points
    #[arg(long)]
    pub font_size: Option<u32>,

    /// Use a logarithmic y axis
    #[arg(long)]
    pub logy: bool,

    /// JSON file with theme, palette and per-series overrides
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LinesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output image; the extension picks the format (.svg, .png, ...)
    #[arg(short, long, default_value = "op.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub labels: LabelArgs,

    #[command(flatten)]
    pub style: StyleArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BarsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output image; the extension picks the format (.svg, .png, ...)
    #[arg(short, long, default_value = "out.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub labels: LabelArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Stack the series in each group instead of placing them side by side
    #[arg(long)]
    pub stacked: bool,

    /// Render only the legend
    #[arg(long)]
    pub legend_only: bool,

    /// Draw a legend on the chart
    #[arg(long)]
    pub legend_include: bool,

    #[arg(long, default_value_t = 1)]
    pub legend_columns: usize,

    /// Error bar cap width in pixels; 0 disables error bars
    #[arg(long)]
    pub error_bar_width: Option<f64>,

    /// Hide the x tick labels
    #[arg(long)]
    pub no_x_axis: bool,

    /// Hide the y tick labels
    #[arg(long)]
    pub no_y_axis: bool,

    /// Remove all horizontal grid lines
    #[arg(long)]
    pub no_y_grid: bool,

    /// Remove the grid lines on the minor y subdivisions
    #[arg(long)]
    pub no_y_minor_grid: bool,

    /// Drop the minor y subdivisions altogether
    #[arg(long)]
    pub no_y_minor_ticks: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Result file of benchmark headers followed by `<system> <value>` lines
    pub file: PathBuf,

    #[arg(long, default_value = DEFAULT_BASELINE)]
    pub baseline: String,

    /// Systems listed first in the report, in this order
    #[arg(long, value_delimiter = ',')]
    pub systems: Option<Vec<String>>,

    /// Also print `<system> <benchmark> <average>` records for `bars`
    #[arg(long)]
    pub emit_records: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub series: String,

    #[arg(long)]
    pub x: String,

    /// Field name as printed by the benchmark, e.g. `total_throughput`
    #[arg(long)]
    pub field: String,

    /// Captured benchmark output files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl LabelArgs {
    fn apply(&self, config: &mut ChartConfig) {
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(label) = &self.x_label {
            config.x_axis.label = label.clone();
        }
        if let Some(label) = &self.y_label {
            config.y_axis.label = label.clone();
        }
    }
}

impl StyleArgs {
    fn apply(&self, config: &mut ChartConfig) -> Result<()> {
        if let Some(width) = self.width {
            config.width_inches = width;
        }
        if let Some(height) = self.height {
            config.height_inches = height;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        config.log_y |= self.logy;
        if let Some(path) = &self.style {
            config.apply_style_file(StyleFile::load(path)?);
        }
        Ok(())
    }
}

impl BarsArgs {
    /// Chart settings from the command line, before input directives.
    pub fn config(&self) -> Result<ChartConfig> {
        let mut config = ChartConfig::bar_defaults();
        self.labels.apply(&mut config);
        self.style.apply(&mut config)?;
        config.stacked = self.stacked;
        config.legend.only = self.legend_only;
        config.legend.include = self.legend_include;
        config.legend.columns = self.legend_columns;
        if let Some(width) = self.error_bar_width {
            config.error_bar_width = width;
        }
        config.x_axis.show_tick_labels = !self.no_x_axis;
        config.y_axis.show_tick_labels = !self.no_y_axis;
        config.y_axis.grid = !self.no_y_grid;
        config.minor_grid = !self.no_y_grid && !self.no_y_minor_grid;
        config.minor_ticks = !self.no_y_minor_ticks;
        Ok(config)
    }
}

impl LinesArgs {
    pub fn config(&self) -> Result<ChartConfig> {
        let mut config = ChartConfig::line_defaults();
        self.labels.apply(&mut config);
        self.style.apply(&mut config)?;
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Lines(args) => run_lines(args, cli.quiet),
        Commands::Bars(args) => run_bars(args, cli.quiet),
        Commands::Table(args) => run_table(args),
        Commands::Compare(args) => run_compare(args),
        Commands::Extract(args) => run_extract(args),
    }
}

/// Read and reshape the input, then print and export the tables as asked.
fn load_tables(args: &InputArgs, quiet: bool) -> Result<(Directives, ReshapedTables)> {
    let text = read_input(args.input.as_deref())?;
    let input = parse_input(text.lines())?;
    let tables = reshape(&input).inspect_err(|e| {
        if matches!(e, ReshapeError::MalformedInput { .. }) {
            print_invalid_data(&input);
        }
    })?;
    tracing::info!(
        layout = ?tables.layout,
        rows = tables.mean.row_count(),
        series = tables.mean.column_count(),
        "reshaped input"
    );
    if !quiet {
        println!("{}", pivot_frame(&tables.mean)?);
    }
    if let Some(path) = &args.export_csv {
        export_csv(&tables, path)?;
    }
    Ok((input.directives, tables))
}

/// Show what the three-column reading made of rejected input.
fn print_invalid_data(input: &ParsedInput) {
    match raw_frame(&kept_lines(input)) {
        Ok(frame) => println!("Invalid parsed data:\n{frame}"),
        Err(e) => tracing::warn!("cannot tabulate rejected input: {e}"),
    }
}

fn export_csv(tables: &ReshapedTables, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_long_csv(tables, file)?;
    tracing::info!("Exported CSV to {:?}", path);
    Ok(())
}

pub fn run_lines(args: &LinesArgs, quiet: bool) -> Result<()> {
    let mut config = args.config()?;
    let (directives, tables) = load_tables(&args.input, quiet)?;
    config.apply_directives(&directives);
    if !tables.mean.is_complete() {
        tracing::info!("some series lack some x values; their lines are broken at the gaps");
    }

    let chart = LineChart::new(&tables.mean, &config);
    save_chart(&chart, &args.output, config.pixel_size())?;
    Ok(())
}

pub fn run_bars(args: &BarsArgs, quiet: bool) -> Result<()> {
    let mut config = args.config()?;
    let (directives, tables) = load_tables(&args.input, quiet)?;
    config.apply_directives(&directives);

    if config.legend.only {
        let legend = LegendOnly::new(tables.mean.columns(), &config);
        save_chart(&legend, &args.output, config.pixel_size())?;
        return Ok(());
    }

    let bars = tables.error_bars();
    if tables.error_bars_suppressed() && config.error_bar_width > 0.0 {
        tracing::info!(
            rows = tables.mean.row_count(),
            "forcing no error bars because there are fewer than two x values"
        );
    }
    let chart = BarChart::new(&tables.mean, bars, &config);
    save_chart(&chart, &args.output, config.pixel_size())?;
    Ok(())
}

pub fn run_table(args: &InputArgs) -> Result<()> {
    let (_, tables) = load_tables(args, true)?;
    for aggregation in Aggregation::ALL {
        println!("{}:", aggregation.label());
        println!("{}", pivot_frame(tables.table(aggregation))?);
    }
    for (label, stats) in tables.series_summary() {
        print!("{}", stats.report(&label));
    }
    print!("{}", tables.overall_summary().report("all series"));
    Ok(())
}

pub fn run_compare(args: &CompareArgs) -> Result<()> {
    let text = read_input(Some(args.file.as_path()))?;
    let systems = args
        .systems
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEMS.iter().map(|s| s.to_string()).collect());
    let report = compare(&text, &args.baseline, &systems);
    tracing::info!(benchmarks = report.benchmarks.len(), "compared {:?}", args.file);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{report}")?;
    if args.emit_records {
        for record in report.records() {
            writeln!(out, "{} {} {}", record.series, record.x, record.y)?;
        }
    }
    Ok(())
}

pub fn run_extract(args: &ExtractArgs) -> Result<()> {
    let records = extract_records(&args.series, &args.x, &args.field, &args.files)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        writeln!(out, "{} {} {}", record.series, record.x, record.y)?;
    }
    Ok(())
}
