//! Command implementations and argument parsing for the `clue` CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clue_core::{
    Clue, ClueBuilder, ClueError, ClueErrorCode, ClusteringResult, ExecutionStrategy,
};
use clue_providers_dense::{DenseMatrixProvider, DenseMatrixProviderError};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_CRITICAL_DISTANCE: f32 = 1.0;
const DEFAULT_DENSITY_THRESHOLD: f32 = 1.0;
const DEFAULT_OUTLIER_DELTA_FACTOR: f32 = 2.0;
const DEFAULT_STACK_SIZE: usize = 256;
const DEFAULT_POINTS_PER_TILE: usize = 10;

/// Highest dimensionality the CLI instantiates the pipeline for.
pub const MAX_DIMENSION: usize = 4;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "clue", about = "Density-based clustering of low-dimensional points.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a point set and print one label per point.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Critical distance `dc` used for density and seed selection.
    #[arg(long = "dc", default_value_t = DEFAULT_CRITICAL_DISTANCE)]
    pub critical_distance: f32,

    /// Minimum density `rho_c` of a seed.
    #[arg(long = "rhoc", default_value_t = DEFAULT_DENSITY_THRESHOLD)]
    pub density_threshold: f32,

    /// Multiplier of `dc` giving the nearest-higher search radius and the
    /// outlier distance.
    #[arg(long = "outlier-delta-factor", default_value_t = DEFAULT_OUTLIER_DELTA_FACTOR)]
    pub outlier_delta_factor: f32,

    /// Deepest follower chain a single seed may propagate through.
    #[arg(long = "stack-size", default_value_t = DEFAULT_STACK_SIZE)]
    pub stack_size: usize,

    /// Average number of points per tile of the spatial grid.
    #[arg(long = "points-per-tile", default_value_t = DEFAULT_POINTS_PER_TILE)]
    pub points_per_tile: usize,

    /// Fixed capacity of every tile bin; unbounded when omitted.
    #[arg(long = "tile-capacity")]
    pub tile_capacity: Option<usize>,

    /// How per-point work is scheduled.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Data source configuration.
    #[command(subcommand)]
    pub source: RunSource,
}

impl RunCommand {
    /// Returns a command with every tuning flag at its default value.
    #[must_use]
    pub fn with_source(source: RunSource) -> Self {
        Self {
            critical_distance: DEFAULT_CRITICAL_DISTANCE,
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            outlier_delta_factor: DEFAULT_OUTLIER_DELTA_FACTOR,
            stack_size: DEFAULT_STACK_SIZE,
            points_per_tile: DEFAULT_POINTS_PER_TILE,
            tile_capacity: None,
            strategy: StrategyArg::Auto,
            source,
        }
    }

    fn build(&self) -> Result<Clue, ClueError> {
        ClueBuilder::new()
            .with_critical_distance(self.critical_distance)
            .with_density_threshold(self.density_threshold)
            .with_outlier_delta_factor(self.outlier_delta_factor)
            .with_local_stack_size_per_seed(self.stack_size)
            .with_points_per_tile(self.points_per_tile)
            .with_tile_capacity(self.tile_capacity)
            .with_execution_strategy(self.strategy.into())
            .build()
    }
}

/// Execution strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Parallel when compiled in, serial otherwise.
    Auto,
    /// Single-threaded.
    Serial,
    /// Rayon thread pool.
    Parallel,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Serial => Self::Serial,
            StrategyArg::Parallel => Self::Parallel,
        }
    }
}

/// Input data sources.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read points from a Parquet `FixedSizeList<Float32, D>` column.
    Parquet(ParquetArgs),
    /// Read points from a text file with one comma-separated point per line.
    Text(TextArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` rows.
    #[arg(long)]
    pub column: String,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Text ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to a text file; blank lines and `#` comments are ignored.
    pub path: PathBuf,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input has more coordinates per point than the CLI supports.
    #[error(
        "points with {dimension} coordinates are not supported (maximum {max})",
        max = MAX_DIMENSION
    )]
    UnsupportedDimension {
        /// Coordinates per point in the input.
        dimension: usize,
    },
    /// Point ingestion failed.
    #[error(transparent)]
    Dense(#[from] DenseMatrixProviderError),
    /// Configuration or clustering failed.
    #[error(transparent)]
    Core(#[from] ClueError),
}

impl CliError {
    /// Returns the stable core error code behind this failure, if any.
    #[must_use]
    pub fn core_code(&self) -> Option<ClueErrorCode> {
        match self {
            Self::Core(err) => Some(err.code()),
            Self::Dense(DenseMatrixProviderError::Points { source, .. }) => Some(source.code()),
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the data source.
    pub data_source: String,
    /// Coordinates per point.
    pub dimension: usize,
    /// Cluster assignments and seeds.
    pub result: ClusteringResult,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clue_cli::cli::{Cli, Command, RunCommand, RunSource, TextArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0,0\n0.5,0\n9,9\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand::with_source(RunSource::Text(TextArgs {
///         path: file.path().to_path_buf(),
///         name: None,
///     }))),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.assignments().len(), 3);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(dc = command.critical_distance, rho_c = command.density_threshold, source = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let clue = command.build()?;
    let span = Span::current();

    let provider = match command.source {
        RunSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            load_parquet(args)?
        }
        RunSource::Text(args) => {
            span.record("source", field::display("text"));
            load_text(args)?
        }
    };

    let result = cluster(&clue, &provider)?;
    info!(
        data_source = provider.name(),
        clusters = result.cluster_count(),
        outliers = result.outlier_count(),
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source: provider.name().to_owned(),
        dimension: provider.dimension(),
        result,
    })
}

#[instrument(
    name = "cli.load_parquet",
    err,
    skip(args),
    fields(path = field::Empty, column = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_parquet(args: ParquetArgs) -> Result<DenseMatrixProvider, CliError> {
    let ParquetArgs { path, column, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    Ok(DenseMatrixProvider::try_from_parquet_path(
        chosen_name,
        &path,
        &column,
    )?)
}

#[instrument(
    name = "cli.load_text",
    err,
    skip(args),
    fields(path = field::Empty, override_name = field::Empty),
)]
pub(super) fn load_text(args: TextArgs) -> Result<DenseMatrixProvider, CliError> {
    let TextArgs { path, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    Ok(DenseMatrixProvider::try_from_text_path(chosen_name, &path)?)
}

/// Instantiates the pipeline for the provider's dimensionality.
fn cluster(clue: &Clue, provider: &DenseMatrixProvider) -> Result<ClusteringResult, CliError> {
    match provider.dimension() {
        1 => cluster_as::<1>(clue, provider),
        2 => cluster_as::<2>(clue, provider),
        3 => cluster_as::<3>(clue, provider),
        4 => cluster_as::<4>(clue, provider),
        dimension => Err(CliError::UnsupportedDimension { dimension }),
    }
}

fn cluster_as<const D: usize>(
    clue: &Clue,
    provider: &DenseMatrixProvider,
) -> Result<ClusteringResult, CliError> {
    let mut points = provider.to_point_set::<D>()?;
    Ok(clue.run(&mut points)?)
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "points".to_owned())
}

/// Renders `summary` to `writer`: a header followed by one
/// `index<TAB>cluster` line per point, with `-1` marking outliers.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clue_cli::cli::{ExecutionSummary, render_summary};
/// # use clue_core::{ClusteringResult, ClusterId};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     dimension: 2,
///     result: ClusteringResult::new(vec![Some(ClusterId::new(0)), None], vec![0]),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("0\t0\n1\t-1\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let result = &summary.result;
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "points: {}", result.assignments().len())?;
    writeln!(writer, "dimension: {}", summary.dimension)?;
    writeln!(writer, "clusters: {}", result.cluster_count())?;
    writeln!(writer, "outliers: {}", result.outlier_count())?;
    for (index, cluster) in result.assignments().iter().enumerate() {
        match cluster {
            Some(id) => writeln!(writer, "{index}\t{id}")?,
            None => writeln!(writer, "{index}\t-1")?,
        }
    }
    Ok(())
}
