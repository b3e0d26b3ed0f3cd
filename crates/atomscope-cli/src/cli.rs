use atomscope::core::io::format::FileFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "atomscope - inspect, bond, convert and replay atomistic structures and LAMMPS trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S bonding.factor=1.2
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of a structure file: format, atoms, frames, types and bonds.
    Info(InfoArgs),
    /// List the bonds inferred for one frame.
    Bonds(BondsArgs),
    /// Show the resolved type-id to element table, optionally saving it.
    TypeMap(TypeMapArgs),
    /// Write all frames as XYZ text with the type map applied.
    Convert(ConvertArgs),
    /// Replay a trajectory headlessly and print the drift-corrected centroid per tick.
    Play(PlayArgs),
}

/// Input flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the structure file.
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    /// Force the input format instead of detecting it (xyz, pdb, dump, data).
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<FileFormat>,

    /// Keep atoms in file order instead of sorting each frame by atom id.
    #[arg(long)]
    pub no_sort: bool,

    /// Multiplier applied to the sum of covalent radii when inferring bonds.
    #[arg(long, value_name = "FLOAT")]
    pub bond_factor: Option<f64>,

    /// Type-map table (CSV or TOML) used to resolve LAMMPS type ids.
    #[arg(long, value_name = "PATH")]
    pub type_map: Option<PathBuf>,

    /// Assign an element to a type id. Can be used multiple times. Example: --type 1=Si
    #[arg(long = "type", value_name = "ID=EL")]
    pub types: Vec<String>,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct BondsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Zero-based frame whose coordinates are used.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub frame: usize,
}

#[derive(Args, Debug)]
pub struct TypeMapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the merged table to a CSV or TOML file (chosen by extension).
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path for the output XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of clock ticks to simulate.
    #[arg(long, default_value_t = 20, value_name = "INT")]
    pub ticks: usize,

    /// Simulated time between ticks in milliseconds.
    #[arg(long, default_value_t = 100, value_name = "MS")]
    pub interval_ms: u64,

    #[command(flatten)]
    pub playback: PlaybackArgs,
}

/// Playback overrides for the `play` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PlaybackArgs {
    /// Frames per second, overriding the config file.
    #[arg(long, value_name = "FLOAT")]
    pub fps: Option<f64>,

    /// Stop at the last frame instead of wrapping around.
    #[arg(long)]
    pub no_loop: bool,
}
