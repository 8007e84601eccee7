use clap::Parser;
use std::path::PathBuf;

/// Logging flags to `#[command(flatten)]` into the CLI.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
        long_help = None,
    )]
    pub verbose: u8,

    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        help = "Decrease logging verbosity",
        long_help = None,
        conflicts_with = "verbose",
    )]
    pub quiet: u8,
}

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "migrate",
    version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
    about = "migrate versioned YAML documents against a defaults document",
)]
pub struct Options {
    #[arg(
        long = "color",
        env = "MIGRATE_COLOR",
        help = "enable or disable color"
    )]
    pub color_choice: Option<termcolor::ColorChoice>,

    #[command(flatten)]
    pub verbosity: Verbosity,

    #[arg(
        long = "log",
        env = "MIGRATE_LOG_LEVEL",
        aliases = ["log-level"],
        help = "Log level. When using a more sophisticated logging setup using the RUST_LOG environment variable, this option is overwritten."
    )]
    pub log_level: Option<tracing::metadata::Level>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Update a user document against a defaults document: relocate, map,
    /// run custom logic and merge per version, then write back the result.
    Update(UpdateArgs),

    /// Parse a single version id against a caller-declared pattern grammar
    /// and print the resulting cursor tuple.
    Version(VersionArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long, help = "path to the user's YAML document")]
    pub user: PathBuf,

    #[arg(long, help = "path to the defaults YAML document")]
    pub defaults: PathBuf,

    #[arg(long, help = "path to a migrate.toml settings document")]
    pub settings: Option<PathBuf>,

    #[arg(
        long,
        help = "print the resulting document instead of writing it back",
        conflicts_with = "write"
    )]
    pub dry_run: bool,

    #[arg(long, help = "write the updated document back to --user")]
    pub write: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct VersionArgs {
    #[arg(help = "the version id string to parse")]
    pub id: String,

    #[arg(
        long,
        help = "pattern grammar, e.g. `range:1:100:1/lit:./range:0:10:1`"
    )]
    pub pattern: String,
}
