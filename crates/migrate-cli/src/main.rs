mod logging;
mod options;
mod pattern_spec;
mod settings_file;
mod yaml;

use clap::Parser;
use color_eyre::eyre;
use migrate_core::settings::Settings;
use options::{Command, Options, UpdateArgs, VersionArgs};
use termcolor::ColorChoice;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let options = Options::parse();

    let color_choice = options.color_choice.unwrap_or(ColorChoice::Auto);
    let log_level = options.log_level.or_else(|| {
        match options.verbosity.verbose.saturating_sub(options.verbosity.quiet) {
            0 => None,
            1 => Some(tracing::metadata::Level::DEBUG),
            _ => Some(tracing::metadata::Level::TRACE),
        }
    });
    logging::setup(log_level, None, color_choice)?;

    match options.command {
        Command::Update(args) => run_update(args),
        Command::Version(args) => run_version(args),
    }
}

fn run_update(args: UpdateArgs) -> eyre::Result<()> {
    let mut user = yaml::load(&args.user)?;
    let defaults = yaml::load(&args.defaults)?;

    let settings = match args.settings {
        Some(path) => settings_file::load(&path)?,
        None => Settings::default(),
    };

    let outcome = migrate_core::update(&mut user, Some(&defaults), &settings)?;
    tracing::info!(?outcome, "update finished");

    if args.dry_run {
        println!("{}", yaml::render(&user)?);
        return Ok(());
    }

    if args.write || settings.updater.auto_save {
        yaml::save(&args.user, &user)?;
        tracing::info!(path = %args.user.display(), "wrote updated document");
    } else {
        println!("{}", yaml::render(&user)?);
    }

    Ok(())
}

fn run_version(args: VersionArgs) -> eyre::Result<()> {
    let pattern = pattern_spec::parse(&args.pattern)?;
    match pattern.cursors_for(&args.id) {
        Some(cursors) => {
            println!("{cursors:?}");
            Ok(())
        }
        None => eyre::bail!("{:?} does not match the given pattern", args.id),
    }
}
