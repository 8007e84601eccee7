//! Resolves versions, marks keep flags, dispatches the per-version
//! pipeline, and invokes the merger.

use crate::custom_logic;
use crate::mapper;
use crate::relocator;
use crate::route::Route;
use crate::settings::Settings;
use crate::tree::Section;
use crate::version::{self, Version};
use crate::versioning::{self, Versioning};
use std::cmp::Ordering;

/// Errors surfaced by [`update`]. Everything Relocator/Merger treat as a
/// no-op (the "target absent" class) never reaches this type — only the
/// documented-fatal kinds do.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Versioning(#[from] versioning::Error),
    #[error(transparent)]
    Version(#[from] version::Error),
    #[error(
        "user version {user} is newer than defaults version {defaults} and downgrading is disabled"
    )]
    DowngradeRefused { user: String, defaults: String },
}

/// What an [`update`] call actually did, distinguishing the documented
/// no-op policies (missing defaults, already up to date, downgrade skipped)
/// from a real update — none of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No defaults document was supplied.
    MissingDefaults,
    /// `user == defaults`; nothing to do.
    UpToDate,
    /// `user > defaults` and `enable_downgrading` is set; silently skipped.
    DowngradeSkipped,
    /// The per-version pipeline and merger ran.
    Updated,
}

/// Run a full update of `user` against `defaults` under `settings`.
///
/// Resolves versions, gates on
/// comparison, mark keep flags, run the per-version pipeline (relocations,
/// mappers, custom logic, in ascending version order), merge, then write the
/// new version id back for automatic versioning.
pub fn update(
    user: &mut Section,
    defaults: Option<&Section>,
    settings: &Settings,
) -> Result<Outcome, Error> {
    let Some(defaults) = defaults else {
        return Ok(Outcome::MissingDefaults);
    };

    let Some(versioning) = settings.updater.versioning.as_ref() else {
        crate::merger::merge(
            user,
            defaults,
            settings.updater.merge_rules,
            settings.updater.option_sorting,
        );
        return Ok(Outcome::Updated);
    };

    let defaults_version = versioning.get_version(defaults, true)?;
    let user_version = versioning.get_version(user, false)?;

    match user_version.compare(&defaults_version)? {
        Ordering::Greater => {
            if settings.updater.enable_downgrading {
                return Ok(Outcome::DowngradeSkipped);
            }
            return Err(Error::DowngradeRefused {
                user: user_version.id().to_string(),
                defaults: defaults_version.id().to_string(),
            });
        }
        Ordering::Equal => return Ok(Outcome::UpToDate),
        Ordering::Less => {}
    }

    mark_keep_flags(user, settings, user_version.id());
    run_per_version_pipeline(user, &user_version, &defaults_version, settings)?;
    crate::merger::merge(
        user,
        defaults,
        settings.updater.merge_rules,
        settings.updater.option_sorting,
    );
    versioning.update_version_id(user, defaults_version.id())?;

    Ok(Outcome::Updated)
}

/// Walk versions `user+1 ..= defaults`, applying that version's relocations,
/// then its mappers, then its custom logic, before moving to the next
/// version, immediately after that version's relocations.
fn run_per_version_pipeline(
    user: &mut Section,
    user_version: &Version,
    defaults_version: &Version,
    settings: &Settings,
) -> Result<(), Error> {
    let mut current = user_version.clone();
    current.next();

    while current.compare(defaults_version)? != Ordering::Greater {
        relocator::apply_version(user, current.id(), &settings.updater.relocations);
        mapper::apply(user, current.id(), &settings.updater.mappers);
        custom_logic::apply(user, current.id(), &settings.updater.custom_logic);
        current.next();
    }
    Ok(())
}

/// Set the transient `keep` flag from `settings.keep_all` or the resolved
/// user version's entry in `settings.keep_routes`.
fn mark_keep_flags(user: &mut Section, settings: &Settings, user_version_id: &str) {
    if settings.updater.keep_all {
        mark_all(user);
        return;
    }
    let Some(routes) = settings.updater.keep_routes.get(user_version_id) else {
        return;
    };
    for route in routes {
        mark_route(user, route);
    }
}

fn mark_route(user: &mut Section, route: &Route) {
    let Some(parent) = user.parent_section_mut(route) else {
        return;
    };
    if let Some(block) = parent.get_mut(route.last()) {
        block.keep = true;
    }
}

fn mark_all(section: &mut Section) {
    for (_, block) in section.iter_mut() {
        block.keep = true;
        if let Some(child) = block.as_section_mut() {
            mark_all(child);
        }
    }
}
