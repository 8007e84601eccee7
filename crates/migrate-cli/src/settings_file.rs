//! Loads a `migrate.toml` settings document and converts it into a
//! [`migrate_core::settings::Settings`].
//!
//! Only the statically-describable parts of [`migrate_core::settings::Updater`]
//! can be expressed in TOML: versioning, merge rules, sort policy, keep
//! routes/keep-all, downgrade/auto-save flags, and relocations (plain
//! route-to-route pairs). Value mappers and custom logic are Rust closures
//! by construction and so can only be supplied programmatically — a
//! `migrate.toml` file cannot express them.

use crate::pattern_spec;
use color_eyre::eyre::{self, WrapErr};
use migrate_core::merger::{MergeRules, SortPolicy};
use migrate_core::relocator::{RelocationMap, Relocations};
use migrate_core::route::{KeyFormat, Route};
use migrate_core::settings::{General, Settings};
use migrate_core::versioning::Versioning;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct SettingsFile {
    #[serde(default)]
    general: GeneralFile,
    #[serde(default)]
    updater: UpdaterFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct GeneralFile {
    route_separator: Option<char>,
    #[serde(default)]
    string_keys_only: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct UpdaterFile {
    versioning: Option<VersioningFile>,
    #[serde(default)]
    enable_downgrading: bool,
    #[serde(default)]
    keep_all: bool,
    #[serde(default)]
    keep_routes: std::collections::HashMap<String, Vec<String>>,
    #[serde(default)]
    relocations: std::collections::HashMap<String, std::collections::HashMap<String, String>>,
    #[serde(default)]
    merge_rules: MergeRulesFile,
    #[serde(default)]
    defaults_order: Option<bool>,
    #[serde(default)]
    auto_save: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
enum VersioningFile {
    Manual {
        pattern: String,
        user_id: Option<String>,
        defaults_id: String,
    },
    Automatic {
        pattern: String,
        route: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MergeRulesFile {
    mapping_at_mapping: bool,
    mapping_at_section: bool,
    section_at_mapping: bool,
}

impl Default for MergeRulesFile {
    fn default() -> Self {
        let defaults = MergeRules::default();
        Self {
            mapping_at_mapping: defaults.mapping_at_mapping,
            mapping_at_section: defaults.mapping_at_section,
            section_at_mapping: defaults.section_at_mapping,
        }
    }
}

/// Load `path` and build a [`Settings`] from it. Mappers and custom logic
/// are always empty in the result — callers that need them must add them to
/// the returned `Settings` programmatically.
pub fn load(path: &Path) -> eyre::Result<Settings> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let file: SettingsFile = toml::from_str(&text)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    into_settings(file)
}

fn into_settings(file: SettingsFile) -> eyre::Result<Settings> {
    let mut settings = Settings::default();

    settings.general = General {
        key_format: if file.general.string_keys_only {
            KeyFormat::StringOnly
        } else {
            KeyFormat::Any
        },
        route_separator: file.general.route_separator.unwrap_or('.'),
        ..General::default()
    };

    let route_separator = settings.general.route_separator;

    settings.updater.versioning = file
        .updater
        .versioning
        .map(|v| versioning_from_file(v, route_separator))
        .transpose()?;
    settings.updater.enable_downgrading = file.updater.enable_downgrading;
    settings.updater.keep_all = file.updater.keep_all;
    settings.updater.auto_save = file.updater.auto_save;

    for (version_id, routes) in file.updater.keep_routes {
        let routes: HashSet<Route> = routes
            .iter()
            .map(|r| Route::try_split(r, route_separator))
            .collect::<Result<_, _>>()
            .wrap_err_with(|| format!("invalid keep route for version {version_id}"))?;
        settings.updater.keep_routes.insert(version_id, routes);
    }

    let mut relocations = Relocations::new();
    for (version_id, moves) in file.updater.relocations {
        let mut map = RelocationMap::new();
        for (from, to) in moves {
            let from = Route::try_split(&from, route_separator)
                .wrap_err_with(|| format!("invalid relocation source for version {version_id}"))?;
            let to = Route::try_split(&to, route_separator)
                .wrap_err_with(|| format!("invalid relocation target for version {version_id}"))?;
            map.insert(from, to);
        }
        relocations.insert(version_id, map);
    }
    settings.updater.relocations = relocations;

    settings.updater.merge_rules = MergeRules {
        mapping_at_mapping: file.updater.merge_rules.mapping_at_mapping,
        mapping_at_section: file.updater.merge_rules.mapping_at_section,
        section_at_mapping: file.updater.merge_rules.section_at_mapping,
    };
    settings.updater.option_sorting = match file.updater.defaults_order {
        Some(false) => SortPolicy::None,
        _ => SortPolicy::DefaultsOrder,
    };

    Ok(settings)
}

fn versioning_from_file(file: VersioningFile, route_separator: char) -> eyre::Result<Versioning> {
    Ok(match file {
        VersioningFile::Manual {
            pattern,
            user_id,
            defaults_id,
        } => Versioning::Manual {
            pattern: Arc::new(pattern_spec::parse(&pattern)?),
            user_id,
            defaults_id,
        },
        VersioningFile::Automatic { pattern, route } => Versioning::Automatic {
            pattern: Arc::new(pattern_spec::parse(&pattern)?),
            route: Route::try_split(&route, route_separator)
                .wrap_err("invalid automatic versioning route")?,
        },
    })
}
