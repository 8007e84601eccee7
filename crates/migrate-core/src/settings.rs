//! The recognized configuration options, grouped as General, Loader,
//! Updater, Dumper. Loader and Dumper are carried here purely as data the
//! core plumbs through to the delegated YAML front end — the core itself
//! never parses or emits text.

use crate::custom_logic::CustomLogic;
use crate::mapper::Mappers;
use crate::merger::{MergeRules, SortPolicy};
use crate::relocator::Relocations;
use crate::route::{KeyFormat, Route};
use crate::tree::Value;
use crate::versioning::Versioning;
use indexmap::IndexMap;
use std::collections::HashSet;

/// General options governing the document model itself.
#[derive(Debug, Clone)]
pub struct General {
    pub key_format: KeyFormat,
    pub route_separator: char,
    /// Whether a leaf accessor falling back to `default_*` counts as
    /// present for the purposes of the merge/relocation subsystems, or is
    /// treated as absent. Mirrors the source's `useDefaults`.
    pub use_defaults: bool,
    pub default_object: Option<Value>,
    pub default_number: Option<Value>,
    pub default_string: Option<Value>,
    pub default_boolean: Option<Value>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            key_format: KeyFormat::default(),
            route_separator: '.',
            use_defaults: true,
            default_object: None,
            default_number: None,
            default_string: None,
            default_boolean: None,
        }
    }
}

/// Options governing the (out-of-scope) document loader. Carried as plain
/// data for the delegated YAML front end to consult; the core never reads
/// files and never constructs a loader.
#[derive(Debug, Clone)]
pub struct Loader {
    pub create_file_if_absent: bool,
    pub auto_update: bool,
    pub detailed_errors: bool,
    pub allow_duplicate_keys: bool,
    pub max_collection_aliases: i64,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            create_file_if_absent: false,
            auto_update: true,
            detailed_errors: true,
            allow_duplicate_keys: false,
            max_collection_aliases: 50,
        }
    }
}

/// Options governing the (out-of-scope) document dumper.
#[derive(Debug, Clone)]
pub struct Dumper {
    pub indent: u8,
    pub flow_style: bool,
}

impl Default for Dumper {
    fn default() -> Self {
        Self {
            indent: 2,
            flow_style: false,
        }
    }
}

/// The options governing a single [`crate::updater::update`] run — the bulk
/// of the configuration surface.
#[derive(Clone, Default)]
pub struct Updater {
    /// `None` skips the version-gated pipeline entirely and goes straight to
    /// the merger.
    pub versioning: Option<Versioning>,
    pub enable_downgrading: bool,
    pub keep_all: bool,
    pub keep_routes: IndexMap<String, HashSet<Route>>,
    pub relocations: Relocations,
    pub mappers: Mappers,
    pub custom_logic: CustomLogic,
    pub merge_rules: MergeRules,
    pub option_sorting: SortPolicy,
    pub auto_save: bool,
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("versioning", &self.versioning)
            .field("enable_downgrading", &self.enable_downgrading)
            .field("keep_all", &self.keep_all)
            .field("keep_routes", &self.keep_routes)
            .field("relocations", &self.relocations)
            .field("mappers", &"<mappers>")
            .field("custom_logic", &"<custom logic>")
            .field("merge_rules", &self.merge_rules)
            .field("option_sorting", &self.option_sorting)
            .field("auto_save", &self.auto_save)
            .finish()
    }
}

/// The full settings bundle passed to [`crate::updater::update`].
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub general: General,
    pub loader: Loader,
    pub updater: Updater,
    pub dumper: Dumper,
}
