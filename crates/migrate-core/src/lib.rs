#![forbid(unsafe_code)]
//! Versioned document migration core.
//!
//! Given a user document (older), a defaults document (newer), and a
//! migration policy (see [`settings::Settings`]), [`updater::update`]
//! produces an updated user document that adopts new structure and default
//! values from the defaults document while preserving user-authored values,
//! rewriting keys via version-indexed relocations, applying value mappers
//! per version, and honoring per-route "keep" markers.
//!
//! The four subsystems, leaves first:
//! - [`segment`] / [`pattern`] / [`version`]: the Version Pattern Engine —
//!   parses version-identifier strings into an ordered cursor tuple under a
//!   caller-declared grammar.
//! - [`route`] / [`tree`]: the Route and Document Tree model shared by every
//!   other subsystem.
//! - [`relocator`]: walks versions from user+1 to defaults, applying
//!   route-to-route moves.
//! - [`mapper`] / [`custom_logic`]: per-version value transforms and
//!   arbitrary document mutations.
//! - [`merger`]: reconciles the user tree against the defaults tree.
//!
//! [`versioning`], [`settings`], and [`updater`] wire these into the single
//! entry point.
//!
//! Serialization to/from concrete YAML text, comment attachment during
//! parsing, file I/O, and a user-facing CLI are all external collaborators —
//! this crate only mutates an abstract [`tree::Section`].

pub mod custom_logic;
pub mod mapper;
pub mod merger;
pub mod pattern;
pub mod relocator;
pub mod route;
pub mod segment;
pub mod settings;
pub mod tree;
pub mod updater;
pub mod version;
pub mod versioning;

pub use settings::Settings;
pub use tree::Section;
pub use updater::{update, Outcome};
