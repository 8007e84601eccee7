//! Supplies the (user, defaults) [`Version`] pair an update runs between.
//!
//! Two variants: *manual* (caller supplies both ids directly) and
//! *automatic* (both ids live inside the document itself, at a
//! caller-supplied [`Route`]).

use crate::pattern::Pattern;
use crate::route::Route;
use crate::tree::{self, Block, Section, Value};
use crate::version::{self, Version};
use std::sync::Arc;

/// Errors raised while resolving or persisting a version id.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Version(#[from] version::Error),
    #[error(transparent)]
    Tree(#[from] tree::Error),
    /// Automatic versioning: the defaults document has no parseable id at
    /// the configured route. Unlike the user side, this is always fatal.
    #[error("defaults document has no parseable version id at route {route}")]
    MissingDefaultsVersion { route: Route },
    /// Automatic versioning: the value at `route` exists but is not a string.
    #[error("value at route {route} is not a string")]
    NotAString { route: Route },
}

/// How the (user, defaults) version pair is obtained for an update run.
#[derive(Debug, Clone)]
pub enum Versioning {
    /// Caller supplies both ids directly. `user_id` absent means "use the
    /// pattern's first version"; `defaults_id` must parse.
    Manual {
        pattern: Arc<Pattern>,
        user_id: Option<String>,
        defaults_id: String,
    },
    /// Both ids are read from the document itself, at `route`. After a
    /// successful update the resolved defaults id is written back to the
    /// user document at this route.
    Automatic { pattern: Arc<Pattern>, route: Route },
}

impl Versioning {
    #[must_use]
    pub fn pattern(&self) -> &Arc<Pattern> {
        match self {
            Self::Manual { pattern, .. } | Self::Automatic { pattern, .. } => pattern,
        }
    }

    /// Resolve the version for either side of an update.
    ///
    /// For `is_defaults == true` a missing or unparseable id is always an
    /// error. For the user side, a missing or unparseable id is recovered by
    /// substituting [`Version::first`] — never an error.
    pub fn get_version(&self, doc: &Section, is_defaults: bool) -> Result<Version, Error> {
        match self {
            Self::Manual {
                pattern,
                user_id,
                defaults_id,
            } => {
                if is_defaults {
                    Version::parse(Arc::clone(pattern), defaults_id).map_err(|_| {
                        Error::MissingDefaultsVersion {
                            route: Route::new("<manual>"),
                        }
                    })
                } else {
                    Ok(resolve_user_id(pattern, user_id.as_deref()))
                }
            }
            Self::Automatic { pattern, route } => {
                let found = read_string(doc, route)?;
                if is_defaults {
                    let id = found.ok_or_else(|| Error::MissingDefaultsVersion {
                        route: route.clone(),
                    })?;
                    Version::parse(Arc::clone(pattern), &id).map_err(|_| {
                        Error::MissingDefaultsVersion {
                            route: route.clone(),
                        }
                    })
                } else {
                    Ok(resolve_user_id(pattern, found.as_deref()))
                }
            }
        }
    }

    /// Write the defaults id back into the user document, automatic
    /// versioning only (manual versioning has nowhere in the document to
    /// write to).
    pub fn update_version_id(&self, user: &mut Section, defaults_id: &str) -> Result<(), Error> {
        if let Self::Automatic { route, .. } = self {
            let parent = user.ensure_parent_section(route)?;
            parent.insert(
                route.last().clone(),
                Block::leaf(Value::String(defaults_id.to_string())),
            );
        }
        Ok(())
    }
}

/// Parse `id` under `pattern`, falling back to the first version on a
/// missing or unparseable id — the recovery rule that applies to the user
/// side only (§4.3).
fn resolve_user_id(pattern: &Arc<Pattern>, id: Option<&str>) -> Version {
    id.and_then(|id| Version::parse(Arc::clone(pattern), id).ok())
        .unwrap_or_else(|| Version::first(Arc::clone(pattern)))
}

fn read_string(doc: &Section, route: &Route) -> Result<Option<String>, Error> {
    match doc.get_route(route) {
        Ok(block) => match block.as_value() {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Error::NotAString {
                route: route.clone(),
            }),
            None => Ok(None),
        },
        Err(tree::Error::NotFound(_)) => Ok(None),
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn pattern() -> Arc<Pattern> {
        Pattern::new(vec![
            Segment::range(0, 100, 1, 0).unwrap(),
            Segment::literal(["."]).unwrap(),
            Segment::range(0, 100, 1, 0).unwrap(),
        ])
        .unwrap()
        .into_shared()
    }

    #[test]
    fn manual_missing_user_id_uses_first_version() {
        let versioning = Versioning::Manual {
            pattern: pattern(),
            user_id: None,
            defaults_id: "2.3".to_string(),
        };
        let doc = Section::new();
        let user = versioning.get_version(&doc, false).unwrap();
        assert_eq!(user.id(), "0.0");
    }

    #[test]
    fn manual_unparseable_defaults_is_fatal() {
        let versioning = Versioning::Manual {
            pattern: pattern(),
            user_id: None,
            defaults_id: "nope".to_string(),
        };
        let doc = Section::new();
        assert!(versioning.get_version(&doc, true).is_err());
    }

    #[test]
    fn automatic_reads_and_writes_back() {
        let versioning = Versioning::Automatic {
            pattern: pattern(),
            route: Route::new("a"),
        };
        let mut doc = Section::new();
        doc.insert(
            crate::route::Key::from("a"),
            Block::leaf(Value::String("1.2".to_string())),
        );
        let user = versioning.get_version(&doc, false).unwrap();
        assert_eq!(user.id(), "1.2");

        versioning.update_version_id(&mut doc, "2.3").unwrap();
        let updated = versioning.get_version(&doc, false).unwrap();
        assert_eq!(updated.id(), "2.3");
    }

    #[test]
    fn automatic_missing_user_id_uses_first_version() {
        let versioning = Versioning::Automatic {
            pattern: pattern(),
            route: Route::new("a"),
        };
        let doc = Section::new();
        let user = versioning.get_version(&doc, false).unwrap();
        assert_eq!(user.id(), "0.0");
    }

    #[test]
    fn automatic_missing_defaults_id_is_fatal() {
        let versioning = Versioning::Automatic {
            pattern: pattern(),
            route: Route::new("a"),
        };
        let doc = Section::new();
        assert!(versioning.get_version(&doc, true).is_err());
    }
}
