//! Applies user-supplied value transformations at routes, per version.

use crate::route::Route;
use crate::tree::{Content, Section, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// A transformation registered at a route for a given version.
///
/// `Value` mappers see only the old leaf value; `Section` mappers see the
/// whole document plus the route being mapped, so they can derive the new
/// value from sibling state (a mapper that branches on the integer a
/// relocation just moved in, for example).
#[derive(Clone)]
pub enum Mapper {
    Value(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
    Section(Arc<dyn Fn(&Section, &Route) -> Value + Send + Sync>),
}

impl Mapper {
    pub fn value<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Value(Arc::new(f))
    }

    pub fn section<F>(f: F) -> Self
    where
        F: Fn(&Section, &Route) -> Value + Send + Sync + 'static,
    {
        Self::Section(Arc::new(f))
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Mapper::Value(..)"),
            Self::Section(_) => f.write_str("Mapper::Section(..)"),
        }
    }
}

/// The mappers registered for a single version: route -> mapper.
pub type MapperMap = IndexMap<Route, Mapper>;

/// The full mapper set, keyed by the version id at which it applies.
pub type Mappers = IndexMap<String, MapperMap>;

/// Apply every mapper registered for `version_id`, in the map's own
/// iteration order. A mapper at a route with no value is a no-op — it must
/// never create the key.
pub fn apply(doc: &mut Section, version_id: &str, mappers: &Mappers) {
    let Some(map) = mappers.get(version_id) else {
        return;
    };
    for (route, mapper) in map {
        apply_one(doc, route, mapper);
    }
}

fn apply_one(doc: &mut Section, route: &Route, mapper: &Mapper) {
    if doc.get_route(route).is_err() {
        return;
    }
    let new_value = match mapper {
        Mapper::Value(f) => {
            let block = doc.get_route(route).expect("checked above");
            let Some(old) = block.as_value() else {
                return;
            };
            f(old)
        }
        Mapper::Section(f) => f(doc, route),
    };
    let Some(parent) = doc.parent_section_mut(route) else {
        return;
    };
    let Some(block) = parent.get_mut(route.last()) else {
        return;
    };
    block.content = Content::Leaf(new_value);
    tracing::debug!(?route, "applied mapper");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Key;
    use crate::tree::Block;

    #[test]
    fn value_mapper_transforms_existing_leaf() {
        let mut doc = Section::new();
        doc.insert(Key::from("m"), Block::leaf(Value::String("a: c".into())));

        let mut map = MapperMap::new();
        map.insert(
            Route::new("m"),
            Mapper::value(|v| match v {
                Value::String(s) => Value::Int(s.find(':').map_or(-1, |i| i as i64)),
                other => other.clone(),
            }),
        );
        let mut mappers = Mappers::new();
        mappers.insert("2.3".to_string(), map);

        apply(&mut doc, "2.3", &mappers);
        assert_eq!(
            doc.get_route(&Route::new("m")).unwrap().as_value(),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn mapper_at_missing_route_is_noop() {
        let mut doc = Section::new();
        let mut map = MapperMap::new();
        map.insert(Route::new("missing"), Mapper::value(|_| Value::Int(0)));
        let mut mappers = Mappers::new();
        mappers.insert("1.0".to_string(), map);

        apply(&mut doc, "1.0", &mappers);
        assert!(doc.get_route(&Route::new("missing")).is_err());
    }

    #[test]
    fn section_mapper_sees_whole_document() {
        let mut doc = Section::new();
        doc.insert(Key::from("r"), Block::leaf(Value::Int(5)));

        let mut map = MapperMap::new();
        map.insert(
            Route::new("r"),
            Mapper::section(|section, route| {
                let value = section.get_route(route).unwrap().as_value().unwrap();
                match value {
                    Value::Int(i) if *i > 0 => Value::String("+".into()),
                    _ => Value::String("else".into()),
                }
            }),
        );
        let mut mappers = Mappers::new();
        mappers.insert("1.5".to_string(), map);

        apply(&mut doc, "1.5", &mappers);
        assert_eq!(
            doc.get_route(&Route::new("r")).unwrap().as_value(),
            Some(&Value::String("+".into()))
        );
    }
}
