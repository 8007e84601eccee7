//! Walks versions from `user+1` to `defaults` inclusive, applying
//! version-indexed route-to-route moves.
//!
//! Handles target chains and cycles deterministically via a per-version
//! consumption map, and prunes emptied ancestor sections after each move.

use crate::route::Route;
use crate::tree::Section;
use crate::version::{self, Version};
use indexmap::IndexMap;

/// The moves to apply for a single version: `from` route -> `to` route.
pub type RelocationMap = IndexMap<Route, Route>;

/// The full set of relocations, keyed by the version id at which they apply.
pub type Relocations = IndexMap<String, RelocationMap>;

/// Walk `current` from `user_version + 1` through `defaults_version`
/// inclusive, applying the relocation set registered for each version
/// visited along the way.
///
/// # Errors
/// Propagates [`version::Error::IncomparablePatterns`] if `user_version` and
/// `defaults_version` were not parsed from the same pattern.
pub fn relocate(
    user: &mut Section,
    user_version: &Version,
    defaults_version: &Version,
    relocations: &Relocations,
) -> Result<(), version::Error> {
    let mut current = user_version.clone();
    current.next();

    while current.compare(defaults_version)? != std::cmp::Ordering::Greater {
        apply_version(user, current.id(), relocations);
        current.next();
    }
    Ok(())
}

/// Apply the relocation set registered for a single version id, if any.
/// Exposed separately from [`relocate`] so the Updater's combined per-version
/// pipeline (relocations, then mappers, then custom logic) can interleave
/// this with the other two runners at each version it visits.
pub fn apply_version(user: &mut Section, version_id: &str, relocations: &Relocations) {
    let Some(map) = relocations.get(version_id) else {
        return;
    };
    let mut remaining = map.clone();
    let pairs: Vec<(Route, Route)> = map
        .iter()
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect();
    for (from, to) in pairs {
        apply_relocation(user, &from, &to, &mut remaining);
    }
}

/// Apply a single `from -> to` relocation, consuming it (and, by recursion,
/// any chained relocation rooted at `to`) from `remaining`.
fn apply_relocation(user: &mut Section, from: &Route, to: &Route, remaining: &mut RelocationMap) {
    // Step 1: already consumed by an earlier step in this version's chain.
    if remaining.shift_remove(from).is_none() {
        return;
    }

    // Steps 2-3: locate and detach the block, treating "target absent" as a no-op.
    let Some(parent) = user.parent_section_mut(from) else {
        return;
    };
    let Some(block) = parent.remove(from.last()) else {
        return;
    };

    // Step 4: prune any ancestor section that becomes empty.
    prune_empty_ancestors(user, from);

    // Step 5: chain-first. If `to` is itself a pending source key, resolve
    // it before placing our block, so chains and cycles settle deterministically.
    if let Some(next_to) = remaining.get(to).cloned() {
        apply_relocation(user, to, &next_to, remaining);
    }

    // Step 6: place the block at `to`, creating intermediate sections as needed.
    let target_parent = user
        .ensure_parent_section(to)
        .expect("route navigation cannot fail when only creating sections");
    target_parent.insert(to.last().clone(), block);
    tracing::debug!(?from, ?to, "relocated route");
}

/// Walk upward from `detached`'s parent, removing any section that has
/// become empty, stopping at the document root.
fn prune_empty_ancestors(root: &mut Section, detached: &Route) {
    let Ok(mut ancestor) = detached.parent() else {
        return;
    };
    loop {
        let is_empty = {
            let Some(container) = root.parent_section_mut(&ancestor) else {
                return;
            };
            match container.get(ancestor.last()).and_then(|b| b.as_section()) {
                Some(section) => section.is_empty(),
                None => return,
            }
        };
        if !is_empty {
            return;
        }
        let container = root
            .parent_section_mut(&ancestor)
            .expect("just confirmed this path exists");
        container.remove(ancestor.last());
        match ancestor.parent() {
            Ok(next) => ancestor = next,
            Err(_) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::segment::Segment;
    use crate::tree::{Block, Value};
    use std::sync::Arc;

    fn version_pattern() -> Arc<Pattern> {
        Pattern::new(vec![
            Segment::range(0, 100, 1, 0).unwrap(),
            Segment::literal(["."]).unwrap(),
            Segment::range(0, 100, 1, 0).unwrap(),
        ])
        .unwrap()
        .into_shared()
    }

    fn relocations_from(pairs: &[(&str, &[(&str, &str)])]) -> Relocations {
        pairs
            .iter()
            .map(|(version, moves)| {
                let map: RelocationMap = moves
                    .iter()
                    .map(|(from, to)| (Route::new(*from), Route::new(*to)))
                    .collect();
                (version.to_string(), map)
            })
            .collect()
    }

    #[test]
    fn relocator_end_to_end_scenario() {
        // worked example: a chain of relocations across several versions.
        let mut user = Section::new();
        user.insert(Route::new("x").last().clone(), Block::leaf(Value::String("a".into())));
        user.insert(Route::new("y").last().clone(), Block::leaf(Value::String("b".into())));
        let mut z = Section::new();
        z.insert(Route::new("a").last().clone(), Block::leaf(Value::Int(1)));
        z.insert(Route::new("b").last().clone(), Block::leaf(Value::Int(10)));
        user.insert(Route::new("z").last().clone(), Block::section(z));

        let pattern = version_pattern();
        let user_version = Version::parse(Arc::clone(&pattern), "1.2").unwrap();
        let defaults_version = Version::parse(Arc::clone(&pattern), "2.3").unwrap();

        let relocations = relocations_from(&[
            ("1.0", &[("d", "e")]),
            ("1.2", &[("x", "f")]),
            ("1.3", &[("x", "g"), ("y", "x"), ("j", "k")]),
            ("2.3", &[("g", "h"), ("z", "i")]),
        ]);

        relocate(&mut user, &user_version, &defaults_version, &relocations).unwrap();

        assert_eq!(user.len(), 3, "three top-level keys");
        let h = user.get_route(&Route::new("h")).unwrap();
        assert_eq!(h.as_value(), Some(&Value::String("a".into())));
        let x = user.get_route(&Route::new("x")).unwrap();
        assert_eq!(x.as_value(), Some(&Value::String("b".into())));
        let i = user.get_route(&Route::new("i")).unwrap().as_section().unwrap();
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn cyclic_relocation_swaps_values() {
        // a->b, b->a at the same version: net effect is a swap.
        let mut user = Section::new();
        user.insert(Route::new("a").last().clone(), Block::leaf(Value::Int(1)));
        user.insert(Route::new("b").last().clone(), Block::leaf(Value::Int(2)));

        let pattern = version_pattern();
        let user_version = Version::parse(Arc::clone(&pattern), "0.0").unwrap();
        let defaults_version = Version::parse(Arc::clone(&pattern), "0.1").unwrap();
        let relocations = relocations_from(&[("0.1", &[("a", "b"), ("b", "a")])]);

        relocate(&mut user, &user_version, &defaults_version, &relocations).unwrap();

        assert_eq!(user.get_route(&Route::new("a")).unwrap().as_value(), Some(&Value::Int(2)));
        assert_eq!(user.get_route(&Route::new("b")).unwrap().as_value(), Some(&Value::Int(1)));
    }

    #[test]
    fn empty_relocation_map_is_idempotent() {
        let mut user = Section::new();
        user.insert(Route::new("x").last().clone(), Block::leaf(Value::Int(1)));
        let before = user.clone();

        let pattern = version_pattern();
        let user_version = Version::parse(Arc::clone(&pattern), "0.0").unwrap();
        let defaults_version = Version::parse(Arc::clone(&pattern), "1.0").unwrap();
        relocate(&mut user, &user_version, &defaults_version, &Relocations::new()).unwrap();

        assert_eq!(user, before);
    }

    #[test]
    fn pruning_removes_emptied_parent() {
        let mut user = Section::new();
        let mut parent = Section::new();
        parent.insert(Route::new("only").last().clone(), Block::leaf(Value::Int(5)));
        user.insert(Route::new("parent").last().clone(), Block::section(parent));

        let pattern = version_pattern();
        let user_version = Version::parse(Arc::clone(&pattern), "0.0").unwrap();
        let defaults_version = Version::parse(Arc::clone(&pattern), "0.1").unwrap();

        let mut map = RelocationMap::new();
        map.insert(Route::new("parent").add("only"), Route::new("moved"));
        let mut relocations = Relocations::new();
        relocations.insert("0.1".to_string(), map);

        relocate(&mut user, &user_version, &defaults_version, &relocations).unwrap();

        assert!(!user.contains_key(&Route::new("parent").last().clone()));
        assert_eq!(
            user.get_route(&Route::new("moved")).unwrap().as_value(),
            Some(&Value::Int(5))
        );
    }
}
