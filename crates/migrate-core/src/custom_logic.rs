//! Applies user-supplied arbitrary document mutations, per version.

use crate::tree::Section;
use indexmap::IndexMap;
use std::sync::Arc;

/// An arbitrary mutation of the document tree, registered for a version.
pub type CustomLogicFn = Arc<dyn Fn(&mut Section) + Send + Sync>;

/// The ordered list of mutations registered for a single version.
pub type CustomLogicList = Vec<CustomLogicFn>;

/// The full custom-logic set, keyed by the version id at which it applies.
pub type CustomLogic = IndexMap<String, CustomLogicList>;

/// Run every custom-logic entry registered for `version_id`, in declared
/// order — after that version's relocations and mappers have already run.
pub fn apply(doc: &mut Section, version_id: &str, custom_logic: &CustomLogic) {
    let Some(entries) = custom_logic.get(version_id) else {
        return;
    };
    for entry in entries {
        entry(doc);
        tracing::debug!(version_id, "ran custom logic entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Key, Route};
    use crate::tree::{Block, Value};

    #[test]
    fn custom_logic_runs_in_declared_order() {
        let mut doc = Section::new();
        doc.insert(Key::from("log"), Block::leaf(Value::String(String::new())));

        let append = |suffix: &'static str| -> CustomLogicFn {
            Arc::new(move |doc: &mut Section| {
                let route = Route::new("log");
                let parent = doc.parent_section_mut(&route).unwrap();
                let block = parent.get_mut(route.last()).unwrap();
                if let Some(Value::String(s)) = block.as_value() {
                    let mut next = s.clone();
                    next.push_str(suffix);
                    block.content = crate::tree::Content::Leaf(Value::String(next));
                }
            })
        };

        let mut custom_logic = CustomLogic::new();
        custom_logic.insert("1.0".to_string(), vec![append("a"), append("b")]);

        apply(&mut doc, "1.0", &custom_logic);
        assert_eq!(
            doc.get_route(&Route::new("log")).unwrap().as_value(),
            Some(&Value::String("ab".to_string()))
        );
    }

    #[test]
    fn no_entries_for_version_is_noop() {
        let mut doc = Section::new();
        let custom_logic = CustomLogic::new();
        apply(&mut doc, "9.9", &custom_logic);
        assert!(doc.is_empty());
    }
}
