//! Deep reconciliation of the user tree against the defaults tree
//! reconciling mapping-vs-mapping, mapping-under-section, and section-under-mapping nodes.

use crate::route::Key;
use crate::tree::{Block, Section};

/// The three mixed-kind collision rules. Each is `true` to keep the user's
/// value, `false` to take the defaults' value. Both-sections always
/// recurses; both-leaves and mixed-kind collisions consult these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRules {
    /// Both sides are leaves at the same route.
    pub mapping_at_mapping: bool,
    /// User has a leaf where defaults has a section.
    pub mapping_at_section: bool,
    /// User has a section where defaults has a leaf.
    pub section_at_mapping: bool,
}

impl Default for MergeRules {
    /// The teacher's bumpversion-config convention of "prefer the user's
    /// authored value" applied uniformly across all three collision shapes.
    fn default() -> Self {
        Self {
            mapping_at_mapping: true,
            mapping_at_section: true,
            section_at_mapping: true,
        }
    }
}

/// Whether the merged section's keys follow the defaults' declared order
/// (user-only keys appended at the tail) or the user's own order (defaults-
/// only keys appended at the tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    DefaultsOrder,
    None,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self::DefaultsOrder
    }
}

/// Reconcile `user` against `defaults` in place, following `rules` and
/// `sort`.
pub fn merge(user: &mut Section, defaults: &Section, rules: MergeRules, sort: SortPolicy) {
    let keys = ordered_keys(user, defaults, sort);
    let mut merged = Section::new();

    for key in keys {
        let user_block = user.get(&key).cloned();
        let defaults_block = defaults.get(&key).cloned();

        let resolved = match (user_block, defaults_block) {
            (Some(u), Some(d)) => merge_present_in_both(u, d, rules, sort),
            (Some(u), None) => {
                // user-only key: dropped unless flagged keep or ignored.
                (u.keep || u.ignored).then_some(u)
            }
            (None, Some(d)) => Some(d),
            (None, None) => unreachable!("key came from one of the two sections"),
        };

        if let Some(block) = resolved {
            merged.insert(key, block);
        }
    }

    *user = merged;
}

fn merge_present_in_both(
    mut user: Block,
    defaults: Block,
    rules: MergeRules,
    sort: SortPolicy,
) -> Option<Block> {
    let user_is_section = user.is_section();
    let defaults_is_section = defaults.is_section();

    match (user_is_section, defaults_is_section) {
        (true, true) => {
            let crate::tree::Content::Section(mut u) = user.content else {
                unreachable!()
            };
            let crate::tree::Content::Section(d) = defaults.content else {
                unreachable!()
            };
            merge(&mut u, &d, rules, sort);
            user.content = crate::tree::Content::Section(u);
            Some(user)
        }
        (false, false) => Some(resolve_leaf_collision(user, defaults, rules.mapping_at_mapping)),
        (false, true) => Some(if rules.mapping_at_section { user } else { defaults }),
        (true, false) => Some(if rules.section_at_mapping { user } else { defaults }),
    }
}

/// Both sides are leaves: apply the comment-preservation rule from
/// "when taking user, retain user comments, inheriting defaults' if the
/// user has none; when taking defaults, always use defaults' comments", on
/// top of the `keep_user` decision.
fn resolve_leaf_collision(mut user: Block, defaults: Block, keep_user: bool) -> Block {
    if keep_user {
        if user.comments.is_empty() {
            user.comments = defaults.comments;
        }
        user
    } else {
        defaults
    }
}

fn ordered_keys(user: &Section, defaults: &Section, sort: SortPolicy) -> Vec<Key> {
    match sort {
        SortPolicy::DefaultsOrder => {
            let mut keys: Vec<Key> = defaults.keys().cloned().collect();
            keys.extend(user.keys().filter(|k| !defaults.contains_key(k)).cloned());
            keys
        }
        SortPolicy::None => {
            let mut keys: Vec<Key> = user.keys().cloned().collect();
            keys.extend(defaults.keys().filter(|k| !user.contains_key(k)).cloned());
            keys
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Key;
    use crate::tree::{Comments, Value};

    fn leaf(value: Value) -> Block {
        Block::leaf(value)
    }

    #[test]
    fn merger_with_ignored_scenario() {
        // literal end-to-end scenario: ignored user-only key survives a merge.
        let mut user = Section::new();
        user.insert(Key::from("x"), leaf(Value::String("1.2".into())));
        user.insert(Key::from("y"), leaf(Value::Bool(true)));
        let mut z = Section::new();
        z.insert(Key::from("a"), leaf(Value::Int(1)));
        z.insert(Key::from("b"), leaf(Value::Int(10)));
        user.insert(Key::from("z"), Block::section(z));
        let mut p = leaf(Value::Bool(false));
        p.ignored = true;
        user.insert(Key::from("p"), p);

        let mut defaults = Section::new();
        defaults.insert(Key::from("x"), leaf(Value::String("1.4".into())));
        defaults.insert(Key::from("y"), leaf(Value::Bool(false)));
        let mut dz = Section::new();
        dz.insert(Key::from("a"), leaf(Value::Int(5)));
        dz.insert(Key::from("b"), leaf(Value::Int(10)));
        defaults.insert(Key::from("z"), Block::section(dz));
        defaults.insert(Key::from("m"), leaf(Value::String("a: c".into())));

        merge(
            &mut user,
            &defaults,
            MergeRules::default(),
            SortPolicy::DefaultsOrder,
        );

        assert_eq!(user.len(), 5, "x, y, z, m, p");
        assert_eq!(
            user.get(&Key::from("x")).unwrap().as_value(),
            Some(&Value::String("1.2".into()))
        );
        assert_eq!(
            user.get(&Key::from("y")).unwrap().as_value(),
            Some(&Value::Bool(true))
        );
        let z = user.get(&Key::from("z")).unwrap().as_section().unwrap();
        assert_eq!(z.len(), 2);
        assert_eq!(
            user.get(&Key::from("m")).unwrap().as_value(),
            Some(&Value::String("a: c".into()))
        );
        assert_eq!(
            user.get(&Key::from("p")).unwrap().as_value(),
            Some(&Value::Bool(false)),
            "ignored user-only key survives"
        );
    }

    #[test]
    fn merger_drops_user_only_keys_without_keep_or_ignored() {
        let mut user = Section::new();
        user.insert(Key::from("gone"), leaf(Value::Int(1)));
        let defaults = Section::new();

        merge(
            &mut user,
            &defaults,
            MergeRules::default(),
            SortPolicy::DefaultsOrder,
        );
        assert!(user.is_empty());
    }

    #[test]
    fn merger_idempotent_under_defaults_order() {
        // merge(U, U, rules) yields the same key set and values as U.
        let mut base = Section::new();
        base.insert(Key::from("a"), leaf(Value::Int(1)));
        base.insert(Key::from("b"), leaf(Value::String("x".into())));

        let snapshot = base.clone();
        merge(
            &mut base,
            &snapshot,
            MergeRules::default(),
            SortPolicy::DefaultsOrder,
        );
        assert_eq!(base, snapshot);
    }

    #[test]
    fn takes_defaults_comments_when_taking_defaults() {
        let mut user = leaf(Value::Int(1));
        user.comments.before.push("user comment".to_string());
        let mut defaults = leaf(Value::Int(2));
        defaults.comments.before.push("defaults comment".to_string());

        let merged = resolve_leaf_collision(user, defaults, false);
        assert_eq!(
            merged.comments,
            Comments {
                before: vec!["defaults comment".to_string()],
                inline: None,
                after: vec![],
            }
        );
    }

    #[test]
    fn inherits_defaults_comments_when_user_has_none() {
        let user = leaf(Value::Int(1));
        let mut defaults = leaf(Value::Int(2));
        defaults.comments.before.push("defaults comment".to_string());

        let merged = resolve_leaf_collision(user, defaults, true);
        assert_eq!(merged.as_value(), Some(&Value::Int(1)));
        assert_eq!(merged.comments.before, vec!["defaults comment".to_string()]);
    }
}
