//! Immutable key-path abstraction used across every other subsystem.
//!
//! A [`Route`] is an ordered sequence of [`Key`]s identifying a node in a
//! [`crate::tree`] document. Two representations of "the same route" exist —
//! the ordered-key object and a separator-joined string — and the two must
//! round-trip through [`Route::join`] / [`Route::try_split`].

use std::fmt;

/// A single path component. The document's [`KeyFormat`]
/// setting constrains which variants are admitted at construction time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(ordered_float::OrderedFloat<f64>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Float(v) => write!(f, "{}", v.0),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Errors raised while constructing or splitting a [`Route`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A route must contain at least one key.
    #[error("route must contain at least one key")]
    Empty,
    /// `parent()` was called on a route of length 1.
    #[error("route of length 1 has no parent")]
    NoParent,
    /// A key contained the separator character used to join/split routes.
    #[error("key {key:?} contains the route separator {sep:?}")]
    SeparatorInKey { key: String, sep: char },
    /// `KeyFormat::StringOnly` rejected a non-string key.
    #[error("key {key} is not a string, but the configured key format requires string keys")]
    NonStringKey { key: Key },
}

/// Which [`Key`] variants a document's configured key format admits.
///
/// Enforced at [`Route`] construction via [`Route::check_format`] — the
/// distilled spec only gestures at "the document's key format setting
/// constrains which are admitted"; this gives that constraint a concrete,
/// fail-fast enforcement point rather than silent stringification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    /// Only [`Key::String`] keys are admitted.
    StringOnly,
    /// Any [`Key`] variant is admitted.
    #[default]
    Any,
}

/// Immutable ordered sequence of keys identifying a node in a document tree.
///
/// Invariants: length >= 1; equality is element-wise; `parent()` is defined
/// only when length >= 2; `add(k)` yields a new route of length + 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(Vec<Key>);

impl Route {
    /// Build a route from a single key.
    #[must_use]
    pub fn new(key: impl Into<Key>) -> Self {
        Self(vec![key.into()])
    }

    /// Build a route from an explicit, non-empty key sequence.
    pub fn from_keys(keys: Vec<Key>) -> Result<Self, Error> {
        if keys.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self(keys))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// The last key in the route (the key this node is stored under in its parent).
    #[must_use]
    pub fn last(&self) -> &Key {
        self.0.last().expect("route is never empty")
    }

    /// The route identifying this node's parent, or an error if this route is top-level.
    pub fn parent(&self) -> Result<Self, Error> {
        if self.0.len() < 2 {
            return Err(Error::NoParent);
        }
        Ok(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// A new route with `key` appended.
    #[must_use]
    pub fn add(&self, key: impl Into<Key>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Join the route into a single string with the given separator.
    ///
    /// No key may itself contain `sep` for this to round-trip through
    /// [`Route::try_split`]; callers are responsible for upholding that
    /// invariant (see [`Error::SeparatorInKey`] for the checked variant).
    #[must_use]
    pub fn join(&self, sep: char) -> String {
        self.0
            .iter()
            .map(std::string::ToString::to_string)
            .collect::<Vec<_>>()
            .join(&sep.to_string())
    }

    /// Join the route, first verifying that no key contains `sep`.
    pub fn try_join(&self, sep: char) -> Result<String, Error> {
        for key in &self.0 {
            let rendered = key.to_string();
            if rendered.contains(sep) {
                return Err(Error::SeparatorInKey {
                    key: rendered,
                    sep,
                });
            }
        }
        Ok(self.join(sep))
    }

    /// Validate every key against `format`, failing fast on the first key
    /// the format does not admit.
    pub fn check_format(&self, format: KeyFormat) -> Result<(), Error> {
        if format == KeyFormat::Any {
            return Ok(());
        }
        for key in &self.0 {
            if !matches!(key, Key::String(_)) {
                return Err(Error::NonStringKey { key: key.clone() });
            }
        }
        Ok(())
    }

    /// Split a separator-joined string back into a route of string keys.
    ///
    /// This is the inverse of [`Route::join`] for routes composed purely of
    /// string keys (the common case for automatic versioning routes).
    pub fn try_split(s: &str, sep: char) -> Result<Self, Error> {
        let keys: Vec<Key> = s.split(sep).map(Key::from).collect();
        Self::from_keys(keys)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join('.'))
    }
}

/// Minimal ordered-float wrapper so `Key::Float` can participate in `Eq`/`Hash`/`Ord`.
mod ordered_float {
    #[derive(Debug, Clone, Copy)]
    pub struct OrderedFloat<T>(pub T);

    impl PartialEq for OrderedFloat<f64> {
        fn eq(&self, other: &Self) -> bool {
            self.0.to_bits() == other.0.to_bits()
        }
    }
    impl Eq for OrderedFloat<f64> {}
    impl PartialOrd for OrderedFloat<f64> {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for OrderedFloat<f64> {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.total_cmp(&other.0)
        }
    }
    impl std::hash::Hash for OrderedFloat<f64> {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.0.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_last_round_trips() {
        let route = Route::new("a").add("b").add("c");
        assert_eq!(route.len(), 3);
        assert_eq!(route.last(), &Key::from("c"));
    }

    #[test]
    fn parent_add_last_is_identity() {
        // For all routes r with length(r) >= 2: r.parent().add(r[-1]) == r.
        let route = Route::new("x").add("y").add(3i64);
        let parent = route.parent().unwrap();
        let rebuilt = parent.add(route.last().clone());
        assert_eq!(rebuilt, route);
    }

    #[test]
    fn single_key_route_has_no_parent() {
        let route = Route::new("only");
        assert_eq!(route.parent(), Err(Error::NoParent));
    }

    #[test]
    fn join_split_round_trip() {
        let route = Route::new("a").add("b").add("c");
        let joined = route.join('.');
        assert_eq!(joined, "a.b.c");
        let split = Route::try_split(&joined, '.').unwrap();
        assert_eq!(split, route);
    }

    #[test]
    fn try_join_rejects_separator_in_key() {
        let route = Route::new("a.b");
        assert_eq!(
            route.try_join('.'),
            Err(Error::SeparatorInKey {
                key: "a.b".to_string(),
                sep: '.',
            })
        );
    }

    #[test]
    fn empty_key_list_is_rejected() {
        assert_eq!(Route::from_keys(vec![]), Err(Error::Empty));
    }

    #[test]
    fn string_only_format_rejects_non_string_keys() {
        let route = Route::new("a").add(3i64);
        assert_eq!(
            route.check_format(KeyFormat::StringOnly),
            Err(Error::NonStringKey { key: Key::from(3i64) })
        );
        assert_eq!(route.check_format(KeyFormat::Any), Ok(()));
    }
}
