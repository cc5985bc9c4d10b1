//! The nested structure produced by [`decode`](super::decode).

/// A decoded value: a scalar, a sequence (from `[]` suffixes), or a nested tree
/// (from `[key]` suffixes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Plain string value.
    Scalar(String),
    /// Ordered values appended through `key[]`.
    Sequence(Vec<QueryValue>),
    /// Nested map built through `key[sub]`.
    Tree(DecodedTree),
}

impl QueryValue {
    /// Returns the scalar string, if this is a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the sequence elements, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[QueryValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested tree, if this is a tree.
    #[must_use]
    pub fn as_tree(&self) -> Option<&DecodedTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Tree(_) => "tree",
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<DecodedTree> for QueryValue {
    fn from(tree: DecodedTree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Vec<QueryValue>> for QueryValue {
    fn from(items: Vec<QueryValue>) -> Self {
        Self::Sequence(items)
    }
}

/// String-keyed map that remembers the order in which keys first appeared.
///
/// Equality ignores key order: two trees are equal when they hold the same
/// keys with equal values.
#[derive(Debug, Clone, Default)]
pub struct DecodedTree {
    entries: Vec<(String, QueryValue)>,
}

impl DecodedTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns the scalar stored under `key`, if any.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_str)
    }

    /// Returns true when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`, returning the previous value.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Iterates keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub(crate) fn get_or_insert_with(
        &mut self,
        key: &str,
        default: impl FnOnce() -> QueryValue,
    ) -> &mut QueryValue {
        let index = if let Some(index) = self.entries.iter().position(|(existing, _)| existing == key) {
            index
        } else {
            self.entries.push((key.to_string(), default()));
            self.entries.len() - 1
        };
        &mut self.entries[index].1
    }
}

impl PartialEq for DecodedTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| theirs == value))
    }
}

impl Eq for DecodedTree {}

impl<K, V> FromIterator<(K, V)> for DecodedTree
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
