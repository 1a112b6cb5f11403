use alloc::borrow::Cow;
use core::any::Any;

use refract_utils::hash::HashMap;
use refract_utils::hash::hashbrown::hash_map;

use crate::Value;

/// The property values requested by one update call.
///
/// Keys are logical property names; values must already be of the
/// property's value type. Iteration order is unspecified and never affects
/// the order in which properties are written.
///
/// # Examples
///
/// ```
/// use refract_mapper::ChangeSet;
///
/// let changes = ChangeSet::new()
///     .with("accessorValue", 2_i32)
///     .with("plainField", vec![String::from("a")]);
///
/// assert_eq!(changes.len(), 2);
/// assert!(changes.contains("accessorValue"));
/// assert_eq!(changes.get("accessorValue").unwrap().downcast_ref::<i32>(), Some(&2));
/// ```
#[derive(Debug, Default)]
pub struct ChangeSet {
    values: HashMap<Cow<'static, str>, Value>,
}

impl ChangeSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Adds a value, builder style. A later value for the same name wins.
    pub fn with<V: Any>(mut self, name: impl Into<Cow<'static, str>>, value: V) -> Self {
        self.insert(name, Value::new(value));
        self
    }

    /// Inserts a value, returning the previous value for `name`.
    pub fn insert(&mut self, name: impl Into<Cow<'static, str>>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the property names, in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|name| &**name)
    }

    /// Iterates the entries, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (&**name, value))
    }
}

impl<K: Into<Cow<'static, str>>> FromIterator<(K, Value)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut changes = Self::new();
        for (name, value) in iter {
            changes.insert(name, value);
        }
        changes
    }
}

impl<K: Into<Cow<'static, str>>> Extend<(K, Value)> for ChangeSet {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = hash_map::IntoIter<Cow<'static, str>, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
