//! Dependency lists deciding when a bound effect re-runs.

use serde::{Deserialize, Serialize};

/// Ordered values that decide when a bound effect re-runs.
///
/// Two lists are equal when they have the same length and every value is
/// equal to the one at the same position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyList(Vec<serde_json::Value>);

impl DependencyList {
    /// Creates an empty list, which runs the effect once per mount.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list from already-converted values.
    #[must_use]
    pub fn from_values(values: Vec<serde_json::Value>) -> Self {
        Self(values)
    }

    /// Appends a value.
    #[must_use]
    pub fn with(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.0.push(value.into());
        self
    }

    /// Appends any serializable value, failing instead of panicking when it
    /// cannot be represented (for example a map with non-string keys).
    pub fn try_with<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.0.push(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Returns the values in order.
    #[must_use]
    pub fn values(&self) -> &[serde_json::Value] {
        &self.0
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if this list differs from `previous`.
    #[must_use]
    pub fn changed_from(&self, previous: &Self) -> bool {
        self != previous
    }
}

impl<V: Into<serde_json::Value>> FromIterator<V> for DependencyList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`DependencyList`] from serializable expressions.
///
/// ```rust
/// use abortable_effects::deps;
///
/// let user_id = 7;
/// let deps = deps![user_id, "profile"];
/// assert_eq!(deps.len(), 2);
/// ```
///
/// # Panics
///
/// Panics if a value fails to serialize, such as a map whose keys are not
/// strings. Use [`DependencyList::try_with`] for such values.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::lifecycle::DependencyList::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::lifecycle::DependencyList::from_values(
            vec![$($crate::__private::serde_json::json!($value)),+]
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_equal_lists_unchanged() {
        let a = deps![1, "user"];
        let b = deps![1, "user"];
        assert!(!b.changed_from(&a));
    }

    #[test]
    fn test_value_change_detected() {
        let a = deps![1];
        let b = deps![2];
        assert!(b.changed_from(&a));
    }

    #[test]
    fn test_order_matters() {
        let a = deps![1, 2];
        let b = deps![2, 1];
        assert!(b.changed_from(&a));
    }

    #[test]
    fn test_length_change_detected() {
        let a = deps![1];
        let b = deps![1, 1];
        assert!(b.changed_from(&a));
    }

    #[test]
    fn test_builders_agree() {
        let from_macro = deps![1, "a", true];
        let from_with = DependencyList::new().with(1).with("a").with(true);
        let from_iter: DependencyList = vec![json!(1), json!("a"), json!(true)].into_iter().collect();

        assert_eq!(from_macro, from_with);
        assert_eq!(from_macro, from_iter);
        assert_eq!(from_macro.values()[1], json!("a"));
    }

    #[test]
    fn test_empty_macro() {
        let empty = deps![];
        assert!(empty.is_empty());
        assert_eq!(empty, DependencyList::new());
    }

    #[test]
    fn test_try_with_rejects_non_string_keys() {
        let keyed = BTreeMap::from([(vec![1_u8], 1)]);
        assert!(DependencyList::new().try_with(&keyed).is_err());

        let list = DependencyList::new().try_with(&7).unwrap().try_with("a").unwrap();
        assert_eq!(list, deps![7, "a"]);
    }

    #[test]
    #[should_panic]
    fn test_macro_panics_on_unserializable_value() {
        let keyed = BTreeMap::from([(vec![1_u8], 1)]);
        let _ = deps![keyed];
    }

    #[test]
    fn test_serializes_as_array() {
        let list = deps![1, "a"];
        assert_eq!(serde_json::to_value(&list).unwrap(), json!([1, "a"]));
    }
}
