//! Order-preserving grouping.
//!
//! Keys only need `PartialEq`: groups are kept in a vector in the order their
//! key first appears, and each group keeps the relative order of the input.

use serde_json::Value;

/// Ordered mapping from key to the items that share it.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
}

impl<K, T> Default for Groups<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, T> Groups<K, T> {
    /// Append an item to the group for `key`, opening the group if needed.
    pub fn push(&mut self, key: K, item: T) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, items)) => items.push(item),
            None => self.entries.push((key, vec![item])),
        }
    }

    pub fn get(&self, key: &K) -> Option<&[T]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, items)| items.as_slice())
    }

    /// Like `get`, but an absent group reads as empty.
    pub fn get_or_empty(&self, key: &K) -> &[T] {
        self.get(key).unwrap_or(&[])
    }

    /// Remove and return the group for `key`.
    pub fn take(&mut self, key: &K) -> Vec<T> {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => self.entries.remove(idx).1,
            None => Vec::new(),
        }
    }
}

impl<K, T> Groups<K, T> {
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.entries.iter().map(|(k, items)| (k, items.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<(K, Vec<T>)> {
        self.entries
    }
}

impl<K, T> IntoIterator for Groups<K, T> {
    type Item = (K, Vec<T>);
    type IntoIter = std::vec::IntoIter<(K, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partition `items` by the key `key_fn` derives from each one.
pub fn group_by<I, K, F>(items: I, mut key_fn: F) -> Groups<K, I::Item>
where
    I: IntoIterator,
    K: PartialEq,
    F: FnMut(&I::Item) -> K,
{
    let mut groups = Groups::default();
    for item in items {
        let key = key_fn(&item);
        groups.push(key, item);
    }
    groups
}

/// How to derive a grouping key from a JSON record.
pub enum KeySelector<'a> {
    /// Use the value of a top-level field; records without it group under `null`.
    Field(&'a str),
    /// Derive the key with a function.
    With(Box<dyn Fn(&Value) -> Value + 'a>),
}

impl<'a> KeySelector<'a> {
    pub fn with(f: impl Fn(&Value) -> Value + 'a) -> Self {
        Self::With(Box::new(f))
    }

    fn key_for(&self, value: &Value) -> Value {
        match self {
            Self::Field(name) => value.get(*name).cloned().unwrap_or(Value::Null),
            Self::With(f) => f(value),
        }
    }
}

/// Group untyped JSON records, e.g. raw API payloads.
pub fn group_json<I>(values: I, selector: &KeySelector<'_>) -> Groups<Value, Value>
where
    I: IntoIterator<Item = Value>,
{
    group_by(values, |v| selector.key_for(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_json_by_field_preserves_order() {
        let items = vec![
            json!({"id": 0, "status": "pending"}),
            json!({"id": 1, "status": "done"}),
            json!({"id": 2, "status": "pending"}),
        ];

        let groups = group_json(items.clone(), &KeySelector::Field("status"));

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups.get(&json!("pending")).unwrap(),
            &[items[0].clone(), items[2].clone()]
        );
        assert_eq!(groups.get(&json!("done")).unwrap(), &[items[1].clone()]);
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec![json!("pending"), json!("done")]);
    }

    #[test]
    fn test_group_json_with_function() {
        let items = vec![json!({"year": 1999}), json!({"year": 2004}), json!({"year": 1994})];
        let decade = KeySelector::with(|v| {
            let year = v.get("year").and_then(Value::as_i64).unwrap_or_default();
            json!(year / 10 * 10)
        });

        let groups = group_json(items, &decade);

        assert_eq!(groups.get_or_empty(&json!(1990)).len(), 2);
        assert_eq!(groups.get_or_empty(&json!(2000)).len(), 1);
    }

    #[test]
    fn test_missing_field_groups_under_null() {
        let items = vec![json!({"status": "pending"}), json!({"text": "orphan"})];
        let groups = group_json(items, &KeySelector::Field("status"));
        assert_eq!(groups.get_or_empty(&Value::Null).len(), 1);
    }

    #[test]
    fn test_group_by_only_needs_equality() {
        // f64 is PartialEq but neither Eq nor Hash
        let groups = group_by(vec![1.5_f64, 2.0, 1.5, 3.25], |x| *x);
        assert_eq!(groups.get(&1.5), Some(&[1.5, 1.5][..]));
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by(Vec::<u8>::new(), |x| *x);
        assert!(groups.is_empty());
        assert!(groups.get_or_empty(&1).is_empty());
    }

    #[test]
    fn test_take_removes_group() {
        let mut groups = group_by(vec!["a1", "b1", "a2"], |s| s.chars().next());
        assert_eq!(groups.take(&Some('a')), vec!["a1", "a2"]);
        assert!(groups.get(&Some('a')).is_none());
        assert!(groups.take(&Some('z')).is_empty());
    }
}
