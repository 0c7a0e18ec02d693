//! Utility extensions for [`ChainedMap`].

use crate::ChainedMap;

/// Extension trait providing bulk views that are handy in tests and
/// diagnostics but not part of the map's core contract.
pub trait MapExtensions<K, V> {
    /// Returns the keys of the map as a `Vec`, in iteration order.
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the map as a `Vec`, in iteration order.
    fn values(&self) -> Vec<V>;
}

impl<K, V, S> MapExtensions<K, V> for ChainedMap<K, V, S>
where
    K: Clone,
    V: Clone,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_values_follow_iteration_order() {
        let mut map = ChainedMap::with_buckets(8);
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);

        let mut keys = map.keys();
        keys.sort();
        let mut values = map.values();
        values.sort_unstable();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(values, vec![1, 2, 3]);

        let paired: Vec<(String, i32)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(map.keys(), paired.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>());
        assert_eq!(map.values(), paired.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    }
}
