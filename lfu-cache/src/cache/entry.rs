/// One cached key/value pair with its access frequency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
    /// Accesses while resident; starts at 1 on insert
    pub frequency: u64,
}

impl<K, V> Entry<K, V> {
    /// Create a fresh entry at frequency 1
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            frequency: 1,
        }
    }
}
