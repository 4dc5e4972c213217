//! Flat key-value persistence seam
use std::collections::HashMap;
use std::convert::Infallible;

/// Trait for abstracting the platform's key-value storage.
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), Self::Error>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be updated.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory store for headless runs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from key/value pairs.
    #[must_use]
    pub fn with_values<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.values.remove(key);
        Ok(())
    }
}

impl<T: KeyValueStore> KeyValueStore for &mut T {
    type Error = T::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}
