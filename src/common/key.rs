use crate::common::value::Value;
use crate::error::{Error, Result};

use aws_sdk_dynamodb::types;
use std::collections;

/// Key component.
///
/// ```rust
/// use dynamodb_fluent::common::key;
///
/// let key = key::Key::new("id", "1");
/// assert_eq!(key.name, "id");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: Value,
}

impl Key {
    /// Build a key component.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_fluent::common::key;
///
/// let keys = key::Keys::new("pk", "USER#1").sort_key("sk", "PROFILE");
/// assert!(keys.sort_key.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Keys {
    /// The partition key (required).
    pub partition_key: Key,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<Key>,
}

impl Keys {
    /// A primary key made of a partition key only.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            partition_key: Key::new(name, value),
            sort_key: None,
        }
    }

    /// Add a sort key.
    pub fn sort_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sort_key = Some(Key::new(name, value));
        self
    }
}

impl TryFrom<Keys> for collections::HashMap<String, types::AttributeValue> {
    type Error = Error;

    fn try_from(keys: Keys) -> Result<Self> {
        let mut map = Self::from([(
            keys.partition_key.name,
            keys.partition_key.value.try_into()?,
        )]);
        if let Some(sort_key) = keys.sort_key {
            map.insert(sort_key.name, sort_key.value.try_into()?);
        }
        Ok(map)
    }
}

/// Key components collected from separate builder calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct KeyParts {
    partition_key: Option<Key>,
    sort_key: Option<Key>,
}

impl KeyParts {
    pub(crate) fn set_partition_key(&mut self, key: Key) {
        self.partition_key = Some(key);
    }

    pub(crate) fn set_sort_key(&mut self, key: Key) {
        self.sort_key = Some(key);
    }

    pub(crate) fn set_keys(&mut self, keys: Keys) {
        self.partition_key = Some(keys.partition_key);
        self.sort_key = keys.sort_key;
    }

    pub(crate) fn resolve(
        self,
        operation: &'static str,
    ) -> Result<collections::HashMap<String, types::AttributeValue>> {
        let partition_key = self
            .partition_key
            .ok_or(Error::MissingKey { operation })?;
        let keys = Keys {
            partition_key,
            sort_key: self.sort_key,
        };
        keys.try_into()
    }
}

/// Generate `key`, `sort_key` and `keys` for a builder with a `keys: KeyParts` field.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_key_methods {
    ($builder:ty) => {
        impl $builder {
            /// Set the partition key.
            pub fn key(
                mut self,
                name: impl Into<String>,
                value: impl Into<$crate::common::value::Value>,
            ) -> Self {
                self.keys
                    .set_partition_key($crate::common::key::Key::new(name, value));
                self
            }

            /// Set the sort key.
            pub fn sort_key(
                mut self,
                name: impl Into<String>,
                value: impl Into<$crate::common::value::Value>,
            ) -> Self {
                self.keys
                    .set_sort_key($crate::common::key::Key::new(name, value));
                self
            }

            /// Set the whole primary key.
            pub fn keys(mut self, keys: $crate::common::key::Keys) -> Self {
                self.keys.set_keys(keys);
                self
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::partition_key_only_string(
        Keys::new("a", "b"),
        collections::HashMap::from(
            [(
                "a".to_string(),
                types::AttributeValue::S(
                    "b".to_string()
                ),
            )]
        )
    )]
    #[case::partition_key_only_number(
        Keys::new("a", 42),
        collections::HashMap::from(
            [(
                "a".to_string(),
                types::AttributeValue::N(
                    "42".to_string()
                ),
            )]
        )
    )]
    #[case::partition_key_string_sort_key_number(
        Keys::new("a", "b").sort_key("c", 100),
        collections::HashMap::from(
            [
                (
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    )
                ),
                (
                    "c".to_string(),
                    types::AttributeValue::N(
                        "100".to_string()
                    )
                ),
            ]
        )
    )]
    fn test_keys_to_hash_map(
        #[case] keys: Keys,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let actual = collections::HashMap::<String, types::AttributeValue>::try_from(keys).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_key_parts() {
        let mut parts = KeyParts::default();
        parts.set_sort_key(Key::new("sk", "b"));
        parts.set_partition_key(Key::new("pk", "a"));
        let expected: collections::HashMap<String, types::AttributeValue> =
            Keys::new("pk", "a").sort_key("sk", "b").try_into().unwrap();
        assert_eq!(parts.resolve("GetItem").unwrap(), expected);
    }

    #[test]
    fn test_key_parts_non_finite_key() {
        let mut parts = KeyParts::default();
        parts.set_partition_key(Key::new("pk", f64::NAN));
        assert!(matches!(
            parts.resolve("GetItem"),
            Err(Error::NonFiniteNumber { .. })
        ));
    }

    #[test]
    fn test_key_parts_missing_partition_key() {
        let mut parts = KeyParts::default();
        parts.set_sort_key(Key::new("sk", "b"));
        assert!(matches!(
            parts.resolve("GetItem"),
            Err(Error::MissingKey {
                operation: "GetItem"
            })
        ));
    }
}
