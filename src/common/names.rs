use crate::error::{Error, RegistryKind, Result};

use indexmap::IndexMap;
use std::collections;

/// Expression attribute names registered by one request builder.
///
/// Maps `#placeholder` tokens to real attribute names. The registry is append
/// only: a placeholder can be registered once, even with the same name.
///
/// ```rust
/// use dynamodb_fluent::common::names::AttributeNames;
///
/// let mut names = AttributeNames::default();
/// names.add("#pk", "partitionKey").unwrap();
/// assert!(names.add("#pk", "partitionKey").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeNames {
    names: IndexMap<String, String>,
}

impl AttributeNames {
    /// Register `placeholder` as standing for `name`.
    pub fn add(&mut self, placeholder: impl Into<String>, name: impl Into<String>) -> Result<()> {
        let placeholder = placeholder.into();
        if self.names.contains_key(&placeholder) {
            return Err(Error::DuplicateKey {
                kind: RegistryKind::Names,
                key: placeholder,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(placeholder = %placeholder, "registered attribute name");
        self.names.insert(placeholder, name.into());
        Ok(())
    }

    /// Register every entry in order.
    ///
    /// Entries added before a duplicate is hit stay registered.
    pub fn add_range<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (placeholder, name) in entries {
            self.add(placeholder, name)?;
        }
        Ok(())
    }

    /// The attribute name registered for `placeholder`.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.names.get(placeholder).map(String::as_str)
    }

    /// Whether `placeholder` is registered.
    pub fn contains(&self, placeholder: &str) -> bool {
        self.names.contains_key(placeholder)
    }

    /// Number of registered placeholders.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The registered names, or `None` when the request should omit them.
    pub fn snapshot(&self) -> Option<collections::HashMap<String, String>> {
        if self.names.is_empty() {
            return None;
        }
        let names = self
            .names
            .iter()
            .map(|(placeholder, name)| (placeholder.clone(), name.clone()))
            .collect();
        Some(names)
    }

    pub(crate) fn into_snapshot(self) -> Option<collections::HashMap<String, String>> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.names.into_iter().collect())
        }
    }
}
