use crate::common::value::Value;
use crate::error::{Error, RegistryKind, Result};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::collections;

/// Expression attribute values registered by one request builder.
///
/// Maps `:placeholder` tokens to wire values. Like
/// [`AttributeNames`](crate::common::names::AttributeNames) it is append only.
///
/// ```rust
/// use dynamodb_fluent::common::values::AttributeValues;
///
/// let mut values = AttributeValues::default();
/// values.add(":status", "active", true).unwrap();
/// // absent optional values are skipped when used conditionally
/// values.add(":tag", None::<String>, true).unwrap();
/// assert_eq!(values.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeValues {
    values: IndexMap<String, types::AttributeValue>,
}

impl AttributeValues {
    /// Register `value` under `placeholder`.
    ///
    /// With `conditional_use` an absent value is skipped without registering
    /// anything. Without it the absent value is written in its explicit null form.
    pub fn add(
        &mut self,
        placeholder: impl Into<String>,
        value: impl Into<Value>,
        conditional_use: bool,
    ) -> Result<()> {
        let placeholder = placeholder.into();
        let value = value.into();
        if conditional_use && value.is_null() {
            if self.values.contains_key(&placeholder) {
                return Err(duplicate(placeholder));
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(placeholder = %placeholder, "skipped absent attribute value");
            return Ok(());
        }
        self.add_attribute(placeholder, value.try_into()?)
    }

    /// Register an already encoded wire value under `placeholder`.
    pub fn add_attribute(
        &mut self,
        placeholder: impl Into<String>,
        value: types::AttributeValue,
    ) -> Result<()> {
        let placeholder = placeholder.into();
        if self.values.contains_key(&placeholder) {
            return Err(duplicate(placeholder));
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(placeholder = %placeholder, "registered attribute value");
        self.values.insert(placeholder, value);
        Ok(())
    }

    /// Register every entry in order, skipping absent values.
    ///
    /// Entries added before a duplicate is hit stay registered.
    pub fn add_range<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (placeholder, value) in entries {
            self.add(placeholder, value, true)?;
        }
        Ok(())
    }

    /// The wire value registered for `placeholder`.
    pub fn get(&self, placeholder: &str) -> Option<&types::AttributeValue> {
        self.values.get(placeholder)
    }

    /// Whether `placeholder` is registered.
    pub fn contains(&self, placeholder: &str) -> bool {
        self.values.contains_key(placeholder)
    }

    /// Number of registered placeholders.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The registered values, or `None` when the request should omit them.
    pub fn snapshot(&self) -> Option<collections::HashMap<String, types::AttributeValue>> {
        if self.values.is_empty() {
            return None;
        }
        let values = self
            .values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), value.clone()))
            .collect();
        Some(values)
    }

    pub(crate) fn into_snapshot(
        self,
    ) -> Option<collections::HashMap<String, types::AttributeValue>> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.into_iter().collect())
        }
    }
}

fn duplicate(key: String) -> Error {
    Error::DuplicateKey {
        kind: RegistryKind::Values,
        key,
    }
}
