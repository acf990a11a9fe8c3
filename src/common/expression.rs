use crate::common::{
    condition::Conditions, format, names::AttributeNames, value::Value, values::AttributeValues,
};
use crate::error::{Error, Result};

use aws_sdk_dynamodb::types;
use std::collections;

/// The attribute name and value registries owned by one request builder.
///
/// Every expression slot of the request (condition, filter, key condition,
/// update, projection) draws its placeholders from the same two registries, so
/// generated `:pN` placeholders never collide across slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expressions {
    names: AttributeNames,
    values: AttributeValues,
}

impl Expressions {
    /// The registered attribute names.
    pub fn names(&self) -> &AttributeNames {
        &self.names
    }

    /// The registered attribute values.
    pub fn values(&self) -> &AttributeValues {
        &self.values
    }

    /// Register an attribute name placeholder.
    pub fn add_name(
        &mut self,
        placeholder: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<()> {
        self.names.add(placeholder, name)
    }

    /// Register several attribute name placeholders.
    pub fn add_names<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.names.add_range(entries)
    }

    /// Register an attribute value placeholder.
    pub fn add_value(
        &mut self,
        placeholder: impl Into<String>,
        value: impl Into<Value>,
        conditional_use: bool,
    ) -> Result<()> {
        self.values.add(placeholder, value, conditional_use)
    }

    /// Resolve a template and register the values it generates.
    ///
    /// Without arguments the template is taken verbatim and its braces are not
    /// interpreted.
    pub fn resolve(&mut self, template: &str, args: Option<&[Value]>) -> Result<String> {
        let Some(args) = args else {
            if template.trim().is_empty() {
                return Err(Error::EmptyTemplate);
            }
            return Ok(template.to_string());
        };
        let formatted = format::format_expression(template, Some(args), &self.values)?;
        for (placeholder, value) in formatted.values {
            self.values.add_attribute(placeholder, value)?;
        }
        Ok(formatted.expression)
    }

    /// Resolve a template and append it to `conditions`.
    pub(crate) fn push(
        &mut self,
        conditions: &mut Conditions,
        template: &str,
        args: Option<&[Value]>,
    ) -> Result<()> {
        let fragment = self.resolve(template, args)?;
        conditions.add(fragment);
        Ok(())
    }

    /// Split into the maps written to the request, each omitted when empty.
    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<collections::HashMap<String, String>>,
        Option<collections::HashMap<String, types::AttributeValue>>,
    ) {
        (self.names.into_snapshot(), self.values.into_snapshot())
    }
}

/// Collect format arguments into the slice form the formatter takes.
pub(crate) fn collect_args<I>(args: I) -> Vec<Value>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    args.into_iter().map(Into::into).collect()
}

/// Generate `with_attribute`/`with_attributes` for a builder owning [`Expressions`].
#[macro_export]
#[doc(hidden)]
macro_rules! impl_attribute_name_methods {
    ($builder:ty) => {
        impl $builder {
            /// Register an expression attribute name placeholder, e.g. `#status`.
            pub fn with_attribute(
                mut self,
                placeholder: impl Into<String>,
                name: impl Into<String>,
            ) -> $crate::error::Result<Self> {
                self.expressions.add_name(placeholder, name)?;
                Ok(self)
            }

            /// Register several expression attribute name placeholders.
            pub fn with_attributes<I, K, V>(mut self, entries: I) -> $crate::error::Result<Self>
            where
                I: IntoIterator<Item = (K, V)>,
                K: Into<String>,
                V: Into<String>,
            {
                self.expressions.add_names(entries)?;
                Ok(self)
            }
        }
    };
}

/// Generate `with_value`/`with_value_if` for a builder owning [`Expressions`].
#[macro_export]
#[doc(hidden)]
macro_rules! impl_attribute_value_methods {
    ($builder:ty) => {
        impl $builder {
            /// Register an expression attribute value placeholder, e.g. `:status`.
            ///
            /// Absent values are skipped.
            pub fn with_value(
                self,
                placeholder: impl Into<String>,
                value: impl Into<$crate::common::value::Value>,
            ) -> $crate::error::Result<Self> {
                self.with_value_if(placeholder, value, true)
            }

            /// Register an expression attribute value placeholder, choosing whether an
            /// absent value is skipped (`conditional_use`) or written as null.
            pub fn with_value_if(
                mut self,
                placeholder: impl Into<String>,
                value: impl Into<$crate::common::value::Value>,
                conditional_use: bool,
            ) -> $crate::error::Result<Self> {
                self.expressions
                    .add_value(placeholder, value, conditional_use)?;
                Ok(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shares_registry_between_calls() {
        let mut expressions = Expressions::default();
        let first = expressions
            .resolve("#pk = {0}", Some(&[Value::from("a")]))
            .unwrap();
        let second = expressions
            .resolve("#sk > {0}", Some(&[Value::from(1)]))
            .unwrap();
        assert_eq!(first, "#pk = :p0");
        assert_eq!(second, "#sk > :p1");
        assert_eq!(expressions.values().len(), 2);
    }

    #[test]
    fn test_resolve_avoids_manual_placeholders() {
        let mut expressions = Expressions::default();
        expressions.add_value(":p0", "manual", true).unwrap();
        let expression = expressions
            .resolve("a = {0}", Some(&[Value::from("b")]))
            .unwrap();
        assert_eq!(expression, "a = :p1");
        assert_eq!(
            expressions.values().get(":p0"),
            Some(&types::AttributeValue::S("manual".to_string()))
        );
    }

    #[test]
    fn test_resolve_verbatim() {
        let mut expressions = Expressions::default();
        let expression = expressions.resolve("attribute_exists({0})", None).unwrap();
        assert_eq!(expression, "attribute_exists({0})");
        assert!(expressions.values().is_empty());
        assert!(matches!(
            expressions.resolve("  ", None),
            Err(Error::EmptyTemplate)
        ));
    }

    #[test]
    fn test_out_of_range_registers_nothing() {
        let mut expressions = Expressions::default();
        let error = expressions.resolve("a = {0} AND b = {1}", Some(&[Value::from(1)]));
        assert!(matches!(error, Err(Error::IndexOutOfRange { index: 1, count: 1 })));
        assert!(expressions.values().is_empty());
    }

    #[test]
    fn test_non_finite_argument_registers_nothing() {
        let mut expressions = Expressions::default();
        let error = expressions.resolve(
            "a = {0} AND b = {1}",
            Some(&[Value::from(1), Value::from(f64::NAN)]),
        );
        assert!(matches!(error, Err(Error::NonFiniteNumber { .. })));
        assert!(expressions.values().is_empty());
    }

    #[test]
    fn test_push_and_parts() {
        let mut expressions = Expressions::default();
        let mut conditions = Conditions::default();
        expressions.add_name("#s", "status").unwrap();
        expressions
            .push(&mut conditions, "#s = {0}", Some(&collect_args(["active"])))
            .unwrap();
        expressions
            .push(&mut conditions, "attribute_exists(#s)", None)
            .unwrap();
        assert_eq!(
            conditions.combine().as_deref(),
            Some("(#s = :p0) AND (attribute_exists(#s))")
        );
        let (names, values) = expressions.into_parts();
        assert_eq!(
            names,
            Some(collections::HashMap::from([(
                "#s".to_string(),
                "status".to_string()
            )]))
        );
        assert_eq!(
            values,
            Some(collections::HashMap::from([(
                ":p0".to_string(),
                types::AttributeValue::S("active".to_string())
            )]))
        );
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(Expressions::default().into_parts(), (None, None));
    }
}
