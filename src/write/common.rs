use crate::common::{condition::Conditions, expression::Expressions};

use aws_sdk_dynamodb::types;
use std::collections;

/// Options shared by Put, Update and Delete.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteArgs {
    pub(crate) condition: Conditions,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
}

/// Internal representation of write operation parameters.
///
/// Holds the fully resolved condition expression and attribute maps ready for
/// DynamoDB API calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    pub(crate) table_name: String,
}

impl WriteArgs {
    pub(crate) fn into_input(self, table_name: String, expressions: Expressions) -> WriteInput {
        let (expression_attribute_names, expression_attribute_values) = expressions.into_parts();
        WriteInput {
            condition_expression: self.condition.combine(),
            expression_attribute_names,
            expression_attribute_values,
            return_consumed_capacity: self.return_consumed_capacity,
            return_item_collection_metrics: self.return_item_collection_metrics,
            return_values: self.return_values,
            return_values_on_condition_check_failure: self.return_values_on_condition_check_failure,
            table_name,
        }
    }
}

/// Generate the `condition` builder methods for a type with `expressions` and `condition`.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_condition_methods {
    ($builder:ty, $($condition:ident).+) => {
        impl $builder {
            /// Add a condition fragment taken verbatim.
            ///
            /// Fragments from several calls are parenthesized and joined with `AND`.
            pub fn condition(mut self, expression: &str) -> $crate::error::Result<Self> {
                self.expressions
                    .push(&mut self.$($condition).+, expression, None)?;
                Ok(self)
            }

            /// Add a condition fragment whose `{N}` markers are bound to `args`.
            pub fn condition_with<I>(
                mut self,
                template: &str,
                args: I,
            ) -> $crate::error::Result<Self>
            where
                I: IntoIterator,
                I::Item: Into<$crate::common::value::Value>,
            {
                let args = $crate::common::expression::collect_args(args);
                self.expressions
                    .push(&mut self.$($condition).+, template, Some(&args))?;
                Ok(self)
            }
        }
    };
}

/// Generate the return option methods of Put, Update and Delete.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_write_methods {
    ($builder:ty) => {
        $crate::impl_condition_methods!($builder, write_args.condition);

        impl $builder {
            /// Whether to return consumed capacity.
            pub fn return_consumed_capacity(
                mut self,
                return_consumed_capacity: aws_sdk_dynamodb::types::ReturnConsumedCapacity,
            ) -> Self {
                self.write_args.return_consumed_capacity = Some(return_consumed_capacity);
                self
            }

            /// Whether to return item collection metrics.
            pub fn return_item_collection_metrics(
                mut self,
                return_item_collection_metrics:
                    aws_sdk_dynamodb::types::ReturnItemCollectionMetrics,
            ) -> Self {
                self.write_args.return_item_collection_metrics =
                    Some(return_item_collection_metrics);
                self
            }

            /// Which item attributes to return in the response.
            pub fn return_values(
                mut self,
                return_values: aws_sdk_dynamodb::types::ReturnValue,
            ) -> Self {
                self.write_args.return_values = Some(return_values);
                self
            }

            /// Which item attributes to return when the condition fails.
            pub fn return_values_on_condition_check_failure(
                mut self,
                return_values: aws_sdk_dynamodb::types::ReturnValuesOnConditionCheckFailure,
            ) -> Self {
                self.write_args.return_values_on_condition_check_failure = Some(return_values);
                self
            }
        }
    };
}

/// apply common write operation settings to a builder
#[macro_export]
#[doc(hidden)]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_consumed_capacity($write_operation.return_consumed_capacity)
            .set_return_item_collection_metrics($write_operation.return_item_collection_metrics)
            .set_return_values($write_operation.return_values)
            .set_return_values_on_condition_check_failure(
                $write_operation.return_values_on_condition_check_failure,
            )
            .table_name($write_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::Value;

    #[test]
    fn test_into_input() {
        let mut expressions = Expressions::default();
        let mut args = WriteArgs {
            return_values: Some(types::ReturnValue::AllOld),
            ..Default::default()
        };
        expressions
            .push(&mut args.condition, "a = {0}", Some(&[Value::from("b")]))
            .unwrap();
        expressions
            .push(&mut args.condition, "attribute_not_exists(c)", None)
            .unwrap();
        let input = args.into_input("t".to_string(), expressions);
        assert_eq!(
            input,
            WriteInput {
                condition_expression: Some("(a = :p0) AND (attribute_not_exists(c))".to_string()),
                expression_attribute_values: Some(collections::HashMap::from([(
                    ":p0".to_string(),
                    types::AttributeValue::S("b".to_string())
                )])),
                return_values: Some(types::ReturnValue::AllOld),
                table_name: "t".to_string(),
                ..Default::default()
            }
        );
    }
}
