use crate::common::{condition::Conditions, expression::Expressions};

use aws_sdk_dynamodb::types;
use std::collections;

/// Separator between projection fragments added by separate calls.
pub(crate) const PROJECTION_SEPARATOR: &str = ", ";

pub(crate) fn join_projection(projection: Vec<String>) -> Option<String> {
    if projection.is_empty() {
        None
    } else {
        Some(projection.join(PROJECTION_SEPARATOR))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Options of multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadArgs {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter: Conditions,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection: Vec<String>,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) select: Option<types::Select>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

impl MultipleReadArgs {
    pub(crate) fn into_input(
        self,
        table_name: String,
        expressions: Expressions,
    ) -> MultipleReadInput {
        let (expression_attribute_names, expression_attribute_values) = expressions.into_parts();
        MultipleReadInput {
            consistent_read: self.consistent_read,
            exclusive_start_key: self.exclusive_start_key,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression: self.filter.combine(),
            index_name: self.index_name,
            limit: self.limit,
            projection_expression: join_projection(self.projection),
            return_consumed_capacity: self.return_consumed_capacity,
            select: self.select,
            table_name,
        }
    }
}

/// Generate the option and filter methods shared by Query and Scan.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_multiple_read_methods {
    ($builder:ty) => {
        impl $builder {
            /// Add a filter fragment taken verbatim.
            ///
            /// Fragments from several calls are parenthesized and joined with `AND`.
            pub fn filter(mut self, expression: &str) -> $crate::error::Result<Self> {
                self.expressions
                    .push(&mut self.read_args.filter, expression, None)?;
                Ok(self)
            }

            /// Add a filter fragment whose `{N}` markers are bound to `args`.
            pub fn filter_with<I>(mut self, template: &str, args: I) -> $crate::error::Result<Self>
            where
                I: IntoIterator,
                I::Item: Into<$crate::common::value::Value>,
            {
                let args = $crate::common::expression::collect_args(args);
                self.expressions
                    .push(&mut self.read_args.filter, template, Some(&args))?;
                Ok(self)
            }

            /// Use strongly consistent reads.
            pub fn consistent_read(mut self, consistent_read: bool) -> Self {
                self.read_args.consistent_read = Some(consistent_read);
                self
            }

            /// Continue from the `last_evaluated_key` of a previous page.
            pub fn exclusive_start_key(
                mut self,
                key: std::collections::HashMap<String, aws_sdk_dynamodb::types::AttributeValue>,
            ) -> Self {
                self.read_args.exclusive_start_key = Some(key);
                self
            }

            /// Read from a secondary index instead of the base table.
            pub fn index(mut self, index_name: impl Into<String>) -> Self {
                self.read_args.index_name = Some(index_name.into());
                self
            }

            /// Maximum number of items to evaluate.
            pub fn limit(mut self, limit: i32) -> Self {
                self.read_args.limit = Some(limit);
                self
            }

            /// Add attributes to the projection expression.
            pub fn projection(mut self, projection: impl Into<String>) -> Self {
                self.read_args.projection.push(projection.into());
                self
            }

            /// Whether to return consumed capacity.
            pub fn return_consumed_capacity(
                mut self,
                return_consumed_capacity: aws_sdk_dynamodb::types::ReturnConsumedCapacity,
            ) -> Self {
                self.read_args.return_consumed_capacity = Some(return_consumed_capacity);
                self
            }

            /// Which attributes to return.
            pub fn select(mut self, select: aws_sdk_dynamodb::types::Select) -> Self {
                self.read_args.select = Some(select);
                self
            }
        }
    };
}

/// apply common single read operation settings to a builder
#[macro_export]
#[doc(hidden)]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
#[doc(hidden)]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .set_return_consumed_capacity($multiple_read_operation.return_consumed_capacity)
            .set_select($multiple_read_operation.select)
            .table_name($multiple_read_operation.table_name)
    };
}
