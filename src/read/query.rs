use crate::common::{condition::Conditions, expression::Expressions};
use crate::error::Result;
use crate::read;

use aws_sdk_dynamodb::{Client, error, operation};

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    scan_index_forward: Option<bool>,
}

/// Query operation.
///
/// The key condition is required; filters are optional and combined with `AND`.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::{read, values};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = read::query::Query::new("users")
///     .key_condition_with("#pk = {0} AND begins_with(#sk, {1})", values!["USER#1", "ORDER#"])?
///     .with_attributes([("#pk", "pk"), ("#sk", "sk")])?
///     .scan_index_forward(false)
///     .limit(10)
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    expressions: Expressions,
    key_condition: Conditions,
    read_args: read::common::MultipleReadArgs,
    scan_index_forward: Option<bool>,
    table_name: String,
}

impl Query {
    /// Start a query on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Add a key condition fragment taken verbatim.
    pub fn key_condition(mut self, expression: &str) -> Result<Self> {
        self.expressions
            .push(&mut self.key_condition, expression, None)?;
        Ok(self)
    }

    /// Add a key condition fragment whose `{N}` markers are bound to `args`.
    pub fn key_condition_with<I>(mut self, template: &str, args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<crate::common::value::Value>,
    {
        let args = crate::common::expression::collect_args(args);
        self.expressions
            .push(&mut self.key_condition, template, Some(&args))?;
        Ok(self)
    }

    /// Read in ascending (`true`, the default) or descending sort key order.
    pub fn scan_index_forward(mut self, scan_index_forward: bool) -> Self {
        self.scan_index_forward = Some(scan_index_forward);
        self
    }

    pub(crate) fn build(self) -> Result<QueryInput> {
        let key_condition_expression = self.key_condition.require("Query")?;
        let multiple_read_operation = self
            .read_args
            .into_input(self.table_name, self.expressions);
        Ok(QueryInput {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: self.scan_index_forward,
        })
    }

    /// Execute the query operation.
    ///
    /// Returns a single page; continue with
    /// [`exclusive_start_key`](Self::exclusive_start_key).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.query", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query = self.build().map_err(error::BuildError::other)?;
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_scan_index_forward(query.scan_index_forward);
        crate::apply_multiple_read_operation!(builder, query.multiple_read_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(Query);
crate::impl_attribute_value_methods!(Query);
crate::impl_multiple_read_methods!(Query);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::values;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use std::collections;

    #[rstest]
    #[case::key_only(
        Query::new("a")
            .key_condition_with("#b = {0}", ["c"])
            .unwrap()
            .with_attribute("#b", "b")
            .unwrap(),
        QueryInput {
            key_condition_expression: "#b = :p0".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#b".to_string(), "b".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":p0".to_string(),
                                types::AttributeValue::S(
                                    "c".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "a".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case::full(
        Query::new("a")
            .key_condition_with("pk = {0} AND sk > {1}", ["USER#123", "2024-01-01"])
            .unwrap()
            .filter_with("#c = {0}", values![true])
            .unwrap()
            .filter("attribute_exists(#d)")
            .unwrap()
            .with_attributes([("#c", "c"), ("#d", "d")])
            .unwrap()
            .index("e")
            .limit(10)
            .consistent_read(false)
            .projection("#c")
            .select(types::Select::SpecificAttributes)
            .scan_index_forward(false)
            .return_consumed_capacity(types::ReturnConsumedCapacity::Total)
            .exclusive_start_key(
                collections::HashMap::from(
                    [
                        (
                            "pk".to_string(),
                            types::AttributeValue::S(
                                "f".to_string()
                            )
                        ),
                    ]
                )
            ),
        QueryInput {
            key_condition_expression: "pk = :p0 AND sk > :p1".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                consistent_read: Some(false),
                exclusive_start_key: Some(
                    collections::HashMap::from(
                        [
                            (
                                "pk".to_string(),
                                types::AttributeValue::S(
                                    "f".to_string()
                                )
                            ),
                        ]
                    )
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#c".to_string(), "c".to_string()),
                            ("#d".to_string(), "d".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":p0".to_string(),
                                types::AttributeValue::S(
                                    "USER#123".to_string()
                                )
                            ),
                            (
                                ":p1".to_string(),
                                types::AttributeValue::S(
                                    "2024-01-01".to_string()
                                )
                            ),
                            (
                                ":p2".to_string(),
                                types::AttributeValue::Bool(true)
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "(#c = :p2) AND (attribute_exists(#d))".to_string()
                ),
                index_name: Some("e".to_string()),
                limit: Some(10),
                projection_expression: Some("#c".to_string()),
                return_consumed_capacity: Some(
                    types::ReturnConsumedCapacity::Total
                ),
                select: Some(
                    types::Select::SpecificAttributes
                ),
                table_name: "a".to_string(),
            },
            scan_index_forward: Some(false),
        }
    )]
    fn test_query(#[case] args: Query, #[case] expected: QueryInput) {
        let actual = args.build().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_query_without_key_condition() {
        let error = Query::new("a").filter("x = y").unwrap().build().unwrap_err();
        assert!(matches!(error, Error::MissingCondition { operation: "Query" }));
    }

    #[test]
    fn test_query_conditional_value() {
        let input = Query::new("a")
            .key_condition("pk = :pk")
            .unwrap()
            .with_value(":pk", "b")
            .unwrap()
            .with_value(":status", None::<String>)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            input.multiple_read_operation.expression_attribute_values,
            Some(collections::HashMap::from([(
                ":pk".to_string(),
                types::AttributeValue::S("b".to_string())
            )]))
        );
    }

    #[test]
    fn test_query_index_out_of_range() {
        let error = Query::new("a")
            .key_condition_with("pk = {0} AND sk = {1}", ["b"])
            .unwrap_err();
        assert!(matches!(error, Error::IndexOutOfRange { index: 1, count: 1 }));
    }
}
