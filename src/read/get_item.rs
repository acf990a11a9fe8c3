use crate::common::{expression::Expressions, key::KeyParts};
use crate::error::Result;
use crate::read;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GetItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::read;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = read::get_item::GetItem::new("users")
///     .key("pk", "USER#1")
///     .sort_key("sk", "PROFILE")
///     .projection("#name, #email")
///     .with_attributes([("#name", "name"), ("#email", "email")])?
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem {
    consistent_read: Option<bool>,
    expressions: Expressions,
    keys: KeyParts,
    projection: Vec<String>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    table_name: String,
}

impl GetItem {
    /// Start a get item request on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Use a strongly consistent read.
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// Add attributes to the projection expression.
    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection.push(projection.into());
        self
    }

    /// Whether to return consumed capacity.
    pub fn return_consumed_capacity(
        mut self,
        return_consumed_capacity: types::ReturnConsumedCapacity,
    ) -> Self {
        self.return_consumed_capacity = Some(return_consumed_capacity);
        self
    }

    pub(crate) fn build(self) -> Result<GetItemInput> {
        let keys = self.keys.resolve("GetItem")?;
        let (expression_attribute_names, _) = self.expressions.into_parts();
        let single_read_operation = read::common::SingleReadInput {
            consistent_read: self.consistent_read,
            expression_attribute_names,
            projection_expression: read::common::join_projection(self.projection),
            table_name: self.table_name,
        };
        Ok(GetItemInput {
            keys,
            return_consumed_capacity: self.return_consumed_capacity,
            single_read_operation,
        })
    }

    /// Execute the get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item = self.build().map_err(error::BuildError::other)?;
        let builder = client
            .get_item()
            .set_key(Some(get_item.keys))
            .set_return_consumed_capacity(get_item.return_consumed_capacity);
        crate::apply_single_read_operation!(builder, get_item.single_read_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(GetItem);
crate::impl_key_methods!(GetItem);
