use crate::common::{expression::Expressions, key::Keys};
use crate::error::Result;
use crate::read;

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use std::collections;

/// The keys to read from one table of a batch, with their read options.
///
/// ```rust
/// use dynamodb_fluent::{common::key::Keys, read::batch_get_item::BatchGetTable};
///
/// let table = BatchGetTable::new("users")
///     .key(Keys::new("pk", "USER#1"))
///     .key(Keys::new("pk", "USER#2"))
///     .projection("#name")
///     .with_attribute("#name", "name")
///     .unwrap();
/// # let _ = table;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetTable {
    consistent_read: Option<bool>,
    expressions: Expressions,
    keys: Vec<Keys>,
    projection: Vec<String>,
    table_name: String,
}

impl BatchGetTable {
    /// Start describing the reads from `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Add a primary key to read.
    pub fn key(mut self, keys: Keys) -> Self {
        self.keys.push(keys);
        self
    }

    /// Use strongly consistent reads for this table.
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// Add attributes to the projection expression.
    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection.push(projection.into());
        self
    }

    fn build(self) -> Result<(String, types::KeysAndAttributes)> {
        let (expression_attribute_names, _) = self.expressions.into_parts();
        let single_read_operation = read::common::SingleReadInput {
            consistent_read: self.consistent_read,
            expression_attribute_names,
            projection_expression: read::common::join_projection(self.projection),
            table_name: self.table_name,
        };
        let keys = self
            .keys
            .into_iter()
            .map(collections::HashMap::<String, types::AttributeValue>::try_from)
            .collect::<Result<Vec<_>>>()?;
        let keys_and_attributes = types::KeysAndAttributes::builder()
            .set_consistent_read(single_read_operation.consistent_read)
            .set_expression_attribute_names(single_read_operation.expression_attribute_names)
            .set_keys(Some(keys))
            .set_projection_expression(single_read_operation.projection_expression)
            .build()?;
        Ok((single_read_operation.table_name, keys_and_attributes))
    }
}

crate::impl_attribute_name_methods!(BatchGetTable);

/// Batch get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::{common::key::Keys, read::batch_get_item};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = batch_get_item::BatchGetItem::new()
///     .table(batch_get_item::BatchGetTable::new("users").key(Keys::new("pk", "USER#1")))
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItem {
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    tables: IndexMap<String, BatchGetTable>,
}

impl BatchGetItem {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the reads of one table. A later call for the same table replaces it.
    pub fn table(mut self, table: BatchGetTable) -> Self {
        self.tables.insert(table.table_name.clone(), table);
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

    pub(crate) fn build(self) -> Result<operation::batch_get_item::BatchGetItemInput> {
        let mut request_items = collections::HashMap::with_capacity(self.tables.len());
        for table in self.tables.into_values() {
            let (table_name, keys_and_attributes) = table.build()?;
            request_items.insert(table_name, keys_and_attributes);
        }
        let input = operation::batch_get_item::BatchGetItemInput::builder()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .build()?;
        Ok(input)
    }

    /// Execute the batch get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.batch_get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_get_item::BatchGetItemOutput,
        error::SdkError<operation::batch_get_item::BatchGetItemError>,
    > {
        let batch_get_item = self.build().map_err(error::BuildError::other)?;
        client
            .batch_get_item()
            .set_request_items(batch_get_item.request_items)
            .set_return_consumed_capacity(batch_get_item.return_consumed_capacity)
            .send()
            .await
    }
}
