use crate::common::key::Keys;
use crate::error::Result;

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
enum BatchWriteRequest {
    Put(collections::HashMap<String, types::AttributeValue>),
    Delete(Keys),
}

impl TryFrom<BatchWriteRequest> for types::WriteRequest {
    type Error = crate::error::Error;

    fn try_from(request: BatchWriteRequest) -> Result<Self> {
        let builder = match request {
            BatchWriteRequest::Put(item) => {
                let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
                Self::builder().put_request(put_request)
            }
            BatchWriteRequest::Delete(keys) => {
                let delete_request = types::DeleteRequest::builder()
                    .set_key(Some(keys.try_into()?))
                    .build()?;
                Self::builder().delete_request(delete_request)
            }
        };
        Ok(builder.build())
    }
}

/// Batch write item operation.
///
/// Requests are grouped per table in the order the tables were first used.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::{common::key::Keys, write};
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = write::batch_write_item::BatchWriteItem::new()
///     .put("users", &json!({"pk": "USER#1", "name": "John"}))?
///     .delete("users", Keys::new("pk", "USER#2"))
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem {
    request_items: IndexMap<String, Vec<BatchWriteRequest>>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
}

impl BatchWriteItem {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, table_name: impl Into<String>, request: BatchWriteRequest) -> Self {
        self.request_items
            .entry(table_name.into())
            .or_default()
            .push(request);
        self
    }

    /// Put `item`, serialized through `serde_dynamo`, into `table_name`.
    pub fn put<T: Serialize>(self, table_name: impl Into<String>, item: &T) -> Result<Self> {
        let item = to_item(item)?;
        Ok(self.push(table_name, BatchWriteRequest::Put(item)))
    }

    /// Put an already encoded item into `table_name`.
    pub fn put_item(
        self,
        table_name: impl Into<String>,
        item: collections::HashMap<String, types::AttributeValue>,
    ) -> Self {
        self.push(table_name, BatchWriteRequest::Put(item))
    }

    /// Delete the item with primary key `keys` from `table_name`.
    pub fn delete(self, table_name: impl Into<String>, keys: Keys) -> Self {
        self.push(table_name, BatchWriteRequest::Delete(keys))
    }

    /// Whether to return consumed capacity.
    pub fn return_consumed_capacity(
        mut self,
        return_consumed_capacity: types::ReturnConsumedCapacity,
    ) -> Self {
        self.return_consumed_capacity = Some(return_consumed_capacity);
        self
    }

    /// Whether to return item collection metrics.
    pub fn return_item_collection_metrics(
        mut self,
        return_item_collection_metrics: types::ReturnItemCollectionMetrics,
    ) -> Self {
        self.return_item_collection_metrics = Some(return_item_collection_metrics);
        self
    }

    pub(crate) fn build(self) -> Result<operation::batch_write_item::BatchWriteItemInput> {
        let mut request_items = collections::HashMap::with_capacity(self.request_items.len());
        for (table_name, requests) in self.request_items {
            let requests = requests
                .into_iter()
                .map(types::WriteRequest::try_from)
                .collect::<Result<Vec<_>>>()?;
            request_items.insert(table_name, requests);
        }
        let input = operation::batch_write_item::BatchWriteItemInput::builder()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .set_return_item_collection_metrics(self.return_item_collection_metrics)
            .build()?;
        Ok(input)
    }

    /// Execute the batch write item operation.
    ///
    /// Unprocessed items are returned in the output and are not retried.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.batch_write_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_write_item::BatchWriteItemOutput,
        error::SdkError<operation::batch_write_item::BatchWriteItemError>,
    > {
        let batch_write_item = self.build().map_err(error::BuildError::other)?;
        client
            .batch_write_item()
            .set_request_items(batch_write_item.request_items)
            .set_return_consumed_capacity(batch_write_item.return_consumed_capacity)
            .set_return_item_collection_metrics(batch_write_item.return_item_collection_metrics)
            .send()
            .await
    }
}
