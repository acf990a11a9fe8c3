use crate::common::{expression::Expressions, value::Value};
use crate::error::Result;
use crate::write;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
pub(crate) struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = write::put_item::PutItem::new("users")
///     .item(&json!({"pk": "USER#1", "name": "John"}))?
///     .condition("attribute_not_exists(pk)")?
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItem {
    expressions: Expressions,
    item: collections::HashMap<String, types::AttributeValue>,
    table_name: String,
    write_args: write::common::WriteArgs,
}

impl PutItem {
    /// Start a put item request on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Serialize `item` into the attributes to write.
    ///
    /// Attributes set earlier with the same name are replaced.
    pub fn item<T: Serialize>(mut self, item: &T) -> Result<Self> {
        let item: collections::HashMap<String, types::AttributeValue> = to_item(item)?;
        self.item.extend(item);
        Ok(self)
    }

    /// Set a single attribute of the item.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.item.insert(name.into(), value.into().try_into()?);
        Ok(self)
    }

    pub(crate) fn build(self) -> Result<PutItemInput> {
        let write_operation = self.write_args.into_input(self.table_name, self.expressions);
        Ok(PutItemInput {
            item: self.item,
            write_operation,
        })
    }

    /// Execute the put item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.put_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item = self.build().map_err(error::BuildError::other)?;
        let builder = client.put_item().set_item(Some(put_item.item));
        crate::apply_write_operation!(builder, put_item.write_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(PutItem);
crate::impl_attribute_value_methods!(PutItem);
crate::impl_write_methods!(PutItem);
