use crate::common::{expression::Expressions, key::KeyParts};
use crate::error::Result;
use crate::write;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
pub(crate) struct DeleteItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::write;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = write::delete_item::DeleteItem::new("users")
///     .key("pk", "USER#1")
///     .condition_with("#status = {0}", ["inactive"])?
///     .with_attribute("#status", "status")?
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItem {
    expressions: Expressions,
    keys: KeyParts,
    table_name: String,
    write_args: write::common::WriteArgs,
}

impl DeleteItem {
    /// Start a delete item request on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn build(self) -> Result<DeleteItemInput> {
        let keys = self.keys.resolve("DeleteItem")?;
        let write_operation = self.write_args.into_input(self.table_name, self.expressions);
        Ok(DeleteItemInput {
            keys,
            write_operation,
        })
    }

    /// Execute the delete item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.delete_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item = self.build().map_err(error::BuildError::other)?;
        let builder = client.delete_item().set_key(Some(delete_item.keys));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(DeleteItem);
crate::impl_key_methods!(DeleteItem);
crate::impl_attribute_value_methods!(DeleteItem);
crate::impl_write_methods!(DeleteItem);
