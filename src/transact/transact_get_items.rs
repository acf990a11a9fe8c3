use crate::common::{expression::Expressions, key::KeyParts};
use crate::error::Result;
use crate::read;

use aws_sdk_dynamodb::{Client, error, operation, types};

/// One item read as part of a transaction.
///
/// ```rust
/// use dynamodb_fluent::transact::transact_get_items::TransactGet;
///
/// let get = TransactGet::new("users")
///     .key("pk", "USER#1")
///     .projection("#name")
///     .with_attribute("#name", "name")
///     .unwrap();
/// # let _ = get;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactGet {
    expressions: Expressions,
    keys: KeyParts,
    projection: Vec<String>,
    table_name: String,
}

impl TransactGet {
    /// Start a read from `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Add attributes to the projection expression.
    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection.push(projection.into());
        self
    }

    fn build(self) -> Result<types::TransactGetItem> {
        let keys = self.keys.resolve("TransactGet")?;
        let (expression_attribute_names, _) = self.expressions.into_parts();
        let get = types::Get::builder()
            .set_key(Some(keys))
            .table_name(self.table_name)
            .set_projection_expression(read::common::join_projection(self.projection))
            .set_expression_attribute_names(expression_attribute_names)
            .build()?;
        Ok(types::TransactGetItem::builder().get(get).build())
    }
}

crate::impl_attribute_name_methods!(TransactGet);
crate::impl_key_methods!(TransactGet);

/// Transact get items operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::transact::transact_get_items::{TransactGet, TransactGetItems};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = TransactGetItems::new()
///     .get(TransactGet::new("users").key("pk", "USER#1"))
///     .get(TransactGet::new("orders").key("pk", "ORDER#1"))
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactGetItems {
    gets: Vec<TransactGet>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
}

impl TransactGetItems {
    /// Start an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to read. Responses keep the order of the calls.
    pub fn get(mut self, get: TransactGet) -> Self {
        self.gets.push(get);
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

    pub(crate) fn build(self) -> Result<operation::transact_get_items::TransactGetItemsInput> {
        let transact_items = self
            .gets
            .into_iter()
            .map(TransactGet::build)
            .collect::<Result<Vec<_>>>()?;
        let input = operation::transact_get_items::TransactGetItemsInput::builder()
            .set_transact_items(Some(transact_items))
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .build()?;
        Ok(input)
    }

    /// Execute the transact get items operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.transact_get_items", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::transact_get_items::TransactGetItemsOutput,
        error::SdkError<operation::transact_get_items::TransactGetItemsError>,
    > {
        let transact_get_items = self.build().map_err(error::BuildError::other)?;
        client
            .transact_get_items()
            .set_transact_items(transact_get_items.transact_items)
            .set_return_consumed_capacity(transact_get_items.return_consumed_capacity)
            .send()
            .await
    }
}
