use crate::common::{
    condition::Conditions,
    expression::Expressions,
    key::KeyParts,
    value::Value,
};
use crate::error::Result;
use crate::write::update_item::UpdateActions;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// Generate the condition and return-on-failure methods of a transaction participant.
macro_rules! impl_participant_methods {
    ($builder:ty) => {
        crate::impl_condition_methods!($builder, condition);

        impl $builder {
            /// Which item attributes to return when the condition fails.
            pub fn return_values_on_condition_check_failure(
                mut self,
                return_values: types::ReturnValuesOnConditionCheckFailure,
            ) -> Self {
                self.return_values_on_condition_check_failure = Some(return_values);
                self
            }
        }
    };
}

/// A put taking part in a transaction.
///
/// ```rust
/// use dynamodb_fluent::transact::transact_write_items::TransactPut;
///
/// let put = TransactPut::new("orders")
///     .attribute("pk", "ORDER#1")
///     .unwrap()
///     .attribute("total", 42)
///     .unwrap()
///     .condition("attribute_not_exists(pk)")
///     .unwrap();
/// # let _ = put;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactPut {
    condition: Conditions,
    expressions: Expressions,
    item: collections::HashMap<String, types::AttributeValue>,
    return_values_on_condition_check_failure: Option<types::ReturnValuesOnConditionCheckFailure>,
    table_name: String,
}

impl TransactPut {
    /// Start a put on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Serialize `item` into the attributes to write.
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

    fn build(self) -> Result<types::Put> {
        let (expression_attribute_names, expression_attribute_values) =
            self.expressions.into_parts();
        let put = types::Put::builder()
            .set_item(Some(self.item))
            .table_name(self.table_name)
            .set_condition_expression(self.condition.combine())
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                self.return_values_on_condition_check_failure,
            )
            .build()?;
        Ok(put)
    }
}

crate::impl_attribute_name_methods!(TransactPut);
crate::impl_attribute_value_methods!(TransactPut);
impl_participant_methods!(TransactPut);

/// An update taking part in a transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactUpdate {
    actions: UpdateActions,
    condition: Conditions,
    expressions: Expressions,
    keys: KeyParts,
    return_values_on_condition_check_failure: Option<types::ReturnValuesOnConditionCheckFailure>,
    table_name: String,
}

impl TransactUpdate {
    /// Start an update on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    fn build(self) -> Result<types::Update> {
        let keys = self.keys.resolve("TransactUpdate")?;
        let update_expression = self.actions.combine()?;
        let (expression_attribute_names, expression_attribute_values) =
            self.expressions.into_parts();
        let update = types::Update::builder()
            .set_key(Some(keys))
            .update_expression(update_expression)
            .table_name(self.table_name)
            .set_condition_expression(self.condition.combine())
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                self.return_values_on_condition_check_failure,
            )
            .build()?;
        Ok(update)
    }
}

crate::impl_attribute_name_methods!(TransactUpdate);
crate::impl_attribute_value_methods!(TransactUpdate);
crate::impl_key_methods!(TransactUpdate);
crate::impl_update_methods!(TransactUpdate);
impl_participant_methods!(TransactUpdate);

/// A delete taking part in a transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactDelete {
    condition: Conditions,
    expressions: Expressions,
    keys: KeyParts,
    return_values_on_condition_check_failure: Option<types::ReturnValuesOnConditionCheckFailure>,
    table_name: String,
}

impl TransactDelete {
    /// Start a delete on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    fn build(self) -> Result<types::Delete> {
        let keys = self.keys.resolve("TransactDelete")?;
        let (expression_attribute_names, expression_attribute_values) =
            self.expressions.into_parts();
        let delete = types::Delete::builder()
            .set_key(Some(keys))
            .table_name(self.table_name)
            .set_condition_expression(self.condition.combine())
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                self.return_values_on_condition_check_failure,
            )
            .build()?;
        Ok(delete)
    }
}

crate::impl_attribute_name_methods!(TransactDelete);
crate::impl_attribute_value_methods!(TransactDelete);
crate::impl_key_methods!(TransactDelete);
impl_participant_methods!(TransactDelete);

/// A condition on an item that the transaction does not modify.
///
/// At least one condition is required.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionCheck {
    condition: Conditions,
    expressions: Expressions,
    keys: KeyParts,
    return_values_on_condition_check_failure: Option<types::ReturnValuesOnConditionCheckFailure>,
    table_name: String,
}

impl ConditionCheck {
    /// Start a condition check on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    fn build(self) -> Result<types::ConditionCheck> {
        let keys = self.keys.resolve("ConditionCheck")?;
        let condition_expression = self.condition.require("ConditionCheck")?;
        let (expression_attribute_names, expression_attribute_values) =
            self.expressions.into_parts();
        let condition_check = types::ConditionCheck::builder()
            .set_key(Some(keys))
            .table_name(self.table_name)
            .condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                self.return_values_on_condition_check_failure,
            )
            .build()?;
        Ok(condition_check)
    }
}

crate::impl_attribute_name_methods!(ConditionCheck);
crate::impl_attribute_value_methods!(ConditionCheck);
crate::impl_key_methods!(ConditionCheck);
impl_participant_methods!(ConditionCheck);

#[derive(Clone, Debug, PartialEq)]
enum TransactWriteRequest {
    ConditionCheck(ConditionCheck),
    Delete(TransactDelete),
    Put(TransactPut),
    Update(TransactUpdate),
}

impl TryFrom<TransactWriteRequest> for types::TransactWriteItem {
    type Error = crate::error::Error;

    fn try_from(request: TransactWriteRequest) -> Result<Self> {
        let builder = Self::builder();
        let builder = match request {
            TransactWriteRequest::ConditionCheck(condition_check) => {
                builder.condition_check(condition_check.build()?)
            }
            TransactWriteRequest::Delete(delete) => builder.delete(delete.build()?),
            TransactWriteRequest::Put(put) => builder.put(put.build()?),
            TransactWriteRequest::Update(update) => builder.update(update.build()?),
        };
        Ok(builder.build())
    }
}

/// Transact write items operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::transact::transact_write_items::{
///     ConditionCheck, TransactPut, TransactUpdate, TransactWriteItems,
/// };
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = TransactWriteItems::new()
///     .condition_check(
///         ConditionCheck::new("users")
///             .key("pk", "USER#1")
///             .condition_with("#status = {0}", ["active"])?
///             .with_attribute("#status", "status")?,
///     )
///     .put(TransactPut::new("orders").attribute("pk", "ORDER#1")?)
///     .update(
///         TransactUpdate::new("users")
///             .key("pk", "USER#1")
///             .add_with("#orders {0}", [1])?
///             .with_attribute("#orders", "orders")?,
///     )
///     .client_request_token("order-1")
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactWriteItems {
    client_request_token: Option<String>,
    requests: Vec<TransactWriteRequest>,
    return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
}

impl TransactWriteItems {
    /// Start an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition check.
    pub fn condition_check(mut self, condition_check: ConditionCheck) -> Self {
        self.requests
            .push(TransactWriteRequest::ConditionCheck(condition_check));
        self
    }

    /// Add a delete.
    pub fn delete(mut self, delete: TransactDelete) -> Self {
        self.requests.push(TransactWriteRequest::Delete(delete));
        self
    }

    /// Add a put.
    pub fn put(mut self, put: TransactPut) -> Self {
        self.requests.push(TransactWriteRequest::Put(put));
        self
    }

    /// Add an update.
    pub fn update(mut self, update: TransactUpdate) -> Self {
        self.requests.push(TransactWriteRequest::Update(update));
        self
    }

    /// Idempotency token; retries with the same token within ten minutes are not re-applied.
    pub fn client_request_token(mut self, client_request_token: impl Into<String>) -> Self {
        self.client_request_token = Some(client_request_token.into());
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

    /// Whether to return item collection metrics.
    pub fn return_item_collection_metrics(
        mut self,
        return_item_collection_metrics: types::ReturnItemCollectionMetrics,
    ) -> Self {
        self.return_item_collection_metrics = Some(return_item_collection_metrics);
        self
    }

    pub(crate) fn build(self) -> Result<operation::transact_write_items::TransactWriteItemsInput> {
        let transact_items = self
            .requests
            .into_iter()
            .map(types::TransactWriteItem::try_from)
            .collect::<Result<Vec<_>>>()?;
        let input = operation::transact_write_items::TransactWriteItemsInput::builder()
            .set_transact_items(Some(transact_items))
            .set_client_request_token(self.client_request_token)
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .set_return_item_collection_metrics(self.return_item_collection_metrics)
            .build()?;
        Ok(input)
    }

    /// Execute the transact write items operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.transact_write_items", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::transact_write_items::TransactWriteItemsOutput,
        error::SdkError<operation::transact_write_items::TransactWriteItemsError>,
    > {
        let transact_write_items = self.build().map_err(error::BuildError::other)?;
        client
            .transact_write_items()
            .set_transact_items(transact_write_items.transact_items)
            .set_client_request_token(transact_write_items.client_request_token)
            .set_return_consumed_capacity(transact_write_items.return_consumed_capacity)
            .set_return_item_collection_metrics(
                transact_write_items.return_item_collection_metrics,
            )
            .send()
            .await
    }
}
