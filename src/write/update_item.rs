use crate::common::{expression::Expressions, key::KeyParts};
use crate::error::{Error, Result};
use crate::write;

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// Separator between the actions of one update clause.
const ACTION_SEPARATOR: &str = ", ";

/// The four clauses of an update expression, in the order they are rendered.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Clause {
    Set,
    Remove,
    Add,
    Delete,
}

impl Clause {
    fn keyword(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Remove => "REMOVE",
            Self::Add => "ADD",
            Self::Delete => "DELETE",
        }
    }
}

/// Update actions collected per clause.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct UpdateActions {
    set: Vec<String>,
    remove: Vec<String>,
    add: Vec<String>,
    delete: Vec<String>,
}

impl UpdateActions {
    pub(crate) fn push(&mut self, clause: Clause, action: String) {
        self.actions_mut(clause).push(action);
    }

    fn actions_mut(&mut self, clause: Clause) -> &mut Vec<String> {
        match clause {
            Clause::Set => &mut self.set,
            Clause::Remove => &mut self.remove,
            Clause::Add => &mut self.add,
            Clause::Delete => &mut self.delete,
        }
    }

    /// `SET a, b REMOVE c ADD d DELETE e`, skipping empty clauses.
    pub(crate) fn combine(self) -> Result<String> {
        let clauses = [
            (Clause::Set, self.set),
            (Clause::Remove, self.remove),
            (Clause::Add, self.add),
            (Clause::Delete, self.delete),
        ];
        let rendered: Vec<String> = clauses
            .into_iter()
            .filter(|(_, actions)| !actions.is_empty())
            .map(|(clause, actions)| {
                format!("{} {}", clause.keyword(), actions.join(ACTION_SEPARATOR))
            })
            .collect();
        if rendered.is_empty() {
            return Err(Error::MissingUpdate);
        }
        Ok(rendered.join(" "))
    }
}

/// Generate the SET, REMOVE, ADD and DELETE methods for a builder with
/// `expressions` and `actions: UpdateActions`.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_update_methods {
    ($builder:ty) => {
        impl $builder {
            fn push_action(
                mut self,
                clause: $crate::write::update_item::Clause,
                template: &str,
                args: Option<&[$crate::common::value::Value]>,
            ) -> $crate::error::Result<Self> {
                let action = self.expressions.resolve(template, args)?;
                self.actions.push(clause, action);
                Ok(self)
            }

            /// Add a `SET` action taken verbatim, e.g. `#a = :a`.
            pub fn set(self, action: &str) -> $crate::error::Result<Self> {
                self.push_action($crate::write::update_item::Clause::Set, action, None)
            }

            /// Add a `SET` action whose `{N}` markers are bound to `args`.
            pub fn set_with<I>(self, template: &str, args: I) -> $crate::error::Result<Self>
            where
                I: IntoIterator,
                I::Item: Into<$crate::common::value::Value>,
            {
                let args = $crate::common::expression::collect_args(args);
                self.push_action(
                    $crate::write::update_item::Clause::Set,
                    template,
                    Some(&args),
                )
            }

            /// Add a `REMOVE` action for one or more attribute paths.
            pub fn remove(self, paths: &str) -> $crate::error::Result<Self> {
                self.push_action($crate::write::update_item::Clause::Remove, paths, None)
            }

            /// Add an `ADD` action taken verbatim, e.g. `#count :one`.
            pub fn add(self, action: &str) -> $crate::error::Result<Self> {
                self.push_action($crate::write::update_item::Clause::Add, action, None)
            }

            /// Add an `ADD` action whose `{N}` markers are bound to `args`.
            pub fn add_with<I>(self, template: &str, args: I) -> $crate::error::Result<Self>
            where
                I: IntoIterator,
                I::Item: Into<$crate::common::value::Value>,
            {
                let args = $crate::common::expression::collect_args(args);
                self.push_action(
                    $crate::write::update_item::Clause::Add,
                    template,
                    Some(&args),
                )
            }

            /// Add a `DELETE` action taken verbatim, removing elements from a set.
            pub fn delete(self, action: &str) -> $crate::error::Result<Self> {
                self.push_action($crate::write::update_item::Clause::Delete, action, None)
            }

            /// Add a `DELETE` action whose `{N}` markers are bound to `args`.
            pub fn delete_with<I>(self, template: &str, args: I) -> $crate::error::Result<Self>
            where
                I: IntoIterator,
                I::Item: Into<$crate::common::value::Value>,
            {
                let args = $crate::common::expression::collect_args(args);
                self.push_action(
                    $crate::write::update_item::Clause::Delete,
                    template,
                    Some(&args),
                )
            }
        }
    };
}

/// update item operation
#[derive(Debug, PartialEq)]
pub(crate) struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// Actions are grouped per clause and rendered as
/// `SET a, b REMOVE c ADD d DELETE e`.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::{values, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = write::update_item::UpdateItem::new("users")
///     .key("pk", "USER#1")
///     .set_with("#name = {0}, #visits = #visits + {1}", values!["John", 1])?
///     .remove("#legacy")?
///     .with_attributes([("#name", "name"), ("#visits", "visits"), ("#legacy", "legacy")])?
///     .condition("attribute_exists(pk)")?
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem {
    actions: UpdateActions,
    expressions: Expressions,
    keys: KeyParts,
    table_name: String,
    write_args: write::common::WriteArgs,
}

impl UpdateItem {
    /// Start an update item request on `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn build(self) -> Result<UpdateItemInput> {
        let keys = self.keys.resolve("UpdateItem")?;
        let update_expression = self.actions.combine()?;
        let write_operation = self.write_args.into_input(self.table_name, self.expressions);
        Ok(UpdateItemInput {
            keys,
            update_expression,
            write_operation,
        })
    }

    /// Execute the update item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.update_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item = self.build().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(UpdateItem);
crate::impl_key_methods!(UpdateItem);
crate::impl_update_methods!(UpdateItem);
crate::impl_attribute_value_methods!(UpdateItem);
crate::impl_write_methods!(UpdateItem);
