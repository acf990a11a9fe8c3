//! Write operations for modifying data in DynamoDB tables.
//!
//! Put, update and delete share one set of options: conditions accumulated from
//! several `condition` calls, and the return value/capacity/metrics switches.

/// Batch write item operation for putting and deleting items across tables.
pub mod batch_write_item;

/// Options and macros shared by the single-item write builders.
pub(crate) mod common;

/// Delete item operation for removing items by primary key.
pub mod delete_item;

/// Put item operation for creating or replacing items.
pub mod put_item;

/// Update item operation built from SET, REMOVE, ADD and DELETE actions.
pub mod update_item;
