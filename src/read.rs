//! Read operations for retrieving data from DynamoDB tables.
//!
//! Query and scan share their filter, projection and paging options; every
//! `send` returns a single page.

/// Batch get item operation reading keys from several tables.
pub mod batch_get_item;

/// Options and macros shared by the read builders.
pub(crate) mod common;

/// Get item operation reading one item by primary key.
pub mod get_item;

/// Query operation reading items that match a key condition.
pub mod query;

/// Scan operation reading every item of a table or index.
pub mod scan;
