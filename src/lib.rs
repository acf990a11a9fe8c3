#![deny(missing_docs)]

//! # DynamoDB Fluent
//!
//! Fluent request builders for Amazon DynamoDB with positional expression formatting.
//!
//! ## Overview
//!
//! Every builder owns an attribute name registry, an attribute value registry and
//! one accumulator per expression slot. Expression templates carry positional
//! markers (`{0}`, `{1:F2}`, ...) that are replaced by generated `:pN` value
//! placeholders, bound to typed values and checked for collisions:
//! - placeholders can only be registered once per builder
//! - repeated markers share one placeholder
//! - several `condition`/`filter` calls are parenthesized and joined with `AND`
//! - absent optional values can turn a `with_value` call into a no-op
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_fluent::{read, values};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::from_conf(aws_sdk_dynamodb::config::Config::builder().build());
//! let output = read::query::Query::new("orders")
//!     .key_condition_with(
//!         "#pk = {0} AND #sk > {1:yyyy-MM-dd}",
//!         values!["USER#123", chrono::Utc::now()],
//!     )?
//!     .filter_with("#total >= {0:F2}", values![rust_decimal::Decimal::new(9999, 2)])?
//!     .filter("attribute_exists(#shipped)")?
//!     .with_attributes([
//!         ("#pk", "pk"),
//!         ("#sk", "sk"),
//!         ("#total", "total"),
//!         ("#shipped", "shipped"),
//!     ])?
//!     .send(&client)
//!     .await?;
//! // KeyConditionExpression: "#pk = :p0 AND #sk > :p1"
//! // FilterExpression:       "(#total >= :p2) AND (attribute_exists(#shipped))"
//! # let _ = output;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Registries, value codec, expression formatter and condition accumulator
//! - [`mod@read`] - Read operations (GetItem, Query, Scan, BatchGetItem)
//! - [`mod@write`] - Write operations (PutItem, UpdateItem, DeleteItem, BatchWriteItem)
//! - [`mod@transact`] - Transactions (TransactWriteItems, TransactGetItems)

/// Expression building shared by every request builder.
pub mod common;

/// Errors raised while building requests.
pub mod error;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions
/// - Scanning entire tables
/// - Batch retrieving multiple items
pub mod read;

/// Transactional operations spanning several items.
pub mod transact;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Updating items with SET, REMOVE, ADD and DELETE actions
/// - Deleting items by key
/// - Batch writing multiple items
pub mod write;

pub use error::{Error, Result};
