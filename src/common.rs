//! Expression building shared by every request builder.
//!
//! This module holds the pieces that turn builder calls into the attribute name
//! map, the attribute value map and the expression strings of a DynamoDB request:
//! the two placeholder registries, the value codec, the positional expression
//! formatter and the condition accumulator.

/// Condition accumulation across several builder calls.
pub mod condition;

/// Per-builder expression state routing templates through the formatter.
pub mod expression;

/// Positional `{N}` template formatting.
pub mod format;

/// Primary key description.
pub mod key;

/// Expression attribute name registry.
pub mod names;

/// Typed values and their wire encoding.
pub mod value;

/// Expression attribute value registry.
pub mod values;
