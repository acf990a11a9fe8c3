//! Error types for request building.
//!
//! Every variant describes a misuse of a builder by its caller. None of them is
//! transient and none is retried.

use aws_sdk_dynamodb::error::BuildError;
use std::fmt;
use thiserror::Error;

/// Which registry rejected a duplicate placeholder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryKind {
    /// Expression attribute names (`#placeholder`).
    Names,
    /// Expression attribute values (`:placeholder`).
    Values,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names => f.write_str("expression attribute names"),
            Self::Values => f.write_str("expression attribute values"),
        }
    }
}

/// Errors that can occur while assembling a request.
#[derive(Debug, Error)]
pub enum Error {
    /// A placeholder was registered twice in the same registry.
    #[error("duplicate key `{key}` in {kind}")]
    DuplicateKey {
        /// The registry holding the placeholder.
        kind: RegistryKind,
        /// The placeholder that was already present.
        key: String,
    },

    /// An expression template was empty or whitespace only.
    #[error("expression template must not be empty")]
    EmptyTemplate,

    /// The argument sequence for a template was absent.
    #[error("format arguments must be provided")]
    NullArguments,

    /// A template marker referenced an argument that was not supplied.
    #[error(
        "format marker references argument index {index}, but only {count} argument(s) were supplied"
    )]
    IndexOutOfRange {
        /// The index named by the marker.
        index: usize,
        /// The number of arguments actually supplied.
        count: usize,
    },

    /// A template marker could not be parsed.
    #[error("invalid expression template at byte {position}: {reason}")]
    InvalidTemplate {
        /// Byte offset of the offending character.
        position: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A format spec is not understood for the value it was applied to.
    #[error("format spec `{spec}` is not supported for {kind} values")]
    UnsupportedFormat {
        /// The format spec as written in the template.
        spec: String,
        /// The kind of value it was applied to.
        kind: &'static str,
    },

    /// An operation that needs a condition was finalized without one.
    #[error("{operation} requires at least one condition")]
    MissingCondition {
        /// The operation being built.
        operation: &'static str,
    },

    /// An operation that needs a primary key was finalized without one.
    #[error("{operation} requires a partition key")]
    MissingKey {
        /// The operation being built.
        operation: &'static str,
    },

    /// An update was finalized without any SET, REMOVE, ADD or DELETE action.
    #[error("update requires at least one action")]
    MissingUpdate,

    /// A floating point value is NaN or infinite, which DynamoDB numbers cannot hold.
    #[error("number `{value}` is not finite and cannot be written as a DynamoDB number")]
    NonFiniteNumber {
        /// The rejected value.
        value: f64,
    },

    /// A value could not be serialized into attribute values.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    /// The SDK rejected an assembled request object.
    #[error("request build error: {0}")]
    Build(#[from] BuildError),
}

/// Result alias for request building.
pub type Result<T, E = Error> = std::result::Result<T, E>;
