// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Error returned by path resolution and constant evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path text could not be tokenized or parsed.
    #[error("invalid path: {0}")]
    Parse(String),

    /// The expression kind is outside the navigable subset (calls, bare arithmetic, ...).
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("field `{field}` not found in {type_name}")]
    FieldNotFound { field: String, type_name: String },

    /// Operand or value of the wrong kind for the requested operation.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// A constant is not representable in the index or key type it must be narrowed to.
    #[error("cannot convert {value} to {target}")]
    ConstantConversion { value: String, target: String },

    /// A numeric fault caught while folding constants.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}

impl PathError {
    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub(crate) fn conversion(value: impl ToString, target: impl ToString) -> Self {
        Self::ConstantConversion {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }
}

impl From<anyhow::Error> for PathError {
    fn from(err: anyhow::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
