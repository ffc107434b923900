// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};
use navpath::PathError;

/// Installs a test subscriber once. Set `RUST_LOG=navpath=trace` to see
/// navigation steps.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn error_kind(err: &PathError) -> &'static str {
    match err {
        PathError::Parse(_) => "Parse",
        PathError::UnsupportedExpression(_) => "UnsupportedExpression",
        PathError::UnknownIdentifier(_) => "UnknownIdentifier",
        PathError::FieldNotFound { .. } => "FieldNotFound",
        PathError::TypeMismatch(_) => "TypeMismatch",
        PathError::IndexOutOfRange { .. } => "IndexOutOfRange",
        PathError::ConstantConversion { .. } => "ConstantConversion",
        PathError::Arithmetic(_) => "Arithmetic",
    }
}

/// Checks an error against the expected message fragment and kind.
pub fn check_error(err: &PathError, message: &str, kind: Option<&str>) -> Result<()> {
    let actual = err.to_string();
    if !actual.contains(message) {
        bail!("Error message\n`{actual}`\ndoes not contain `{message}`");
    }
    if let Some(kind) = kind {
        if error_kind(err) != kind {
            bail!("expected {kind} error, got {} ({actual})", error_kind(err));
        }
    }
    Ok(())
}
