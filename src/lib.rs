// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod ast;
mod constant;
mod error;
pub mod eval;
mod impls;
mod lexer;
mod navigable;
mod navigator;
mod number;
mod parser;
mod value;

#[cfg(feature = "arc")]
use std::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
use std::rc::Rc;

pub use constant::{Constant, MAX_SHIFT};
pub use error::PathError;
pub use navigable::{
    FloatKind, IntKind, KeyKind, KeyType, Kind, Map, MapKey, Navigable, Record, Sequence,
};
pub use navigator::{parse, resolve, resolve_as, Resolved, Step, ZeroValue, ROOT};
pub use number::Number;
pub use value::Value;

/// Items in `unstable` are likely to change.
pub mod unstable {
    pub use crate::ast::*;
    pub use crate::lexer::*;
    pub use crate::parser::*;
}

#[cfg(test)]
mod tests;
