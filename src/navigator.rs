// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::constant::Constant;
use crate::error::PathError;
use crate::eval;
use crate::lexer::Source;
use crate::navigable::{Kind, MapKey, Navigable};
use crate::parser::Parser;

use core::any::Any;
use core::fmt;

use tracing::trace;

/// Name of the synthetic identifier that stands for the root value.
pub const ROOT: &str = "v";

/// One move made while walking a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Deref,
    Field(String),
    Element(usize),
    Entry(MapKey),
}

/// Zero value produced for an absent map key, along with the steps taken
/// through it afterwards.
pub struct ZeroValue {
    root: Box<dyn Navigable>,
    steps: Vec<Step>,
}

impl ZeroValue {
    fn new(root: Box<dyn Navigable>) -> Self {
        Self {
            root,
            steps: vec![],
        }
    }

    /// The value reached after replaying the recorded steps.
    pub fn get(&self) -> &dyn Navigable {
        let mut value: &dyn Navigable = &*self.root;
        for step in &self.steps {
            let next = match (step, value.kind()) {
                (Step::Deref, Kind::Indirection(inner)) => inner,
                (Step::Field(name), Kind::Record(r)) => r.field(name),
                (Step::Element(i), Kind::Sequence(s)) => s.element(*i),
                (Step::Entry(key), Kind::Map(m)) => m.get(key),
                _ => None,
            };
            match next {
                Some(next) => value = next,
                None => break,
            }
        }
        value
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Debug for ZeroValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroValue")
            .field("value", &self.get())
            .field("steps", &self.steps)
            .finish()
    }
}

/// The value a path resolved to.
pub enum Resolved<'a> {
    /// A borrow of the value exactly as stored in the root.
    Stored(&'a dyn Navigable),
    /// An owned zero value standing in for an absent map entry.
    Zero(ZeroValue),
}

impl<'a> Resolved<'a> {
    pub fn value(&self) -> &dyn Navigable {
        match self {
            Self::Stored(v) => *v,
            Self::Zero(z) => z.get(),
        }
    }

    pub fn kind(&self) -> Kind<'_> {
        self.value().kind()
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Zero(_))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value().as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored(v) => f.debug_tuple("Stored").field(v).finish(),
            Self::Zero(z) => f.debug_tuple("Zero").field(z).finish(),
        }
    }
}

// Navigation operation applied to the current value.
enum Op<'e> {
    Select(&'e str),
    Index(Constant),
}

enum Outcome<'b> {
    Found(&'b dyn Navigable, Vec<Step>),
    Absent(Box<dyn Navigable>),
}

enum Cursor<'a> {
    Stored(&'a dyn Navigable),
    Zero(ZeroValue),
}

fn deref<'b>(
    mut value: &'b dyn Navigable,
    steps: &mut Vec<Step>,
) -> Result<&'b dyn Navigable, PathError> {
    loop {
        match value.kind() {
            Kind::Indirection(Some(inner)) => {
                steps.push(Step::Deref);
                value = inner;
            }
            Kind::Indirection(None) => {
                return Err(PathError::mismatch(format!(
                    "nil dereference of {}",
                    value.type_name()
                )))
            }
            _ => return Ok(value),
        }
    }
}

fn apply_op<'b>(value: &'b dyn Navigable, op: &Op<'_>) -> Result<Outcome<'b>, PathError> {
    let mut steps = vec![];
    let value = deref(value, &mut steps)?;

    match (op, value.kind()) {
        (Op::Select(name), Kind::Record(record)) => match record.field(name) {
            Some(field) => {
                steps.push(Step::Field(name.to_string()));
                Ok(Outcome::Found(field, steps))
            }
            None => Err(PathError::FieldNotFound {
                field: name.to_string(),
                type_name: value.type_name().to_string(),
            }),
        },
        (Op::Select(name), kind) => Err(PathError::mismatch(format!(
            "cannot select field `{name}` of {} {}",
            kind.name(),
            value.type_name()
        ))),

        (Op::Index(key), Kind::Sequence(seq)) => {
            let index = key.to_index()?;
            let len = seq.len();
            let element = usize::try_from(index)
                .ok()
                .and_then(|i| seq.element(i).map(|e| (i, e)));
            match element {
                Some((i, e)) => {
                    steps.push(Step::Element(i));
                    Ok(Outcome::Found(e, steps))
                }
                None => Err(PathError::IndexOutOfRange { index, len }),
            }
        }
        (Op::Index(key), Kind::Map(map)) => {
            let key = key.to_map_key(map.key_kind())?;
            match map.get(&key) {
                Some(entry) => {
                    steps.push(Step::Entry(key));
                    Ok(Outcome::Found(entry, steps))
                }
                None => {
                    trace!(%key, map = value.type_name(), "absent key, substituting zero value");
                    Ok(Outcome::Absent(map.zero_value()))
                }
            }
        }
        (Op::Index(_), kind) => Err(PathError::mismatch(format!(
            "{} {} is not indexable",
            kind.name(),
            value.type_name()
        ))),
    }
}

fn advance<'a>(cursor: Cursor<'a>, op: Op<'_>) -> Result<Cursor<'a>, PathError> {
    match cursor {
        Cursor::Stored(value) => Ok(match apply_op(value, &op)? {
            Outcome::Found(next, _) => {
                trace!(kind = next.kind().name(), value = next.type_name(), "step");
                Cursor::Stored(next)
            }
            Outcome::Absent(zero) => Cursor::Zero(ZeroValue::new(zero)),
        }),
        Cursor::Zero(mut zero) => {
            let outcome = match apply_op(zero.get(), &op)? {
                Outcome::Found(_, steps) => Ok(steps),
                Outcome::Absent(inner) => Err(inner),
            };
            match outcome {
                Ok(steps) => {
                    zero.steps.extend(steps);
                    trace!(steps = zero.steps.len(), "step through zero value");
                    Ok(Cursor::Zero(zero))
                }
                Err(inner) => Ok(Cursor::Zero(ZeroValue::new(inner))),
            }
        }
    }
}

fn walk<'a>(root: &'a dyn Navigable, expr: &Expr) -> Result<Cursor<'a>, PathError> {
    match expr {
        Expr::Ident { span } if span.text() == ROOT => Ok(Cursor::Stored(root)),
        Expr::Ident { span } => Err(PathError::UnknownIdentifier(span.text().to_string())),
        Expr::Selector { target, field, .. } => {
            let cursor = walk(root, target)?;
            advance(cursor, Op::Select(field.text()))
        }
        Expr::Index { target, key, .. } => {
            let cursor = walk(root, target)?;
            let key = eval::evaluate(key)?;
            trace!(%key, "index");
            advance(cursor, Op::Index(key))
        }
        _ => Err(PathError::UnsupportedExpression(format!(
            "{} `{}` can not be navigated",
            expr.kind_name(),
            expr.span().text()
        ))),
    }
}

/// Prefixes the synthetic root so that `A.B` and `[0]` parse as selector
/// and index expressions on it.
fn normalize(path: &str) -> String {
    if path.starts_with('[') {
        format!("{ROOT}{path}")
    } else {
        format!("{ROOT}.{path}")
    }
}

/// Parses a path into its expression tree.
pub fn parse(path: &str) -> Result<ExprRef, PathError> {
    let source = Source::from_contents("<path>".to_string(), normalize(path))?;
    let mut parser = Parser::new(&source)?;
    Ok(parser.parse_path()?)
}

/// Resolves `path` against `root`.
///
/// A path is a chain of `.Field` selectors and `[key]` indexes such as
/// `Servers[0].Ports["http"]`. Index keys are constant expressions.
/// Indirections are followed at every step, but the final value is returned
/// exactly as stored.
#[tracing::instrument(level = "debug", skip(root), fields(root = root.type_name()))]
pub fn resolve<'a>(root: &'a dyn Navigable, path: &str) -> Result<Resolved<'a>, PathError> {
    let expr = parse(path)?;
    Ok(match walk(root, &expr)? {
        Cursor::Stored(value) => Resolved::Stored(value),
        Cursor::Zero(zero) => Resolved::Zero(zero),
    })
}

/// Resolves `path` and clones the result as a `T`.
pub fn resolve_as<T: Any + Clone>(root: &dyn Navigable, path: &str) -> Result<T, PathError> {
    let resolved = resolve(root, path)?;
    match resolved.downcast_ref::<T>() {
        Some(value) => Ok(value.clone()),
        None => Err(PathError::mismatch(format!(
            "{} is not a {}",
            resolved.value().type_name(),
            core::any::type_name::<T>()
        ))),
    }
}
