// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Constant folding of index expressions.

use crate::ast::*;
use crate::constant::Constant;
use crate::error::PathError;

/// Folds `expr` into a single constant.
///
/// Only literals, the identifiers `true` and `false`, parentheses and unary
/// or binary operators are accepted.
pub fn evaluate(expr: &Expr) -> Result<Constant, PathError> {
    match expr {
        Expr::Literal { span, kind } => Constant::from_literal(*kind, span.text()),
        Expr::Ident { span } => match span.text() {
            "true" => Ok(Constant::Bool(true)),
            "false" => Ok(Constant::Bool(false)),
            name => Err(PathError::UnknownIdentifier(name.to_string())),
        },
        Expr::Paren { inner, .. } => evaluate(inner),
        Expr::Unary { op, operand, .. } => Constant::unary(*op, evaluate(operand)?),
        Expr::Binary { op, lhs, rhs, .. } => {
            let lhs = evaluate(lhs)?;
            let rhs = evaluate(rhs)?;
            Constant::binary(*op, lhs, rhs)
        }
        Expr::Selector { .. } | Expr::Index { .. } | Expr::Call { .. } => {
            Err(PathError::UnsupportedExpression(format!(
                "{} `{}` is not a constant",
                expr.kind_name(),
                expr.span().text()
            )))
        }
    }
}
