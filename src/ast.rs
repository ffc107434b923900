// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::lexer::*;
use crate::Rc;

use core::{cmp, fmt, ops::Deref};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    Complement,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // bitwise
    And,
    Or,
    Xor,
    AndNot,
    Shl,
    Shr,

    // logical
    LogicalAnd,
    LogicalOr,

    // comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Complement => "^",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::AndNot => "&^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
}

pub struct NodeRef<T> {
    r: Rc<T>,
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self { r: self.r.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.r.as_ref().fmt(f)
    }
}

impl<T> cmp::PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.r).eq(&Rc::as_ptr(&other.r))
    }
}

impl<T> cmp::Eq for NodeRef<T> {}

impl<T> Deref for NodeRef<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.r
    }
}

impl<T> AsRef<T> for NodeRef<T> {
    fn as_ref(&self) -> &T {
        self.deref()
    }
}

impl<T> NodeRef<T> {
    pub fn new(t: T) -> Self {
        Self { r: Rc::new(t) }
    }
}

pub type Ref<T> = NodeRef<T>;

/// A node of a parsed path expression.
///
/// Nodes are immutable once built. Names and literal text are not copied out
/// of the source; they are read back through each node's span.
#[derive(Debug)]
pub enum Expr {
    Ident {
        span: Span,
    },

    // target.field
    Selector {
        span: Span,
        target: Ref<Expr>,
        field: Span,
    },

    // target[key]
    Index {
        span: Span,
        target: Ref<Expr>,
        key: Ref<Expr>,
    },

    Paren {
        span: Span,
        inner: Ref<Expr>,
    },

    Unary {
        span: Span,
        op: UnaryOp,
        operand: Ref<Expr>,
    },

    Binary {
        span: Span,
        op: BinaryOp,
        lhs: Ref<Expr>,
        rhs: Ref<Expr>,
    },

    // The span covers the raw lexical text, including quotes.
    Literal {
        span: Span,
        kind: LitKind,
    },

    // Accepted by the parser only so that it can be rejected with a
    // precise error later.
    Call {
        span: Span,
        fcn: Ref<Expr>,
        args: Vec<Ref<Expr>>,
    },
}

impl Expr {
    pub const fn span(&self) -> &Span {
        match *self {
            Self::Ident { ref span, .. }
            | Self::Selector { ref span, .. }
            | Self::Index { ref span, .. }
            | Self::Paren { ref span, .. }
            | Self::Unary { ref span, .. }
            | Self::Binary { ref span, .. }
            | Self::Literal { ref span, .. }
            | Self::Call { ref span, .. } => span,
        }
    }

    /// Short human readable name of the node kind.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Ident { .. } => "identifier",
            Self::Selector { .. } => "selector",
            Self::Index { .. } => "index expression",
            Self::Paren { .. } => "parenthesized expression",
            Self::Unary { .. } => "unary expression",
            Self::Binary { .. } => "binary expression",
            Self::Literal { .. } => "literal",
            Self::Call { .. } => "call expression",
        }
    }
}

pub type ExprRef = Ref<Expr>;
