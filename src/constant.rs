// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::{BinaryOp, LitKind, UnaryOp};
use crate::error::PathError;
use crate::lexer::unquote;
use crate::navigable::{FloatKind, KeyKind, MapKey};

use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

/// Largest accepted shift count for `<<` and `>>`.
pub const MAX_SHIFT: u32 = 65535;

/// Result of folding a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Int(BigInt),
    Float(f64),
    String(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Constant {
    fn from(i: i64) -> Self {
        Self::Int(BigInt::from(i))
    }
}

impl From<BigInt> for Constant {
    fn from(i: BigInt) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Constant {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

fn parse_int(raw: &str) -> Option<BigInt> {
    let text = raw.replace('_', "");
    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        Some("0o" | "0O") => (&text[2..], 8),
        Some("0b" | "0B") => (&text[2..], 2),
        _ if text.len() > 1 && text.starts_with('0') => (&text[1..], 8),
        _ => (text.as_str(), 10),
    };
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

fn check_float(value: f64, op: impl fmt::Display) -> Result<Constant, PathError> {
    if value.is_finite() {
        Ok(Constant::Float(value))
    } else {
        Err(PathError::arithmetic(format!(
            "floating-point overflow in `{op}`"
        )))
    }
}

fn int_to_float(i: &BigInt) -> Result<f64, PathError> {
    match i.to_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(PathError::conversion(i, "f64")),
    }
}

impl Constant {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Converts the raw text of a literal token into a constant.
    pub fn from_literal(kind: LitKind, raw: &str) -> Result<Self, PathError> {
        match kind {
            LitKind::Int => parse_int(raw)
                .map(Self::Int)
                .ok_or_else(|| PathError::conversion(raw, "int")),
            LitKind::Float => {
                let f: f64 = raw
                    .replace('_', "")
                    .parse()
                    .map_err(|_| PathError::conversion(raw, "float"))?;
                if f.is_finite() {
                    Ok(Self::Float(f))
                } else {
                    Err(PathError::conversion(raw, "f64"))
                }
            }
            LitKind::Char => {
                let s = unquote(raw).map_err(|e| PathError::Parse(e.to_string()))?;
                match s.chars().next() {
                    Some(c) => Ok(Self::Int(BigInt::from(u32::from(c)))),
                    None => Err(PathError::Parse(format!("invalid character literal {raw}"))),
                }
            }
            LitKind::String => unquote(raw)
                .map(Self::String)
                .map_err(|e| PathError::Parse(e.to_string())),
        }
    }

    pub fn unary(op: UnaryOp, operand: Self) -> Result<Self, PathError> {
        match (op, operand) {
            (UnaryOp::Plus, v @ (Self::Int(_) | Self::Float(_))) => Ok(v),
            (UnaryOp::Neg, Self::Int(i)) => Ok(Self::Int(-i)),
            (UnaryOp::Neg, Self::Float(f)) => Ok(Self::Float(-f)),
            (UnaryOp::Complement, Self::Int(i)) => Ok(Self::Int(!i)),
            (UnaryOp::Not, Self::Bool(b)) => Ok(Self::Bool(!b)),
            (op, v) => Err(PathError::mismatch(format!(
                "operator {op} not defined on {v} ({})",
                v.kind_name()
            ))),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Result<Self, PathError> {
        // Mixed integer and float operands fold as floats.
        let (lhs, rhs) = match (lhs, rhs) {
            (Self::Int(i), Self::Float(f)) if !matches!(op, BinaryOp::Shl | BinaryOp::Shr) => {
                (Self::Float(int_to_float(&i)?), Self::Float(f))
            }
            (Self::Float(f), Self::Int(i)) if !matches!(op, BinaryOp::Shl | BinaryOp::Shr) => {
                (Self::Float(f), Self::Float(int_to_float(&i)?))
            }
            pair => pair,
        };

        if op.is_comparison() {
            return Self::compare(op, &lhs, &rhs);
        }

        match (lhs, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::int_op(op, a, b),
            (Self::Float(a), Self::Float(b)) => Self::float_op(op, a, b),
            (Self::String(a), Self::String(b)) if op == BinaryOp::Add => {
                Ok(Self::String(a + &b))
            }
            (Self::Bool(a), Self::Bool(b)) if op == BinaryOp::LogicalAnd => Ok(Self::Bool(a && b)),
            (Self::Bool(a), Self::Bool(b)) if op == BinaryOp::LogicalOr => Ok(Self::Bool(a || b)),
            (a, b) => Err(PathError::mismatch(format!(
                "invalid operation: {a} {op} {b} (mismatched kinds {} and {})",
                a.kind_name(),
                b.kind_name()
            ))),
        }
    }

    fn int_op(op: BinaryOp, a: BigInt, b: BigInt) -> Result<Self, PathError> {
        let value = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div | BinaryOp::Rem if b.is_zero() => {
                return Err(PathError::arithmetic("integer division by zero"));
            }
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            BinaryOp::And => a & b,
            BinaryOp::Or => a | b,
            BinaryOp::Xor => a ^ b,
            BinaryOp::AndNot => a & !b,
            BinaryOp::Shl | BinaryOp::Shr => {
                let count = match b.to_u32() {
                    Some(c) if c <= MAX_SHIFT => c as usize,
                    _ => {
                        return Err(PathError::arithmetic(format!("invalid shift count {b}")));
                    }
                };
                if op == BinaryOp::Shl {
                    a << count
                } else {
                    a >> count
                }
            }
            _ => {
                return Err(PathError::mismatch(format!(
                    "operator {op} not defined on {a} (int)"
                )))
            }
        };
        Ok(Self::Int(value))
    }

    fn float_op(op: BinaryOp, a: f64, b: f64) -> Result<Self, PathError> {
        match op {
            BinaryOp::Add => check_float(a + b, op),
            BinaryOp::Sub => check_float(a - b, op),
            BinaryOp::Mul => check_float(a * b, op),
            BinaryOp::Div if b == 0.0 => Err(PathError::arithmetic("division by zero")),
            BinaryOp::Div => check_float(a / b, op),
            _ => Err(PathError::mismatch(format!(
                "operator {op} not defined on {a:?} (float)"
            ))),
        }
    }

    fn compare(op: BinaryOp, lhs: &Self, rhs: &Self) -> Result<Self, PathError> {
        let ordering = match (lhs, rhs) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Self::Bool(a), Self::Bool(b)) if matches!(op, BinaryOp::Eq | BinaryOp::Ne) => {
                Some(a.cmp(b))
            }
            _ => {
                return Err(PathError::mismatch(format!(
                    "invalid comparison: {lhs} {op} {rhs} ({} and {})",
                    lhs.kind_name(),
                    rhs.kind_name()
                )))
            }
        };
        let Some(ordering) = ordering else {
            return Ok(Self::Bool(op == BinaryOp::Ne));
        };
        Ok(Self::Bool(match op {
            BinaryOp::Eq => ordering == Ordering::Equal,
            BinaryOp::Ne => ordering != Ordering::Equal,
            BinaryOp::Lt => ordering == Ordering::Less,
            BinaryOp::Le => ordering != Ordering::Greater,
            BinaryOp::Gt => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        }))
    }

    /// Narrows the constant to a sequence index. Only Int constants are
    /// indexes.
    ///
    /// Negative values are returned as is; bounds are checked by the caller
    /// against the sequence length.
    pub fn to_index(&self) -> Result<isize, PathError> {
        let index = match self {
            Self::Int(i) => i.to_isize(),
            _ => None,
        };
        index.ok_or_else(|| PathError::conversion(self, "isize"))
    }

    /// Converts the constant into the key representation a map declares.
    pub fn to_map_key(&self, kind: KeyKind) -> Result<MapKey, PathError> {
        let key = match (kind, self) {
            (KeyKind::Dynamic, Self::Bool(b)) => Some(MapKey::Bool(*b)),
            (KeyKind::Dynamic, Self::Int(i)) => Some(MapKey::Int(i.clone())),
            (KeyKind::Dynamic, Self::Float(f)) => Some(MapKey::Float(*f)),
            (KeyKind::Dynamic, Self::String(s)) => Some(MapKey::String(s.clone())),

            (KeyKind::Bool, Self::Bool(b)) => Some(MapKey::Bool(*b)),
            (KeyKind::String, Self::String(s)) => Some(MapKey::String(s.clone())),

            (KeyKind::Int(ik), Self::Int(i)) if ik.contains(i) => Some(MapKey::Int(i.clone())),

            (KeyKind::Float(fk), Self::Int(_) | Self::Float(_)) => {
                let f = match self {
                    Self::Int(i) => i.to_f64(),
                    Self::Float(f) => Some(*f),
                    _ => None,
                };
                match (fk, f) {
                    (FloatKind::F64, Some(f)) if f.is_finite() => Some(MapKey::Float(f)),
                    (FloatKind::F32, Some(f)) if (f as f32).is_finite() => {
                        Some(MapKey::Float(f64::from(f as f32)))
                    }
                    _ => None,
                }
            }

            (KeyKind::Char, Self::Int(i)) => i
                .to_u32()
                .and_then(char::from_u32)
                .map(MapKey::Char),

            _ => None,
        };
        key.ok_or_else(|| PathError::conversion(self, kind))
    }
}

