// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::lexer::*;

use anyhow::Result;

/// Maximum depth of the expression tree. Every suffix, operator and
/// parenthesized or bracketed sub-expression adds a level.
pub const MAX_DEPTH: u32 = 256;

#[derive(Clone)]
pub struct Parser<'source> {
    source: Source,
    lexer: Lexer<'source>,
    tok: Token,
    line: u32,
    end: u32,
    depth: u32,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source Source) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let tok = lexer.next_token()?;
        Ok(Self {
            source: source.clone(),
            lexer,
            tok,
            line: 0,
            end: 0,
            depth: 0,
        })
    }

    pub fn token_text(&self) -> &str {
        match self.tok.0 {
            TokenKind::Symbol | TokenKind::Ident | TokenKind::Eof => self.tok.1.text(),
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::RawString => "",
        }
    }

    pub fn next_token(&mut self) -> Result<()> {
        self.line = self.tok.1.line;
        self.end = self.tok.1.end;
        self.tok = self.lexer.next_token()?;
        Ok(())
    }

    fn error(&self, msg: &str) -> anyhow::Error {
        self.source.error(self.tok.1.line, self.tok.1.col, msg)
    }

    fn expect(&mut self, text: &str, context: &str) -> Result<()> {
        if self.tok.0 == TokenKind::Symbol && self.token_text() == text {
            self.next_token()
        } else {
            Err(self.error(&format!("expecting `{text}` {context}")))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression is nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn is_keyword(&self, ident: &str) -> bool {
        KEYWORDS.contains(&ident)
    }

    fn parse_ident(&mut self) -> Result<Span> {
        let span = self.tok.1.clone();
        match self.tok.0 {
            TokenKind::Ident if self.is_keyword(span.text()) => Err(self.error(&format!(
                "unexpected keyword `{}`",
                span.text()
            ))),
            TokenKind::Ident => {
                self.next_token()?;
                Ok(span)
            }
            _ => Err(self.error("expecting identifier")),
        }
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        let span = self.tok.1.clone();
        let kind = match self.tok.0 {
            TokenKind::Int => LitKind::Int,
            TokenKind::Float => LitKind::Float,
            TokenKind::Char => LitKind::Char,
            TokenKind::String | TokenKind::RawString => LitKind::String,
            TokenKind::Ident => {
                let span = self.parse_ident()?;
                return Ok(Expr::Ident { span });
            }
            TokenKind::Symbol if self.token_text() == "(" => return self.parse_parens_expr(),
            TokenKind::Eof => return Err(self.error("unexpected end of path")),
            _ => return Err(self.error("expecting expression")),
        };
        self.next_token()?;
        Ok(Expr::Literal { span, kind })
    }

    fn parse_parens_expr(&mut self) -> Result<Expr> {
        let mut span = self.tok.1.clone();
        self.next_token()?;
        let inner = self.parse_expr()?;
        self.expect(")", "while parsing parenthesized expression")?;
        span.end = self.end;
        Ok(Expr::Paren {
            span,
            inner: Ref::new(inner),
        })
    }

    fn parse_call_args(&mut self) -> Result<Vec<Ref<Expr>>> {
        let mut args = vec![];
        if self.token_text() != ")" {
            args.push(Ref::new(self.parse_expr()?));
            while self.token_text() == "," {
                self.next_token()?;
                match self.token_text() {
                    ")" => break,
                    _ => args.push(Ref::new(self.parse_expr()?)),
                }
            }
        }
        self.expect(")", "while parsing call expr")?;
        Ok(args)
    }

    // Parses an operand followed by any number of `.field`, `[key]` or
    // `(args)` suffixes.
    fn parse_primary_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.start;
        let depth = self.depth;
        let mut term = self.parse_operand()?;

        loop {
            let mut span = term.span().clone();
            span.start = start;
            if self.tok.0 != TokenKind::Symbol || !matches!(self.token_text(), "." | "[" | "(") {
                break;
            }
            self.enter()?;
            match self.token_text() {
                "." => {
                    self.next_token()?;
                    let field = self.parse_ident()?;
                    span.end = self.end;
                    term = Expr::Selector {
                        span,
                        target: Ref::new(term),
                        field,
                    };
                }
                "[" => {
                    self.next_token()?;
                    let key = self.parse_expr()?;
                    self.expect("]", "while parsing index expression")?;
                    span.end = self.end;
                    term = Expr::Index {
                        span,
                        target: Ref::new(term),
                        key: Ref::new(key),
                    };
                }
                "(" => {
                    self.next_token()?;
                    let args = self.parse_call_args()?;
                    span.end = self.end;
                    term = Expr::Call {
                        span,
                        fcn: Ref::new(term),
                        args,
                    };
                }
                _ => break,
            }
        }

        self.depth = depth;
        Ok(term)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        let op = match (&self.tok.0, self.token_text()) {
            (TokenKind::Symbol, "+") => UnaryOp::Plus,
            (TokenKind::Symbol, "-") => UnaryOp::Neg,
            (TokenKind::Symbol, "!") => UnaryOp::Not,
            (TokenKind::Symbol, "^") => UnaryOp::Complement,
            _ => return self.parse_primary_expr(),
        };
        let mut span = self.tok.1.clone();
        self.enter()?;
        self.next_token()?;
        let operand = self.parse_unary_expr()?;
        self.leave();
        span.end = self.end;
        Ok(Expr::Unary {
            span,
            op,
            operand: Ref::new(operand),
        })
    }

    fn binary(&self, start: &Span, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let mut span = start.clone();
        span.end = self.end;
        Expr::Binary {
            span,
            op,
            lhs: Ref::new(lhs),
            rhs: Ref::new(rhs),
        }
    }

    // * / % << >> & &^
    fn parse_mul_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.clone();
        let depth = self.depth;
        let mut expr = self.parse_unary_expr()?;

        while self.tok.0 == TokenKind::Symbol {
            let op = match self.token_text() {
                "*" => BinaryOp::Mul,
                "/" => BinaryOp::Div,
                "%" => BinaryOp::Rem,
                "<<" => BinaryOp::Shl,
                ">>" => BinaryOp::Shr,
                "&" => BinaryOp::And,
                "&^" => BinaryOp::AndNot,
                _ => break,
            };
            self.enter()?;
            self.next_token()?;
            let right = self.parse_unary_expr()?;
            expr = self.binary(&start, op, expr, right);
        }
        self.depth = depth;
        Ok(expr)
    }

    // + - | ^
    fn parse_add_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.clone();
        let depth = self.depth;
        let mut expr = self.parse_mul_expr()?;

        while self.tok.0 == TokenKind::Symbol {
            let op = match self.token_text() {
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Sub,
                "|" => BinaryOp::Or,
                "^" => BinaryOp::Xor,
                _ => break,
            };
            self.enter()?;
            self.next_token()?;
            let right = self.parse_mul_expr()?;
            expr = self.binary(&start, op, expr, right);
        }
        self.depth = depth;
        Ok(expr)
    }

    fn parse_comparison_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.clone();
        let depth = self.depth;
        let mut expr = self.parse_add_expr()?;

        while self.tok.0 == TokenKind::Symbol {
            let op = match self.token_text() {
                "<" => BinaryOp::Lt,
                "<=" => BinaryOp::Le,
                "==" => BinaryOp::Eq,
                ">=" => BinaryOp::Ge,
                ">" => BinaryOp::Gt,
                "!=" => BinaryOp::Ne,
                _ => break,
            };
            self.enter()?;
            self.next_token()?;
            let right = self.parse_add_expr()?;
            expr = self.binary(&start, op, expr, right);
        }
        self.depth = depth;
        Ok(expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.clone();
        let depth = self.depth;
        let mut expr = self.parse_comparison_expr()?;

        while self.tok.0 == TokenKind::Symbol && self.token_text() == "&&" {
            self.enter()?;
            self.next_token()?;
            let right = self.parse_comparison_expr()?;
            expr = self.binary(&start, BinaryOp::LogicalAnd, expr, right);
        }
        self.depth = depth;
        Ok(expr)
    }

    fn parse_or_expr(&mut self) -> Result<Expr> {
        let start = self.tok.1.clone();
        let depth = self.depth;
        let mut expr = self.parse_and_expr()?;

        while self.tok.0 == TokenKind::Symbol && self.token_text() == "||" {
            self.enter()?;
            self.next_token()?;
            let right = self.parse_and_expr()?;
            expr = self.binary(&start, BinaryOp::LogicalOr, expr, right);
        }
        self.depth = depth;
        Ok(expr)
    }

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.enter()?;
        let expr = self.parse_or_expr()?;
        self.leave();
        Ok(expr)
    }

    /// Parses the whole source as a single expression.
    pub fn parse_path(&mut self) -> Result<Ref<Expr>> {
        let expr = self.parse_expr()?;
        if self.tok.0 != TokenKind::Eof {
            return Err(self.error("unexpected token after end of expression"));
        }
        Ok(Ref::new(expr))
    }
}
