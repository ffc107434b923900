// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};
use navpath::unstable::*;
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

// Renders a tree as an s-expression so that structure and precedence can be
// compared as text.
fn sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Ident { span } | Expr::Literal { span, .. } => span.text().to_string(),
        Expr::Selector { target, field, .. } => format!("(. {} {})", sexpr(target), field.text()),
        Expr::Index { target, key, .. } => format!("([] {} {})", sexpr(target), sexpr(key)),
        Expr::Paren { inner, .. } => format!("(paren {})", sexpr(inner)),
        Expr::Unary { op, operand, .. } => format!("({op} {})", sexpr(operand)),
        Expr::Binary { op, lhs, rhs, .. } => format!("({op} {} {})", sexpr(lhs), sexpr(rhs)),
        Expr::Call { fcn, args, .. } => {
            let args: String = args.iter().map(|a| format!(" {}", sexpr(a))).collect();
            format!("(call {}{args})", sexpr(fcn))
        }
    }
}

fn parse(text: &str) -> Result<ExprRef> {
    let source = Source::from_contents("case.path".to_string(), text.to_string())?;
    let mut parser = Parser::new(&source)?;
    parser.parse_path()
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Case {
    note: String,
    expr: String,
    want: Option<String>,
    error: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Test {
    cases: Vec<Case>,
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {file}");

    let yaml = std::fs::read_to_string(file)?;
    let test: Test = serde_yaml::from_str(&yaml)?;

    for case in &test.cases {
        print!("case {} ", case.note);
        match (parse(&case.expr), &case.want, &case.error) {
            (Ok(expr), Some(want), None) => {
                let actual = sexpr(&expr);
                if &actual != want {
                    bail!("{}: expected `{want}`, parsed `{actual}`", case.note);
                }
                // The root node spans the whole expression.
                assert_eq!(expr.span().text(), case.expr.trim(), "{}", case.note);
            }
            (Err(actual), None, Some(expected)) => {
                let actual = actual.to_string();
                if !actual.contains(expected.as_str()) {
                    bail!("Error message\n`{actual}\n`\ndoes not contain `{expected}`");
                }
            }
            (Ok(expr), _, Some(_)) => bail!("{}: expected error, parsed {}", case.note, sexpr(&expr)),
            (Err(actual), _, _) => return Err(actual),
            _ => bail!("{}: case must have exactly one of want or error", case.note),
        }
        println!("passed");
    }

    println!("{} cases passed.", test.cases.len());
    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/parser/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn sub_expression_spans() -> Result<()> {
    let expr = parse("v.A[1 + 2]")?;
    let Expr::Index { target, key, span } = expr.as_ref() else {
        bail!("expected index expression, got {expr:?}");
    };
    assert_eq!(span.text(), "v.A[1 + 2]");
    assert_eq!(target.span().text(), "v.A");
    assert_eq!(key.span().text(), "1 + 2");
    assert_eq!(key.kind_name(), "binary expression");
    Ok(())
}

#[test]
fn literal_kinds() -> Result<()> {
    let expr = parse(r#"v[1][1.5]['a']["s"][`r`]"#)?;
    let mut kinds = vec![];
    let mut node = expr.as_ref();
    while let Expr::Index { target, key, .. } = node {
        match key.as_ref() {
            Expr::Literal { kind, .. } => kinds.push(*kind),
            other => bail!("expected literal, got {other:?}"),
        }
        node = target.as_ref();
    }
    kinds.reverse();
    assert_eq!(
        kinds,
        [LitKind::Int, LitKind::Float, LitKind::Char, LitKind::String, LitKind::String]
    );
    Ok(())
}

#[test]
fn nesting_is_limited() -> Result<()> {
    let ok = format!("v[{}1{}]", "(".repeat(200), ")".repeat(200));
    parse(&ok)?;
    parse(&format!("v{}", ".a".repeat(200)))?;
    parse(&format!("v[{}]", vec!["1"; 200].join(" * ")))?;

    for deep in [
        format!("v[{}1{}]", "(".repeat(300), ")".repeat(300)),
        format!("v[{}1]", "-".repeat(300)),
        format!("v{}", "[v".repeat(300)),
        format!("v{}", ".a".repeat(10_000)),
        format!("v{}", "[0]".repeat(10_000)),
        format!("v[{}]", vec!["1"; 10_000].join("+")),
        format!("v[{}]", vec!["a"; 10_000].join(" || ")),
    ] {
        match parse(&deep) {
            Ok(_) => bail!("expected nesting error"),
            Err(e) => assert!(e.to_string().contains("nested too deeply"), "{e}"),
        }
    }
    Ok(())
}

#[test]
fn trees_are_shared_not_copied() -> Result<()> {
    let expr = parse("v.A")?;
    let other = expr.clone();
    assert_eq!(expr, other);
    assert_ne!(expr, parse("v.A")?);
    Ok(())
}
