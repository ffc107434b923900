// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::common::check_error;

use anyhow::{bail, Result};
use navpath::eval::evaluate;
use navpath::unstable::*;
use navpath::{Constant, PathError};
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

fn eval_str(text: &str) -> Result<Result<Constant, PathError>> {
    let source = Source::from_contents("case.expr".to_string(), text.to_string())?;
    let mut parser = Parser::new(&source)?;
    let expr = parser.parse_path()?;
    Ok(evaluate(&expr))
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Case {
    note: String,
    expr: String,
    want: Option<String>,
    error: Option<String>,
    error_kind: Option<String>,
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
        match (eval_str(&case.expr)?, &case.want, &case.error) {
            (Ok(actual), Some(want), None) => {
                if &actual.to_string() != want {
                    bail!("{}: expected {want}, got {actual}", case.note);
                }
            }
            (Err(err), None, Some(message)) => {
                check_error(&err, message, case.error_kind.as_deref())?;
            }
            (Ok(actual), _, Some(_)) => bail!("{}: expected error, got {actual}", case.note),
            (Err(err), _, _) => bail!("{}: {err}", case.note),
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

#[test_resources("tests/eval/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn folds_to_typed_constants() -> Result<()> {
    assert_eq!(eval_str("1 + 2")??, Constant::from(3i64));
    assert_eq!(eval_str("1 + 0.5")??, Constant::Float(1.5));
    assert_eq!(eval_str(r#""a" + `b`"#)??, Constant::from("ab"));
    assert_eq!(eval_str("'a' + 1")??, Constant::from(98i64));
    assert_eq!(eval_str("!(1 < 2)")??, Constant::Bool(false));
    Ok(())
}
