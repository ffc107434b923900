// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};
use navpath::unstable::*;
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

fn get_tokens(source: &Source) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut lex = Lexer::new(source);
    loop {
        let tok = lex.next_token()?;
        tokens.push(tok.clone());
        if tok.0 == TokenKind::Eof {
            break;
        }
    }

    Ok(tokens)
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Case {
    pub path: String,
    pub note: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    pub kinds: Option<Vec<String>>,
    pub error: Option<String>,
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
        let source = Source::from_contents("case.path".to_string(), case.path.clone())?;
        print!("case {} ", &case.note);

        match (get_tokens(&source), &case.error) {
            (Ok(tokens), None) => {
                let texts: Vec<&str> = tokens.iter().map(|t| t.1.text()).collect();
                assert_eq!(texts, case.tokens, "token mismatch in {}", case.note);

                if let Some(kinds) = &case.kinds {
                    let actual: Vec<String> = tokens.iter().map(|t| format!("{:?}", t.0)).collect();
                    assert_eq!(&actual, kinds, "kind mismatch in {}", case.note);
                }
            }
            (Ok(tokens), Some(_)) => bail!("expected error, lexed {tokens:?}"),
            (Err(actual), Some(expected)) => {
                let actual = actual.to_string();
                if !actual.contains(expected) {
                    bail!("Error message\n`{actual}\n`\ndoes not contain `{expected}`");
                }
            }
            (Err(actual), None) => return Err(actual),
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

#[test_resources("tests/lexer/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn unquote_resolves_escapes() {
    assert_eq!(unquote(r#""a\x41\101é\U0001F600""#), Ok("aAAé😀".to_string()));
    assert_eq!(unquote("`a\r\nb`"), Ok("a\nb".to_string()));
    assert_eq!(unquote(r"'\''"), Ok("'".to_string()));
    assert!(unquote(r#""\'""#).is_err());
    assert!(unquote(r#""\400""#).is_err());
    assert!(unquote("'ab'").is_err());
}

#[test]
fn byte_escapes_in_strings() {
    assert_eq!(unquote(r#""\xc3\xa9""#), Ok("é".to_string()));
    assert_eq!(unquote(r#""\303\251""#), Ok("é".to_string()));
    assert_eq!(unquote(r#""\xe2\x82\xac = \u20ac""#), Ok("€ = €".to_string()));
    assert_eq!(unquote(r#""\xff""#), Err("string literal is not valid UTF-8"));
    assert_eq!(unquote(r#""\xc3""#), Err("string literal is not valid UTF-8"));

    // Character literals take the escape as a code point.
    assert_eq!(unquote(r"'\xe9'"), Ok("é".to_string()));
    assert_eq!(unquote(r"'\303'"), Ok("Ã".to_string()));
}

#[test]
fn error_points_at_column() -> Result<()> {
    let source = Source::from_contents("case.path".to_string(), "v.A[#]".to_string())?;
    let err = match get_tokens(&source) {
        Ok(tokens) => bail!("expected error, lexed {tokens:?}"),
        Err(e) => e.to_string(),
    };
    let lines: Vec<&str> = err.split('\n').collect();
    assert_eq!(lines[1], "--> case.path:1:5");
    assert_eq!(lines[3], "1 | v.A[#]");
    assert_eq!(lines[4], "  |     ^");
    Ok(())
}
