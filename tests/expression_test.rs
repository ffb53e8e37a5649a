mod common;
use basic::mach::{Config, Runtime};
use common::*;
use std::time::Duration;

#[test]
fn test_numeric_literal_is_unchanged() {
    let r = Runtime::default();
    assert_eq!(r.evaluate_text("42").unwrap(), "42");
    assert_eq!(r.evaluate_text("2+3*4").unwrap(), "14");
}

#[test]
fn test_string_concatenation() {
    let mut r = Runtime::default();
    r.enter(r#"A$="foo""#);
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.evaluate_text(r#"A$+"bar""#).unwrap(), r#""foobar""#);
}

#[test]
fn test_string_equality() {
    let r = Runtime::default();
    assert_eq!(r.evaluate_text(r#""ab"="ab""#).unwrap(), "1");
    assert_eq!(r.evaluate_text(r#""ab"="ac""#).unwrap(), "0");
}

#[test]
fn test_substrings() {
    let r = Runtime::default();
    assert_eq!(r.evaluate_text(r#"LEFT$("HELLO",3)"#).unwrap(), r#""HEL""#);
    assert_eq!(r.evaluate_text(r#"RIGHT$("HELLO",2)"#).unwrap(), r#""LO""#);
    assert_eq!(r.evaluate_text(r#"MID$("HELLO",2,3)"#).unwrap(), r#""ELL""#);
}

#[test]
fn test_list_separators() {
    let r = Runtime::default();
    assert_eq!(r.evaluate_text(r#"1,"A";2"#).unwrap(), "1\t\"A\"2");
}

#[test]
fn test_print_undefined_name() {
    let mut r = Runtime::default();
    r.enter("PRINT HELLO");
    assert_eq!(exec(&mut r), "HELLO\n");
    r.enter("PRINT HELLO+1");
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_type_mismatch() {
    let mut r = Runtime::default();
    r.enter(r#"PRINT "A"+1"#);
    assert_eq!(exec(&mut r), "?TYPE MISMATCH\n");
}

#[test]
fn test_user_function() {
    let mut r = Runtime::default();
    r.enter("DEF FNSQ(X)=X*X");
    assert_eq!(exec(&mut r), "");
    r.enter("PRINT FNSQ(3)+1");
    assert_eq!(exec(&mut r), "10\n");
    r.enter("DEF FNBAD(XY)=1");
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; PARAMETERS ARE SINGLE LETTERS\n");
}

#[test]
fn test_expression_timeout() {
    let mut r = Runtime::new(Config {
        expression_timeout: Duration::from_millis(50),
        ..Config::default()
    });
    for i in 0..30 {
        r.enter(&format!("DEF FNF{}(X)=FNF{}(X)+FNF{}(X)", i, i + 1, i + 1));
        assert_eq!(exec(&mut r), "");
    }
    r.enter("DEF FNF30(X)=X");
    assert_eq!(exec(&mut r), "");
    r.enter("PRINT FNF0(1)");
    assert_eq!(exec(&mut r), "?EXPRESSION TIMEOUT\n");
}

#[test]
fn test_catalog_names() {
    let mut r = Runtime::default();
    r.press_key('k');
    r.enter("PRINT INKEY$");
    assert_eq!(exec(&mut r), "k\n");
    r.enter(r#"INKEY$="":PRINT LEN(INKEY$)"#);
    assert_eq!(exec(&mut r), "0\n");
    r.enter(r#"USERNAME$="x""#);
    assert_eq!(exec(&mut r), "?ILLEGAL VARIABLE NAME; USERNAME$\n");
    r.enter("PRINT ROWS;COLS");
    assert_eq!(exec(&mut r), "2480\n");
}

#[test]
fn test_words() {
    use basic::mach::WordList;
    use std::sync::Arc;
    let mut r = Runtime::default();
    r.set_words(Arc::new(WordList::new(vec!["apple", "banana", "cherry"])));
    r.enter(r#"PRINT ISWORD("APPLE");ISWORD("pear");GETNEXTWORD("apple")"#);
    assert_eq!(exec(&mut r), "10banana\n");
    r.enter(r#"PRINT GETNEXTWORDCONTAINS("apple","rr");GETWORD(6)"#);
    let out = exec(&mut r);
    assert!(out == "cherrybanana\n" || out == "cherrycherry\n");
}

#[test]
fn test_deep_nesting() {
    let mut r = Runtime::default();
    r.enter(&format!("PRINT {}1{}", "(".repeat(1000), ")".repeat(1000)));
    assert!(exec(&mut r).starts_with("?FORMULA TOO COMPLEX"));
    r.enter(&format!("PRINT {}", vec!["1"; 1000].join("+")));
    assert!(exec(&mut r).starts_with("?FORMULA TOO COMPLEX"));
    r.enter(&format!("PRINT {}1{}", "(".repeat(20), ")".repeat(20)));
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_string_length_limit() {
    let mut r = Runtime::default();
    r.enter("PRINT LEN(TAB(1E15))");
    assert_eq!(exec(&mut r), "?STRING TOO LONG; TAB\n");
    r.enter("A$=TAB(40000):PRINT LEN(A$)");
    assert_eq!(exec(&mut r), "40000\n");
    r.enter("A$=A$+A$");
    assert_eq!(exec(&mut r), "?STRING TOO LONG\n");
    r.enter(r#"PRINT LEN(REPLACE$(A$," ","ab"))"#);
    assert_eq!(exec(&mut r), "?STRING TOO LONG; REPLACE$\n");
    r.enter("10 A$=TAB(65530)");
    r.enter("20 A$=A$+\"x\":GOTO 20");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "?STRING TOO LONG IN 20\n");
    r.enter("PRINT LEN(A$)");
    assert_eq!(exec(&mut r), "65535\n");
}
