mod common;
use basic::mach::{Config, Runtime, Val};
use common::*;

#[test]
fn test_input_prompt() {
    let mut r = Runtime::default();
    r.enter(r#"10 INPUT "NAME";N$"#);
    r.enter(r#"20 PRINT "HI ";N$"#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "NAME? ");
    assert!(r.enter("Bob"));
    assert_eq!(exec(&mut r), "HI Bob\n");
}

#[test]
fn test_input_many() {
    let mut r = Runtime::default();
    r.enter("INPUT A,B$,C");
    assert_eq!(exec(&mut r), "? ");
    r.enter("3, x y");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.var("A"), Some(Val::Number(3.0)));
    assert_eq!(r.var("B$"), Some(Val::Text("x y".into())));
    assert_eq!(r.var("C"), Some(Val::Text("".into())));
}

#[test]
fn test_input_needs_variable() {
    let mut r = Runtime::default();
    r.enter(r#"INPUT "X""#);
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; MISSING VARIABLE\n");
}

#[test]
fn test_get() {
    let mut r = Runtime::default();
    r.enter("GET K$:PRINT K$");
    assert_eq!(exec(&mut r), "");
    assert!(!r.enter("xyz"));
    assert_eq!(exec(&mut r), "x\n");
}

#[test]
fn test_script_mode_skips_input() {
    let mut r = Runtime::new(Config {
        script: true,
        ..Config::default()
    });
    let out = run_program(&mut r, &["10 INPUT N$", "20 GET K$", "30 PRINT \"DONE\""]);
    assert_eq!(out, "DONE\n");
    assert_eq!(r.var("N$"), None);
}

#[test]
fn test_interrupt_during_input() {
    let mut r = Runtime::default();
    r.enter("10 INPUT A");
    r.enter("20 PRINT A");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "? ");
    r.interrupt();
    r.enter("");
    assert_eq!(exec(&mut r), "?BREAK IN 20\n");
}

#[test]
fn test_key_pressed_while_running() {
    let mut r = Runtime::default();
    r.enter(r#"10 IF INKEY$="" THEN 10"#);
    r.enter("20 PRINT INKEY$");
    r.enter("RUN");
    assert_eq!(exec_n(&mut r, 10), "\n10 Execution cycles exceeded.\n");
    r.press_key('q');
    assert_eq!(exec(&mut r), "q\n");
}
