mod common;
use basic::mach::{Runtime, Val};
use common::*;

#[test]
fn test_read_in_order() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 DATA 1,2,3",
            "20 READ A,B,C",
            "30 PRINT A;B;C",
            "40 READ D",
        ],
    );
    assert_eq!(out, "123\n?OUT OF DATA IN 40\n");
    assert_eq!(r.var("C"), Some(Val::Number(3.0)));
}

#[test]
fn test_restore() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 READ A,B$:RESTORE:READ C",
            "20 PRINT A,B$,C",
            "30 DATA 1,\"TWO\"",
        ],
    );
    assert_eq!(out, "1\tTWO\t1\n");
}

#[test]
fn test_data_across_lines() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 DATA 5:X=1:DATA 6",
            "20 DATA hello",
            "30 READ A,B,C$",
            "40 PRINT A+B;C$",
        ],
    );
    assert_eq!(out, "11hello\n");
}

#[test]
fn test_run_clears_variables() {
    let mut r = Runtime::default();
    r.enter("X=5");
    assert_eq!(exec(&mut r), "");
    let out = run_program(&mut r, &["10 PRINT X+0"]);
    assert_eq!(out, "0\n");
}

#[test]
fn test_direct_goto_keeps_variables() {
    let mut r = Runtime::default();
    r.enter("10 PRINT X");
    r.enter("X=5:GOTO 10");
    assert_eq!(exec(&mut r), "5\n");
}
