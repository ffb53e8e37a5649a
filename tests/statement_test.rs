mod common;
use basic::mach::{Runtime, Val};
use common::*;

#[test]
fn test_for_loop_sum() {
    let mut r = Runtime::default();
    r.enter("FOR I=1 TO 5 : S=S+I : NEXT I");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.var("S"), Some(Val::Number(15.0)));
    r.enter("PRINT S;I");
    assert_eq!(exec(&mut r), "156\n");
}

#[test]
fn test_for_loop_step() {
    let mut r = Runtime::default();
    r.enter("FOR I=10 TO 1 STEP -3:PRINT I;\" \";:NEXT");
    assert_eq!(exec(&mut r), "10 7 4 1 ");
}

#[test]
fn test_for_bounds_must_be_integers() {
    let mut r = Runtime::default();
    r.enter("FOR I=1 TO 2.5:NEXT");
    assert_eq!(exec(&mut r), "?ILLEGAL FUNCTION CALL; INTEGER REQUIRED\n");
}

#[test]
fn test_goto_back_into_for_reuses_frame() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 N=N+1",
            "20 FOR I=1 TO 2",
            "30 IF N<500 THEN 10",
            "40 NEXT I",
            "50 PRINT N;I",
        ],
    );
    assert_eq!(out, "5003\n");
}

#[test]
fn test_next_without_for() {
    let mut r = Runtime::default();
    r.enter("NEXT");
    assert_eq!(exec(&mut r), "?NEXT WITHOUT FOR\n");
    r.enter("FOR I=1 TO 2:NEXT J");
    assert_eq!(exec(&mut r), "?NEXT WITHOUT FOR; J\n");
}

#[test]
fn test_gosub_label() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 GOSUB greet",
            "20 PRINT \"DONE\"",
            "30 END",
            "40 !greet",
            "50 PRINT \"HI\"",
            "60 RETURN",
        ],
    );
    assert_eq!(out, "HI\nDONE\n");
}

#[test]
fn test_return_without_gosub() {
    let mut r = Runtime::default();
    let out = run_program(&mut r, &["10 FOR I=1 TO 2", "20 RETURN"]);
    assert_eq!(out, "?RETURN WITHOUT GOSUB IN 20\n");
}

#[test]
fn test_undefined_line() {
    let mut r = Runtime::default();
    let out = run_program(&mut r, &["10 GOTO 99"]);
    assert_eq!(out, "?UNDEFINED LINE IN 10; 99\n");
}

#[test]
fn test_on_goto_and_gosub() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 ON 2 GOSUB 100,200",
            "20 ON 0 GOTO 100",
            "30 ON 1 GOTO 300",
            "100 PRINT \"A\":RETURN",
            "200 PRINT \"B\":RETURN",
            "300 PRINT \"C\"",
        ],
    );
    assert_eq!(out, "B\nC\n");
    r.enter("ON -1 GOTO 100");
    assert_eq!(exec(&mut r), "?ILLEGAL FUNCTION CALL; -1\n");
}

#[test]
fn test_if_forms() {
    let mut r = Runtime::default();
    r.enter("A=1:IF A=1 THEN PRINT \"YES\"");
    assert_eq!(exec(&mut r), "YES\n");
    r.enter("IF defined Q THEN PRINT \"D\"");
    assert_eq!(exec(&mut r), "");
    r.enter("Q=0:IF defined Q THEN PRINT \"D\"");
    assert_eq!(exec(&mut r), "D\n");
    r.enter("IF not defined Z THEN PRINT \"ND\"");
    assert_eq!(exec(&mut r), "ND\n");
    r.enter("IF N$=\"\" THEN PRINT \"EMPTY\"");
    assert_eq!(exec(&mut r), "EMPTY\n");
    r.enter("N$=\"X\":IF N$<>\"\" THEN PRINT N$");
    assert_eq!(exec(&mut r), "X\n");
    r.enter("IF 1 PRINT");
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; MISSING THEN\n");
}

#[test]
fn test_assignment() {
    let mut r = Runtime::default();
    r.enter("LET A=2:B=A*3:PRINT B");
    assert_eq!(exec(&mut r), "6\n");
    r.enter("B=:PRINT B");
    assert_eq!(exec(&mut r), "B\n");
    assert_eq!(r.var("B"), None);
    r.enter("FOO");
    assert_eq!(exec(&mut r), "?UNKNOWN STATEMENT; FOO\n");
    r.enter("A B=1");
    assert_eq!(exec(&mut r), "?ILLEGAL VARIABLE NAME; A B\n");
}

#[test]
fn test_scope_locals() {
    let mut r = Runtime::default();
    let out = run_program(
        &mut r,
        &[
            "10 _X=1",
            "20 GOSUB 100",
            "30 PRINT _X",
            "40 END",
            "100 _X=5:PRINT _X",
            "110 RETURN",
        ],
    );
    assert_eq!(out, "5\n1\n");
}

#[test]
fn test_dim() {
    let mut r = Runtime::default();
    r.enter("DIM A(2,3):A(1,2)=7:PRINT A(1,2);A(0,0)");
    assert_eq!(exec(&mut r), "70\n");
    r.enter("PRINT A(2,0)");
    assert_eq!(exec(&mut r), "A(2,0)\n");
    r.enter("DIM B");
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; MISSING DIMENSIONS\n");
}

#[test]
fn test_end_stops_program() {
    let mut r = Runtime::default();
    let out = run_program(&mut r, &["10 PRINT 1", "20 END", "30 PRINT 2"]);
    assert_eq!(out, "1\n");
}

#[test]
fn test_editor_commands_in_program() {
    let mut r = Runtime::default();
    let out = run_program(&mut r, &["10 LIST"]);
    assert_eq!(out, "?SYNTAX ERROR IN 10; DIRECT MODE ONLY\n");
}

#[test]
fn test_interrupt_reports_line() {
    let mut r = Runtime::default();
    r.enter("10 GOTO 10");
    r.enter("RUN");
    assert_eq!(exec_n(&mut r, 10), "\n10 Execution cycles exceeded.\n");
    r.interrupt();
    assert_eq!(exec(&mut r), "?BREAK IN 10\n");
}

#[test]
fn test_full_array_can_be_overwritten() {
    let mut r = Runtime::default();
    r.enter("DIM A(65535):A(0)=5:PRINT A(0)");
    assert_eq!(exec(&mut r), "5\n");
    r.enter("A(65535)=1");
    assert_eq!(exec(&mut r), "?OUT OF MEMORY\n");
    r.enter("DIM C(2)");
    assert_eq!(exec(&mut r), "?OUT OF MEMORY\n");
    r.enter("DIM A(65535):PRINT A(0)");
    assert_eq!(exec(&mut r), "0\n");
}
