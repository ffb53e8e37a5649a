mod common;
use basic::mach::Runtime;
use common::*;

fn program() -> Runtime {
    let mut r = Runtime::default();
    r.enter("10 X=1");
    r.enter("20 GOSUB 50");
    r.enter("30 PRINT X");
    r.enter("40 END");
    r.enter("50 X=X+1:IF X<3 THEN 50");
    r.enter("60 RETURN");
    r
}

#[test]
fn test_renum_preserves_behavior() {
    let mut r = program();
    r.enter("RUN");
    let before = exec(&mut r);
    assert_eq!(before, "3\n");
    r.enter("RENUM 100,0,5");
    assert_eq!(exec(&mut r), "");
    r.enter("LIST");
    assert_eq!(
        exec(&mut r),
        "100 X=1\n105 GOSUB 120\n110 PRINT X\n115 END\n120 X=X+1:IF X<3 THEN 120\n125 RETURN\n"
    );
    r.enter("RUN");
    assert_eq!(exec(&mut r), before);
}

#[test]
fn test_renum_warns_on_unknown_target() {
    let mut r = Runtime::default();
    r.enter("10 GOTO 99");
    r.enter("RENUM");
    assert_eq!(exec(&mut r), "?WARNING: UNDEFINED LINE 99 IN 10\n");
}

#[test]
fn test_list_ranges() {
    let mut r = program();
    r.enter("LIST 20-30");
    assert_eq!(exec(&mut r), "20 GOSUB 50\n30 PRINT X\n");
    r.enter("LIST -10");
    assert_eq!(exec(&mut r), "10 X=1\n");
    r.enter("LIST 60-");
    assert_eq!(exec(&mut r), "60 RETURN\n");
}

#[test]
fn test_delete_and_replace() {
    let mut r = program();
    r.enter("DELETE 40-60");
    assert_eq!(exec(&mut r), "");
    r.enter("20");
    r.enter("30 PRINT X*2");
    r.enter("LIST");
    assert_eq!(exec(&mut r), "10 X=1\n30 PRINT X*2\n");
    r.enter("DELETE 500");
    assert_eq!(exec(&mut r), "?UNDEFINED LINE; 500\n");
}

#[test]
fn test_find_and_edit() {
    let mut r = program();
    r.enter("FIND gosub");
    assert_eq!(exec(&mut r), "20 GOSUB 50\n");
    r.enter(r#"EDIT "X","Y",30"#);
    assert_eq!(exec(&mut r), "30 PRINT Y\n");
}

#[test]
fn test_duplicate_label_warning() {
    let mut r = Runtime::default();
    r.enter("10 !top");
    r.enter("20 !TOP");
    r.enter("30 PRINT 1");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "?WARNING: DUPLICATE LABEL TOP IN 20 (FIRST IN 10)\n1\n");
}

#[test]
fn test_new() {
    let mut r = program();
    r.enter("NEW");
    assert_eq!(exec(&mut r), "");
    r.enter("LIST");
    assert_eq!(exec(&mut r), "");
}

#[test]
fn test_save_and_load() {
    let dir = scratch_dir("editor");
    let mut r = runtime_in(dir.clone());
    r.enter("10 PRINT \"SAVED\"");
    r.enter("SAVE \"prog.bas\"");
    assert_eq!(exec(&mut r), "");
    r.enter("SAVE \"prog.pak\"");
    assert_eq!(exec(&mut r), "");
    assert!(dir.join("prog.bas").exists());

    let mut r = runtime_in(dir.clone());
    r.enter("LOAD \"prog.pak\"");
    assert_eq!(exec(&mut r), "");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "SAVED\n");
    r.enter("LOAD \"missing.bas\"");
    assert!(exec(&mut r).starts_with("?FILE NOT FOUND"));
}
