use super::*;

#[test]
fn test_line_number() {
    let l = Line::new("10 print x\r\n");
    assert_eq!(l.number(), Some(10));
    assert_eq!(l.text(), "print x");
    assert_eq!(l.to_string(), "10 print x");
}

#[test]
fn test_direct() {
    let l = Line::new("list");
    assert!(l.is_direct());
    assert_eq!(l.statements(), ["list"]);
}

#[test]
fn test_delete_line() {
    let l = Line::new("20");
    assert_eq!(l.number(), Some(20));
    assert!(l.is_empty());
}

#[test]
fn test_split_outside_quotes() {
    let l = Line::new(r#"10 a$="x:y": ?a$ : b=1"#);
    assert_eq!(l.statements(), [r#"a$="x:y""#, "? a$", "b=1"]);
}

#[test]
fn test_print_shorthand() {
    let l = Line::new(r#"?"hi":? 2"#);
    assert_eq!(l.statements(), [r#"? "hi""#, "? 2"]);
}

#[test]
fn test_label() {
    let l = Line::new("100 !Main Loop:goto 10");
    assert_eq!(l.label(), Some("Main Loop"));
    assert_eq!(l.statements().len(), 2);
    assert_eq!(Line::new("110 print").label(), None);
}

#[test]
fn test_split_data() {
    assert_eq!(
        split_unquoted(r#"1,"a,b",3"#, ','),
        ["1", r#""a,b""#, "3"]
    );
}

#[test]
fn test_split_top_level() {
    assert_eq!(
        split_top_level(r#"A(1,2),B$(3),",""#, ','),
        ["A(1,2)", "B$(3)", r#"",""#]
    );
}

#[test]
fn test_find_keyword() {
    assert_eq!(find_keyword("I=1 TO 5", "to"), Some(4));
    assert_eq!(find_keyword("X=1THEN100", "then"), Some(3));
    assert_eq!(find_keyword(r#"A$="then" then 5"#, "THEN"), Some(10));
    assert_eq!(find_keyword("TOTAL=1", "to"), None);
    assert_eq!(find_keyword("ON N GOTO 10", "to"), None);
}

#[test]
fn test_find_assignment() {
    assert_eq!(find_assignment(r#"A(B=1)="=""#), Some(6));
    assert_eq!(find_assignment("PRINT 1"), None);
}
