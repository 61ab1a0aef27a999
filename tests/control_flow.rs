#[path = "../src/tests/util.rs"]
mod util;

use pretty_assertions::assert_eq;
use util::{eval_err, eval_last, eval_ok, run_glint_source};

#[test]
fn while_loop_mutates_outer_counter() {
    let source = r#"
i = 0
total = 0
while i < 5 {
    i = i + 1
    total = total + i
}
total
"#;
    assert_eq!(eval_last(source), "15");
}

#[test]
fn break_and_continue_in_while() {
    let output = run_glint_source(
        r#"
i = 0
while true {
    i = i + 1
    if i == 2 { continue; }
    if i > 4 { break; }
    print(i)
}
"#,
    );
    assert_eq!(output, "1\n3\n4\n");
}

#[test]
fn for_iterates_lists_and_string_characters() {
    let output = run_glint_source(
        r#"
for n in (3, 1, 2) { print(n) }
for ch in "ok" { print(ch) }
for n in range(1, 10) {
    if n % 2 == 0 { continue; }
    if n > 5 { break; }
    print("odd", n)
}
"#,
    );
    assert_eq!(output, "3\n1\n2\no\nk\nodd 1\nodd 3\nodd 5\n");
}

#[test]
fn loop_variable_is_scoped_to_each_iteration() {
    assert_eq!(
        eval_err("for x in (1, 2) { }\nx"),
        "error at line 2: undefined variable 'x'"
    );
}

#[test]
fn loops_evaluate_to_the_empty_block_result() {
    let results = eval_ok("while false { }\nfor x in () { }");
    assert!(results.iter().all(|value| value.is_empty_result()));
}

#[test]
fn for_rejects_non_iterables() {
    assert_eq!(
        eval_err("for x in 5 { }"),
        "error at line 1: expected List or String, got Number"
    );
}

#[test]
fn if_yields_the_value_of_the_taken_branch() {
    assert_eq!(eval_last("if 1 > 2 { \"a\" } else { \"b\" }"), "b");
    assert_eq!(
        eval_last("n = 0\nif n > 0 { \"pos\" } else if n < 0 { \"neg\" } else { \"zero\" }"),
        "zero"
    );
    assert!(eval_ok("if false { 1 }")[0].is_empty_result());
}

#[test]
fn if_blocks_share_the_enclosing_frame() {
    assert_eq!(eval_last("if true { created = 9 }\ncreated"), "9");
}

#[test]
fn return_unwinds_nested_loops_and_conditionals() {
    let source = r#"
find = func(xs, target) {
    for x in xs {
        i = 0
        while i < 3 {
            if x == target {
                when true { is true { return x * 10; } }
            }
            i = i + 1
        }
    }
    return;
}
(unwrap(find <- ((1, 2, 3), 2), -1), unwrap(find <- ((1, 2, 3), 9), -1))
"#;
    assert_eq!(eval_last(source), "(20, -1)");
}

#[test]
fn when_matches_first_equal_pattern() {
    let source = r#"
classify = func(n) {
    when {
        is n < 0 { "negative" }
        is n == 0 { "zero" }
        else { "positive" }
    }
}
(classify(-4), classify(0), classify(8))
"#;
    assert_eq!(eval_last(source), "((negative), (zero), (positive))");
}

#[test]
fn negated_when_matches_false_patterns() {
    assert_eq!(
        eval_last("when not { is 1 > 2 { \"first false\" } is false { \"second\" } }"),
        "first false"
    );
    assert!(eval_ok("when 3 { is 4 { 1 } }")[0].is_empty_result());
}

#[test]
fn stray_signals_become_errors() {
    assert_eq!(eval_err("\nbreak"), "error at line 2: break outside of a loop");
    assert_eq!(eval_err("continue"), "error at line 1: continue outside of a loop");
    assert_eq!(eval_err("return 3"), "error at line 1: return outside of a function");
}

#[test]
fn break_cannot_cross_a_function_boundary() {
    let source = r#"
stop = func() {
    break;
}
while true {
    stop()
}
"#;
    assert_eq!(eval_err(source), "error at line 3: break outside of a loop");
}
