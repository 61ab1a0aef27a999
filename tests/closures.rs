#[path = "../src/tests/util.rs"]
mod util;

use pretty_assertions::assert_eq;
use util::{eval_err, eval_last, eval_ok};

#[test]
fn counter_closure_keeps_mutating_its_captured_frame() {
    let source = r#"
make_counter = func() {
    count = 0
    func() { count = count + 1; count }
}
counter = unwrap(make_counter(), 0)
counter()
counter()
unwrap(counter(), 0)
"#;
    let results = eval_ok(source);
    assert_eq!(results[2].to_string(), "(1)");
    assert_eq!(results[3].to_string(), "(2)");
    assert_eq!(results[4].to_string(), "3");
}

#[test]
fn independent_counters_do_not_share_state() {
    let source = r#"
make_counter = func() {
    count = 0
    func() { count = count + 1; count }
}
a = unwrap(make_counter(), 0)
b = unwrap(make_counter(), 0)
a(); a()
(unwrap(a(), 0), unwrap(b(), 0))
"#;
    assert_eq!(eval_last(source), "(3, 1)");
}

#[test]
fn assignment_updates_an_outer_binding() {
    let source = r#"
total = 0
add = func(n) { total = total + n }
add(2)
add(3)
total
"#;
    assert_eq!(eval_last(source), "5");
}

#[test]
fn fresh_names_stay_local_to_the_call() {
    assert_eq!(
        eval_err("g = func() { fresh = 1 }\ng()\nfresh"),
        "error at line 3: undefined variable 'fresh'"
    );
}

#[test]
fn parameters_shadow_outer_bindings() {
    let source = r#"
x = 1
f = func(x) { x = x + 10; x }
(unwrap(f(5), 0), x)
"#;
    assert_eq!(eval_last(source), "(15, 1)");
}

#[test]
fn closures_resolve_names_where_they_were_defined() {
    let source = r#"
x = "global"
show = func() { x }
wrapper = func(x) { show() }
unwrap(unwrap(wrapper("local"), 0), 0)
"#;
    assert_eq!(eval_last(source), "global");
}

#[test]
fn defaults_see_earlier_parameters() {
    assert_eq!(eval_last("f = func(a, b = a * 2) { a + b }\nf(3)"), "(9)");
    assert_eq!(eval_last("f = func(a, b = a * 2) { a + b }\nf <- (3, 1)"), "(4)");
}

#[test]
fn argument_count_is_checked_for_user_functions() {
    assert_eq!(
        eval_err("f = func(a, b = 1) { a }\nf(1, 2, 3)"),
        "error at line 2: incorrect number of arguments. expected 2, got 3"
    );
    assert_eq!(
        eval_err("h = func(a, b) { a }\nh <- (1)"),
        "error at line 2: incorrect number of arguments. expected 2, got 1"
    );
}

#[test]
fn functions_are_first_class_values() {
    let source = r#"
apply = func(f, v) { f <- (v) }
apply(func(n) { n * 2 }, 4)
apply(len, "abc")
"#;
    let results = eval_ok(source);
    assert_eq!(results[1].to_string(), "((8))");
    assert_eq!(results[2].to_string(), "(3)");
}

#[test]
fn function_values_render_their_signature() {
    assert_eq!(eval_last("f = func(a, b = 1) { a }\nf"), "func(a, b = 1)");
    assert_eq!(eval_last("len"), "<builtin len>");
}

#[test]
fn calling_a_non_function_fails() {
    assert_eq!(
        eval_err("x = 3\nx <- (1)"),
        "error at line 2: expected Function, got Number"
    );
    assert_eq!(
        eval_err("\"text\"(1)"),
        "error at line 1: expected Function, got String"
    );
}

#[test]
fn functions_are_equal_only_to_themselves() {
    let source = r#"
f = func(a) { a }
g = func(a) { a }
h = f
(f == g, f == f, f == h, f != g)
when f { is g { "matched g" } is h { "matched h" } else { "none" } }
"#;
    let results = eval_ok(source);
    assert_eq!(results[3].to_string(), "(false, true, true, true)");
    assert_eq!(results[4].to_string(), "matched h");
}

#[test]
fn closures_from_separate_calls_are_distinct() {
    let source = r#"
make = func() { func() { 1 } }
a = unwrap(make(), 0)
b = unwrap(make(), 0)
a == b
"#;
    assert_eq!(eval_last(source), "false");
}
