#[path = "../src/tests/util.rs"]
mod util;

use glint::ast::Node;
use pretty_assertions::assert_eq;
use util::{eval_last, eval_ok, run, run_glint_source};

#[test]
fn range_counts_down_when_start_exceeds_end() {
    assert_eq!(eval_last("range(5,0)"), "(5, 4, 3, 2, 1, 0)");
}

#[test]
fn send_wraps_function_result_in_monad() {
    let results = eval_ok(
        r#"
divide = func(a,b){ a/b; }
divide <- (10,2)
unwrap(divide <- (10,2), -1)
"#,
    );
    assert!(results[0].is_empty_result());
    assert_eq!(results[1], Node::list(0, vec![Node::number(0, 5.0)]));
    assert_eq!(results[2], Node::number(0, 5.0));
}

#[test]
fn empty_function_body_produces_empty_monad() {
    let results = eval_ok(
        r#"
f = func() {}
f <- ()
unwrap(f <- (), "x")
"#,
    );
    assert_eq!(results[1], Node::list(0, vec![]));
    assert_eq!(results[2], Node::string(0, "x"));
}

#[test]
fn print_writes_space_joined_line_and_yields_empty_result() {
    let run = run("print(1,2,3)");
    let results = run.results.unwrap();
    assert_eq!(run.output, "1 2 3\n");
    assert!(results[0].is_empty_result());
}

#[test]
fn print_without_arguments_emits_bare_newline() {
    assert_eq!(run_glint_source("print()"), "\n");
    assert_eq!(run_glint_source("print"), "\n");
}

#[test]
fn print_statement_matches_print_builtin() {
    let output = run_glint_source(
        r#"
xs = (1, "two", (3, 4))
print xs, true
print(xs, true)
"#,
    );
    assert_eq!(output, "(1, two, (3, 4)) true\n(1, two, (3, 4)) true\n");
}

#[test]
fn call_syntax_on_user_function_also_returns_monad() {
    let results = eval_ok(
        r#"
add = func(a, b) { return a + b; }
add(2, 3)
unwrap(add(2, 3), 0) * 2
"#,
    );
    assert_eq!(results[1].to_string(), "(5)");
    assert_eq!(results[2].to_string(), "10");
}

#[test]
fn builtins_can_be_sent_argument_lists() {
    assert_eq!(eval_last("len <- (\"hello\")"), "5");
    assert_eq!(eval_last("r = range; r <- (1, 3)"), "(1, 2, 3)");
}

#[test]
fn fizzbuzz_program() {
    let output = run_glint_source(
        r#"
fizzbuzz = func(n) {
    when 0 {
        is n % 15 { return "FizzBuzz"; }
        is n % 3 { return "Fizz"; }
        is n % 5 { return "Buzz"; }
    }
    n
}
for i in range(1, 15) {
    print(unwrap(fizzbuzz <- (i), "?"))
}
"#,
    );
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[2], "Fizz");
    assert_eq!(lines[4], "Buzz");
    assert_eq!(lines[13], "14");
    assert_eq!(lines[14], "FizzBuzz");
}

#[test]
fn recursion_through_global_binding() {
    let source = r#"
fact = func(n) {
    if n <= 1 { return 1; }
    n * unwrap(fact <- (n - 1), 0)
}
unwrap(fact <- (10), 0)
"#;
    assert_eq!(eval_last(source), "3628800");
}

#[test]
fn input_reads_one_line_after_prompt() {
    let run = util::run_with_input(
        r#"
name = input("name? ")
print("hi", name)
second = input("> ")
second
"#,
        "ada\r\nbob\n",
    );
    let results = run.results.unwrap();
    assert_eq!(run.output, "name? hi ada\n> ");
    assert_eq!(results[3], Node::string(0, "bob"));
}

#[test]
fn input_at_end_of_stream_returns_empty_string() {
    let run = util::run_with_input("input(\"? \")", "");
    assert_eq!(run.results.unwrap()[0], Node::string(0, ""));
}

#[test]
fn evaluation_stops_at_first_error_without_partial_results() {
    let run = run(
        r#"
print("before")
missing + 1
print("after")
"#,
    );
    assert_eq!(run.output, "before\n");
    let err = run.results.unwrap_err();
    assert_eq!(err.to_string(), "error at line 3: undefined variable 'missing'");
}

#[test]
fn print_can_be_sent_an_argument_list() {
    let run = run("print <- (1, 2)\nprint == print");
    let results = run.results.unwrap();
    assert_eq!(run.output, "1 2\n");
    assert!(results[0].is_empty_result());
    assert_eq!(results[1], Node::boolean(0, true));
}
