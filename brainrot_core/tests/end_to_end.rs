//! End-to-end scenarios driving the full lex -> parse -> execute pipeline,
//! matching the literal example programs used to pin down print-dispatch
//! and control-flow semantics.

use brainrot_core::executor::Interpreter;
use brainrot_core::lexer::tokenize;
use brainrot_core::parser::parse;
use brainrot_core::print::BufferSink;

fn run_capturing(source: &str) -> (String, String) {
    let tokens = tokenize(source).expect("lex should succeed");
    let ast = parse(tokens).expect("parse should succeed");
    let stdout = BufferSink::default();
    let stderr = BufferSink::default();
    let mut interp = Interpreter::new(Box::new(stdout.clone()), Box::new(stderr.clone()));
    interp.run(&ast);
    (stdout.contents(), stderr.contents())
}

#[test]
fn increment_then_print_formats_with_d_specifier() {
    let (stdout, _stderr) = run_capturing(
        r#"
        x = 41;
        x = x + 1;
        yapping("%d\n", x);
        "#,
    );
    assert_eq!(stdout, "42\n");
}

#[test]
fn switch_with_fallthrough_then_break_runs_both_cases() {
    let (stdout, _stderr) = run_capturing(
        r#"
        x = 1;
        pakad (x) {
            keis 1:
                yapping("one\n");
            keis 2:
                yapping("two\n");
                chudail;
            keis 3:
                yapping("three\n");
        }
        "#,
    );
    assert_eq!(stdout, "one\ntwo\n");
}

#[test]
fn division_by_zero_reports_and_continues_with_zero() {
    let (stdout, _stderr) = run_capturing(
        r#"
        x = 5 / 0;
        yapping("%d\n", x);
        "#,
    );
    assert_eq!(stdout, "0\n");
}

#[test]
fn boolean_variable_prints_as_word_without_d_specifier() {
    let (stdout, _stderr) = run_capturing(
        r#"
        boolean b = yes;
        yapping("val=%s", b);
        "#,
    );
    assert_eq!(stdout, "val=yes");
}

#[test]
fn float_assigned_then_printed_with_precision() {
    let (stdout, _stderr) = run_capturing(
        r#"
        f = 2.5;
        yapping("%.1f\n", f);
        "#,
    );
    assert_eq!(stdout, "2.5\n");
}

#[test]
fn for_loop_accumulates_and_breaks_early() {
    let (stdout, _stderr) = run_capturing(
        r#"
        total = 0;
        kdegi (i = 0; i < 10; i = i + 1) {
            agar (i == 3) {
                chudail;
            }
            total = total + i;
        }
        yapping("%d\n", total);
        "#,
    );
    assert_eq!(stdout, "3\n");
}

#[test]
fn baka_routes_to_stderr_not_stdout() {
    let (stdout, stderr) = run_capturing(
        r#"
        baka("uh oh\n");
        "#,
    );
    assert_eq!(stdout, "");
    assert_eq!(stderr, "uh oh\n");
}
