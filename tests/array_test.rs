mod common;
use common::*;

#[test]
fn test_dim_store_and_read() {
    let io = interpret("DIM @(3)\n@(0)=5\nPRINT @(0)\n@(3)=1\n");
    assert_eq!(io.output_string(), "5\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE"]);
    // the prompt comes back after the abort
    assert_eq!(io.command_prompts, 5);
}

#[test]
fn test_default_array_has_1024_elements() {
    assert_eq!(output_of("@(1023)=7\nPRINT @(1023)\n"), "7\n");
    let io = interpret("@(1024)=7\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE"]);
}

#[test]
fn test_subscripts_are_zero_based() {
    assert_eq!(output_of("DIM @(3)\n@(0)=1\nPRINT @(0)\n"), "1\n");
}

#[test]
fn test_negative_subscript_aborts() {
    let io = interpret("PRINT @(-1)\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE"]);
}

#[test]
fn test_dim_zero_leaves_no_elements() {
    let io = interpret("DIM @(0)\n@(0)=1\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE"]);
}

#[test]
fn test_dim_negative_aborts() {
    let io = interpret("DIM @(-1)\n");
    assert_eq!(
        io.errors,
        vec!["ILLEGAL FUNCTION CALL; ARRAY SIZE MUST NOT BE NEGATIVE"]
    );
}

#[test]
fn test_subscript_errors_name_the_line_while_running() {
    let io = interpret("10 DIM @(2)\n20 @(9)=1\nRUN\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE IN 20"]);
}

#[test]
fn test_run_zeroes_array_values_but_keeps_size() {
    let source = "10 PRINT @(0)\n20 END\n@(0)=9\nRUN\n";
    assert_eq!(output_of(source), "0\n");
    // a DIM survives RUN: subscript 5 stays valid on a DIM @(9) array
    let io = interpret("DIM @(9)\n10 @(5)=1\n20 PRINT @(5)\n30 END\nRUN\n");
    assert_eq!(io.output_string(), "1\n");
    assert!(io.errors.is_empty());
}

#[test]
fn test_subscript_expressions() {
    assert_eq!(output_of("A=2\n@(A+1)=6\nPRINT @(3)\n"), "6\n");
}
