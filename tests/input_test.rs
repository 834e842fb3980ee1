mod common;
use common::*;

#[test]
fn test_two_values_on_one_line() {
    let io = interpret("10 INPUT A,B\n20 PRINT A+B\n30 END\nRUN\n7,8\n");
    assert_eq!(io.output_string(), "15\n");
    assert_eq!(io.input_prompts, 1);
}

#[test]
fn test_values_can_span_lines() {
    let io = interpret("10 INPUT A,B\n20 PRINT A*B\n30 END\nRUN\n6\n7\n");
    assert_eq!(io.output_string(), "42\n");
    assert_eq!(io.input_prompts, 2);
}

#[test]
fn test_signed_values() {
    assert_eq!(
        output_of("10 INPUT A\n20 PRINT A\n30 END\nRUN\n-12\n"),
        "-12\n"
    );
    assert_eq!(
        output_of("10 INPUT A\n20 PRINT A\n30 END\nRUN\n+4\n"),
        "4\n"
    );
}

#[test]
fn test_variable_reference_substitutes_its_value() {
    let source = "10 INPUT A\n20 INPUT B\n30 PRINT B\n40 END\nRUN\n9\nA\n";
    assert_eq!(output_of(source), "9\n");
}

#[test]
fn test_bad_value_reprompts_without_aborting() {
    let io = interpret("10 INPUT A\n20 PRINT A\n30 END\nRUN\n!!\n5\n");
    assert_eq!(io.output_string(), "5\n");
    assert_eq!(
        io.errors,
        vec!["INVALID INPUT; TYPE A NUMBER OR A VARIABLE NAME"]
    );
    assert_eq!(io.input_prompts, 2);
}

#[test]
fn test_end_of_stream_during_input_aborts_the_run() {
    let io = interpret("10 INPUT A\nRUN\n");
    assert_eq!(io.errors, vec!["INPUT PAST END IN 10"]);
}

#[test]
fn test_immediate_input() {
    let io = interpret("INPUT A\n3\nPRINT A\n");
    assert_eq!(io.output_string(), "3\n");
    assert_eq!(io.input_prompts, 1);
}

#[test]
fn test_input_to_array_element() {
    assert_eq!(output_of("INPUT @(2)\n44\nPRINT @(2)\n"), "44\n");
}

#[test]
fn test_input_subscript_out_of_range_aborts() {
    let io = interpret("DIM @(2)\nINPUT @(5)\n7\n");
    assert_eq!(io.errors, vec!["SUBSCRIPT OUT OF RANGE"]);
}
