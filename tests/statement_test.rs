mod common;
use common::*;

#[test]
fn test_hello() {
    assert_eq!(output_of("10 PRINT \"HELLO\"\n20 END\nRUN\n"), "HELLO\n");
}

#[test]
fn test_gosub_return() {
    let source = "10 GOSUB 40\n20 PRINT \"B\"\n30 END\n40 PRINT \"A\"\n50 RETURN\nRUN\n";
    assert_eq!(output_of(source), "A\nB\n");
}

#[test]
fn test_return_stack_is_balanced_after_run() {
    let io = interpret("10 GOSUB 30\n20 END\n30 RETURN\nRUN\nRETURN\n");
    assert_eq!(io.output_string(), "");
    // the immediate RETURN proves the stack was empty when the run ended
    assert_eq!(io.errors, vec!["RETURN WITHOUT GOSUB"]);
}

#[test]
fn test_if_then() {
    assert_eq!(output_of("IF 1 < 2 THEN PRINT \"YES\"\n"), "YES\n");
    assert_eq!(output_of("IF 2 < 1 THEN PRINT \"NO\"\n"), "");
    assert_eq!(output_of("IF 3 <> 4 PRINT \"T\"\n"), "T\n");
}

#[test]
fn test_if_can_jump() {
    let source = "10 IF 1 = 1 THEN GOTO 40\n20 PRINT \"NO\"\n30 END\n40 PRINT \"YES\"\n50 END\nRUN\n";
    assert_eq!(output_of(source), "YES\n");
}

#[test]
fn test_goto_from_the_prompt_starts_running() {
    assert_eq!(output_of("10 PRINT \"X\"\n20 END\nGOTO 10\n"), "X\n");
}

#[test]
fn test_goto_unknown_line_aborts() {
    let io = interpret("GOTO 10\n");
    assert_eq!(io.errors, vec!["UNDEFINED LINE"]);
}

#[test]
fn test_run_clears_variables() {
    let source = "10 PRINT A\n20 END\nA=9\nRUN\n";
    assert_eq!(output_of(source), "0\n");
}

#[test]
fn test_run_with_no_program_is_a_quiet_no_op() {
    let io = interpret("RUN\nPRINT 1\n");
    assert_eq!(io.output_string(), "1\n");
    assert!(io.errors.is_empty());
}

#[test]
fn test_print_separators() {
    assert_eq!(output_of("PRINT 1,2\n"), "1\t2\n");
    assert_eq!(output_of("PRINT 1;2\n"), "12\n");
    assert_eq!(output_of("PRINT \"A\";\n"), "A");
    assert_eq!(output_of("PRINT\n"), "\n");
}

#[test]
fn test_empty_line_is_a_no_op() {
    let io = interpret("\n\nPRINT 1\n");
    assert_eq!(io.output_string(), "1\n");
    assert!(io.errors.is_empty());
}

#[test]
fn test_syntax_error_discards_the_line() {
    let io = interpret("PRINT $\nPRINT 2\n");
    assert_eq!(io.errors, vec!["SYNTAX ERROR"]);
    assert_eq!(io.output_string(), "2\n");
}

#[test]
fn test_bare_line_number_deletes() {
    let source = "10 PRINT 1\n20 PRINT 2\n10\nLIST\n";
    assert_eq!(output_of(source), "20 PRINT 2\n");
    // deleting a line that was never entered is not an error
    let io = interpret("99\n");
    assert!(io.errors.is_empty());
}

#[test]
fn test_entering_a_line_twice_replaces_it() {
    let source = "10 PRINT 1\n10 PRINT 9\nLIST\nRUN\n";
    assert_eq!(output_of(source), "10 PRINT 9\n9\n");
}

#[test]
fn test_clear_erases_everything() {
    let io = interpret("10 PRINT 1\nA=5\nCLEAR\nLIST\nPRINT A\n");
    assert_eq!(io.output_string(), "0\n");
    assert!(io.errors.is_empty());
}

#[test]
fn test_rem_does_nothing() {
    let io = interpret("10 REM GREETING PROGRAM\n20 END\nRUN\n");
    assert_eq!(io.output_string(), "");
    assert!(io.errors.is_empty());
}

#[test]
fn test_tron_traces_line_numbers() {
    let io = interpret("TRON\n10 PRINT 1\n20 END\nRUN\n");
    assert_eq!(io.traces, vec!["[10]", "[20]"]);
    assert_eq!(io.output_string(), "1\n");
}

#[test]
fn test_troff_stops_tracing() {
    let io = interpret("TRON\nTROFF\n10 END\nRUN\n");
    assert!(io.traces.is_empty());
}

#[test]
fn test_bye_terminates() {
    let io = interpret("BYE\nPRINT 1\n");
    assert!(io.said_bye);
    assert_eq!(io.output_string(), "");
}

#[test]
fn test_help_prints_usage() {
    let io = interpret("HELP\n");
    assert!(io.output_string().contains("STATEMENTS"));
    assert!(io.output_string().contains("GOSUB"));
}
