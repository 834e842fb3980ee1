use super::io::{InputCharResult, Io};
use super::program::Program;
use super::stack::Stack;
use super::State;
use crate::error;
use crate::lang::ast::*;
use crate::lang::{parse, Error, InputPos, Number};
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Error>;

const DEFAULT_ARRAY_LEN: usize = 1024;

/// DIM beyond this aborts instead of exhausting the host.
const MAX_ARRAY_LEN: usize = 1 << 20;

const HELP_TEXT: &str = "\
STATEMENTS:
  PRINT item {,|; item}     PR and ? are synonyms
  [LET] var = expr          variables are A to Z, array is @(expr)
  INPUT var {, var}         IN is a synonym
  IF expr relop expr [THEN] statement
  GOTO expr   GOSUB expr   RETURN
  RUN   END   CLEAR   REM text
  LIST [low [, high]]
  DIM @(expr)
  SAVE \"name\"   LOAD \"name\"   FILES
  CLIPSAVE   CLIPLOAD
  TRON   TROFF   BYE   HELP
";

/// Result of attempting to read one line of input.
enum InputLineResult {
    Value(Vec<u8>),
    EndOfStream,
    Waiting,
}

/// Outcome of consuming INPUT values from one line.
enum Consume {
    Ok,
    Bad,
    Aborted,
}

/// The interpreter: program table, stores, return stack, and the driver
/// state machine, stepped cooperatively by [`Interpreter::next`].
pub struct Interpreter<IO: Io> {
    io: IO,
    state: State,
    vars: VariableBindings,
    array: Vec<Number>,
    rng: Rng,
    program: Program,
    program_index: usize,
    return_stack: Stack<usize>,
    trace: bool,
    input_line_buffer: Vec<u8>,
    input_lvalues: VecDeque<Lvalue>,
    state_before_input: State,
    has_reached_end_of_input: bool,
    terminated: bool,
}

impl<IO: Io> Interpreter<IO> {
    pub fn new(io: IO) -> Interpreter<IO> {
        Interpreter {
            io,
            state: State::Idle,
            vars: VariableBindings::new(),
            array: vec![0; DEFAULT_ARRAY_LEN],
            rng: Rng::new(),
            program: Program::new(),
            program_index: 0,
            return_stack: Stack::new("TOO MANY GOSUBS"),
            trace: false,
            input_line_buffer: Vec::new(),
            input_lvalues: VecDeque::new(),
            state_before_input: State::Idle,
            has_reached_end_of_input: false,
            terminated: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn has_reached_end_of_input(&self) -> bool {
        self.has_reached_end_of_input
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn into_io(self) -> IO {
        self.io
    }

    /// Read and interpret until end of input.
    ///
    /// Only valid when the adapter never returns `Waiting`; a host with an
    /// interactive adapter calls [`Interpreter::next`] in a loop instead.
    pub fn run_until_end_of_input(&mut self) {
        while !self.terminated && !self.has_reached_end_of_input {
            self.next();
        }
    }

    /// Perform the next unit of work. Never panics and never blocks beyond
    /// the adapter's own callbacks; all effects surface through the adapter.
    pub fn next(&mut self) {
        if self.terminated || self.has_reached_end_of_input {
            return;
        }
        match self.state {
            State::Idle => {
                self.io.show_command_prompt();
                self.state = State::ReadingStatement;
            }
            State::ReadingStatement => self.read_statement(),
            State::Running => self.execute_next_program_statement(),
            State::ReadingInput => self.continue_input(),
        }
    }

    /// Abort a running program, as Ctrl-C does in the terminal shell.
    ///
    /// An interrupt arrives between steps, so the line reported is the one
    /// that was about to execute.
    pub fn interrupt(&mut self) {
        match self.state {
            State::Running => {
                let line = self.program.get(self.program_index).map(|(n, _)| *n);
                let error = error!(Break).in_line_number(line);
                self.io.show_error_message(&error.to_string());
                self.end_run();
            }
            State::ReadingInput => self.abort_run(error!(Break)),
            State::Idle | State::ReadingStatement => {}
        }
    }

    fn read_statement(&mut self) {
        match self.read_input_line() {
            InputLineResult::Value(input) => {
                self.process_input(&input);
                if self.state == State::ReadingStatement {
                    self.state = State::Idle;
                }
            }
            InputLineResult::EndOfStream => self.has_reached_end_of_input = true,
            InputLineResult::Waiting => {}
        }
    }

    /// Assemble one line from the adapter. LF terminates; HT becomes a
    /// space; other control bytes (CR included) and non-ASCII bytes are
    /// dropped, so a CR-LF sequence ends a line but a lone CR does not.
    fn read_input_line(&mut self) -> InputLineResult {
        loop {
            match self.io.get_input_char() {
                InputCharResult::Value(c) => {
                    if c == b'\n' {
                        if self.io.is_interactive() {
                            self.io.put_output_char(b'\n');
                        }
                        return InputLineResult::Value(std::mem::take(
                            &mut self.input_line_buffer,
                        ));
                    }
                    let c = if c == b'\t' { b' ' } else { c };
                    if c < 0x20 || c > 0x7e {
                        continue;
                    }
                    self.input_line_buffer.push(c);
                    if self.io.is_interactive() {
                        self.io.put_output_char(c);
                    }
                }
                InputCharResult::EndOfStream => {
                    if self.input_line_buffer.is_empty() {
                        return InputLineResult::EndOfStream;
                    }
                    return InputLineResult::Value(std::mem::take(&mut self.input_line_buffer));
                }
                InputCharResult::Waiting => return InputLineResult::Waiting,
            }
        }
    }

    /// Parse a finished line and execute, insert, or delete.
    fn process_input(&mut self, input: &[u8]) {
        match parse::line(input) {
            Ok(parse::Line::Empty) => {}
            Ok(parse::Line::Delete(number)) => self.program.delete(number),
            Ok(parse::Line::Insert(number, statement)) => self.program.insert(number, statement),
            Ok(parse::Line::Immediate(statement)) => self.execute(&statement),
            Err(error) => self.io.show_error_message(&error.to_string()),
        }
    }

    fn execute_next_program_statement(&mut self) {
        let (number, statement) = match self.program.get(self.program_index) {
            Some((number, statement)) => (*number, statement.clone()),
            None => {
                // ran off the end of the program
                self.end_run();
                return;
            }
        };
        if self.trace {
            self.io.show_debug_trace_message(&format!("[{}]", number));
        }
        self.program_index += 1;
        self.execute(&statement);
    }

    fn execute(&mut self, statement: &Statement) {
        if let Err(error) = self.try_execute(statement) {
            self.abort_run(error);
        }
    }

    fn try_execute(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Print(list) => {
                let text = list.print_text(&self.vars, &self.array, &mut self.rng)?;
                for c in text {
                    self.io.put_output_char(c);
                }
                Ok(())
            }
            Statement::PrintNewline => {
                self.io.put_output_char(b'\n');
                Ok(())
            }
            Statement::Let(lvalue, expression) => {
                let value = self.evaluate(expression)?;
                self.assign(lvalue, value)
            }
            Statement::Input(lvalues) => {
                self.begin_input(lvalues);
                Ok(())
            }
            Statement::IfThen(lhs, op, rhs, consequent) => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                if op.is_true_for(lhs, rhs) {
                    self.try_execute(consequent)
                } else {
                    Ok(())
                }
            }
            Statement::Goto(expression) => self.goto(expression),
            Statement::Gosub(expression) => self.gosub(expression),
            Statement::Return => self.return_from_gosub(),
            Statement::Run => {
                self.run();
                Ok(())
            }
            Statement::End => {
                self.end_run();
                Ok(())
            }
            Statement::List(range) => self.list(range),
            Statement::Clear => {
                self.clear();
                Ok(())
            }
            Statement::Rem(_) => Ok(()),
            Statement::Dim(expression) => self.dim(expression),
            Statement::Save(name) => {
                let text = self.listing_text();
                self.io.save_program(name, &text);
                Ok(())
            }
            Statement::Load(name) => {
                if let Some(text) = self.io.load_program(name) {
                    self.replace_program(&text);
                }
                Ok(())
            }
            Statement::Files => {
                self.io.files();
                Ok(())
            }
            Statement::ClipSave => {
                let text = self.listing_text();
                self.io.clip_save(&text);
                Ok(())
            }
            Statement::ClipLoad => {
                if let Some(text) = self.io.clip_load() {
                    self.replace_program(&text);
                }
                Ok(())
            }
            Statement::Tron => {
                self.trace = true;
                Ok(())
            }
            Statement::Troff => {
                self.trace = false;
                Ok(())
            }
            Statement::Bye => {
                self.terminated = true;
                self.io.bye();
                Ok(())
            }
            Statement::Help => {
                self.write_str(HELP_TEXT);
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expression: &Expression) -> Result<Number> {
        expression.evaluate(&self.vars, &self.array, &mut self.rng)
    }

    fn assign(&mut self, lvalue: &Lvalue, value: Number) -> Result<()> {
        match lvalue {
            Lvalue::Var(name) => {
                self.vars.insert(*name, value);
                Ok(())
            }
            Lvalue::ArrayElement(subscript) => {
                let index = self.evaluate(subscript)?;
                if index < 0 || index as usize >= self.array.len() {
                    return Err(error!(SubscriptOutOfRange));
                }
                self.array[index as usize] = value;
                Ok(())
            }
        }
    }

    fn goto(&mut self, expression: &Expression) -> Result<()> {
        let number = self.evaluate(expression)?;
        match self.program.index_of(number) {
            Some(index) => {
                self.program_index = index;
                self.state = State::Running;
                Ok(())
            }
            None => Err(error!(UndefinedLine)),
        }
    }

    fn gosub(&mut self, expression: &Expression) -> Result<()> {
        let number = self.evaluate(expression)?;
        match self.program.index_of(number) {
            Some(index) => {
                // program_index already points past the GOSUB
                self.return_stack.push(self.program_index)?;
                self.program_index = index;
                self.state = State::Running;
                Ok(())
            }
            None => Err(error!(UndefinedLine)),
        }
    }

    fn return_from_gosub(&mut self) -> Result<()> {
        match self.return_stack.pop() {
            Some(index) => {
                self.program_index = index;
                Ok(())
            }
            None => Err(error!(ReturnWithoutGosub)),
        }
    }

    /// RUN clears variables, array values, and the return stack, but not
    /// the program. Running an empty program is a silent no-op.
    fn run(&mut self) {
        self.vars.clear();
        for element in self.array.iter_mut() {
            *element = 0;
        }
        self.return_stack.clear();
        self.program_index = 0;
        if self.program.is_empty() {
            self.end_run();
        } else {
            self.state = State::Running;
        }
    }

    fn end_run(&mut self) {
        self.state = State::Idle;
    }

    fn clear(&mut self) {
        self.program.clear();
        self.vars.clear();
        self.array = vec![0; DEFAULT_ARRAY_LEN];
        self.return_stack.clear();
    }

    fn dim(&mut self, expression: &Expression) -> Result<()> {
        let len = self.evaluate(expression)?;
        if len < 0 {
            return Err(error!(IllegalFunctionCall; "ARRAY SIZE MUST NOT BE NEGATIVE"));
        }
        if len as usize > MAX_ARRAY_LEN {
            return Err(error!(OutOfMemory; "ARRAY TOO LARGE"));
        }
        self.array = vec![0; len as usize];
        Ok(())
    }

    fn list(&mut self, range: &ListRange) -> Result<()> {
        let (low, high) = match range {
            ListRange::All => (Number::min_value(), Number::max_value()),
            ListRange::Single(e) => {
                let n = self.evaluate(e)?;
                (n, n)
            }
            ListRange::Range(low, high) => (self.evaluate(low)?, self.evaluate(high)?),
        };
        let mut text = String::new();
        for (number, statement) in self.program.lines() {
            if *number >= low && *number <= high {
                text.push_str(&format!("{} {}\n", number, statement));
            }
        }
        self.write_str(&text);
        Ok(())
    }

    /// Full-range listing text, the format SAVE and LOAD exchange.
    fn listing_text(&self) -> String {
        let mut text = String::new();
        for (number, statement) in self.program.lines() {
            text.push_str(&format!("{} {}\n", number, statement));
        }
        text
    }

    /// Replace the program with one parsed from listing text.
    fn replace_program(&mut self, text: &str) {
        self.program.clear();
        for source_line in text.lines() {
            let source_line = source_line.replace('\t', " ");
            match parse::line(source_line.as_bytes()) {
                Ok(parse::Line::Insert(number, statement)) => {
                    self.program.insert(number, statement)
                }
                Ok(parse::Line::Empty) => {}
                Ok(_) => self
                    .io
                    .show_error_message(&error!(SyntaxError; "UNNUMBERED LINE SKIPPED").to_string()),
                Err(error) => self.io.show_error_message(&error.to_string()),
            }
        }
    }

    fn begin_input(&mut self, lvalues: &[Lvalue]) {
        self.input_lvalues = lvalues.iter().cloned().collect();
        self.state_before_input = self.state;
        self.state = State::ReadingInput;
        self.io.show_input_prompt();
        self.continue_input();
    }

    /// Consume INPUT values until satisfied, out of input, or aborted.
    /// Called from `begin_input` and again on later ticks while more
    /// values are still owed.
    fn continue_input(&mut self) {
        loop {
            match self.read_input_line() {
                InputLineResult::Waiting => return,
                InputLineResult::EndOfStream => {
                    self.abort_run(error!(InputPastEnd));
                    return;
                }
                InputLineResult::Value(input) => match self.consume_input_values(&input) {
                    Consume::Aborted => return,
                    Consume::Bad => self.io.show_input_prompt(),
                    Consume::Ok => {
                        if self.input_lvalues.is_empty() {
                            self.finish_input();
                            return;
                        }
                        self.io.show_input_prompt();
                    }
                },
            }
        }
    }

    /// Take as many comma-separated values from `input` as there are
    /// lvalues waiting. Anything after the last value taken is discarded.
    fn consume_input_values(&mut self, input: &[u8]) -> Consume {
        let mut pos = InputPos::new(input);
        while let Some(lvalue) = self.input_lvalues.front().cloned() {
            match parse::input_expression(pos, &self.vars) {
                Some((value, next)) => {
                    if let Err(error) = self.assign(&lvalue, value) {
                        self.abort_run(error);
                        return Consume::Aborted;
                    }
                    self.input_lvalues.pop_front();
                    pos = next;
                    if self.input_lvalues.is_empty() {
                        break;
                    }
                    match crate::lang::literal(",", pos) {
                        Some((_, next)) => pos = next,
                        None => break,
                    }
                }
                None => {
                    self.io
                        .show_error_message("INVALID INPUT; TYPE A NUMBER OR A VARIABLE NAME");
                    return Consume::Bad;
                }
            }
        }
        Consume::Ok
    }

    fn finish_input(&mut self) {
        self.state = match self.state_before_input {
            State::Running => State::Running,
            _ => State::Idle,
        };
    }

    /// Report an unrecoverable statement error and stop any run.
    fn abort_run(&mut self, error: Error) {
        let running = self.state == State::Running
            || (self.state == State::ReadingInput && self.state_before_input == State::Running);
        let error = if running {
            error.in_line_number(self.current_line_number())
        } else {
            error
        };
        self.io.show_error_message(&error.to_string());
        self.end_run();
    }

    /// Line number of the statement being executed. The step model
    /// advances `program_index` before executing, hence the offset.
    fn current_line_number(&self) -> Option<Number> {
        if self.program_index == 0 {
            return None;
        }
        self.program.get(self.program_index - 1).map(|(n, _)| *n)
    }

    fn write_str(&mut self, text: &str) {
        for c in text.bytes() {
            self.io.put_output_char(c);
        }
    }
}
