/*!
## Terminal Module

Interactive front end: a linefeed line editor drives the interpreter,
with history, Ctrl-C as BREAK, and completion of stored lines by number.

*/

extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;

use crate::lang::Number;
use crate::mach::{InputCharResult, Interpreter, Io};
use ansi_term::Style;
use linefeed::complete::Suffix;
use linefeed::{Completer, Completion, DefaultTerminal, Interface, Prompter, ReadResult, Terminal};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    if std::env::args().count() > 2 {
        println!("Usage: tinybasic [FILENAME]");
        return;
    }
    let filename = std::env::args().nth(1);
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted, filename) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>, filename: Option<String>) -> std::io::Result<()> {
    let interface = Arc::new(Interface::new("tinybasic")?);
    let mut interp = Interpreter::new(TermIo::new(interface.clone()));

    if let Some(filename) = filename {
        // batch mode: feed the file through the interpreter, run it, exit
        let text = match fs::read_to_string(&filename) {
            Ok(text) => text,
            Err(error) => {
                interface.write_fmt(format_args!("{}\n", error))?;
                return Ok(());
            }
        };
        interp.io_mut().queue_text(&text);
        interp.io_mut().queue_line("RUN");
        interp.io_mut().close_input();
        while !interp.is_terminated() && !interp.has_reached_end_of_input() {
            if interrupted.load(Ordering::SeqCst) {
                interp.interrupt();
                interrupted.store(false, Ordering::SeqCst);
            }
            interp.next();
        }
        interp.io_mut().flush_output();
        return Ok(());
    }

    loop {
        if interrupted.load(Ordering::SeqCst) {
            interp.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        }
        interp.next();
        if interp.is_terminated() {
            break;
        }
        if interp.io().needs_line() {
            interp.io_mut().flush_output();
            let saved_completer = interface.completer();
            interface.set_completer(Arc::new(LineCompleter::new(&interp)));
            let result = interface.read_line()?;
            interface.set_completer(saved_completer);
            match result {
                ReadResult::Input(text) => {
                    if !text.trim().is_empty() {
                        interface.add_history_unique(text.clone());
                    }
                    interp.io_mut().queue_line(&text);
                }
                ReadResult::Signal(_) | ReadResult::Eof => break,
            }
        }
    }
    Ok(())
}

/// Adapter between the interpreter and the linefeed interface. Input
/// arrives a whole line at a time from the editor and drains out as bytes;
/// output is buffered and flushed at line boundaries.
struct TermIo {
    interface: Arc<Interface<DefaultTerminal>>,
    pending: VecDeque<u8>,
    output: String,
    needs_line: bool,
    closed: bool,
}

impl TermIo {
    fn new(interface: Arc<Interface<DefaultTerminal>>) -> TermIo {
        TermIo {
            interface,
            pending: VecDeque::new(),
            output: String::new(),
            needs_line: false,
            closed: false,
        }
    }

    fn queue_line(&mut self, text: &str) {
        self.pending.extend(text.bytes());
        self.pending.push_back(b'\n');
        self.needs_line = false;
    }

    fn queue_text(&mut self, text: &str) {
        self.pending.extend(text.bytes());
        if !text.ends_with('\n') {
            self.pending.push_back(b'\n');
        }
    }

    /// After this, an empty queue reads as end of stream, not `Waiting`.
    fn close_input(&mut self) {
        self.closed = true;
    }

    fn needs_line(&self) -> bool {
        self.needs_line
    }

    fn flush_output(&mut self) {
        if !self.output.is_empty() {
            let _ = self
                .interface
                .write_fmt(format_args!("{}", self.output));
            self.output.clear();
        }
    }
}

impl Io for TermIo {
    fn get_input_char(&mut self) -> InputCharResult {
        match self.pending.pop_front() {
            Some(c) => InputCharResult::Value(c),
            None => {
                if self.closed {
                    InputCharResult::EndOfStream
                } else {
                    self.needs_line = true;
                    InputCharResult::Waiting
                }
            }
        }
    }

    fn put_output_char(&mut self, c: u8) {
        self.output.push(c as char);
        if c == b'\n' {
            self.flush_output();
        }
    }

    fn show_command_prompt(&mut self) {
        self.flush_output();
        let _ = self.interface.set_prompt("> ");
    }

    fn show_input_prompt(&mut self) {
        self.flush_output();
        let _ = self.interface.set_prompt("? ");
    }

    fn show_error_message(&mut self, message: &str) {
        self.flush_output();
        let text = format!("?{}", message);
        let _ = self
            .interface
            .write_fmt(format_args!("{}\n", Style::new().bold().paint(text)));
    }

    fn show_debug_trace_message(&mut self, message: &str) {
        self.flush_output();
        let _ = self.interface.write_fmt(format_args!("{}\n", message));
    }

    fn bye(&mut self) {
        self.flush_output();
        let _ = self.interface.write_fmt(format_args!("GOODBYE\n"));
    }

    fn save_program(&mut self, filename: &str, text: &str) {
        if text.is_empty() {
            self.show_error_message("NOTHING TO SAVE");
            return;
        }
        if let Err(error) = fs::write(filename, text) {
            self.show_error_message(&format!("SAVE FAILED; {}", error));
        }
    }

    fn load_program(&mut self, filename: &str) -> Option<String> {
        match fs::read_to_string(filename) {
            Ok(text) => Some(text),
            Err(error) => {
                self.show_error_message(&format!("LOAD FAILED; {}", error));
                None
            }
        }
    }

    fn files(&mut self) {
        self.flush_output();
        match fs::read_dir(".") {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let _ = self
                        .interface
                        .write_fmt(format_args!("{}\n", entry.file_name().to_string_lossy()));
                }
            }
            Err(error) => self.show_error_message(&format!("FILES FAILED; {}", error)),
        }
    }
}

/// Typing a line number at the prompt and pressing tab recalls the stored
/// line for editing.
struct LineCompleter {
    lines: HashMap<Number, String>,
}

impl LineCompleter {
    fn new<IO: Io>(interp: &Interpreter<IO>) -> LineCompleter {
        let lines = interp
            .program()
            .lines()
            .map(|(number, statement)| (*number, format!("{} {}", number, statement)))
            .collect();
        LineCompleter { lines }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        if let Ok(number) = prompter.buffer().trim().parse::<Number>() {
            if let Some(s) = self.lines.get(&number) {
                let mut comp = Completion::simple(s.clone());
                comp.suffix = Suffix::None;
                return Some(vec![comp]);
            }
        }
        None
    }
}
