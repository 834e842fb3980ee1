#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use tinybasic::mach::{InputCharResult, Interpreter, Io};

/// Capture adapter: queued bytes in, everything observable out.
pub struct TestIo {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub errors: Vec<String>,
    pub traces: Vec<String>,
    pub command_prompts: usize,
    pub input_prompts: usize,
    pub storage: HashMap<String, String>,
    pub clipboard: Option<String>,
    pub said_bye: bool,
    /// When false, an empty queue reads as `Waiting` instead of end of
    /// stream, which is how an interactive adapter behaves.
    pub eof_when_empty: bool,
}

impl TestIo {
    pub fn new() -> TestIo {
        TestIo {
            input: VecDeque::new(),
            output: Vec::new(),
            errors: Vec::new(),
            traces: Vec::new(),
            command_prompts: 0,
            input_prompts: 0,
            storage: HashMap::new(),
            clipboard: None,
            said_bye: false,
            eof_when_empty: true,
        }
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Io for TestIo {
    fn get_input_char(&mut self) -> InputCharResult {
        match self.input.pop_front() {
            Some(c) => InputCharResult::Value(c),
            None => {
                if self.eof_when_empty {
                    InputCharResult::EndOfStream
                } else {
                    InputCharResult::Waiting
                }
            }
        }
    }

    fn put_output_char(&mut self, c: u8) {
        self.output.push(c);
    }

    fn show_command_prompt(&mut self) {
        self.command_prompts += 1;
    }

    fn show_input_prompt(&mut self) {
        self.input_prompts += 1;
    }

    fn show_error_message(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_debug_trace_message(&mut self, message: &str) {
        self.traces.push(message.to_string());
    }

    fn bye(&mut self) {
        self.said_bye = true;
    }

    fn save_program(&mut self, filename: &str, text: &str) {
        self.storage.insert(filename.to_string(), text.to_string());
    }

    fn load_program(&mut self, filename: &str) -> Option<String> {
        match self.storage.get(filename) {
            Some(text) => Some(text.clone()),
            None => {
                self.show_error_message("FILE NOT FOUND");
                None
            }
        }
    }

    fn clip_save(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn clip_load(&mut self) -> Option<String> {
        match self.clipboard.clone() {
            Some(text) => Some(text),
            None => {
                self.show_error_message("CLIPBOARD EMPTY");
                None
            }
        }
    }
}

/// Feed `input` to a fresh interpreter, run to end of input, and hand back
/// the adapter for inspection.
pub fn interpret(input: &str) -> TestIo {
    let mut io = TestIo::new();
    io.input = input.bytes().collect();
    let mut interp = Interpreter::new(io);
    interp.run_until_end_of_input();
    interp.into_io()
}

/// Just the characters the interpreter emitted for `input`.
pub fn output_of(input: &str) -> String {
    interpret(input).output_string()
}
