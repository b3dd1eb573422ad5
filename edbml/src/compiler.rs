use log::{trace, warn};

use crate::markup;
use crate::output::{OUT, Output};
use crate::runner::{Runner, Scanner};
use crate::status::{Capture, Mode, Status};

/// Prefix of generated helper names.
pub const PREFIX: &str = "$edb";

const PROLOGUE: &str = "'use strict';\n";

/// Issues unique helper names. Lives as long as the compiler that owns it,
/// so names are never reused across compilations.
#[derive(Debug)]
pub struct Names {
    next: usize,
}

impl Default for Names {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl Names {
    pub fn next_name(&mut self) -> String {
        let name = format!("{PREFIX}{}", self.next);
        self.next += 1;
        name
    }

    /// How many names have been handed out so far.
    pub fn issued(&self) -> usize {
        self.next - 1
    }
}

/// Character handler for one [`Mode`].
pub type Handler = fn(char, &Runner, &mut Status, &mut Output, &mut Names);

impl Mode {
    pub fn handler(self) -> Handler {
        match self {
            Mode::Script => script,
            Mode::Markup => markup::markup,
            Mode::Tag => tag,
        }
    }
}

/// Compiles template text into a function body, character by character.
#[derive(Debug, Default)]
pub struct Compiler {
    names: Names,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn compile(&mut self, script: &str) -> String {
        let mut runner = Runner::new();
        let mut status = Status::new();
        let mut output = Output::new(PROLOGUE);
        runner.run(self, script, &mut status, &mut output);
        if let Some(capture) = status.capture.take() {
            warn!("{capture:?} capture still open at end of input, dropped");
            output.take_temp();
        }
        if status.is_markup() {
            output.close();
        }
        output.code(&format!("\nreturn {OUT}.write ();"));
        trace!(
            "compiled {} nodes, {} outlines",
            output.nodes().len(),
            output.outlines().len()
        );
        output.unparse()
    }
}

impl Scanner for Compiler {
    fn newline(&mut self, runner: &Runner, status: &mut Status, _output: &mut Output) {
        status.adds = runner.first() == Some('+');
        status.cont =
            status.cont || (status.is_markup() && status.adds && !status.capturing());
    }

    fn nextchar(
        &mut self,
        c: char,
        runner: &Runner,
        status: &mut Status,
        output: &mut Output,
    ) {
        (status.mode.handler())(c, runner, status, output, &mut self.names);
        if status.consume() {
            emit(c, status, output);
        }
    }

    fn endline(&mut self, _runner: &Runner, status: &mut Status, output: &mut Output) {
        match status.capture {
            Some(Capture::Peek) => output.peek_push('\n'),
            Some(Capture::Poke | Capture::Geek) => output.temp_push('\n'),
            None if status.is_markup() && !status.cont => {
                output.close();
                output.code("\n");
                status.go_script();
            }
            None if status.is_markup() => output.line_break(),
            None => output.code("\n"),
        }
        status.cont = false;
    }
}

/// Default emission of a character nobody consumed.
fn emit(c: char, status: &Status, output: &mut Output) {
    match (status.capture, status.mode) {
        (Some(Capture::Peek), _) => output.peek_push(c),
        (Some(Capture::Poke | Capture::Geek), _) => output.temp_push(c),
        (None, Mode::Script) => output.code_char(c),
        (None, Mode::Markup) => output.text(c),
        (None, Mode::Tag) => {}
    }
}

fn script(
    c: char,
    runner: &Runner,
    status: &mut Status,
    output: &mut Output,
    _names: &mut Names,
) {
    match c {
        '<' if runner.first_char() => {
            status.spot = output.open();
            status.go_markup();
        }
        // reserved for the @ macro
        '@' => {}
        _ => {}
    }
}

fn tag(
    c: char,
    runner: &Runner,
    status: &mut Status,
    _output: &mut Output,
    _names: &mut Names,
) {
    match c {
        '$' if runner.ahead("{") => {
            status.refs = true;
            status.skip = 2;
        }
        '>' => {
            status.go_script();
            status.skip = 1;
        }
        _ => {}
    }
}
