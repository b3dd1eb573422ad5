/// Line-by-line, character-by-character scanner driver.
///
/// The [`Runner`] walks a source text once, forward only. For every line it
/// signals [`Scanner::newline`], then [`Scanner::nextchar`] for each
/// character, then [`Scanner::endline`]. While a character is being handled
/// the runner answers position and lookaround queries about the current
/// line.
///
/// Lines are split on `\n`; a trailing `\r` is dropped.
use crate::output::Output;
use crate::status::Status;

/// Receiver of scanner events.
pub trait Scanner {
    fn newline(&mut self, runner: &Runner, status: &mut Status, output: &mut Output);
    fn nextchar(
        &mut self,
        c: char,
        runner: &Runner,
        status: &mut Status,
        output: &mut Output,
    );
    fn endline(&mut self, runner: &Runner, status: &mut Status, output: &mut Output);
}

#[derive(Debug, Default)]
pub struct Runner {
    line: Vec<char>,
    index: usize,
    lineno: usize,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<S: Scanner>(
        &mut self,
        scanner: &mut S,
        source: &str,
        status: &mut Status,
        output: &mut Output,
    ) {
        for (lineno, line) in source.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.line = line.chars().collect();
            self.index = 0;
            self.lineno = lineno + 1;
            scanner.newline(self, status, output);
            for index in 0..self.line.len() {
                self.index = index;
                let c = self.line[index];
                scanner.nextchar(c, self, status, output);
            }
            scanner.endline(self, status, output);
        }
    }

    /// 1-based number of the current line.
    pub fn line_number(&self) -> usize {
        self.lineno
    }

    /// First character of the current line.
    pub fn first(&self) -> Option<char> {
        self.line.first().copied()
    }

    /// Index of the last character of the current line.
    pub fn last(&self) -> Option<usize> {
        self.line.len().checked_sub(1)
    }

    pub fn first_char(&self) -> bool {
        self.index == 0
    }

    pub fn last_char(&self) -> bool {
        self.last() == Some(self.index)
    }

    /// Does the text right after the current character start with `s`?
    pub fn ahead(&self, s: &str) -> bool {
        let want: Vec<char> = s.chars().collect();
        self.line
            .get(self.index + 1..)
            .is_some_and(|rest| rest.starts_with(&want))
    }

    /// Does the text right before the current character end with `s`?
    pub fn behind(&self, s: &str) -> bool {
        let want: Vec<char> = s.chars().collect();
        self.line[..self.index.min(self.line.len())].ends_with(&want)
    }

    /// Remaining text of the current line, after the current character.
    pub fn line_ahead(&self) -> String {
        self.line
            .get(self.index + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default()
    }
}
