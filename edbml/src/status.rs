/// Lexical mode of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Script text, copied through as statements.
    #[default]
    Script,
    /// Markup text, collected into a string literal on the output object.
    Markup,
    /// Inside an opening tag.
    Tag,
}

/// The capture operators recognized in markup text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// `${expr}` is spliced inline.
    Peek,
    /// `#{expr}` becomes a hoisted event callback.
    Poke,
    /// `?{expr}` becomes a hoisted getter.
    Geek,
}

/// Per-compilation scan state.
///
/// Captures are exclusive by construction: at most one is active.
#[derive(Debug, Default)]
pub struct Status {
    pub mode: Mode,
    /// Current line starts with `+`.
    pub adds: bool,
    /// The open string literal continues across this line boundary.
    pub cont: bool,
    pub capture: Option<Capture>,
    /// Brace depth of the active capture.
    pub curl: usize,
    /// Characters still to be withheld from default emission.
    pub skip: usize,
    /// Anchor for hoisted outlines of the current markup block.
    pub spot: usize,
    /// Tag-mode reference marker.
    pub refs: bool,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_script(&self) -> bool {
        self.mode == Mode::Script
    }

    pub fn is_markup(&self) -> bool {
        self.mode == Mode::Markup
    }

    pub fn is_tag(&self) -> bool {
        self.mode == Mode::Tag
    }

    pub fn go_script(&mut self) {
        self.mode = Mode::Script;
    }

    pub fn go_markup(&mut self) {
        self.mode = Mode::Markup;
    }

    pub fn go_tag(&mut self) {
        self.mode = Mode::Tag;
        self.refs = false;
    }

    pub fn capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Start a capture, withholding the sigil and its opening brace.
    pub fn begin(&mut self, capture: Capture) {
        self.capture = Some(capture);
        self.curl = 0;
        self.skip = 2;
    }

    /// End the active capture, withholding the closing brace.
    pub fn end(&mut self) -> Option<Capture> {
        self.curl = 0;
        self.skip = 1;
        self.capture.take()
    }

    /// Tick the skip counter for one visited character. Returns `true` when
    /// the character should be emitted.
    pub fn consume(&mut self) -> bool {
        if self.skip == 0 {
            true
        } else {
            self.skip -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_script_mode() {
        let status = Status::new();
        assert!(status.is_script());
        assert!(!status.capturing());
        assert_eq!(status.skip, 0);
    }

    #[test]
    fn consume_counts_down_then_emits() {
        let mut status = Status::new();
        status.skip = 2;
        assert!(!status.consume());
        assert!(!status.consume());
        assert!(status.consume());
        assert_eq!(status.skip, 0);
    }

    #[test]
    fn begin_and_end_capture() {
        let mut status = Status::new();
        status.begin(Capture::Poke);
        assert_eq!(status.capture, Some(Capture::Poke));
        assert_eq!(status.skip, 2);
        status.curl = 3;
        assert_eq!(status.end(), Some(Capture::Poke));
        assert_eq!(status.curl, 0);
        assert_eq!(status.skip, 1);
        assert!(!status.capturing());
    }

    #[test]
    fn go_tag_resets_reference_marker() {
        let mut status = Status::new();
        status.refs = true;
        status.go_tag();
        assert!(status.is_tag());
        assert!(!status.refs);
    }
}
