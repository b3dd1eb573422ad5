use crate::pos::Pos;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// A template script block appears inside the template being compiled.
    NestedTemplate,
}

impl CompileErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::NestedTemplate => "nested EDBML template",
        }
    }
}

/// A fatal compilation failure. No partial output exists when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub pos: Pos,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind.message(), self.pos)
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = CompileError::new(
            CompileErrorKind::NestedTemplate,
            Pos::new(20, 2, 5),
        );
        assert_eq!(err.to_string(), "nested EDBML template at 2:5");
    }
}
